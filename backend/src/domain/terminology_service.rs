//! Terminology search use-cases.
//!
//! Wraps the [`TerminologySource`] port with the portal's policies: query
//! validation, confidence clamping, pagination sanity checks, and the
//! degradation rule that an unreachable source yields an empty result set
//! rather than a failed page.
//!
//! Successful searches populate an in-memory detail cache so the detail
//! endpoints can serve the exact row the practitioner clicked without a
//! second upstream round trip.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use pagination::Pagination;
use serde_json::json;
use tracing::warn;

use super::Error;
use super::ports::TerminologySource;
use super::terminology::{
    MappingRecord, MappingSearchOutcome, MappingSystem, MinConfidence, System, Term,
    TermSearchOutcome,
};

/// Cache of rows returned by recent searches, keyed for the detail pages.
///
/// Entries live until overwritten by a later search for the same key; a
/// miss simply asks the client to search again.
#[derive(Default)]
pub struct DetailCache {
    terms: RwLock<HashMap<(System, String), Term>>,
    mappings: RwLock<HashMap<String, MappingRecord>>,
}

impl DetailCache {
    fn store_terms(&self, terms: &[Term]) {
        let mut guard = self
            .terms
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for term in terms {
            guard.insert((term.system(), term.code().to_owned()), term.clone());
        }
    }

    fn store_mappings(&self, records: &[MappingRecord]) {
        let mut guard = self
            .mappings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for record in records {
            guard.insert(record.mapping_id.clone(), record.clone());
        }
    }

    fn term(&self, system: System, code: &str) -> Option<Term> {
        self.terms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(system, code.to_owned()))
            .cloned()
    }

    fn mapping(&self, mapping_id: &str) -> Option<MappingRecord> {
        self.mappings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(mapping_id)
            .cloned()
    }
}

/// Terminology search and detail lookups.
pub struct TerminologyService {
    source: Arc<dyn TerminologySource>,
    cache: DetailCache,
}

impl TerminologyService {
    /// Build the service over a terminology source.
    pub fn new(source: Arc<dyn TerminologySource>) -> Self {
        Self {
            source,
            cache: DetailCache::default(),
        }
    }

    /// Search cross-system mappings.
    ///
    /// The query must be non-empty once trimmed. `min_confidence` is
    /// clamped into `[0.1, 1.0]`, defaulting to the floor when absent.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error for a blank query. Upstream
    /// failures are logged and collapse to an empty outcome.
    pub async fn search_mappings(
        &self,
        system: MappingSystem,
        query: &str,
        min_confidence: Option<f64>,
    ) -> Result<MappingSearchOutcome, Error> {
        let query = validated_query(query)?;
        let min_confidence = min_confidence.map_or_else(MinConfidence::default, MinConfidence::clamped);
        let mut outcome = match self
            .source
            .search_mappings(system, query, min_confidence)
            .await
        {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(%error, system = %system, "mapping search failed, returning no results");
                return Ok(MappingSearchOutcome::empty());
            }
        };
        outcome.pagination = checked_pagination(outcome.pagination, outcome.records.len());
        self.cache.store_mappings(&outcome.records);
        Ok(outcome)
    }

    /// Search terms within one coding system.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error for a blank query. Upstream
    /// failures are logged and collapse to an empty outcome.
    pub async fn search_terms(
        &self,
        system: System,
        query: &str,
    ) -> Result<TermSearchOutcome, Error> {
        let query = validated_query(query)?;
        let mut outcome = match self.source.search_terms(system, query).await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(%error, system = %system, "term search failed, returning no results");
                return Ok(TermSearchOutcome::empty());
            }
        };
        outcome.pagination = checked_pagination(outcome.pagination, outcome.terms.len());
        self.cache.store_terms(&outcome.terms);
        Ok(outcome)
    }

    /// Fetch a term previously returned by a search.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no recent search produced the term.
    pub fn term_details(&self, system: System, code: &str) -> Result<Term, Error> {
        self.cache.term(system, code).ok_or_else(|| {
            Error::not_found("term not found; run a search to load it")
                .with_details(json!({ "system": system.as_str(), "code": code }))
        })
    }

    /// Fetch a mapping row previously returned by a search.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no recent search produced the row.
    pub fn mapping_details(&self, mapping_id: &str) -> Result<MappingRecord, Error> {
        self.cache.mapping(mapping_id).ok_or_else(|| {
            Error::not_found("mapping not found; run a search to load it")
                .with_details(json!({ "mappingId": mapping_id }))
        })
    }
}

fn validated_query(query: &str) -> Result<&str, Error> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(
            Error::invalid_request("search query must not be empty")
                .with_details(json!({ "field": "q" })),
        );
    }
    Ok(trimmed)
}

fn checked_pagination(pagination: Pagination, returned: usize) -> Pagination {
    match pagination.validate_for(returned) {
        Ok(()) => pagination,
        Err(error) => {
            warn!(%error, "inconsistent pagination from terminology source");
            Pagination::single_page(returned as u64)
        }
    }
}
