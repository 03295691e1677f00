//! DTOs for decoding terminology service responses.
//!
//! The adapter decodes into these lenient transport shapes first, then maps
//! into domain records in one pass. Missing optional fields default; a row
//! that cannot be mapped poisons the whole response with a decode error.

use chrono::{DateTime, Utc};
use pagination::Pagination;
use serde::Deserialize;

use crate::domain::{
    Confidence, IcdMapping, MappingRecord, MappingSystem, MappingTerm, NamasteTerms, System, Term,
};
use crate::domain::terminology::{AyurvedaTerm, Icd11Term, SiddhaTerm, UnaniTerm};

#[derive(Debug, Deserialize)]
pub(super) struct MappingsResponseDto {
    #[serde(default)]
    pub(super) results: Vec<MappingRowDto>,
    pub(super) pagination: Option<PaginationDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TermsResponseDto {
    #[serde(default)]
    pub(super) results: Vec<TermDto>,
    pub(super) pagination: Option<PaginationDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PaginationDto {
    #[serde(default = "default_page")]
    pub(super) page: u32,
    #[serde(default)]
    pub(super) total_pages: u32,
    #[serde(default)]
    pub(super) total_results: u64,
    #[serde(default)]
    pub(super) has_next: bool,
    #[serde(default)]
    pub(super) has_previous: bool,
}

fn default_page() -> u32 {
    1
}

impl PaginationDto {
    pub(super) fn into_domain(self) -> Pagination {
        Pagination {
            page: self.page,
            total_pages: self.total_pages,
            total_results: self.total_results,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct MappingRowDto {
    pub(super) mapping_id: Option<String>,
    pub(super) ayurveda: Option<MappingTermDto>,
    pub(super) siddha: Option<MappingTermDto>,
    pub(super) unani: Option<MappingTermDto>,
    pub(super) icd_mapping: Option<IcdMappingDto>,
    pub(super) confidence_score: Option<f64>,
    pub(super) fuzzy_similarity: Option<f64>,
    pub(super) created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct MappingTermDto {
    pub(super) code: String,
    pub(super) english_name: Option<String>,
    pub(super) local_name: Option<String>,
    pub(super) romanized_name: Option<String>,
    pub(super) description: Option<String>,
}

impl MappingTermDto {
    fn into_domain(self) -> MappingTerm {
        let MappingTermDto {
            code,
            english_name,
            local_name,
            romanized_name,
            description,
        } = self;
        let english_name = english_name.unwrap_or_else(|| code.clone());
        MappingTerm {
            code,
            english_name,
            local_name,
            romanized_name,
            description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct IcdMappingDto {
    pub(super) code: String,
    pub(super) title: Option<String>,
    pub(super) foundation_uri: Option<String>,
    pub(super) chapter_no: Option<String>,
    pub(super) similarity_score: Option<f64>,
}

impl IcdMappingDto {
    fn into_domain(self) -> IcdMapping {
        let IcdMappingDto {
            code,
            title,
            foundation_uri,
            chapter_no,
            similarity_score,
        } = self;
        let title = title.unwrap_or_else(|| code.clone());
        IcdMapping {
            code,
            title,
            foundation_uri,
            chapter_no,
            similarity_score,
        }
    }
}

impl MappingsResponseDto {
    pub(super) fn into_domain(
        self,
        system: MappingSystem,
    ) -> Result<(Vec<MappingRecord>, Option<Pagination>), String> {
        let pagination = self.pagination.map(PaginationDto::into_domain);
        let records = self
            .results
            .into_iter()
            .enumerate()
            .map(|(index, row)| row.into_domain(system, index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((records, pagination))
    }
}

impl MappingRowDto {
    fn into_domain(self, system: MappingSystem, index: usize) -> Result<MappingRecord, String> {
        let source_term = match system {
            MappingSystem::Ayurveda => self.ayurveda.clone(),
            MappingSystem::Siddha => self.siddha.clone(),
            MappingSystem::Unani => self.unani.clone(),
        }
        .ok_or_else(|| format!("row {index} has no {system} term"))?;

        let raw_confidence = self
            .confidence_score
            .ok_or_else(|| format!("row {index} has no confidence_score"))?;
        let confidence = Confidence::try_new(raw_confidence)
            .map_err(|error| format!("row {index}: {error}"))?;

        // Stable enough for the session-scoped detail cache when the
        // source omits an id.
        let mapping_id = self
            .mapping_id
            .unwrap_or_else(|| format!("{system}:{}:{index}", source_term.code));

        Ok(MappingRecord {
            mapping_id,
            search_system: system,
            source_term: source_term.into_domain(),
            namaste_terms: NamasteTerms {
                ayurveda: self.ayurveda.map(MappingTermDto::into_domain),
                siddha: self.siddha.map(MappingTermDto::into_domain),
                unani: self.unani.map(MappingTermDto::into_domain),
            },
            icd_mapping: self.icd_mapping.map(IcdMappingDto::into_domain),
            confidence,
            fuzzy_similarity: self.fuzzy_similarity,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TermDto {
    pub(super) code: String,
    pub(super) english_name: Option<String>,
    pub(super) title: Option<String>,
    pub(super) hindi_name: Option<String>,
    pub(super) diacritical_name: Option<String>,
    pub(super) tamil_name: Option<String>,
    pub(super) arabic_name: Option<String>,
    pub(super) romanized_name: Option<String>,
    pub(super) foundation_uri: Option<String>,
    pub(super) linearization_uri: Option<String>,
    pub(super) chapter_no: Option<String>,
    pub(super) is_leaf: Option<bool>,
    pub(super) browser_link: Option<String>,
    pub(super) icat_link: Option<String>,
    pub(super) description: Option<String>,
}

impl TermsResponseDto {
    pub(super) fn into_domain(self, system: System) -> (Vec<Term>, Option<Pagination>) {
        let pagination = self.pagination.map(PaginationDto::into_domain);
        let terms = self
            .results
            .into_iter()
            .map(|term| term.into_domain(system))
            .collect();
        (terms, pagination)
    }
}

impl TermDto {
    fn into_domain(self, system: System) -> Term {
        let name = self
            .english_name
            .clone()
            .or_else(|| self.title.clone())
            .unwrap_or_else(|| self.code.clone());
        match system {
            System::Ayurveda => Term::Ayurveda(AyurvedaTerm {
                code: self.code,
                english_name: name,
                hindi_name: self.hindi_name,
                diacritical_name: self.diacritical_name,
                description: self.description,
            }),
            System::Siddha => Term::Siddha(SiddhaTerm {
                code: self.code,
                english_name: name,
                tamil_name: self.tamil_name,
                romanized_name: self.romanized_name,
                description: self.description,
            }),
            System::Unani => Term::Unani(UnaniTerm {
                code: self.code,
                english_name: name,
                arabic_name: self.arabic_name,
                romanized_name: self.romanized_name,
                description: self.description,
            }),
            System::Icd11 => Term::Icd11(Icd11Term {
                code: self.code,
                title: name,
                foundation_uri: self.foundation_uri,
                linearization_uri: self.linearization_uri,
                chapter_no: self.chapter_no,
                is_leaf: self.is_leaf,
                browser_link: self.browser_link,
                icat_link: self.icat_link,
                description: self.description,
            }),
        }
    }
}
