//! Terminology search and detail HTTP handlers.
//!
//! ```text
//! GET /api/v1/mappings/search?system=&q=&min_confidence=
//! GET /api/v1/systems/{system}/search?q=
//! GET /api/v1/details/{system}/{code}
//! GET /api/v1/mapping-details/{mapping_id}
//! ```

use std::str::FromStr;

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    ApiResult, Error, MappingRecord, MappingSearchOutcome, MappingSystem, System, Term,
    TermSearchOutcome,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use pagination::Pagination;

/// Query string for the mapping search endpoint.
#[derive(Debug, Deserialize)]
pub struct MappingSearchParams {
    pub system: String,
    pub q: String,
    pub min_confidence: Option<f64>,
}

/// Query string for the single-system search endpoint.
#[derive(Debug, Deserialize)]
pub struct TermSearchParams {
    pub q: String,
}

/// A mapping row plus its rendered confidence label.
#[derive(Debug, Serialize, ToSchema)]
pub struct MappingRecordView {
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub record: MappingRecord,
    /// Confidence as a one-decimal percentage, e.g. `73.4%`.
    pub confidence_label: String,
}

impl From<MappingRecord> for MappingRecordView {
    fn from(record: MappingRecord) -> Self {
        let confidence_label = record.confidence.percent_label();
        Self {
            record,
            confidence_label,
        }
    }
}

/// Mapping search response envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct MappingSearchResponse {
    pub results: Vec<MappingRecordView>,
    #[schema(value_type = Object)]
    pub pagination: Pagination,
}

impl From<MappingSearchOutcome> for MappingSearchResponse {
    fn from(outcome: MappingSearchOutcome) -> Self {
        Self {
            results: outcome
                .records
                .into_iter()
                .map(MappingRecordView::from)
                .collect(),
            pagination: outcome.pagination,
        }
    }
}

/// Term search response envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct TermSearchResponse {
    #[schema(value_type = Vec<Object>)]
    pub results: Vec<Term>,
    #[schema(value_type = Object)]
    pub pagination: Pagination,
}

impl From<TermSearchOutcome> for TermSearchResponse {
    fn from(outcome: TermSearchOutcome) -> Self {
        Self {
            results: outcome.terms,
            pagination: outcome.pagination,
        }
    }
}

fn parse_system<T: FromStr>(raw: &str) -> Result<T, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request("unknown coding system").with_details(json!({
            "field": "system",
            "value": raw,
        }))
    })
}

/// Search cross-system mappings anchored on a NAMASTE system.
#[utoipa::path(
    get,
    path = "/api/v1/mappings/search",
    params(
        ("system" = String, Query, description = "Anchor system: ayurveda, siddha, or unani"),
        ("q" = String, Query, description = "Search text"),
        ("min_confidence" = Option<f64>, Query, description = "Confidence floor, clamped into [0.1, 1.0]")
    ),
    responses(
        (status = 200, description = "Mapping rows with pagination", body = MappingSearchResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["terminology"],
    operation_id = "searchMappings"
)]
#[get("/mappings/search")]
pub async fn search_mappings(
    state: web::Data<HttpState>,
    params: web::Query<MappingSearchParams>,
) -> ApiResult<web::Json<MappingSearchResponse>> {
    let params = params.into_inner();
    let system: MappingSystem = parse_system(&params.system)?;
    let outcome = state
        .terminology
        .search_mappings(system, &params.q, params.min_confidence)
        .await?;
    Ok(web::Json(MappingSearchResponse::from(outcome)))
}

/// Search terms within one coding system.
#[utoipa::path(
    get,
    path = "/api/v1/systems/{system}/search",
    params(
        ("system" = String, Path, description = "ayurveda, siddha, unani, or icd11"),
        ("q" = String, Query, description = "Search text")
    ),
    responses(
        (status = 200, description = "Terms with pagination", body = TermSearchResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["terminology"],
    operation_id = "searchTerms"
)]
#[get("/systems/{system}/search")]
pub async fn search_terms(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    params: web::Query<TermSearchParams>,
) -> ApiResult<web::Json<TermSearchResponse>> {
    let system: System = parse_system(&path.into_inner())?;
    let outcome = state.terminology.search_terms(system, &params.q).await?;
    Ok(web::Json(TermSearchResponse::from(outcome)))
}

/// Detail view for a term loaded by a recent search.
#[utoipa::path(
    get,
    path = "/api/v1/details/{system}/{code}",
    params(
        ("system" = String, Path, description = "ayurveda, siddha, unani, or icd11"),
        ("code" = String, Path, description = "Term code within the system")
    ),
    responses(
        (status = 200, description = "Term detail", body = Object),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not loaded by any recent search", body = ErrorSchema)
    ),
    tags = ["terminology"],
    operation_id = "termDetails"
)]
#[get("/details/{system}/{code}")]
pub async fn term_details(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Term>> {
    let (raw_system, code) = path.into_inner();
    let system: System = parse_system(&raw_system)?;
    let term = state.terminology.term_details(system, &code)?;
    Ok(web::Json(term))
}

/// Detail view for a mapping row loaded by a recent search.
#[utoipa::path(
    get,
    path = "/api/v1/mapping-details/{mapping_id}",
    params(("mapping_id" = String, Path, description = "Mapping row identifier")),
    responses(
        (status = 200, description = "Mapping detail", body = MappingRecordView),
        (status = 404, description = "Not loaded by any recent search", body = ErrorSchema)
    ),
    tags = ["terminology"],
    operation_id = "mappingDetails"
)]
#[get("/mapping-details/{mapping_id}")]
pub async fn mapping_details(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MappingRecordView>> {
    let record = state.terminology.mapping_details(&path.into_inner())?;
    Ok(web::Json(MappingRecordView::from(record)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::terminology::{MappingTerm, NamasteTerms};
    use crate::domain::{Confidence, ErrorCode};

    #[test]
    fn unknown_systems_map_to_invalid_request() {
        let err = parse_system::<MappingSystem>("icd11").expect_err("not an anchor system");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let err = parse_system::<System>("homeopathy").expect_err("unknown");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(parse_system::<System>("icd11").is_ok());
    }

    #[test]
    fn mapping_views_render_the_confidence_label() {
        let record = MappingRecord {
            mapping_id: "m-1".to_owned(),
            search_system: MappingSystem::Ayurveda,
            source_term: MappingTerm {
                code: "AYU-001".to_owned(),
                english_name: "Jvara".to_owned(),
                local_name: None,
                romanized_name: None,
                description: None,
            },
            namaste_terms: NamasteTerms::default(),
            icd_mapping: None,
            confidence: Confidence::try_new(0.734).expect("in range"),
            fuzzy_similarity: None,
            created_at: None,
        };
        let view = MappingRecordView::from(record);
        assert_eq!(view.confidence_label, "73.4%");
        let value = serde_json::to_value(&view).expect("serialise");
        // Flattened record fields sit alongside the label.
        assert_eq!(value["mapping_id"], "m-1");
        assert_eq!(value["confidence_label"], "73.4%");
    }
}
