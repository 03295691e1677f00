//! Reqwest-backed terminology source adapter.
//!
//! Owns transport details only: URL construction, HTTP error mapping, and
//! JSON decoding into domain records. No request timeout or retry is
//! applied; a slow upstream surfaces as a slow search.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use url::Url;

use super::dto::{MappingsResponseDto, TermsResponseDto};
use crate::domain::ports::{TerminologySource, TerminologySourceError};
use crate::domain::{
    MappingSearchOutcome, MappingSystem, MinConfidence, System, TermSearchOutcome,
};
use pagination::Pagination;

const DEFAULT_USER_AGENT: &str = "ayush-portal/0.1";

/// Configuration failures when building the adapter.
#[derive(Debug, thiserror::Error)]
pub enum SourceConfigError {
    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("terminology base URL cannot be a base: {0}")]
    BaseUrl(Url),
    /// The HTTP client could not be constructed.
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// Terminology source adapter performing GET requests against one base URL.
pub struct TerminologyHttpSource {
    client: Client,
    base_url: Url,
}

impl TerminologyHttpSource {
    /// Build an adapter rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceConfigError`] when the URL cannot take path
    /// segments or the HTTP client fails to build.
    pub fn new(base_url: Url) -> Result<Self, SourceConfigError> {
        if base_url.cannot_be_a_base() {
            return Err(SourceConfigError::BaseUrl(base_url));
        }
        let client = Client::builder().user_agent(DEFAULT_USER_AGENT).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        {
            // new() guarantees the URL can be a base.
            let mut parts = url.path_segments_mut().unwrap_or_else(|()| {
                unreachable!("base URL validated at construction");
            });
            parts.pop_if_empty();
            parts.extend(segments);
            // Upstream routes carry a trailing slash.
            parts.push("");
        }
        url
    }

    async fn get_json<Q, T>(&self, url: Url, query: &Q) -> Result<T, TerminologySourceError>
    where
        Q: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .query(query)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| TerminologySourceError::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| TerminologySourceError::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref())
            .map_err(|error| TerminologySourceError::decode(error.to_string()))
    }
}

#[async_trait]
impl TerminologySource for TerminologyHttpSource {
    async fn search_mappings(
        &self,
        system: MappingSystem,
        query: &str,
        min_confidence: MinConfidence,
    ) -> Result<MappingSearchOutcome, TerminologySourceError> {
        let url = self.endpoint(&["terminologies", "mappings"]);
        let decoded: MappingsResponseDto = self
            .get_json(
                url,
                &[
                    ("system", system.as_str().to_owned()),
                    ("q", query.to_owned()),
                    ("min_confidence", min_confidence.value().to_string()),
                ],
            )
            .await?;
        let (records, pagination) = decoded
            .into_domain(system)
            .map_err(TerminologySourceError::decode)?;
        let pagination =
            pagination.unwrap_or_else(|| Pagination::single_page(records.len() as u64));
        Ok(MappingSearchOutcome {
            records,
            pagination,
        })
    }

    async fn search_terms(
        &self,
        system: System,
        query: &str,
    ) -> Result<TermSearchOutcome, TerminologySourceError> {
        let url = self.endpoint(&["terminologies", system.as_str(), "search"]);
        let decoded: TermsResponseDto = self.get_json(url, &[("q", query)]).await?;
        let (terms, pagination) = decoded.into_domain(system);
        let pagination = pagination.unwrap_or_else(|| Pagination::single_page(terms.len() as u64));
        Ok(TermSearchOutcome { terms, pagination })
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TerminologySourceError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        "no response body".to_owned()
    } else {
        preview
    };
    TerminologySourceError::status(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for non-network mapping helpers and payload decoding.

    use super::*;
    use rstest::rstest;

    fn source(base: &str) -> TerminologyHttpSource {
        let base_url = Url::parse(base).expect("valid URL");
        TerminologyHttpSource::new(base_url).expect("adapter builds")
    }

    #[rstest]
    #[case::bare_host(
        "https://terminology.example",
        "https://terminology.example/terminologies/mappings/"
    )]
    #[case::with_prefix(
        "https://terminology.example/api",
        "https://terminology.example/api/terminologies/mappings/"
    )]
    #[case::trailing_slash(
        "https://terminology.example/api/",
        "https://terminology.example/api/terminologies/mappings/"
    )]
    fn endpoints_join_base_paths_with_a_trailing_slash(#[case] base: &str, #[case] expected: &str) {
        let url = source(base).endpoint(&["terminologies", "mappings"]);
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn opaque_base_urls_are_rejected() {
        let base_url = Url::parse("mailto:ops@example.com").expect("valid URL");
        assert!(matches!(
            TerminologyHttpSource::new(base_url),
            Err(SourceConfigError::BaseUrl(_))
        ));
    }

    #[test]
    fn status_errors_carry_a_compact_body_preview() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"upstream \n   exploded");
        match error {
            TerminologySourceError::Status { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn mapping_payloads_decode_into_domain_records() {
        let body = r#"{
            "results": [
                {
                    "mapping_id": "map-1",
                    "ayurveda": { "code": "AYU-001", "english_name": "Jvara" },
                    "icd_mapping": { "code": "MG26", "title": "Fever of other or unknown origin" },
                    "confidence_score": 0.91,
                    "fuzzy_similarity": 0.88
                },
                {
                    "ayurveda": { "code": "AYU-002" },
                    "confidence_score": 0.42
                }
            ],
            "pagination": {
                "page": 1, "total_pages": 1, "total_results": 2,
                "has_next": false, "has_previous": false
            }
        }"#;

        let decoded: MappingsResponseDto = serde_json::from_slice(body.as_bytes()).expect("json");
        let (records, pagination) = decoded
            .into_domain(MappingSystem::Ayurveda)
            .expect("rows map");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].mapping_id, "map-1");
        assert_eq!(
            records[0].icd_mapping.as_ref().expect("icd side").code,
            "MG26"
        );
        // Fallback id and name when the source omits them.
        assert_eq!(records[1].mapping_id, "ayurveda:AYU-002:1");
        assert_eq!(records[1].source_term.english_name, "AYU-002");
        assert_eq!(pagination.expect("pagination").total_results, 2);
    }

    #[test]
    fn rows_missing_the_anchor_term_fail_to_decode() {
        let body = r#"{
            "results": [
                { "siddha": { "code": "SID-001" }, "confidence_score": 0.5 }
            ]
        }"#;
        let decoded: MappingsResponseDto = serde_json::from_slice(body.as_bytes()).expect("json");
        let error = decoded
            .into_domain(MappingSystem::Ayurveda)
            .expect_err("no ayurveda term");
        assert!(error.contains("no ayurveda term"));
    }

    #[test]
    fn out_of_range_confidence_scores_fail_to_decode() {
        let body = r#"{
            "results": [
                { "unani": { "code": "UNA-001" }, "confidence_score": 1.7 }
            ]
        }"#;
        let decoded: MappingsResponseDto = serde_json::from_slice(body.as_bytes()).expect("json");
        assert!(decoded.into_domain(MappingSystem::Unani).is_err());
    }

    #[test]
    fn term_payloads_decode_with_title_fallback() {
        let body = r#"{
            "results": [
                { "code": "MG26", "title": "Fever of other or unknown origin", "chapter_no": "21" }
            ]
        }"#;
        let decoded: TermsResponseDto = serde_json::from_slice(body.as_bytes()).expect("json");
        let (terms, pagination) = decoded.into_domain(System::Icd11);
        assert!(pagination.is_none());
        match &terms[0] {
            crate::domain::Term::Icd11(term) => {
                assert_eq!(term.title, "Fever of other or unknown origin");
                assert_eq!(term.chapter_no.as_deref(), Some("21"));
            }
            other => panic!("expected an ICD-11 term, got {other:?}"),
        }
    }
}
