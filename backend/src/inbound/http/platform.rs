//! Platform metadata HTTP handler.
//!
//! ```text
//! GET /api/v1/platform
//! ```
//!
//! Static information the landing and system pages render: platform name,
//! API version, per-system descriptions, and feature cards. Available
//! without a session.

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::System;

/// One coding system as presented on the landing page.
#[derive(Debug, Serialize, ToSchema)]
pub struct SystemCard {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub benefits: Vec<&'static str>,
}

/// One portal capability as presented on the landing page.
#[derive(Debug, Serialize, ToSchema)]
pub struct FeatureCard {
    pub title: &'static str,
    pub description: &'static str,
}

/// Platform metadata payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformResponse {
    pub name: &'static str,
    pub tagline: &'static str,
    pub version: &'static str,
    pub systems: Vec<SystemCard>,
    pub features: Vec<FeatureCard>,
}

/// Platform name, version, systems, and capabilities.
#[utoipa::path(
    get,
    path = "/api/v1/platform",
    responses((status = 200, description = "Platform metadata", body = PlatformResponse)),
    tags = ["platform"],
    operation_id = "getPlatform"
)]
#[get("/platform")]
pub async fn get_platform() -> web::Json<PlatformResponse> {
    web::Json(PlatformResponse {
        name: "AYUSH Bandhan",
        tagline: "Bridging traditional medicine terminologies with ICD-11",
        version: env!("CARGO_PKG_VERSION"),
        systems: vec![
            SystemCard {
                id: System::Ayurveda.as_str(),
                name: "Ayurveda",
                description: "NAMC-coded Ayurveda terminology with Hindi and \
                              diacritical names alongside English.",
                benefits: vec![
                    "Search by code or English name",
                    "Devanagari and diacritical renderings",
                    "Cross-mapped to ICD-11 entities",
                ],
            },
            SystemCard {
                id: System::Siddha.as_str(),
                name: "Siddha",
                description: "Siddha terminology with Tamil and romanized names.",
                benefits: vec![
                    "Tamil-script names with romanization",
                    "Cross-mapped to ICD-11 entities",
                ],
            },
            SystemCard {
                id: System::Unani.as_str(),
                name: "Unani",
                description: "Unani terminology with Arabic and romanized names.",
                benefits: vec![
                    "Arabic-script names with romanization",
                    "Cross-mapped to ICD-11 entities",
                ],
            },
            SystemCard {
                id: System::Icd11.as_str(),
                name: "ICD-11",
                description: "WHO ICD-11 entities with foundation links and \
                              chapter placement.",
                benefits: vec![
                    "Browse by code or title",
                    "Foundation and browser links",
                ],
            },
        ],
        features: vec![
            FeatureCard {
                title: "Terminology search",
                description: "Search any of the four coding systems and open \
                              full term details.",
            },
            FeatureCard {
                title: "ICD-11 mapping",
                description: "Cross-system mapping rows with confidence scores \
                              and a tunable confidence floor.",
            },
            FeatureCard {
                title: "Patient registration",
                description: "A five-step intake wizard that finalises into a \
                              stored patient record.",
            },
            FeatureCard {
                title: "Practitioner dashboard",
                description: "Registration totals per treatment system and the \
                              most recent patients.",
            },
        ],
    })
}
