//! Terminology domain types.
//!
//! Models the vocabularies the portal bridges: the three NAMASTE coding
//! systems used by traditional-medicine practitioners (Ayurveda, Siddha,
//! Unani) and ICD-11, together with the cross-system mapping records
//! returned by the upstream terminology service.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Coding systems the portal can search term-by-term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum System {
    Ayurveda,
    Siddha,
    Unani,
    Icd11,
}

impl System {
    /// Identifier used in URLs and upstream query parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ayurveda => "ayurveda",
            Self::Siddha => "siddha",
            Self::Unani => "unani",
            Self::Icd11 => "icd11",
        }
    }
}

impl std::fmt::Display for System {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for System {
    type Err = UnknownSystem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ayurveda" => Ok(Self::Ayurveda),
            "siddha" => Ok(Self::Siddha),
            "unani" => Ok(Self::Unani),
            "icd11" => Ok(Self::Icd11),
            other => Err(UnknownSystem(other.to_owned())),
        }
    }
}

/// NAMASTE systems a cross-system mapping search can be anchored on.
///
/// ICD-11 is deliberately absent: mappings are always searched from the
/// traditional-medicine side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingSystem {
    Ayurveda,
    Siddha,
    Unani,
}

impl MappingSystem {
    /// Identifier used in URLs and upstream query parameters.
    pub fn as_str(self) -> &'static str {
        System::from(self).as_str()
    }
}

impl From<MappingSystem> for System {
    fn from(value: MappingSystem) -> Self {
        match value {
            MappingSystem::Ayurveda => Self::Ayurveda,
            MappingSystem::Siddha => Self::Siddha,
            MappingSystem::Unani => Self::Unani,
        }
    }
}

impl std::fmt::Display for MappingSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MappingSystem {
    type Err = UnknownSystem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match System::from_str(s)? {
            System::Ayurveda => Ok(Self::Ayurveda),
            System::Siddha => Ok(Self::Siddha),
            System::Unani => Ok(Self::Unani),
            System::Icd11 => Err(UnknownSystem(s.to_owned())),
        }
    }
}

/// Error returned when a system identifier is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown coding system: {0}")]
pub struct UnknownSystem(pub String);

/// Mapping confidence score, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Validate a raw score.
    ///
    /// # Errors
    ///
    /// Returns [`ConfidenceOutOfRange`] when the value is not a finite
    /// number in `[0.0, 1.0]`.
    pub fn try_new(value: f64) -> Result<Self, ConfidenceOutOfRange> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfidenceOutOfRange(value))
        }
    }

    /// Raw score in `[0.0, 1.0]`.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Score rendered as a percentage with one decimal place, e.g. `73.4%`.
    pub fn percent_label(self) -> String {
        format!("{:.1}%", self.0 * 100.0)
    }
}

impl TryFrom<f64> for Confidence {
    type Error = ConfidenceOutOfRange;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

/// Error returned when a confidence score falls outside `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("confidence score {0} is outside [0.0, 1.0]")]
pub struct ConfidenceOutOfRange(pub f64);

/// Lower confidence bound for mapping searches, clamped to `[0.1, 1.0]`.
///
/// Out-of-range client values are clamped rather than rejected so a stale
/// or hand-edited filter still yields results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct MinConfidence(f64);

impl MinConfidence {
    const FLOOR: f64 = 0.1;
    const CEILING: f64 = 1.0;

    /// Clamp a raw value into the accepted range. Non-finite input falls
    /// back to the floor.
    pub fn clamped(value: f64) -> Self {
        if value.is_finite() {
            Self(value.clamp(Self::FLOOR, Self::CEILING))
        } else {
            Self(Self::FLOOR)
        }
    }

    /// The clamped threshold value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for MinConfidence {
    fn default() -> Self {
        Self(Self::FLOOR)
    }
}

impl From<f64> for MinConfidence {
    fn from(value: f64) -> Self {
        Self::clamped(value)
    }
}

impl From<MinConfidence> for f64 {
    fn from(value: MinConfidence) -> Self {
        value.0
    }
}

/// One cell of a mapping row: a coded term in a single NAMASTE system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MappingTerm {
    pub code: String,
    pub english_name: String,
    /// Name in the system's native script (Devanagari, Tamil, or Arabic).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romanized_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The NAMASTE side of a mapping row, one optional term per system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamasteTerms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ayurveda: Option<MappingTerm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub siddha: Option<MappingTerm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unani: Option<MappingTerm>,
}

/// The ICD-11 side of a mapping row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcdMapping {
    pub code: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foundation_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
}

/// A cross-system mapping row as presented to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRecord {
    /// Stable identifier used by the mapping detail endpoint.
    pub mapping_id: String,
    /// System the search was anchored on.
    pub search_system: MappingSystem,
    /// The matched term in the anchor system.
    pub source_term: MappingTerm,
    pub namaste_terms: NamasteTerms,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icd_mapping: Option<IcdMapping>,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuzzy_similarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A single-system search hit, tagged by its coding system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "system", rename_all = "snake_case")]
pub enum Term {
    Ayurveda(AyurvedaTerm),
    Siddha(SiddhaTerm),
    Unani(UnaniTerm),
    Icd11(Icd11Term),
}

impl Term {
    /// The coding system this term belongs to.
    pub fn system(&self) -> System {
        match self {
            Self::Ayurveda(_) => System::Ayurveda,
            Self::Siddha(_) => System::Siddha,
            Self::Unani(_) => System::Unani,
            Self::Icd11(_) => System::Icd11,
        }
    }

    /// The term's code within its system.
    pub fn code(&self) -> &str {
        match self {
            Self::Ayurveda(term) => &term.code,
            Self::Siddha(term) => &term.code,
            Self::Unani(term) => &term.code,
            Self::Icd11(term) => &term.code,
        }
    }
}

/// An Ayurveda (NAMC) term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AyurvedaTerm {
    pub code: String,
    pub english_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hindi_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diacritical_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A Siddha term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiddhaTerm {
    pub code: String,
    pub english_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tamil_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romanized_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A Unani term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaniTerm {
    pub code: String,
    pub english_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arabic_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romanized_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An ICD-11 entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icd11Term {
    pub code: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foundation_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linearization_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_leaf: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icat_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Outcome of a cross-system mapping search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSearchOutcome {
    pub records: Vec<MappingRecord>,
    pub pagination: Pagination,
}

impl MappingSearchOutcome {
    /// Outcome carrying no results, used when the source is unreachable.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            pagination: Pagination::empty(),
        }
    }
}

/// Outcome of a single-system term search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSearchOutcome {
    pub terms: Vec<Term>,
    pub pagination: Pagination,
}

impl TermSearchOutcome {
    /// Outcome carrying no results, used when the source is unreachable.
    pub fn empty() -> Self {
        Self {
            terms: Vec::new(),
            pagination: Pagination::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "0.0%")]
    #[case(0.734, "73.4%")]
    #[case(0.7349, "73.5%")]
    #[case(1.0, "100.0%")]
    fn confidence_renders_one_decimal_percentages(#[case] raw: f64, #[case] expected: &str) {
        let confidence = Confidence::try_new(raw).expect("in range");
        assert_eq!(confidence.percent_label(), expected);
    }

    #[rstest]
    #[case(-0.01)]
    #[case(1.01)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn confidence_rejects_out_of_range_scores(#[case] raw: f64) {
        assert!(Confidence::try_new(raw).is_err());
    }

    #[rstest]
    #[case(0.05, 0.1)]
    #[case(0.1, 0.1)]
    #[case(0.5, 0.5)]
    #[case(1.0, 1.0)]
    #[case(7.0, 1.0)]
    #[case(f64::NAN, 0.1)]
    fn min_confidence_clamps_into_range(#[case] raw: f64, #[case] expected: f64) {
        assert!((MinConfidence::clamped(raw).value() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn system_identifiers_round_trip() {
        for system in [
            System::Ayurveda,
            System::Siddha,
            System::Unani,
            System::Icd11,
        ] {
            assert_eq!(system.as_str().parse::<System>(), Ok(system));
        }
        assert!("homeopathy".parse::<System>().is_err());
    }

    #[test]
    fn icd11_is_not_a_mapping_anchor() {
        assert_eq!("unani".parse::<MappingSystem>(), Ok(MappingSystem::Unani));
        assert!("icd11".parse::<MappingSystem>().is_err());
    }

    #[test]
    fn terms_serialise_with_a_system_tag() {
        let term = Term::Siddha(SiddhaTerm {
            code: "SID-042".to_owned(),
            english_name: "Vali azhal".to_owned(),
            tamil_name: None,
            romanized_name: None,
            description: None,
        });
        let value = serde_json::to_value(&term).expect("serialise");
        assert_eq!(value["system"], "siddha");
        assert_eq!(value["code"], "SID-042");
        let back: Term = serde_json::from_value(value).expect("deserialise");
        assert_eq!(back, term);
    }

    #[test]
    fn confidence_deserialisation_enforces_the_range() {
        let ok: Confidence = serde_json::from_str("0.42").expect("in range");
        assert!((ok.value() - 0.42).abs() < f64::EPSILON);
        assert!(serde_json::from_str::<Confidence>("1.5").is_err());
    }
}
