//! Patient registration: the intake wizard draft and the finalised record.
//!
//! Registration is collected over a five-step wizard. Every field is
//! optional while the draft is in flight; the required set is enforced only
//! when the draft is finalised into a [`PatientRecord`].

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth::UserId;
use super::terminology::MappingSystem;

/// Self-reported gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

/// The wizard's five pages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    Personal,
    Contact,
    Medical,
    Emergency,
    Insurance,
}

impl IntakeStep {
    /// All steps in wizard order.
    pub const ALL: [Self; 5] = [
        Self::Personal,
        Self::Contact,
        Self::Medical,
        Self::Emergency,
        Self::Insurance,
    ];

    /// Zero-based position within the wizard.
    pub fn index(self) -> usize {
        match self {
            Self::Personal => 0,
            Self::Contact => 1,
            Self::Medical => 2,
            Self::Emergency => 3,
            Self::Insurance => 4,
        }
    }

    /// The following step, saturating at the last page.
    pub fn next(self) -> Self {
        Self::ALL
            .get(self.index() + 1)
            .copied()
            .unwrap_or(Self::Insurance)
    }

    /// The preceding step, saturating at the first page.
    pub fn back(self) -> Self {
        match self.index().checked_sub(1) {
            Some(previous) => Self::ALL[previous],
            None => Self::Personal,
        }
    }

    /// Whether this is the final page, from which submission is allowed.
    pub fn is_last(self) -> bool {
        self == Self::Insurance
    }
}

/// An in-progress registration. All fields optional until submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientDraft {
    // Personal
    pub full_name: Option<String>,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    pub national_id: Option<String>,
    pub blood_group: Option<String>,
    // Contact
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    // Medical
    pub allergies: Option<String>,
    pub chronic_illnesses: Option<String>,
    pub current_medications: Option<String>,
    pub past_medical_history: Option<String>,
    pub family_medical_history: Option<String>,
    pub vaccination_history: Option<String>,
    /// Traditional-medicine system the patient is registered under.
    pub treatment_system: Option<MappingSystem>,
    // Emergency contact
    pub emergency_name: Option<String>,
    pub emergency_relationship: Option<String>,
    pub emergency_phone: Option<String>,
    // Insurance
    pub insurance_provider: Option<String>,
    pub policy_number: Option<String>,
    pub validity: Option<String>,
    pub insurance_contact: Option<String>,
}

/// A finalised, stored registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub patient_id: Uuid,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub full_name: String,
    pub gender: Gender,
    pub dob: NaiveDate,
    /// Completed years at registration time, when at least one.
    pub age: Option<u32>,
    pub national_id: Option<String>,
    pub blood_group: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub allergies: Option<String>,
    pub chronic_illnesses: Option<String>,
    pub current_medications: Option<String>,
    pub past_medical_history: Option<String>,
    pub family_medical_history: Option<String>,
    pub vaccination_history: Option<String>,
    pub treatment_system: Option<MappingSystem>,
    pub emergency_name: String,
    pub emergency_relationship: String,
    pub emergency_phone: String,
    pub insurance_provider: Option<String>,
    pub policy_number: Option<String>,
    pub validity: Option<String>,
    pub insurance_contact: Option<String>,
}

/// Completed years of age on `today`, or `None` when under one year.
///
/// The year difference is decremented when the birthday has not yet come
/// round this year.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    u32::try_from(years).ok().filter(|&age| age > 0)
}

fn present(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl PatientDraft {
    /// Field names (as clients know them) still required before submission.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !present(self.full_name.as_ref()) {
            missing.push("fullName");
        }
        if self.gender.is_none() {
            missing.push("gender");
        }
        if self.dob.is_none() {
            missing.push("dob");
        }
        for (value, name) in [
            (&self.phone, "phone"),
            (&self.address, "address"),
            (&self.city, "city"),
            (&self.state, "state"),
            (&self.zip, "zip"),
            (&self.country, "country"),
            (&self.emergency_name, "emergencyName"),
            (&self.emergency_relationship, "emergencyRelationship"),
            (&self.emergency_phone, "emergencyPhone"),
        ] {
            if !present(value.as_ref()) {
                missing.push(name);
            }
        }
        missing
    }

    /// Finalise the draft into a stored record.
    ///
    /// # Errors
    ///
    /// Returns the list of missing required field names when the draft is
    /// incomplete. The draft itself is left untouched.
    pub fn finalise(
        &self,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Result<PatientRecord, Vec<&'static str>> {
        let missing = self.missing_required_fields();
        if !missing.is_empty() {
            return Err(missing);
        }
        let dob = self.dob.ok_or(vec!["dob"])?;
        Ok(PatientRecord {
            patient_id: Uuid::new_v4(),
            created_by,
            created_at: now,
            full_name: self.full_name.clone().unwrap_or_default(),
            gender: self.gender.ok_or(vec!["gender"])?,
            dob,
            age: age_on(dob, now.date_naive()),
            national_id: self.national_id.clone(),
            blood_group: self.blood_group.clone(),
            phone: self.phone.clone().unwrap_or_default(),
            email: self.email.clone(),
            address: self.address.clone().unwrap_or_default(),
            city: self.city.clone().unwrap_or_default(),
            state: self.state.clone().unwrap_or_default(),
            zip: self.zip.clone().unwrap_or_default(),
            country: self.country.clone().unwrap_or_default(),
            allergies: self.allergies.clone(),
            chronic_illnesses: self.chronic_illnesses.clone(),
            current_medications: self.current_medications.clone(),
            past_medical_history: self.past_medical_history.clone(),
            family_medical_history: self.family_medical_history.clone(),
            vaccination_history: self.vaccination_history.clone(),
            treatment_system: self.treatment_system,
            emergency_name: self.emergency_name.clone().unwrap_or_default(),
            emergency_relationship: self.emergency_relationship.clone().unwrap_or_default(),
            emergency_phone: self.emergency_phone.clone().unwrap_or_default(),
            insurance_provider: self.insurance_provider.clone(),
            policy_number: self.policy_number.clone(),
            validity: self.validity.clone(),
            insurance_contact: self.insurance_contact.clone(),
        })
    }
}

/// Wizard state held in the practitioner's session between requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeWizard {
    pub step: IntakeStep,
    pub draft: PatientDraft,
}

impl IntakeWizard {
    /// A fresh wizard positioned at the first page with an empty draft.
    pub fn fresh() -> Self {
        Self {
            step: IntakeStep::Personal,
            draft: PatientDraft::default(),
        }
    }
}

impl Default for IntakeWizard {
    fn default() -> Self {
        Self::fresh()
    }
}
