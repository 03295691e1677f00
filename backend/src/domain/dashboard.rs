//! Dashboard read model derived from stored patient records.
//!
//! Per-system counts come from each record's `treatment_system`
//! classification, so the figures reflect actual registrations.

use serde::{Deserialize, Serialize};

use super::patient::PatientRecord;
use super::terminology::MappingSystem;

/// How many recent registrations the dashboard lists.
pub const RECENT_PATIENT_LIMIT: usize = 5;

/// Registrations per traditional-medicine system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemCounts {
    pub ayurveda: u64,
    pub siddha: u64,
    pub unani: u64,
    /// Records registered without a treatment system.
    pub unassigned: u64,
}

impl SystemCounts {
    fn record(&mut self, system: Option<MappingSystem>) {
        match system {
            Some(MappingSystem::Ayurveda) => self.ayurveda += 1,
            Some(MappingSystem::Siddha) => self.siddha += 1,
            Some(MappingSystem::Unani) => self.unani += 1,
            None => self.unassigned += 1,
        }
    }
}

/// The practitioner dashboard payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_patients: u64,
    pub system_counts: SystemCounts,
    /// Most recent registrations, newest first.
    pub recent_patients: Vec<PatientRecord>,
}

impl DashboardSummary {
    /// Summarise a practitioner's registrations.
    pub fn from_records(mut records: Vec<PatientRecord>) -> Self {
        let total_patients = records.len() as u64;
        let mut system_counts = SystemCounts::default();
        for record in &records {
            system_counts.record(record.treatment_system);
        }
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(RECENT_PATIENT_LIMIT);
        Self {
            total_patients,
            system_counts,
            recent_patients: records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::UserId;
    use crate::domain::patient::{Gender, PatientDraft};
    use chrono::{Duration, NaiveDate, Utc};

    fn record(system: Option<MappingSystem>, minutes_ago: i64) -> PatientRecord {
        let draft = PatientDraft {
            full_name: Some(format!("Patient {minutes_ago}")),
            gender: Some(Gender::Other),
            dob: NaiveDate::from_ymd_opt(1990, 1, 1),
            phone: Some("1".to_owned()),
            address: Some("a".to_owned()),
            city: Some("c".to_owned()),
            state: Some("s".to_owned()),
            zip: Some("z".to_owned()),
            country: Some("in".to_owned()),
            emergency_name: Some("e".to_owned()),
            emergency_relationship: Some("r".to_owned()),
            emergency_phone: Some("p".to_owned()),
            treatment_system: system,
            ..PatientDraft::default()
        };
        draft
            .finalise(
                UserId::generate(),
                Utc::now() - Duration::minutes(minutes_ago),
            )
            .expect("fixture draft is complete")
    }

    #[test]
    fn counts_follow_the_treatment_system_classification() {
        let summary = DashboardSummary::from_records(vec![
            record(Some(MappingSystem::Ayurveda), 1),
            record(Some(MappingSystem::Ayurveda), 2),
            record(Some(MappingSystem::Unani), 3),
            record(None, 4),
        ]);
        assert_eq!(summary.total_patients, 4);
        assert_eq!(summary.system_counts.ayurveda, 2);
        assert_eq!(summary.system_counts.siddha, 0);
        assert_eq!(summary.system_counts.unani, 1);
        assert_eq!(summary.system_counts.unassigned, 1);
    }

    #[test]
    fn recent_patients_are_newest_first_and_capped() {
        let records: Vec<_> = (0..8)
            .map(|i| record(Some(MappingSystem::Siddha), i))
            .collect();
        let summary = DashboardSummary::from_records(records);
        assert_eq!(summary.recent_patients.len(), RECENT_PATIENT_LIMIT);
        let times: Vec<_> = summary
            .recent_patients
            .iter()
            .map(|r| r.created_at)
            .collect();
        assert!(times.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn an_empty_store_summarises_to_zeroes() {
        let summary = DashboardSummary::from_records(Vec::new());
        assert_eq!(summary.total_patients, 0);
        assert_eq!(summary.system_counts, SystemCounts::default());
        assert!(summary.recent_patients.is_empty());
    }
}
