//! Patient registration use-cases.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use super::Error;
use super::auth::UserId;
use super::dashboard::DashboardSummary;
use super::patient::{PatientDraft, PatientRecord};
use super::ports::PatientStore;

/// Registration submission and dashboard summarisation.
pub struct PatientService {
    patients: Arc<dyn PatientStore>,
}

impl PatientService {
    /// Build the service over its store.
    pub fn new(patients: Arc<dyn PatientStore>) -> Self {
        Self { patients }
    }

    /// Finalise and store a registration draft.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error listing the missing required
    /// fields, or a store error when persistence fails. The caller keeps
    /// the draft in either case, so nothing the practitioner typed is lost.
    pub async fn register(
        &self,
        created_by: UserId,
        draft: &PatientDraft,
    ) -> Result<PatientRecord, Error> {
        let record = draft.finalise(created_by, Utc::now()).map_err(|missing| {
            Error::invalid_request("registration is missing required fields")
                .with_details(json!({ "missingFields": missing }))
        })?;
        self.patients.insert(record.clone()).await?;
        Ok(record)
    }

    /// Summarise the practitioner's registrations for the dashboard.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn dashboard(&self, user_id: &UserId) -> Result<DashboardSummary, Error> {
        let records = self.patients.list_created_by(user_id).await?;
        Ok(DashboardSummary::from_records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::patient::Gender;
    use crate::domain::ports::StoreError;
    use crate::domain::terminology::MappingSystem;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct FixtureStore {
        records: Mutex<Vec<PatientRecord>>,
        insert_fails: bool,
    }

    impl FixtureStore {
        fn new(insert_fails: bool) -> Arc<Self> {
            Arc::new(Self {
                records: Mutex::new(Vec::new()),
                insert_fails,
            })
        }
    }

    #[async_trait]
    impl PatientStore for FixtureStore {
        async fn insert(&self, record: PatientRecord) -> Result<(), StoreError> {
            if self.insert_fails {
                return Err(StoreError::unavailable("disk full"));
            }
            self.records.lock().expect("lock").push(record);
            Ok(())
        }

        async fn list_created_by(
            &self,
            user_id: &UserId,
        ) -> Result<Vec<PatientRecord>, StoreError> {
            Ok(self
                .records
                .lock()
                .expect("lock")
                .iter()
                .filter(|record| record.created_by == *user_id)
                .cloned()
                .collect())
        }
    }

    fn complete_draft() -> PatientDraft {
        PatientDraft {
            full_name: Some("Anitha Raman".to_owned()),
            gender: Some(Gender::Female),
            dob: NaiveDate::from_ymd_opt(1987, 4, 12),
            phone: Some("+91 98400 00000".to_owned()),
            address: Some("12 Temple Street".to_owned()),
            city: Some("Madurai".to_owned()),
            state: Some("Tamil Nadu".to_owned()),
            zip: Some("625001".to_owned()),
            country: Some("India".to_owned()),
            emergency_name: Some("Raman K".to_owned()),
            emergency_relationship: Some("Spouse".to_owned()),
            emergency_phone: Some("+91 98400 00001".to_owned()),
            treatment_system: Some(MappingSystem::Ayurveda),
            ..PatientDraft::default()
        }
    }

    #[tokio::test]
    async fn registration_stores_the_finalised_record() {
        let store = FixtureStore::new(false);
        let service = PatientService::new(store.clone());
        let user_id = UserId::generate();

        let record = service
            .register(user_id, &complete_draft())
            .await
            .expect("complete draft registers");
        assert_eq!(record.created_by, user_id);
        assert_eq!(store.records.lock().expect("lock").len(), 1);
    }

    #[tokio::test]
    async fn missing_fields_are_reported_in_the_error_details() {
        let service = PatientService::new(FixtureStore::new(false));
        let mut draft = complete_draft();
        draft.country = None;
        draft.emergency_phone = Some(String::new());

        let err = service
            .register(UserId::generate(), &draft)
            .await
            .expect_err("incomplete");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let missing = err
            .details()
            .and_then(|details| details["missingFields"].as_array())
            .expect("missing field list");
        assert_eq!(missing.len(), 2);
    }

    #[tokio::test]
    async fn store_failures_surface_without_consuming_the_draft() {
        let service = PatientService::new(FixtureStore::new(true));
        let draft = complete_draft();

        let err = service
            .register(UserId::generate(), &draft)
            .await
            .expect_err("store down");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
        // The borrowed draft is untouched and can be resubmitted.
        assert!(draft.full_name.is_some());
    }

    #[tokio::test]
    async fn the_dashboard_only_counts_the_callers_records() {
        let store = FixtureStore::new(false);
        let service = PatientService::new(store.clone());
        let me = UserId::generate();
        let someone_else = UserId::generate();

        service
            .register(me, &complete_draft())
            .await
            .expect("register");
        service
            .register(someone_else, &complete_draft())
            .await
            .expect("register");

        let summary = service.dashboard(&me).await.expect("summarise");
        assert_eq!(summary.total_patients, 1);
        assert_eq!(summary.system_counts.ayurveda, 1);
    }
}
