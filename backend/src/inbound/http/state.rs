//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend
//! only on domain services and ports, and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{IdentityProvider, PatientStore, ProfileStore, TerminologySource};
use crate::domain::{PatientService, ProfileService, TerminologyService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub terminology: Arc<TerminologyService>,
    pub profiles: Arc<ProfileService>,
    pub patients: Arc<PatientService>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl HttpState {
    /// Wire the services over their ports.
    pub fn new(
        source: Arc<dyn TerminologySource>,
        profile_store: Arc<dyn ProfileStore>,
        patient_store: Arc<dyn PatientStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            terminology: Arc::new(TerminologyService::new(source)),
            profiles: Arc::new(ProfileService::new(profile_store, identity.clone())),
            patients: Arc::new(PatientService::new(patient_store)),
            identity,
        }
    }
}
