//! Outbound ports the domain services depend on.
//!
//! Adapters (the HTTP terminology client and the in-memory document stores)
//! implement these traits; services hold them as `Arc<dyn ...>` so tests can
//! substitute fixtures without I/O.

use async_trait::async_trait;
use thiserror::Error;

use super::auth::{AuthenticatedUser, Credentials, Signup, UserId};
use super::patient::PatientRecord;
use super::profile::UserProfile;
use super::terminology::{
    MappingSearchOutcome, MappingSystem, MinConfidence, System, TermSearchOutcome,
};
use super::{Error, ErrorCode};

/// Read access to the upstream terminology service.
#[async_trait]
pub trait TerminologySource: Send + Sync {
    /// Search cross-system mappings anchored on a NAMASTE system.
    async fn search_mappings(
        &self,
        system: MappingSystem,
        query: &str,
        min_confidence: MinConfidence,
    ) -> Result<MappingSearchOutcome, TerminologySourceError>;

    /// Search terms within a single coding system.
    async fn search_terms(
        &self,
        system: System,
        query: &str,
    ) -> Result<TermSearchOutcome, TerminologySourceError>;
}

/// Failures reaching or interpreting the upstream terminology service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerminologySourceError {
    /// The request never produced a response.
    #[error("terminology source transport failure: {message}")]
    Transport { message: String },
    /// The source answered with a non-success status.
    #[error("terminology source returned status {status}: {message}")]
    Status { status: u16, message: String },
    /// The response body could not be decoded into domain records.
    #[error("terminology source payload invalid: {message}")]
    Decode { message: String },
}

impl TerminologySourceError {
    /// Transport-level failure.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Non-success HTTP status.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Undecodable payload.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Persistence for practitioner profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a profile, if one has been written.
    async fn fetch(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError>;

    /// Write a profile, replacing any previous version.
    async fn upsert(&self, profile: UserProfile) -> Result<(), StoreError>;
}

/// Persistence for finalised patient registrations.
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// Store a finalised registration.
    async fn insert(&self, record: PatientRecord) -> Result<(), StoreError>;

    /// All registrations created by the given practitioner.
    async fn list_created_by(&self, user_id: &UserId) -> Result<Vec<PatientRecord>, StoreError>;
}

/// Failures inside a document store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
    /// A stored document could not be read back.
    #[error("stored document invalid: {message}")]
    Serialization { message: String },
}

impl StoreError {
    /// Store unreachable.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Stored document undecodable.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable { message } => {
                tracing::error!(%message, "document store unavailable");
                Self::service_unavailable("storage temporarily unavailable")
            }
            StoreError::Serialization { message } => {
                tracing::error!(%message, "stored document could not be decoded");
                Self::internal("stored document could not be read")
            }
        }
    }
}

/// Account management and credential verification.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and return the signed-in identity.
    async fn sign_up(&self, signup: &Signup) -> Result<AuthenticatedUser, IdentityError>;

    /// Verify credentials and return the identity.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthenticatedUser, IdentityError>;

    /// Look up the identity behind a session's user id.
    async fn identity(&self, user_id: &UserId) -> Result<Option<AuthenticatedUser>, IdentityError>;

    /// Update the display name held on the identity record.
    async fn update_display_name(
        &self,
        user_id: &UserId,
        display_name: &str,
    ) -> Result<(), IdentityError>;
}

/// Failures from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// An account already exists for the email address.
    #[error("email address already registered")]
    EmailInUse,
    /// The email/password pair did not verify.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The provider could not be reached.
    #[error("identity provider unavailable: {message}")]
    Unavailable { message: String },
}

impl IdentityError {
    /// Provider unreachable.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

impl From<IdentityError> for Error {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::EmailInUse => Self::conflict("email address already registered"),
            IdentityError::InvalidCredentials => Self::unauthorized("invalid email or password"),
            IdentityError::Unavailable { message } => {
                tracing::error!(%message, "identity provider unavailable");
                Self::service_unavailable("sign-in temporarily unavailable")
            }
        }
    }
}
