//! Profile use-cases: lazy creation and merge updates.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::Error;
use super::auth::UserId;
use super::ports::{IdentityProvider, ProfileStore};
use super::profile::{ProfileUpdate, UserProfile};

/// Profile reads and merge-writes for the authenticated practitioner.
pub struct ProfileService {
    profiles: Arc<dyn ProfileStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl ProfileService {
    /// Build the service over its ports.
    pub fn new(profiles: Arc<dyn ProfileStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { profiles, identity }
    }

    /// Fetch the profile, seeding a minimal one from the identity record
    /// when none has been written yet. The seed is not persisted until the
    /// first update.
    ///
    /// # Errors
    ///
    /// Returns an unauthorised error when the session's user no longer
    /// exists at the identity provider, and store errors otherwise.
    pub async fn load_or_create(&self, user_id: &UserId) -> Result<UserProfile, Error> {
        if let Some(profile) = self.profiles.fetch(user_id).await? {
            return Ok(profile);
        }
        let identity = self
            .identity
            .identity(user_id)
            .await?
            .ok_or_else(|| Error::unauthorized("account no longer exists"))?;
        Ok(UserProfile::minimal(
            *user_id,
            identity.display_name,
            identity.email,
            Utc::now(),
        ))
    }

    /// Apply a partial update with merge semantics and persist the result.
    ///
    /// A display-name change is forwarded to the identity provider so the
    /// greeting shown after login stays consistent. A failure there is
    /// logged but does not fail the profile write.
    ///
    /// # Errors
    ///
    /// Propagates load and store failures.
    pub async fn apply_update(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, Error> {
        let mut profile = self.load_or_create(user_id).await?;
        let renamed = update.renames().map(str::to_owned);
        profile.merge(update, Utc::now());
        self.profiles.upsert(profile.clone()).await?;
        if let Some(name) = renamed {
            if let Err(error) = self.identity.update_display_name(user_id, &name).await {
                warn!(%error, user_id = %user_id, "display name sync failed");
            }
        }
        Ok(profile)
    }
}
