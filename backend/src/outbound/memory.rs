//! In-memory document stores and identity provider.
//!
//! These adapters back the portal in development and tests. They hold
//! everything in process memory behind `RwLock`s; a poisoned lock is
//! recovered rather than propagated because the guarded maps cannot be
//! left half-written by any of the operations here.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{
    IdentityError, IdentityProvider, PatientStore, ProfileStore, StoreError,
};
use crate::domain::{
    AuthenticatedUser, Credentials, EmailAddress, PatientRecord, Signup, UserId, UserProfile,
};

/// Profile store holding documents keyed by user id.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn fetch(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        Ok(self
            .profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned())
    }

    async fn upsert(&self, profile: UserProfile) -> Result<(), StoreError> {
        self.profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(profile.user_id, profile);
        Ok(())
    }
}

/// Patient store appending finalised registrations.
#[derive(Default)]
pub struct InMemoryPatientStore {
    records: RwLock<Vec<PatientRecord>>,
}

#[async_trait]
impl PatientStore for InMemoryPatientStore {
    async fn insert(&self, record: PatientRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
        Ok(())
    }

    async fn list_created_by(&self, user_id: &UserId) -> Result<Vec<PatientRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|record| record.created_by == *user_id)
            .cloned()
            .collect())
    }
}

struct Account {
    user_id: UserId,
    display_name: String,
    password: String,
}

/// Identity provider keeping accounts in process memory.
///
/// Email lookups are case-insensitive because [`EmailAddress`] normalises
/// on construction.
#[derive(Default)]
pub struct InMemoryIdentity {
    accounts: RwLock<HashMap<EmailAddress, Account>>,
}

impl InMemoryIdentity {
    fn authenticated(email: &EmailAddress, account: &Account) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: account.user_id,
            email: email.clone(),
            display_name: account.display_name.clone(),
        }
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    async fn sign_up(&self, signup: &Signup) -> Result<AuthenticatedUser, IdentityError> {
        let mut accounts = self
            .accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if accounts.contains_key(&signup.email) {
            return Err(IdentityError::EmailInUse);
        }
        let account = Account {
            user_id: UserId::generate(),
            display_name: signup.display_name.clone(),
            password: signup.password.expose().to_owned(),
        };
        let user = Self::authenticated(&signup.email, &account);
        accounts.insert(signup.email.clone(), account);
        Ok(user)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthenticatedUser, IdentityError> {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        let account = accounts
            .get(&credentials.email)
            .filter(|account| account.password == credentials.password.expose())
            .ok_or(IdentityError::InvalidCredentials)?;
        Ok(Self::authenticated(&credentials.email, account))
    }

    async fn identity(&self, user_id: &UserId) -> Result<Option<AuthenticatedUser>, IdentityError> {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        Ok(accounts
            .iter()
            .find(|(_, account)| account.user_id == *user_id)
            .map(|(email, account)| Self::authenticated(email, account)))
    }

    async fn update_display_name(
        &self,
        user_id: &UserId,
        display_name: &str,
    ) -> Result<(), IdentityError> {
        let mut accounts = self
            .accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(account) = accounts
            .values_mut()
            .find(|account| account.user_id == *user_id)
        {
            account.display_name = display_name.to_owned();
        }
        Ok(())
    }
}
