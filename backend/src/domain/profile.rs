//! Practitioner profile aggregate.
//!
//! Profiles are created lazily the first time an authenticated user opens
//! their profile page, and updated with merge semantics: fields absent from
//! an update are preserved, never cleared.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::auth::{EmailAddress, UserId};
use super::patient::Gender;

/// Colour theme preference, kept per browser session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// A practitioner's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    /// Display name, kept in sync with the identity provider's record.
    pub name: String,
    pub email: EmailAddress,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub specialty: Option<String>,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub availability: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// The minimal profile seeded from the identity record.
    pub fn minimal(
        user_id: UserId,
        name: impl Into<String>,
        email: EmailAddress,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            name: name.into(),
            email,
            age: None,
            gender: None,
            dob: None,
            phone: None,
            address: None,
            city: None,
            state: None,
            zip: None,
            specialty: None,
            education: None,
            experience: None,
            availability: None,
            photo_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an update with merge semantics: present fields replace, absent
    /// fields are preserved.
    pub fn merge(&mut self, update: ProfileUpdate, now: DateTime<Utc>) {
        let ProfileUpdate {
            name,
            age,
            gender,
            dob,
            phone,
            address,
            city,
            state,
            zip,
            specialty,
            education,
            experience,
            availability,
            photo_url,
        } = update;
        if let Some(name) = name {
            self.name = name;
        }
        merge_field(&mut self.age, age);
        merge_field(&mut self.gender, gender);
        merge_field(&mut self.dob, dob);
        merge_field(&mut self.phone, phone);
        merge_field(&mut self.address, address);
        merge_field(&mut self.city, city);
        merge_field(&mut self.state, state);
        merge_field(&mut self.zip, zip);
        merge_field(&mut self.specialty, specialty);
        merge_field(&mut self.education, education);
        merge_field(&mut self.experience, experience);
        merge_field(&mut self.availability, availability);
        merge_field(&mut self.photo_url, photo_url);
        self.updated_at = now;
    }
}

fn merge_field<T>(current: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *current = incoming;
    }
}

/// A partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub specialty: Option<String>,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub availability: Option<String>,
    pub photo_url: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update changes the display name.
    pub fn renames(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
