//! Identity primitives: user ids, credentials, and sign-up validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its canonical string form.
    ///
    /// # Errors
    ///
    /// Returns the underlying parse error when `raw` is not a UUID.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(raw.as_ref())?))
    }

    /// Mint a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures for credential material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,
    #[error("passwords don't match")]
    PasswordMismatch,
    #[error("display name must not be empty")]
    EmptyDisplayName,
}

const MIN_PASSWORD_LENGTH: usize = 6;

/// A validated, normalised email address.
///
/// Normalisation trims surrounding whitespace and lowercases the value so
/// lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise a raw address.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::InvalidEmail`] when the address has no
    /// `@`, an empty local part, or a domain without a dot.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CredentialError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        let Some((local, domain)) = normalised.split_once('@') else {
            return Err(CredentialError::InvalidEmail);
        };
        let domain_ok = domain.split('.').count() >= 2
            && domain.split('.').all(|label| !label.is_empty())
            && !domain.contains('@');
        if local.is_empty() || !domain_ok {
            return Err(CredentialError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    /// The normalised address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = CredentialError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A password meeting the minimum length requirement.
///
/// Deliberately excluded from `Debug` and `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Validate a raw password.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::PasswordTooShort`] for passwords under
    /// six characters.
    pub fn new(raw: impl Into<String>) -> Result<Self, CredentialError> {
        let raw = raw.into();
        if raw.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CredentialError::PasswordTooShort);
        }
        Ok(Self(raw))
    }

    /// The raw secret, for handing to the identity provider only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Login credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: EmailAddress,
    pub password: Password,
}

impl Credentials {
    /// Validate both parts of a credential pair.
    ///
    /// # Errors
    ///
    /// Propagates the first [`CredentialError`] encountered.
    pub fn try_from_parts(
        email: impl AsRef<str>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            password: Password::new(password)?,
        })
    }
}

/// A validated sign-up submission.
#[derive(Debug, Clone)]
pub struct Signup {
    pub display_name: String,
    pub email: EmailAddress,
    pub password: Password,
}

impl Signup {
    /// Validate a sign-up form, including the password confirmation field.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::PasswordMismatch`] when the confirmation
    /// differs, and propagates field-level validation failures otherwise.
    pub fn try_from_form(
        display_name: impl Into<String>,
        email: impl AsRef<str>,
        password: impl Into<String>,
        confirm_password: impl AsRef<str>,
    ) -> Result<Self, CredentialError> {
        let display_name = display_name.into().trim().to_owned();
        if display_name.is_empty() {
            return Err(CredentialError::EmptyDisplayName);
        }
        let password = password.into();
        if password != confirm_password.as_ref() {
            return Err(CredentialError::PasswordMismatch);
        }
        Ok(Self {
            display_name,
            email: EmailAddress::new(email)?,
            password: Password::new(password)?,
        })
    }
}

/// The identity attached to an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: EmailAddress,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("vaidya@clinic.example", "vaidya@clinic.example")]
    #[case("  Vaidya@Clinic.Example  ", "vaidya@clinic.example")]
    fn email_addresses_are_normalised(#[case] raw: &str, #[case] expected: &str) {
        let email = EmailAddress::new(raw).expect("valid address");
        assert_eq!(email.as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("no-at-sign")]
    #[case("@clinic.example")]
    #[case("vaidya@")]
    #[case("vaidya@nodot")]
    #[case("vaidya@dot..dot")]
    fn malformed_email_addresses_are_rejected(#[case] raw: &str) {
        assert_eq!(
            EmailAddress::new(raw),
            Err(CredentialError::InvalidEmail),
            "{raw:?} should be rejected"
        );
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert_eq!(
            Password::new("12345").expect_err("too short"),
            CredentialError::PasswordTooShort
        );
        assert!(Password::new("123456").is_ok());
    }

    #[test]
    fn password_debug_output_hides_the_secret() {
        let password = Password::new("secret-value").expect("valid");
        assert_eq!(format!("{password:?}"), "Password(***)");
    }

    #[test]
    fn signup_requires_matching_confirmation() {
        let err = Signup::try_from_form("Dr. Meenakshi", "m@clinic.example", "abcdef", "abcdeg")
            .expect_err("mismatch");
        assert_eq!(err, CredentialError::PasswordMismatch);
    }

    #[test]
    fn signup_rejects_blank_display_names() {
        let err = Signup::try_from_form("   ", "m@clinic.example", "abcdef", "abcdef")
            .expect_err("blank name");
        assert_eq!(err, CredentialError::EmptyDisplayName);
    }

    #[test]
    fn user_ids_round_trip_through_strings() {
        let id = UserId::generate();
        let parsed = UserId::new(id.to_string()).expect("canonical form parses");
        assert_eq!(parsed, id);
        assert!(UserId::new("not-a-uuid").is_err());
    }
}
