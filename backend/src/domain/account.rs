//! User account entity and its validated field types.
//!
//! Accounts are keyed by email address. The plaintext password exists
//! only inside request handling; records persist the Argon2 hash.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Validation errors returned by account field constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// A name fell outside the accepted length range.
    #[error("{field} must be between {min} and {max} characters")]
    NameLength {
        /// Which name field was violated.
        field: &'static str,
        /// Minimum accepted length.
        min: usize,
        /// Maximum accepted length.
        max: usize,
    },
    /// The email address is not syntactically valid.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// The password is shorter than the minimum length.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },
}

impl AccountValidationError {
    /// Name of the violated field, for error details.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameLength { field, .. } => field,
            Self::InvalidEmail => "email",
            Self::PasswordTooShort { .. } => "password",
        }
    }
}

/// Minimum length for first and last names.
pub const PERSON_NAME_MIN: usize = 2;
/// Maximum length for first and last names.
pub const PERSON_NAME_MAX: usize = 50;
/// Minimum password length at submission time.
pub const PASSWORD_MIN: usize = 6;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Syntactic check only: one @, no whitespace, dotted domain.
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// First or last name of an account holder.
///
/// Serialisation is transparent; length rules run on the mutation path
/// through [`PersonName::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a [`PersonName`], labelling the field for
    /// error reporting.
    pub fn new(
        value: impl Into<String>,
        field: &'static str,
    ) -> Result<Self, AccountValidationError> {
        let value = value.into();
        let length = value.trim().chars().count();
        if !(PERSON_NAME_MIN..=PERSON_NAME_MAX).contains(&length) {
            return Err(AccountValidationError::NameLength {
                field,
                min: PERSON_NAME_MIN,
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Syntactically valid email address, lower-cased for keying.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`] from owned input.
    pub fn new(value: impl Into<String>) -> Result<Self, AccountValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if !email_regex().is_match(trimmed) {
            return Err(AccountValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Plaintext password accepted at registration or login.
///
/// Zeroised on drop and deliberately not serialisable.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and construct a [`Password`] from owned input.
    pub fn new(value: impl Into<String>) -> Result<Self, AccountValidationError> {
        let value = Zeroizing::new(value.into());
        if value.chars().count() < PASSWORD_MIN {
            return Err(AccountValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(value))
    }

    /// Borrow the plaintext for hashing or verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Opaque one-way password hash in PHC string format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-computed hash string.
    pub fn from_phc_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the PHC string for verification.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Registered user account.
///
/// ## Invariants
/// - `email` is unique across the account collection.
/// - Only the one-way `password_hash` is persisted, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    id: Uuid,
    first_name: PersonName,
    last_name: PersonName,
    email: EmailAddress,
    password_hash: PasswordHash,
}

impl UserAccount {
    /// Build a new [`UserAccount`] with a freshly generated surrogate id.
    pub fn new(
        first_name: PersonName,
        last_name: PersonName,
        email: EmailAddress,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email,
            password_hash,
        }
    }

    /// Internal surrogate identifier, distinct from the business key.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Account holder's first name.
    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// Account holder's last name.
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Business key.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored one-way password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Ada")]
    #[case("Jo")]
    fn accepts_names_within_bounds(#[case] value: &str) {
        assert!(PersonName::new(value, "first_name").is_ok());
    }

    #[rstest]
    #[case("A")]
    #[case("")]
    fn rejects_names_outside_bounds(#[case] value: &str) {
        let err = PersonName::new(value, "first_name").expect_err("must fail");
        assert_eq!(err.field(), "first_name");
    }

    #[rstest]
    #[case("a@b.com", "a@b.com")]
    #[case("  Ada@Example.COM ", "ada@example.com")]
    fn accepts_and_normalises_emails(#[case] input: &str, #[case] expected: &str) {
        let email = EmailAddress::new(input).expect("valid email");
        assert_eq!(email.as_ref(), expected);
    }

    #[rstest]
    #[case("not-an-email")]
    #[case("a@b")]
    #[case("a b@c.com")]
    #[case("")]
    fn rejects_invalid_emails(#[case] value: &str) {
        assert_eq!(
            EmailAddress::new(value).expect_err("must fail"),
            AccountValidationError::InvalidEmail
        );
    }

    #[test]
    fn rejects_short_passwords() {
        assert_eq!(
            Password::new("12345").expect_err("must fail"),
            AccountValidationError::PasswordTooShort { min: PASSWORD_MIN }
        );
        assert!(Password::new("123456").is_ok());
    }

    #[test]
    fn stored_account_serialises_hash_only() {
        let account = UserAccount::new(
            PersonName::new("Ada", "first_name").expect("valid name"),
            PersonName::new("Lovelace", "last_name").expect("valid name"),
            EmailAddress::new("ada@example.com").expect("valid email"),
            PasswordHash::from_phc_string("$argon2id$v=19$stub"),
        );
        let value = serde_json::to_value(&account).expect("serialise account");
        assert_eq!(value["password_hash"], "$argon2id$v=19$stub");
        assert!(value.get("password").is_none());
    }
}
