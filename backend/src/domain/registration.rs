//! Vehicle registration entity and its validated field types.
//!
//! Registrations share the license-plate key domain with vehicles but
//! are an independent collection; no referential link is enforced.

use std::fmt;
use std::sync::OnceLock;

use chrono::{Datelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vehicle::{LicensePlate, string_newtype_impls};

/// Validation errors returned by registration field constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// Owner name was empty or whitespace.
    #[error("owner name must not be empty")]
    EmptyOwnerName,
    /// Owner name exceeded the maximum length.
    #[error("owner name must be at most {max} characters")]
    OwnerNameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Owner name contained characters outside Latin or Cyrillic
    /// letters, spaces, and hyphens.
    #[error("owner name may only contain letters, spaces, or hyphens")]
    OwnerNameInvalidCharacters,
    /// Owner address was empty or whitespace.
    #[error("owner address must not be empty")]
    EmptyOwnerAddress,
    /// Owner address exceeded the maximum length.
    #[error("owner address must be at most {max} characters")]
    OwnerAddressTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Owner address contained characters outside the accepted set.
    #[error("owner address may only contain letters, digits, spaces, and . , - \\ /")]
    OwnerAddressInvalidCharacters,
    /// Year of manufacture fell outside the accepted range.
    #[error("year of manufacture must be between {min} and {max}")]
    YearOutOfRange {
        /// Earliest accepted year.
        min: i32,
        /// Latest accepted year, the current calendar year.
        max: i32,
    },
}

impl RegistrationValidationError {
    /// Name of the violated field, for error details.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyOwnerName
            | Self::OwnerNameTooLong { .. }
            | Self::OwnerNameInvalidCharacters => "owner_name",
            Self::EmptyOwnerAddress
            | Self::OwnerAddressTooLong { .. }
            | Self::OwnerAddressInvalidCharacters => "owner_address",
            Self::YearOutOfRange { .. } => "year_of_manufacture",
        }
    }
}

/// Maximum length for the owner name.
pub const OWNER_NAME_MAX: usize = 50;
/// Maximum length for the owner address.
pub const OWNER_ADDRESS_MAX: usize = 100;
/// Earliest accepted year of manufacture.
pub const YEAR_MIN: i32 = 1900;

static OWNER_NAME_RE: OnceLock<Regex> = OnceLock::new();
static OWNER_ADDRESS_RE: OnceLock<Regex> = OnceLock::new();

fn owner_name_regex() -> &'static Regex {
    OWNER_NAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains characters.
        Regex::new(r"^[A-Za-zА-Яа-яЁё][A-Za-zА-Яа-яЁё \-]*$")
            .unwrap_or_else(|error| panic!("owner name regex failed to compile: {error}"))
    })
}

fn owner_address_regex() -> &'static Regex {
    OWNER_ADDRESS_RE.get_or_init(|| {
        Regex::new(r"^[А-Яа-яЁёA-Za-z0-9 .,\-\\/]+$")
            .unwrap_or_else(|error| panic!("owner address regex failed to compile: {error}"))
    })
}

/// Name of the registered owner; Latin and Cyrillic are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerName(String);

impl OwnerName {
    /// Validate and construct an [`OwnerName`] from owned input.
    pub fn new(value: impl Into<String>) -> Result<Self, RegistrationValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(RegistrationValidationError::EmptyOwnerName);
        }
        if value.chars().count() > OWNER_NAME_MAX {
            return Err(RegistrationValidationError::OwnerNameTooLong {
                max: OWNER_NAME_MAX,
            });
        }
        if !owner_name_regex().is_match(&value) {
            return Err(RegistrationValidationError::OwnerNameInvalidCharacters);
        }
        Ok(Self(value))
    }
}

/// Postal address of the registered owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerAddress(String);

impl OwnerAddress {
    /// Validate and construct an [`OwnerAddress`] from owned input.
    pub fn new(value: impl Into<String>) -> Result<Self, RegistrationValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(RegistrationValidationError::EmptyOwnerAddress);
        }
        if value.chars().count() > OWNER_ADDRESS_MAX {
            return Err(RegistrationValidationError::OwnerAddressTooLong {
                max: OWNER_ADDRESS_MAX,
            });
        }
        if !owner_address_regex().is_match(&value) {
            return Err(RegistrationValidationError::OwnerAddressInvalidCharacters);
        }
        Ok(Self(value))
    }
}

string_newtype_impls! {
    OwnerName => RegistrationValidationError,
    OwnerAddress => RegistrationValidationError,
}

/// Year the vehicle was manufactured; bounded by the current calendar
/// year at validation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct YearOfManufacture(i32);

impl YearOfManufacture {
    /// Validate and construct a [`YearOfManufacture`].
    pub fn new(value: i32) -> Result<Self, RegistrationValidationError> {
        let max = Utc::now().year();
        if !(YEAR_MIN..=max).contains(&value) {
            return Err(RegistrationValidationError::YearOutOfRange {
                min: YEAR_MIN,
                max,
            });
        }
        Ok(Self(value))
    }

    /// Underlying year value.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for YearOfManufacture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<YearOfManufacture> for i32 {
    fn from(value: YearOfManufacture) -> Self {
        value.0
    }
}

impl TryFrom<i32> for YearOfManufacture {
    type Error = RegistrationValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Vehicle registration record.
///
/// ## Invariants
/// - `license_plate` is unique across the registration collection and
///   never changes after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    id: Uuid,
    license_plate: LicensePlate,
    owner_name: OwnerName,
    owner_address: OwnerAddress,
    year_of_manufacture: YearOfManufacture,
}

impl Registration {
    /// Build a new [`Registration`] with a freshly generated surrogate id.
    pub fn new(
        license_plate: LicensePlate,
        owner_name: OwnerName,
        owner_address: OwnerAddress,
        year_of_manufacture: YearOfManufacture,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            license_plate,
            owner_name,
            owner_address,
            year_of_manufacture,
        }
    }

    /// Internal surrogate identifier, distinct from the business key.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Business key.
    pub fn license_plate(&self) -> &LicensePlate {
        &self.license_plate
    }

    /// Registered owner name.
    pub fn owner_name(&self) -> &OwnerName {
        &self.owner_name
    }

    /// Registered owner address.
    pub fn owner_address(&self) -> &OwnerAddress {
        &self.owner_address
    }

    /// Year the vehicle was manufactured.
    pub fn year_of_manufacture(&self) -> YearOfManufacture {
        self.year_of_manufacture
    }

    /// Field values searched by free-text queries.
    pub fn searchable_fields(&self) -> [&str; 3] {
        [
            self.license_plate.as_ref(),
            self.owner_name.as_ref(),
            self.owner_address.as_ref(),
        ]
    }

    /// Merge a partial update, returning whether anything changed.
    pub fn apply(&mut self, changes: &RegistrationChanges) -> bool {
        let mut changed = false;
        if let Some(owner_name) = &changes.owner_name {
            if owner_name != &self.owner_name {
                self.owner_name = owner_name.clone();
                changed = true;
            }
        }
        if let Some(owner_address) = &changes.owner_address {
            if owner_address != &self.owner_address {
                self.owner_address = owner_address.clone();
                changed = true;
            }
        }
        if let Some(year) = changes.year_of_manufacture {
            if year != self.year_of_manufacture {
                self.year_of_manufacture = year;
                changed = true;
            }
        }
        changed
    }
}

/// Validated subset of registration fields for partial updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationChanges {
    /// Replacement owner name, when present in the payload.
    pub owner_name: Option<OwnerName>,
    /// Replacement owner address, when present in the payload.
    pub owner_address: Option<OwnerAddress>,
    /// Replacement year of manufacture, when present in the payload.
    pub year_of_manufacture: Option<YearOfManufacture>,
}
