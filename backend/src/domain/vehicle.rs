//! Vehicle entity and its validated field types.
//!
//! The license plate is the natural unique key; a generated UUID acts
//! as the internal surrogate id. Every string field is validated by its
//! newtype constructor, so both create and update payloads pass the
//! same rules.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by vehicle field constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VehicleValidationError {
    /// Make was empty or whitespace.
    #[error("make must not be empty")]
    EmptyMake,
    /// Make exceeded the maximum length.
    #[error("make must be at most {max} characters")]
    MakeTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Make contained characters outside letters, spaces, and hyphens.
    #[error("make may only contain letters, spaces, or hyphens")]
    MakeInvalidCharacters,
    /// Model was empty or whitespace.
    #[error("model must not be empty")]
    EmptyModel,
    /// Model exceeded the maximum length.
    #[error("model must be at most {max} characters")]
    ModelTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Model contained characters outside letters, digits, spaces, and
    /// hyphens.
    #[error("model may only contain letters, digits, spaces, or hyphens")]
    ModelInvalidCharacters,
    /// License plate did not match the canonical pattern.
    #[error("license plate must match the pattern A999AA99 or A999AA999")]
    InvalidLicensePlate,
}

impl VehicleValidationError {
    /// Name of the violated field, for error details.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyMake | Self::MakeTooLong { .. } | Self::MakeInvalidCharacters => "make",
            Self::EmptyModel | Self::ModelTooLong { .. } | Self::ModelInvalidCharacters => "model",
            Self::InvalidLicensePlate => "license_plate",
        }
    }
}

/// Maximum length for make and model.
pub const NAME_MAX: usize = 50;

static MAKE_RE: OnceLock<Regex> = OnceLock::new();
static MODEL_RE: OnceLock<Regex> = OnceLock::new();
static PLATE_RE: OnceLock<Regex> = OnceLock::new();

fn make_regex() -> &'static Regex {
    MAKE_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains characters.
        Regex::new(r"^[A-Za-z][A-Za-z \-]*$")
            .unwrap_or_else(|error| panic!("make regex failed to compile: {error}"))
    })
}

fn model_regex() -> &'static Regex {
    MODEL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 \-]*$")
            .unwrap_or_else(|error| panic!("model regex failed to compile: {error}"))
    })
}

fn plate_regex() -> &'static Regex {
    PLATE_RE.get_or_init(|| {
        // Canonical plate format: one letter, three digits, two letters,
        // then a two- or three-digit region code.
        Regex::new(r"^[A-Z]\d{3}[A-Z]{2}\d{2,3}$")
            .unwrap_or_else(|error| panic!("plate regex failed to compile: {error}"))
    })
}

/// Vehicle manufacturer name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Make(String);

impl Make {
    /// Validate and construct a [`Make`] from owned input.
    pub fn new(value: impl Into<String>) -> Result<Self, VehicleValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(VehicleValidationError::EmptyMake);
        }
        if value.chars().count() > NAME_MAX {
            return Err(VehicleValidationError::MakeTooLong { max: NAME_MAX });
        }
        if !make_regex().is_match(&value) {
            return Err(VehicleValidationError::MakeInvalidCharacters);
        }
        Ok(Self(value))
    }
}

/// Vehicle model name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Model(String);

impl Model {
    /// Validate and construct a [`Model`] from owned input.
    pub fn new(value: impl Into<String>) -> Result<Self, VehicleValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(VehicleValidationError::EmptyModel);
        }
        if value.chars().count() > NAME_MAX {
            return Err(VehicleValidationError::ModelTooLong { max: NAME_MAX });
        }
        if !model_regex().is_match(&value) {
            return Err(VehicleValidationError::ModelInvalidCharacters);
        }
        Ok(Self(value))
    }
}

/// Registration plate in the canonical format, the business key shared
/// by vehicles and registrations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicensePlate(String);

impl LicensePlate {
    /// Validate and construct a [`LicensePlate`] from owned input.
    pub fn new(value: impl Into<String>) -> Result<Self, VehicleValidationError> {
        let value = value.into();
        if !plate_regex().is_match(&value) {
            return Err(VehicleValidationError::InvalidLicensePlate);
        }
        Ok(Self(value))
    }
}

macro_rules! string_newtype_impls {
    ($($name:ident => $error:ty),* $(,)?) => {
        $(
            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    self.0.as_str()
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_ref())
                }
            }

            impl From<$name> for String {
                fn from(value: $name) -> Self {
                    value.0
                }
            }

            impl TryFrom<String> for $name {
                type Error = $error;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::new(value)
                }
            }
        )*
    };
}

pub(crate) use string_newtype_impls;

string_newtype_impls! {
    Make => VehicleValidationError,
    Model => VehicleValidationError,
    LicensePlate => VehicleValidationError,
}

/// Tracked vehicle.
///
/// ## Invariants
/// - `license_plate` is unique across the vehicle collection and never
///   changes after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    id: Uuid,
    make: Make,
    model: Model,
    license_plate: LicensePlate,
}

impl Vehicle {
    /// Build a new [`Vehicle`] with a freshly generated surrogate id.
    pub fn new(make: Make, model: Model, license_plate: LicensePlate) -> Self {
        Self {
            id: Uuid::new_v4(),
            make,
            model,
            license_plate,
        }
    }

    /// Internal surrogate identifier, distinct from the business key.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Manufacturer name.
    pub fn make(&self) -> &Make {
        &self.make
    }

    /// Model name.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Business key.
    pub fn license_plate(&self) -> &LicensePlate {
        &self.license_plate
    }

    /// Field values searched by free-text queries.
    pub fn searchable_fields(&self) -> [&str; 3] {
        [
            self.make.as_ref(),
            self.model.as_ref(),
            self.license_plate.as_ref(),
        ]
    }

    /// Merge a partial update, returning whether anything changed.
    ///
    /// The license plate is not part of [`VehicleChanges`]; key
    /// mutation is rejected before reaching the record.
    pub fn apply(&mut self, changes: &VehicleChanges) -> bool {
        let mut changed = false;
        if let Some(make) = &changes.make {
            if make != &self.make {
                self.make = make.clone();
                changed = true;
            }
        }
        if let Some(model) = &changes.model {
            if model != &self.model {
                self.model = model.clone();
                changed = true;
            }
        }
        changed
    }
}

/// Validated subset of vehicle fields for partial updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleChanges {
    /// Replacement make, when present in the payload.
    pub make: Option<Make>,
    /// Replacement model, when present in the payload.
    pub model: Option<Model>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn vehicle(make: &str, model: &str, plate: &str) -> Vehicle {
        Vehicle::new(
            Make::new(make).expect("valid make"),
            Model::new(model).expect("valid model"),
            LicensePlate::new(plate).expect("valid plate"),
        )
    }

    #[rstest]
    #[case("Toyota")]
    #[case("Alfa Romeo")]
    #[case("Mercedes-Benz")]
    fn accepts_valid_makes(#[case] value: &str) {
        assert!(Make::new(value).is_ok());
    }

    #[rstest]
    #[case("", VehicleValidationError::EmptyMake)]
    #[case("   ", VehicleValidationError::EmptyMake)]
    #[case("Toyota!", VehicleValidationError::MakeInvalidCharacters)]
    #[case("4x4 Motors", VehicleValidationError::MakeInvalidCharacters)]
    fn rejects_invalid_makes(#[case] value: &str, #[case] expected: VehicleValidationError) {
        assert_eq!(Make::new(value).expect_err("must fail"), expected);
    }

    #[test]
    fn rejects_overlong_make() {
        let value = "A".repeat(NAME_MAX + 1);
        assert_eq!(
            Make::new(value).expect_err("must fail"),
            VehicleValidationError::MakeTooLong { max: NAME_MAX }
        );
    }

    #[rstest]
    #[case("Corolla")]
    #[case("911 Turbo")]
    #[case("Model-3")]
    fn accepts_valid_models(#[case] value: &str) {
        assert!(Model::new(value).is_ok());
    }

    #[rstest]
    #[case("A123BC77")]
    #[case("X999ZZ199")]
    fn accepts_canonical_plates(#[case] value: &str) {
        assert!(LicensePlate::new(value).is_ok());
    }

    #[rstest]
    #[case("a123bc77")]
    #[case("A123BC7")]
    #[case("A123BC7777")]
    #[case("AB12CD34")]
    #[case("")]
    fn rejects_non_canonical_plates(#[case] value: &str) {
        assert_eq!(
            LicensePlate::new(value).expect_err("must fail"),
            VehicleValidationError::InvalidLicensePlate
        );
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut record = vehicle("Toyota", "Corolla", "A123BC77");
        let changes = VehicleChanges {
            make: None,
            model: Some(Model::new("Camry").expect("valid model")),
        };

        assert!(record.apply(&changes));
        assert_eq!(record.make().as_ref(), "Toyota");
        assert_eq!(record.model().as_ref(), "Camry");
    }

    #[test]
    fn apply_reports_unchanged_when_values_match() {
        let mut record = vehicle("Toyota", "Corolla", "A123BC77");
        let changes = VehicleChanges {
            make: Some(Make::new("Toyota").expect("valid make")),
            model: None,
        };

        assert!(!record.apply(&changes));
    }

    #[test]
    fn serde_validates_fields_on_deserialisation() {
        let raw = r#"{
            "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "make": "Toyota",
            "model": "Corolla",
            "license_plate": "bad plate"
        }"#;
        assert!(serde_json::from_str::<Vehicle>(raw).is_err());
    }
}
