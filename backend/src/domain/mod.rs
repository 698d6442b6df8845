//! Domain entities, validation rules, and persistence ports.
//!
//! Purpose: define strongly typed records used by the HTTP and
//! persistence layers. Field newtypes validate on construction, so the
//! same rules run on create and on update payloads. Types stay
//! transport and storage agnostic; adapters live in `inbound` and
//! `outbound`.

pub mod account;
pub mod error;
pub mod ports;
pub mod registration;
pub mod search;
pub mod vehicle;

pub use self::account::{
    AccountValidationError, EmailAddress, Password, PasswordHash, PersonName, UserAccount,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ports::{AccountRepository, RegistrationRepository, StoreError, VehicleRepository};
pub use self::registration::{
    OwnerAddress, OwnerName, Registration, RegistrationChanges, RegistrationValidationError,
    YearOfManufacture,
};
pub use self::search::SearchQuery;
pub use self::vehicle::{
    LicensePlate, Make, Model, Vehicle, VehicleChanges, VehicleValidationError,
};

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
