//! Failure type shared by every record store port.

use crate::domain::Error;

/// Errors raised by record store adapters.
///
/// Business-rule failures (`Duplicate`, `Missing`) are distinct from
/// storage faults (`Unavailable`) so the boundary can map them to
/// client-error and server-error responses respectively.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A record with the same unique key already exists.
    #[error("a record with key {key} already exists")]
    Duplicate {
        /// Business key of the conflicting record.
        key: String,
    },
    /// No record matches the given key.
    #[error("no record matches key {key}")]
    Missing {
        /// Business key that was looked up.
        key: String,
    },
    /// The underlying store could not serve the operation.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Driver-level failure description, logged but never shown to
        /// callers.
        message: String,
    },
    /// A stored document could not be decoded.
    #[error("stored document is corrupt: {message}")]
    Corrupt {
        /// Decoder failure description.
        message: String,
    },
}

impl StoreError {
    /// Construct a [`StoreError::Duplicate`].
    pub fn duplicate(key: impl Into<String>) -> Self {
        Self::Duplicate { key: key.into() }
    }

    /// Construct a [`StoreError::Missing`].
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }

    /// Construct a [`StoreError::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Construct a [`StoreError::Corrupt`].
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }
}

impl From<StoreError> for Error {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Duplicate { key } => {
                Self::conflict(format!("a record with key {key} already exists"))
            }
            StoreError::Missing { key } => Self::not_found(format!("no record matches key {key}")),
            StoreError::Unavailable { message } => Self::service_unavailable(message),
            StoreError::Corrupt { message } => Self::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(StoreError::duplicate("A123BC77"), ErrorCode::Conflict)]
    #[case(StoreError::missing("A123BC77"), ErrorCode::NotFound)]
    #[case(StoreError::unavailable("io error"), ErrorCode::ServiceUnavailable)]
    #[case(StoreError::corrupt("bad json"), ErrorCode::InternalError)]
    fn maps_to_domain_error_codes(#[case] store: StoreError, #[case] expected: ErrorCode) {
        let err = Error::from(store);
        assert_eq!(err.code(), expected);
    }
}
