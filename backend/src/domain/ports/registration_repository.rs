//! Port abstraction for registration persistence adapters.

use async_trait::async_trait;

use crate::domain::{LicensePlate, Registration, RegistrationChanges, SearchQuery, StoreError};

/// Record store access for the registration collection.
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Insert a new registration; fails with [`StoreError::Duplicate`]
    /// when the license plate is already registered.
    async fn insert(&self, registration: &Registration) -> Result<(), StoreError>;

    /// Fetch every registration; order is unspecified.
    async fn list(&self) -> Result<Vec<Registration>, StoreError>;

    /// Fetch registrations whose plate, owner name, or owner address
    /// matches the query.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Registration>, StoreError>;

    /// Merge a partial update into the record with the given plate.
    ///
    /// Returns whether any field actually changed; fails with
    /// [`StoreError::Missing`] when no record matches.
    async fn update(
        &self,
        plate: &LicensePlate,
        changes: &RegistrationChanges,
    ) -> Result<bool, StoreError>;

    /// Delete the record with the given plate; fails with
    /// [`StoreError::Missing`] when no record matches.
    async fn delete(&self, plate: &LicensePlate) -> Result<(), StoreError>;
}
