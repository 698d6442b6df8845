//! Port abstraction for vehicle persistence adapters.

use async_trait::async_trait;

use crate::domain::{LicensePlate, SearchQuery, StoreError, Vehicle, VehicleChanges};

/// Record store access for the vehicle collection.
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Insert a new vehicle; fails with [`StoreError::Duplicate`] when
    /// the license plate is already taken.
    async fn insert(&self, vehicle: &Vehicle) -> Result<(), StoreError>;

    /// Fetch every vehicle; order is unspecified.
    async fn list(&self) -> Result<Vec<Vehicle>, StoreError>;

    /// Fetch vehicles whose make, model, or plate matches the query.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Vehicle>, StoreError>;

    /// Merge a partial update into the record with the given plate.
    ///
    /// Returns whether any field actually changed; fails with
    /// [`StoreError::Missing`] when no record matches.
    async fn update(
        &self,
        plate: &LicensePlate,
        changes: &VehicleChanges,
    ) -> Result<bool, StoreError>;

    /// Delete the record with the given plate; fails with
    /// [`StoreError::Missing`] when no record matches.
    async fn delete(&self, plate: &LicensePlate) -> Result<(), StoreError>;
}
