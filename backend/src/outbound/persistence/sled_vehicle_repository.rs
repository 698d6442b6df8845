//! Sled-backed `VehicleRepository` adapter.

use async_trait::async_trait;

use crate::domain::{
    LicensePlate, SearchQuery, StoreError, Vehicle, VehicleChanges, VehicleRepository,
};

use super::document_store::{Collection, DocumentStore};

/// Vehicle collection stored in the embedded document store.
#[derive(Clone)]
pub struct SledVehicleRepository {
    collection: Collection<Vehicle>,
}

impl SledVehicleRepository {
    /// Open the vehicle collection inside the given store.
    pub fn new(store: &DocumentStore) -> Result<Self, StoreError> {
        Ok(Self {
            collection: store.collection()?,
        })
    }
}

#[async_trait]
impl VehicleRepository for SledVehicleRepository {
    async fn insert(&self, vehicle: &Vehicle) -> Result<(), StoreError> {
        self.collection.insert_unique(vehicle)
    }

    async fn list(&self) -> Result<Vec<Vehicle>, StoreError> {
        self.collection.all()
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Vehicle>, StoreError> {
        self.collection.search(query)
    }

    async fn update(
        &self,
        plate: &LicensePlate,
        changes: &VehicleChanges,
    ) -> Result<bool, StoreError> {
        self.collection
            .modify(plate.as_ref(), |record| record.apply(changes))
    }

    async fn delete(&self, plate: &LicensePlate) -> Result<(), StoreError> {
        self.collection.remove(plate.as_ref())
    }
}
