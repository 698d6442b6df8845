//! Sled-backed `RegistrationRepository` adapter.

use async_trait::async_trait;

use crate::domain::{
    LicensePlate, Registration, RegistrationChanges, RegistrationRepository, SearchQuery,
    StoreError,
};

use super::document_store::{Collection, DocumentStore};

/// Registration collection stored in the embedded document store.
#[derive(Clone)]
pub struct SledRegistrationRepository {
    collection: Collection<Registration>,
}

impl SledRegistrationRepository {
    /// Open the registration collection inside the given store.
    pub fn new(store: &DocumentStore) -> Result<Self, StoreError> {
        Ok(Self {
            collection: store.collection()?,
        })
    }
}

#[async_trait]
impl RegistrationRepository for SledRegistrationRepository {
    async fn insert(&self, registration: &Registration) -> Result<(), StoreError> {
        self.collection.insert_unique(registration)
    }

    async fn list(&self) -> Result<Vec<Registration>, StoreError> {
        self.collection.all()
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Registration>, StoreError> {
        self.collection.search(query)
    }

    async fn update(
        &self,
        plate: &LicensePlate,
        changes: &RegistrationChanges,
    ) -> Result<bool, StoreError> {
        self.collection
            .modify(plate.as_ref(), |record| record.apply(changes))
    }

    async fn delete(&self, plate: &LicensePlate) -> Result<(), StoreError> {
        self.collection.remove(plate.as_ref())
    }
}
