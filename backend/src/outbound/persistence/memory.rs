//! In-memory record store for tests and data-directory-less runs.
//!
//! The uniqueness check happens under the write lock, so the
//! check-then-insert gap the on-disk store closes with
//! `compare_and_swap` stays closed here too.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{
    AccountRepository, EmailAddress, LicensePlate, Registration, RegistrationChanges,
    RegistrationRepository, SearchQuery, StoreError, UserAccount, Vehicle, VehicleChanges,
    VehicleRepository,
};

use super::document_store::Document;

/// Lock-protected map of business key to record.
#[derive(Default)]
pub struct InMemoryStore<T> {
    records: RwLock<BTreeMap<String, T>>,
}

fn poisoned() -> StoreError {
    StoreError::unavailable("in-memory store lock poisoned")
}

impl<T: Document> InMemoryStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    fn insert_unique(&self, record: &T) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        if records.contains_key(record.key()) {
            return Err(StoreError::duplicate(record.key()));
        }
        records.insert(record.key().to_owned(), record.clone());
        Ok(())
    }

    fn all(&self) -> Result<Vec<T>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.values().cloned().collect())
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<T>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records
            .values()
            .filter(|record| record.matches(query))
            .cloned()
            .collect())
    }

    fn get(&self, key: &str) -> Result<Option<T>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(key).cloned())
    }

    fn modify(&self, key: &str, merge: impl FnOnce(&mut T) -> bool) -> Result<bool, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let record = records.get_mut(key).ok_or_else(|| StoreError::missing(key))?;
        Ok(merge(record))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        if records.remove(key).is_none() {
            return Err(StoreError::missing(key));
        }
        Ok(())
    }
}

#[async_trait]
impl VehicleRepository for InMemoryStore<Vehicle> {
    async fn insert(&self, vehicle: &Vehicle) -> Result<(), StoreError> {
        self.insert_unique(vehicle)
    }

    async fn list(&self) -> Result<Vec<Vehicle>, StoreError> {
        self.all()
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Vehicle>, StoreError> {
        InMemoryStore::search(self, query)
    }

    async fn update(
        &self,
        plate: &LicensePlate,
        changes: &VehicleChanges,
    ) -> Result<bool, StoreError> {
        self.modify(plate.as_ref(), |record| record.apply(changes))
    }

    async fn delete(&self, plate: &LicensePlate) -> Result<(), StoreError> {
        self.remove(plate.as_ref())
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryStore<Registration> {
    async fn insert(&self, registration: &Registration) -> Result<(), StoreError> {
        self.insert_unique(registration)
    }

    async fn list(&self) -> Result<Vec<Registration>, StoreError> {
        self.all()
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Registration>, StoreError> {
        InMemoryStore::search(self, query)
    }

    async fn update(
        &self,
        plate: &LicensePlate,
        changes: &RegistrationChanges,
    ) -> Result<bool, StoreError> {
        self.modify(plate.as_ref(), |record| record.apply(changes))
    }

    async fn delete(&self, plate: &LicensePlate) -> Result<(), StoreError> {
        self.remove(plate.as_ref())
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore<UserAccount> {
    async fn insert(&self, account: &UserAccount) -> Result<(), StoreError> {
        self.insert_unique(account)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, StoreError> {
        self.get(email.as_ref())
    }
}
