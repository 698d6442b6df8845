//! Sled-backed `AccountRepository` adapter.

use async_trait::async_trait;

use crate::domain::{AccountRepository, EmailAddress, StoreError, UserAccount};

use super::document_store::{Collection, DocumentStore};

/// User account collection stored in the embedded document store.
#[derive(Clone)]
pub struct SledAccountRepository {
    collection: Collection<UserAccount>,
}

impl SledAccountRepository {
    /// Open the account collection inside the given store.
    pub fn new(store: &DocumentStore) -> Result<Self, StoreError> {
        Ok(Self {
            collection: store.collection()?,
        })
    }
}

#[async_trait]
impl AccountRepository for SledAccountRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), StoreError> {
        self.collection.insert_unique(account)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, StoreError> {
        self.collection.get(email.as_ref())
    }
}
