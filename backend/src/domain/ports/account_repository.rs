//! Port abstraction for user account persistence adapters.

use async_trait::async_trait;

use crate::domain::{EmailAddress, StoreError, UserAccount};

/// Record store access for the user account collection.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account; fails with [`StoreError::Duplicate`] when
    /// the email is already registered.
    async fn insert(&self, account: &UserAccount) -> Result<(), StoreError>;

    /// Fetch an account by its email key.
    async fn find_by_email(&self, email: &EmailAddress)
    -> Result<Option<UserAccount>, StoreError>;
}
