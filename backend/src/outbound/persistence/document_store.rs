//! Embedded document store built on sled.
//!
//! One tree per collection, one JSON document per record, keyed by the
//! record's business key. The tree names mirror the collections of the
//! system this replaces: `cars`, `registrations`, `users`.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{Registration, SearchQuery, StoreError, UserAccount, Vehicle};

/// A record type that can live in a [`DocumentStore`] collection.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection (tree) name holding records of this type.
    const COLLECTION: &'static str;

    /// Business key the record is stored under.
    fn key(&self) -> &str;

    /// Whether a free-text query matches this record.
    fn matches(&self, query: &SearchQuery) -> bool;
}

impl Document for Vehicle {
    const COLLECTION: &'static str = "cars";

    fn key(&self) -> &str {
        self.license_plate().as_ref()
    }

    fn matches(&self, query: &SearchQuery) -> bool {
        query.matches_any(self.searchable_fields())
    }
}

impl Document for Registration {
    const COLLECTION: &'static str = "registrations";

    fn key(&self) -> &str {
        self.license_plate().as_ref()
    }

    fn matches(&self, query: &SearchQuery) -> bool {
        query.matches_any(self.searchable_fields())
    }
}

impl Document for UserAccount {
    const COLLECTION: &'static str = "users";

    fn key(&self) -> &str {
        self.email().as_ref()
    }

    // Accounts are not exposed to free-text search.
    fn matches(&self, _query: &SearchQuery) -> bool {
        false
    }
}

/// Handle to the on-disk store; cheap to clone and share.
#[derive(Clone)]
pub struct DocumentStore {
    db: sled::Db,
}

impl DocumentStore {
    /// Open (or create) the store at the given directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|err| StoreError::unavailable(err.to_string()))?;
        Ok(Self { db })
    }

    /// Open the collection for a document type.
    pub fn collection<T: Document>(&self) -> Result<Collection<T>, StoreError> {
        let tree = self
            .db
            .open_tree(T::COLLECTION)
            .map_err(|err| StoreError::unavailable(err.to_string()))?;
        Ok(Collection {
            tree,
            _marker: std::marker::PhantomData,
        })
    }
}

/// Typed view over one sled tree.
#[derive(Clone)]
pub struct Collection<T> {
    tree: sled::Tree,
    _marker: std::marker::PhantomData<fn() -> T>,
}

fn unavailable(err: sled::Error) -> StoreError {
    StoreError::unavailable(err.to_string())
}

impl<T: Document> Collection<T> {
    /// Insert a record if and only if its key is absent.
    ///
    /// `compare_and_swap` against an empty slot makes the uniqueness
    /// check and the write a single atomic step.
    pub fn insert_unique(&self, record: &T) -> Result<(), StoreError> {
        let bytes = encode(record)?;
        let outcome = self
            .tree
            .compare_and_swap(record.key().as_bytes(), None::<&[u8]>, Some(bytes))
            .map_err(unavailable)?;
        if outcome.is_err() {
            return Err(StoreError::duplicate(record.key()));
        }
        self.flush()
    }

    /// Fetch every record in the collection.
    pub fn all(&self) -> Result<Vec<T>, StoreError> {
        self.tree
            .iter()
            .map(|entry| {
                let (_, bytes) = entry.map_err(unavailable)?;
                decode(&bytes)
            })
            .collect()
    }

    /// Fetch records matching a free-text query.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<T>, StoreError> {
        let mut hits = self.all()?;
        hits.retain(|record| record.matches(query));
        Ok(hits)
    }

    /// Fetch a record by key.
    pub fn get(&self, key: &str) -> Result<Option<T>, StoreError> {
        self.tree
            .get(key.as_bytes())
            .map_err(unavailable)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    /// Load the record at `key`, apply `merge`, and persist it when
    /// the merge reports a change. Returns whether anything changed.
    pub fn modify(
        &self,
        key: &str,
        merge: impl FnOnce(&mut T) -> bool,
    ) -> Result<bool, StoreError> {
        let mut record = self.get(key)?.ok_or_else(|| StoreError::missing(key))?;
        if !merge(&mut record) {
            return Ok(false);
        }
        let bytes = encode(&record)?;
        self.tree
            .insert(key.as_bytes(), bytes)
            .map_err(unavailable)?;
        self.flush()?;
        Ok(true)
    }

    /// Remove the record at `key`; `Missing` when the key is absent.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let removed = self.tree.remove(key.as_bytes()).map_err(unavailable)?;
        if removed.is_none() {
            return Err(StoreError::missing(key));
        }
        self.flush()
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.tree.flush().map_err(unavailable)?;
        Ok(())
    }
}

fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(record).map_err(|err| StoreError::corrupt(err.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    serde_json::from_slice(bytes).map_err(|err| StoreError::corrupt(err.to_string()))
}
