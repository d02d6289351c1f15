#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Document store used by every tally component.
//!
//! The store is a small collection/document API: documents are JSON
//! objects addressed by `(collection, id)`. Components receive the store
//! explicitly as a [`DocumentStore`] trait object rather than reaching for
//! a process-wide handle, so tests can swap in [`memory::MemoryStore`].
//!
//! The store only supports single-field equality lookups. Callers that
//! need to match on one of several fields issue one [`DocumentStore::find`]
//! per field and merge the results themselves.

pub mod db;
pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use serde_json::Value;

/// Errors that can occur during document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// Opening the database failed.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of what went wrong.
        message: String,
    },

    /// A document body could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored row is missing a column or holds the wrong type.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// I/O error (creating the data directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid store configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

/// A stored document and its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Identifier, unique within its collection.
    pub id: String,
    /// Document body.
    pub data: Value,
}

/// Collection/document storage.
///
/// Documents come back in insertion order. Writes are last-write-wins;
/// there is no compare-and-set, so a `get` followed by a `set` can race
/// with another writer.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns every document in `collection` whose string value at the
    /// dotted `field_path` (e.g. `"locality.city"`) equals `value`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lookup fails.
    async fn find(
        &self,
        collection: &str,
        field_path: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError>;

    /// Returns the document with the given `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lookup fails.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Creates or overwrites the document with the given `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;

    /// Inserts a new document under a freshly generated id and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError>;

    /// Returns every document in `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read fails.
    async fn all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;
}

/// Generates an identifier for [`DocumentStore::add`].
#[must_use]
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Looks up a dotted path such as `"locality.state"` inside `value`.
#[must_use]
pub fn value_at_path<'a>(value: &'a Value, field_path: &str) -> Option<&'a Value> {
    field_path
        .split('.')
        .try_fold(value, |current, segment| current.get(segment))
}
