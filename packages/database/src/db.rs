//! Store selection from the environment.

use std::path::PathBuf;
use std::sync::Arc;

use strum_macros::{AsRefStr, Display, EnumString};

use crate::memory::MemoryStore;
use crate::sqlite::SqliteStore;
use crate::{DocumentStore, StoreError};

/// Default location of the `SQLite` document store.
pub const DEFAULT_DB_PATH: &str = "data/tally.db";

/// Which [`DocumentStore`] implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreBackend {
    /// Persistent `SQLite` file.
    #[default]
    Sqlite,
    /// Process-local, non-persistent store.
    Memory,
}

/// Opens a store of the given backend.
///
/// # Errors
///
/// Returns [`StoreError`] if the `SQLite` store cannot be opened.
pub async fn connect(
    backend: StoreBackend,
    path: PathBuf,
) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match backend {
        StoreBackend::Sqlite => {
            log::info!("Using SQLite document store at {}", path.display());
            Ok(Arc::new(SqliteStore::open(&path).await?))
        }
        StoreBackend::Memory => {
            log::warn!("Using in-memory document store; data will not be persisted");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Opens the store selected by the `STORE_BACKEND` (`sqlite` or
/// `memory`, default `sqlite`) and `DATABASE_PATH` (default
/// [`DEFAULT_DB_PATH`]) environment variables.
///
/// # Errors
///
/// Returns [`StoreError::Config`] if `STORE_BACKEND` is not recognised,
/// or any error from [`connect`].
pub async fn connect_from_env() -> Result<Arc<dyn DocumentStore>, StoreError> {
    let backend = match std::env::var("STORE_BACKEND") {
        Ok(value) => value.parse().map_err(|_| StoreError::Config {
            message: format!("Unknown STORE_BACKEND '{value}'. Expected 'sqlite' or 'memory'"),
        })?,
        Err(_) => StoreBackend::default(),
    };

    let path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

    connect(backend, PathBuf::from(path)).await
}
