#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Locality normalization and the locality registry.
//!
//! Surveys are matched on lowercased, trimmed locality values (see
//! [`normalize`]). The registry keeps one document per distinct
//! normalized state, city, area, and pincode so that clients can list
//! known values for autocomplete.

pub mod capitalize;
pub mod normalize;
pub mod registry;

use tally_database::StoreError;
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Document store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A registry document could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
