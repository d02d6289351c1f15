#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation engine for locality surveys.
//!
//! A search term is matched against all four locality fields of every
//! stored survey. The matching surveys are merged into one de-duplicated
//! set and summarized either as overall statistics ([`stats`]) or as a
//! daily time series ([`trends`]). Everything here is read-only.

pub mod search;
pub mod stats;
pub mod trends;

#[cfg(test)]
mod fixtures;

use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// No locality search term was supplied.
    #[error("locality query parameter is required")]
    MissingLocality,

    /// Document store operation failed.
    #[error(transparent)]
    Store(#[from] tally_database::StoreError),

    /// A stored document is not a valid survey.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

impl AnalyticsError {
    /// Whether the error was caused by the caller's input rather than by
    /// the store.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::MissingLocality)
    }
}

/// A validated, lowercased locality search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalityTerm(String);

impl LocalityTerm {
    /// Validates a raw search term.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::MissingLocality`] if `raw` is absent or
    /// empty.
    pub fn parse(raw: Option<&str>) -> Result<Self, AnalyticsError> {
        match raw {
            Some(term) if !term.is_empty() => Ok(Self(term.to_lowercase())),
            _ => Err(AnalyticsError::MissingLocality),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_term() {
        let term = LocalityTerm::parse(Some("New York")).unwrap();
        assert_eq!(term.as_str(), "new york");
    }

    #[test]
    fn rejects_missing_or_empty_term() {
        assert!(matches!(
            LocalityTerm::parse(None),
            Err(AnalyticsError::MissingLocality)
        ));
        let err = LocalityTerm::parse(Some("")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "locality query parameter is required");
    }
}
