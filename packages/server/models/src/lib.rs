#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the tally server.
//!
//! These types are serialized to JSON for the REST API. Aggregated
//! statistics are reused from `tally_analytics_models`; this crate only
//! adds the envelopes around them.

use serde::{Deserialize, Serialize};
use tally_analytics_models::{DailyRatings, SurveyStats};

/// Query parameters for the survey statistics endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalityQueryParams {
    /// State, city, area, or pincode to search for.
    pub locality: Option<String>,
}

/// Body of a successful write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSuccess {
    pub success: bool,
}

impl ApiSuccess {
    #[must_use]
    pub const fn new() -> Self {
        Self { success: true }
    }
}

impl Default for ApiSuccess {
    fn default() -> Self {
        Self::new()
    }
}

/// Response from `GET /api/surveys/getData`.
///
/// `stats` is `null` when no survey matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStatsResponse {
    pub success: bool,
    pub stats: Option<SurveyStats>,
}

/// Response from `GET /api/surveys/getRatingsOverTime` when no survey
/// matched. A non-empty series is returned as a bare array instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEmptySeries {
    pub success: bool,
    pub data: Vec<DailyRatings>,
}

impl ApiEmptySeries {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            success: true,
            data: Vec::new(),
        }
    }
}

impl Default for ApiEmptySeries {
    fn default() -> Self {
        Self::new()
    }
}

/// Error body for a rejected request (400).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiValidationError {
    pub error: String,
}

/// Error body for a failed operation (500).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFailure {
    pub success: bool,
    pub error: String,
}

impl ApiFailure {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_serialize_as_null() {
        let body = serde_json::to_value(ApiStatsResponse {
            success: true,
            stats: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "success": true, "stats": null }));
    }

    #[test]
    fn empty_series_envelope() {
        let body = serde_json::to_value(ApiEmptySeries::new()).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true, "data": [] }));
    }

    #[test]
    fn failure_envelope() {
        let body = serde_json::to_value(ApiFailure::new("boom")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "success": false, "error": "boom" })
        );
    }
}
