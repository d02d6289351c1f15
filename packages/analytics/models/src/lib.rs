#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregated survey statistics types.
//!
//! These are computed on demand for a single request and never persisted.
//! Field names serialize in `camelCase` to match the JSON API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Age bracket used for the age histogram.
///
/// Brackets are inclusive on both ends: 18 and 25 are both `18-25`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AgeGroup {
    #[serde(rename = "Under 18")]
    #[strum(serialize = "Under 18")]
    Under18,
    #[serde(rename = "18-25")]
    #[strum(serialize = "18-25")]
    From18To25,
    #[serde(rename = "26-35")]
    #[strum(serialize = "26-35")]
    From26To35,
    #[serde(rename = "36-50")]
    #[strum(serialize = "36-50")]
    From36To50,
    #[serde(rename = "50+")]
    #[strum(serialize = "50+")]
    Over50,
}

impl AgeGroup {
    /// Returns the bracket containing `age`.
    #[must_use]
    pub const fn from_age(age: u32) -> Self {
        match age {
            0..=17 => Self::Under18,
            18..=25 => Self::From18To25,
            26..=35 => Self::From26To35,
            36..=50 => Self::From36To50,
            _ => Self::Over50,
        }
    }
}

/// Mean of every rating across the matched surveys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingAverages {
    pub cleanliness: f64,
    pub water_quality: f64,
    pub air_quality: f64,
    pub noise_level: f64,
    pub road_quality: f64,
    pub affordability: f64,
    pub safety: f64,
    pub internet_quality: f64,
}

/// Mean of every amenity score across the matched surveys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenityAverages {
    pub hospital: f64,
    pub grocery_store: f64,
    pub vegetable_vendor: f64,
    pub public_transport: f64,
    pub recreation: f64,
    pub schools: f64,
}

/// Summary of every survey matching a locality search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyStats {
    /// Average ratings.
    pub ratings_avg: RatingAverages,
    /// Average amenity scores.
    pub amenities_avg: AmenityAverages,
    /// Number of respondents per age bracket. Empty brackets are omitted.
    pub age_distribution: BTreeMap<AgeGroup, u64>,
    /// Number of respondents per lowercased occupation.
    pub occupation_distribution: BTreeMap<String, u64>,
    /// Trimmed, non-empty comments in match order.
    pub comments: Vec<String>,
}

/// Average of the tracked ratings for one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRatings {
    /// Day as `YYYY-MM-DD`.
    pub date: String,
    pub cleanliness: f64,
    pub air_quality: f64,
    pub water_quality: f64,
    pub noise_level: f64,
}
