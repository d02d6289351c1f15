#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Survey, locality, rating, and amenity types.
//!
//! [`SurveySubmission`] is the loosely-shaped request body accepted from
//! clients. [`SurveySubmission::validate`] turns it into a [`NewSurvey`]
//! with every required field present. [`SurveyRecord`] is the shape of a
//! survey as persisted in the `surveys` collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Collection holding one document per submitted survey.
pub const SURVEYS_COLLECTION: &str = "surveys";

/// Collection holding one document per raw (non-normalized) locality.
pub const LOCALITIES_COLLECTION: &str = "localities";

/// Error returned when a submission is missing a required field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was absent or `null`.
    #[error("{field} is required")]
    Missing {
        /// Dotted path of the missing field (e.g. `locality.state`).
        field: &'static str,
    },
}

/// One of the four fields a locality is made of.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LocalityField {
    /// State or province.
    State,
    /// City.
    City,
    /// Area or neighbourhood within a city.
    Area,
    /// Postal code.
    Pincode,
}

impl LocalityField {
    /// Every locality field, in lookup order.
    pub const ALL: [Self; 4] = [Self::State, Self::City, Self::Area, Self::Pincode];

    /// Dotted document path of this field inside a stored survey.
    #[must_use]
    pub const fn survey_path(self) -> &'static str {
        match self {
            Self::State => "locality.state",
            Self::City => "locality.city",
            Self::Area => "locality.area",
            Self::Pincode => "locality.pincode",
        }
    }
}

/// Normalized locality embedded in every stored survey.
///
/// `state`, `city`, and `area` are lowercased and trimmed. `pincode` is
/// kept as submitted, or empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    /// Normalized state.
    pub state: String,
    /// Normalized city.
    pub city: String,
    /// Normalized area.
    pub area: String,
    /// Postal code, or `""`.
    #[serde(default)]
    pub pincode: String,
}

impl Locality {
    /// Returns the value of `field`.
    #[must_use]
    pub fn get(&self, field: LocalityField) -> &str {
        match field {
            LocalityField::State => &self.state,
            LocalityField::City => &self.city,
            LocalityField::Area => &self.area,
            LocalityField::Pincode => &self.pincode,
        }
    }
}

/// Locality exactly as the client submitted it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLocality {
    /// State as submitted.
    pub state: String,
    /// City as submitted.
    pub city: String,
    /// Area as submitted.
    pub area: String,
    /// Postal code as submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

/// Named ratings, each on a small numeric scale.
///
/// Any rating may be absent; absent ratings count as 0 when averaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanliness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_quality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_quality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_quality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affordability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internet_quality: Option<f64>,
}

/// Named amenity scores.
///
/// Any score may be absent; absent scores count as 0 when averaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amenities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grocery_store: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vegetable_vendor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_transport: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recreation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schools: Option<f64>,
}

/// A postal code sent either as a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PincodeInput {
    /// `"560001"`
    Text(String),
    /// `560001`
    Number(serde_json::Number),
}

impl From<PincodeInput> for String {
    fn from(value: PincodeInput) -> Self {
        match value {
            PincodeInput::Text(s) => s,
            PincodeInput::Number(n) => n.to_string(),
        }
    }
}

/// Locality part of a [`SurveySubmission`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LocalityInput {
    pub state: Option<String>,
    pub city: Option<String>,
    pub area: Option<String>,
    pub pincode: Option<PincodeInput>,
}

/// Survey request body as sent by clients.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySubmission {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub occupation: Option<String>,
    pub locality: Option<LocalityInput>,
    pub ratings: Option<Ratings>,
    pub amenities: Option<Amenities>,
    pub comments: Option<String>,
}

impl SurveySubmission {
    /// Checks that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Missing`] naming the first absent
    /// required field.
    pub fn validate(self) -> Result<NewSurvey, ValidationError> {
        let locality = self
            .locality
            .ok_or(ValidationError::Missing { field: "locality" })?;

        let locality = RawLocality {
            state: locality.state.ok_or(ValidationError::Missing {
                field: "locality.state",
            })?,
            city: locality.city.ok_or(ValidationError::Missing {
                field: "locality.city",
            })?,
            area: locality.area.ok_or(ValidationError::Missing {
                field: "locality.area",
            })?,
            pincode: locality.pincode.map(String::from),
        };

        Ok(NewSurvey {
            name: self.name,
            age: self.age.ok_or(ValidationError::Missing { field: "age" })?,
            occupation: self
                .occupation
                .ok_or(ValidationError::Missing { field: "occupation" })?,
            locality,
            ratings: self
                .ratings
                .ok_or(ValidationError::Missing { field: "ratings" })?,
            amenities: self
                .amenities
                .ok_or(ValidationError::Missing { field: "amenities" })?,
            comments: self.comments,
        })
    }
}

/// A validated submission, ready to be normalized and persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSurvey {
    pub name: Option<String>,
    pub age: u32,
    pub occupation: String,
    pub locality: RawLocality,
    pub ratings: Ratings,
    pub amenities: Amenities,
    pub comments: Option<String>,
}

/// A survey as stored in the [`SURVEYS_COLLECTION`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyRecord {
    #[serde(default)]
    pub name: Option<String>,
    pub age: u32,
    pub occupation: String,
    pub locality: Locality,
    pub ratings: Ratings,
    pub amenities: Amenities,
    #[serde(default)]
    pub comments: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}
