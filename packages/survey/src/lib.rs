#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Survey ingestion.
//!
//! A submission is validated, its locality normalized, and the survey
//! stored. The raw locality and each normalized locality field are then
//! registered so they can be listed later. The writes are independent:
//! if a later write fails, earlier ones stay committed.

use chrono::{DateTime, Utc};
use futures::try_join;
use tally_database::{DocumentStore, StoreError};
use tally_locality::RegistryError;
use tally_locality::normalize::{normalize_locality, raw_locality_id};
use tally_locality::registry::{LocalityCategory, register_if_absent};
use tally_survey_models::{
    LOCALITIES_COLLECTION, LocalityField, NewSurvey, RawLocality, SURVEYS_COLLECTION,
    SurveyRecord, SurveySubmission, ValidationError,
};
use thiserror::Error;

/// Errors that can occur while ingesting a survey.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// The submission is missing a required field.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Document store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Locality registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The survey could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SurveyError {
    /// Whether the error was caused by the submission rather than by the
    /// store.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Validates and stores a submission, timestamped now.
///
/// Returns the id of the stored survey.
///
/// # Errors
///
/// Returns [`SurveyError::Validation`] before any write if a required
/// field is missing, or a store error from the first failing write.
pub async fn submit(
    store: &dyn DocumentStore,
    submission: SurveySubmission,
) -> Result<String, SurveyError> {
    submit_at(store, submission, Utc::now()).await
}

/// [`submit`] with an explicit submission time.
///
/// # Errors
///
/// See [`submit`].
pub async fn submit_at(
    store: &dyn DocumentStore,
    submission: SurveySubmission,
    created_at: DateTime<Utc>,
) -> Result<String, SurveyError> {
    let survey = submission.validate()?;
    let id = store_survey(store, &survey, created_at).await?;

    register_raw_locality(store, &survey.locality).await?;
    register_locality_fields(store, &survey.locality).await?;

    log::info!("Stored survey {id}");
    Ok(id)
}

async fn store_survey(
    store: &dyn DocumentStore,
    survey: &NewSurvey,
    created_at: DateTime<Utc>,
) -> Result<String, SurveyError> {
    let record = SurveyRecord {
        name: survey.name.clone(),
        age: survey.age,
        occupation: survey.occupation.clone(),
        locality: normalize_locality(&survey.locality),
        ratings: survey.ratings,
        amenities: survey.amenities,
        comments: survey.comments.clone(),
        created_at,
    };

    Ok(store
        .add(SURVEYS_COLLECTION, serde_json::to_value(&record)?)
        .await?)
}

/// Stores the locality exactly as submitted unless its raw id is already
/// known.
async fn register_raw_locality(
    store: &dyn DocumentStore,
    locality: &RawLocality,
) -> Result<(), SurveyError> {
    let id = raw_locality_id(locality);

    if store.get(LOCALITIES_COLLECTION, &id).await?.is_none() {
        log::debug!("Registering locality '{id}'");
        store
            .set(LOCALITIES_COLLECTION, &id, serde_json::to_value(locality)?)
            .await?;
    }

    Ok(())
}

/// Adds each normalized locality field to its registry concurrently.
/// An empty pincode is skipped.
async fn register_locality_fields(
    store: &dyn DocumentStore,
    locality: &RawLocality,
) -> Result<(), SurveyError> {
    let normalized = normalize_locality(locality);
    let register = |field: LocalityField| {
        register_if_absent(
            store,
            LocalityCategory::for_field(field),
            normalized.get(field),
        )
    };

    try_join!(
        register(LocalityField::State),
        register(LocalityField::City),
        register(LocalityField::Area),
        register(LocalityField::Pincode),
    )?;

    Ok(())
}
