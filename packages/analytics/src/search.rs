//! Locality search across the four locality fields.
//!
//! The document store has no OR query, so a search runs one equality
//! lookup per field concurrently and merges the results by document id.
//! Against a store that supports OR this collapses to a single query.

use std::collections::HashSet;

use futures::future::try_join_all;
use tally_database::{Document, DocumentStore};
use tally_survey_models::{LocalityField, SURVEYS_COLLECTION, SurveyRecord};

use crate::{AnalyticsError, LocalityTerm};

/// A stored survey that matched a search.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedSurvey {
    /// Document id in the surveys collection.
    pub id: String,
    pub record: SurveyRecord,
}

/// Merges several result sets, keeping the first occurrence of each id.
#[must_use]
pub fn merge_by_id(result_sets: Vec<Vec<Document>>) -> Vec<Document> {
    let mut seen = HashSet::new();
    result_sets
        .into_iter()
        .flatten()
        .filter(|doc| seen.insert(doc.id.clone()))
        .collect()
}

/// Returns every survey whose state, city, area, or pincode equals the
/// search term. A survey matching on several fields appears once.
///
/// # Errors
///
/// Returns [`AnalyticsError::Store`] if any lookup fails, or
/// [`AnalyticsError::Conversion`] if a matched document is not a survey.
pub async fn find_surveys_by_locality(
    store: &dyn DocumentStore,
    term: &LocalityTerm,
) -> Result<Vec<MatchedSurvey>, AnalyticsError> {
    let lookups = LocalityField::ALL.map(|field| {
        store.find(SURVEYS_COLLECTION, field.survey_path(), term.as_str())
    });
    let result_sets = try_join_all(lookups).await?;

    let documents = merge_by_id(result_sets);
    log::debug!(
        "Locality '{}' matched {} survey(s)",
        term.as_str(),
        documents.len()
    );

    documents
        .into_iter()
        .map(|doc| {
            let record = serde_json::from_value(doc.data).map_err(|e| {
                AnalyticsError::Conversion {
                    message: format!("Survey {} is malformed: {e}", doc.id),
                }
            })?;
            Ok(MatchedSurvey { id: doc.id, record })
        })
        .collect()
}
