//! Deduplicated sets of known locality values.
//!
//! Each [`LocalityCategory`] is a collection holding one `{ "value": .. }`
//! document per distinct normalized value, keyed by [`slugify`]. Inserts
//! are check-then-set without compare-and-set: two concurrent writers of
//! the same value may both write, but they write the same id and body, so
//! the registry converges to a single entry.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use tally_database::DocumentStore;
use tally_survey_models::LocalityField;

use crate::RegistryError;
use crate::capitalize::capitalize_all;
use crate::normalize::{normalize_value, slugify};

/// A registry collection, one per locality field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LocalityCategory {
    States,
    Cities,
    Areas,
    Pincodes,
}

impl LocalityCategory {
    pub const ALL: [Self; 4] = [Self::States, Self::Cities, Self::Areas, Self::Pincodes];

    /// Name of the backing collection.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::States => "localities_states",
            Self::Cities => "localities_cities",
            Self::Areas => "localities_areas",
            Self::Pincodes => "localities_pincodes",
        }
    }

    #[must_use]
    pub const fn field(self) -> LocalityField {
        match self {
            Self::States => LocalityField::State,
            Self::Cities => LocalityField::City,
            Self::Areas => LocalityField::Area,
            Self::Pincodes => LocalityField::Pincode,
        }
    }

    #[must_use]
    pub const fn for_field(field: LocalityField) -> Self {
        match field {
            LocalityField::State => Self::States,
            LocalityField::City => Self::Cities,
            LocalityField::Area => Self::Areas,
            LocalityField::Pincode => Self::Pincodes,
        }
    }

    /// Whether listed values are shown with capitalized words. Pincodes
    /// are listed verbatim.
    #[must_use]
    pub const fn is_capitalized(self) -> bool {
        !matches!(self, Self::Pincodes)
    }
}

/// Body of a registry document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub value: String,
}

/// Records `value` in `category` unless an entry with the same id exists.
///
/// Empty and whitespace-only values are ignored.
///
/// # Errors
///
/// Returns [`RegistryError`] if the existence check or the insert fails.
pub async fn register_if_absent(
    store: &dyn DocumentStore,
    category: LocalityCategory,
    value: &str,
) -> Result<(), RegistryError> {
    let normalized = normalize_value(value);
    if normalized.is_empty() {
        return Ok(());
    }

    let id = slugify(&normalized);
    let collection = category.collection();

    if store.get(collection, &id).await?.is_some() {
        log::trace!("{collection}/{id} already registered");
        return Ok(());
    }

    log::debug!("Registering {collection}/{id}");
    let entry = RegistryEntry { value: normalized };
    store
        .set(collection, &id, serde_json::to_value(&entry)?)
        .await?;

    Ok(())
}

/// Returns every distinct registered value in `category`, sorted
/// ascending.
///
/// # Errors
///
/// Returns [`RegistryError`] if the collection cannot be read.
pub async fn list_distinct_values(
    store: &dyn DocumentStore,
    category: LocalityCategory,
) -> Result<Vec<String>, RegistryError> {
    let documents = store.all(category.collection()).await?;

    let values: BTreeSet<String> = documents
        .iter()
        .filter_map(|doc| doc.data.get("value").and_then(serde_json::Value::as_str))
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .collect();

    Ok(values.into_iter().collect())
}

/// [`list_distinct_values`] with display casing applied for categories
/// that are [`LocalityCategory::is_capitalized`].
///
/// # Errors
///
/// Returns [`RegistryError`] if the collection cannot be read.
pub async fn list_display_values(
    store: &dyn DocumentStore,
    category: LocalityCategory,
) -> Result<Vec<String>, RegistryError> {
    let values = list_distinct_values(store, category).await?;

    if category.is_capitalized() {
        Ok(capitalize_all(&values))
    } else {
        Ok(values)
    }
}
