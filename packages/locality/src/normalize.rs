//! Canonical forms of locality values.
//!
//! Two different keys are derived from a submitted locality:
//! - [`normalize_locality`] lowercases and trims each field. This is the
//!   form embedded in stored surveys and matched by searches.
//! - [`raw_locality_id`] joins the fields exactly as submitted. It keys the
//!   `localities` collection and is intentionally left un-normalized, so
//!   `" Texas"` and `"texas"` produce different locality documents.

use regex::Regex;
use std::sync::LazyLock;
use tally_survey_models::{Locality, RawLocality};

/// Runs of whitespace, replaced by a single hyphen in registry ids.
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Lowercases and trims a single locality value.
#[must_use]
pub fn normalize_value(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Normalizes `state`, `city`, and `area`; passes `pincode` through,
/// substituting `""` when absent.
#[must_use]
pub fn normalize_locality(locality: &RawLocality) -> Locality {
    Locality {
        state: normalize_value(&locality.state),
        city: normalize_value(&locality.city),
        area: normalize_value(&locality.area),
        pincode: locality.pincode.clone().unwrap_or_default(),
    }
}

/// Derives a registry document id from an already-normalized value.
///
/// `"new   york"` becomes `"new-york"`.
#[must_use]
pub fn slugify(normalized: &str) -> String {
    WHITESPACE_RE.replace_all(normalized, "-").into_owned()
}

/// Builds the `state-city-area-pincode` id of a raw locality document.
#[must_use]
pub fn raw_locality_id(locality: &RawLocality) -> String {
    format!(
        "{}-{}-{}-{}",
        locality.state,
        locality.city,
        locality.area,
        locality.pincode.as_deref().unwrap_or_default()
    )
}
