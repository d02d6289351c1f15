//! Display casing for registry values.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// First word character after a word boundary.
static WORD_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w").expect("valid regex"));

/// Uppercases the first character of every word.
///
/// Only word starts are touched; the rest of each word keeps its case.
#[must_use]
pub fn capitalize_words(text: &str) -> String {
    WORD_START_RE
        .replace_all(text, |caps: &Captures<'_>| caps[0].to_uppercase())
        .into_owned()
}

/// Applies [`capitalize_words`] to every value.
#[must_use]
pub fn capitalize_all<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .map(|v| capitalize_words(v.as_ref()))
        .collect()
}
