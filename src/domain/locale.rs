//! Locale normalization
//!
//! Turns raw, possibly incomplete per-locale text into complete
//! [`LocalizedText`] records via an ordered fallback chain. The chain is an
//! explicit list of candidate producers tried in sequence - the first
//! non-empty candidate wins - rather than inline optional-access chains, so
//! each link is independently testable.

use serde::{Deserialize, Serialize};

use super::metadata::ExtractedMetadata;

/// Supported locales. `En` is the default locale every chain falls back to;
/// `Es` is the designated secondary locale with the `name_es` alternate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Every supported locale, default first
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Es];

    /// The locale code as it appears in definition files and the manifest
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }

    /// Parses a locale code, case-insensitively
    pub fn from_code(code: &str) -> Option<Locale> {
        match code.to_ascii_lowercase().as_str() {
            "en" => Some(Locale::En),
            "es" => Some(Locale::Es),
            _ => None,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Locale::En
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Fully populated per-locale text. After normalization `name` is never
/// empty as long as the document has an id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

/// Produces the complete localized text for one locale
pub fn normalize(meta: &ExtractedMetadata, locale: Locale) -> LocalizedText {
    let locale_text = meta.translation(locale.code());
    let default_text = meta.translation(Locale::En.code());

    // Name: locale override -> (secondary locale only) alternate field ->
    // default-locale override -> top-level name -> id
    let name = first_non_empty([
        locale_text.and_then(|t| t.name.as_deref()),
        if locale == Locale::Es {
            meta.name_es.as_deref()
        } else {
            None
        },
        default_text.and_then(|t| t.name.as_deref()),
        meta.name.as_deref(),
        Some(meta.id.as_str()),
    ])
    .unwrap_or_default();

    // Description: same chain minus the id fallback, empty when nothing hits
    let description = first_non_empty([
        locale_text.and_then(|t| t.description.as_deref()),
        default_text.and_then(|t| t.description.as_deref()),
        meta.description.as_deref(),
    ])
    .unwrap_or_default();

    // Aliases: first non-empty list wins, then string normalization
    let raw_aliases = [
        locale_text.map(|t| t.aliases.as_slice()),
        default_text.map(|t| t.aliases.as_slice()),
        Some(meta.aliases.as_slice()),
    ]
    .into_iter()
    .flatten()
    .find(|list| !list.is_empty())
    .unwrap_or(&[]);

    LocalizedText {
        name,
        description,
        aliases: normalize_strings(raw_aliases),
    }
}

/// Returns the first candidate that is non-empty after trimming
fn first_non_empty<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Trims each string, drops empties, and deduplicates by exact equality
/// (case-sensitive), preserving first-occurrence order
pub fn normalize_strings<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::new();

    for item in items {
        let trimmed = item.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_string()) {
            result.push(trimmed.to_string());
        }
    }

    result
}
