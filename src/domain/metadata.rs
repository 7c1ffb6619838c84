//! Document metadata models
//!
//! [`ExtractedMetadata`] is the typed form of what the literal evaluator
//! pulls out of a definition file; [`DocumentMeta`] is the merged,
//! normalized shape stored in the manifest. Field names follow the
//! definition-source convention (camelCase) on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::locale::LocalizedText;
use super::question::Question;

/// Which states a document applies to: every state, or a named subset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum States {
    All,
    Named(Vec<String>),
}

impl States {
    /// Returns true if the document applies in the given state code
    pub fn covers(&self, state: &str) -> bool {
        match self {
            States::All => true,
            States::Named(list) => list.iter().any(|s| s.eq_ignore_ascii_case(state)),
        }
    }
}

impl Serialize for States {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            States::All => serializer.serialize_str("all"),
            States::Named(list) => list.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for States {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Source convention: the string 'all' or an array of state codes
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) if s == "all" => Ok(States::All),
            serde_json::Value::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        serde_json::Value::String(s) => list.push(s),
                        other => {
                            return Err(serde::de::Error::custom(format!(
                                "expected state code string, got {}",
                                other
                            )))
                        }
                    }
                }
                Ok(States::Named(list))
            }
            other => Err(serde::de::Error::custom(format!(
                "expected 'all' or an array of state codes, got {}",
                other
            ))),
        }
    }
}

/// Authoring-effort classification for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Intermediate,
    Complex,
}

/// Raw per-locale text as authored, possibly incomplete
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLocaleText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

/// Plain-data result of evaluating a definition source file
///
/// Only `id` is required; everything else is optional and simply absent
/// when the source omits it or spells it outside the literal grammar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedMetadata {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<States>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_notary: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_form: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Top-level untranslated name, the last text fallback before `id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Alternate Spanish name field, tried before the default-locale chain.
    /// Authored snake_case, unlike the rest of the definition surface.
    #[serde(rename = "name_es", default, skip_serializing_if = "Option::is_none")]
    pub name_es: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub translations: BTreeMap<String, RawLocaleText>,
}

impl ExtractedMetadata {
    /// Raw locale text for a locale code, if authored
    pub fn translation(&self, code: &str) -> Option<&RawLocaleText> {
        self.translations.get(code)
    }
}

/// Merged, normalized metadata as stored in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub id: String,

    /// Default-locale display name
    pub title: String,

    pub description: String,

    pub category: String,

    /// Lowercased jurisdiction code
    pub jurisdiction: String,

    /// Keywords collapsed across all locales, deduplicated
    pub tags: Vec<String>,

    /// Aliases collapsed across all locales, deduplicated
    pub aliases: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_notary: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_form: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<States>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,

    /// Fully populated per-locale text for every supported locale
    pub translations: BTreeMap<String, LocalizedText>,
}

/// The full definition object a registry load yields: the extracted
/// metadata plus the static per-document question declarations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentDefinition {
    #[serde(flatten)]
    pub metadata: ExtractedMetadata,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
}
