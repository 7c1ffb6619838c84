//! Manifest assembly and artifact emission
//!
//! Turns discovered definitions into the sorted catalog and emits the two
//! artifacts: a generated source module for code-split consumers and a
//! plain JSON document for metadata-only consumers. Ordering is ordinal by
//! id and deterministic regardless of discovery order.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::artifact::write_atomic;
use super::config::ProjectConfig;
use super::discovery::ExtractedDocument;
use crate::domain::{normalize, normalize_strings, DocumentMeta, Locale};

/// One catalog entry: the id, the import path of its definition relative
/// to the artifact location, and the merged metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: String,
    pub import_path: String,
    pub meta: DocumentMeta,
}

/// The assembled catalog, sorted ascending by id with unique ids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

/// Serialized form of the data artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestData {
    pub entries: Vec<ManifestEntry>,
    pub metadata: BTreeMap<String, DocumentMeta>,
    pub ids: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl Manifest {
    /// Sorted document ids
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    /// Id -> metadata-only map, for consumers that need data but no code
    pub fn metadata_map(&self) -> BTreeMap<String, DocumentMeta> {
        self.entries
            .iter()
            .map(|e| (e.id.clone(), e.meta.clone()))
            .collect()
    }

    pub fn entry(&self, id: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Snapshot for the data artifact, timestamped now
    pub fn data(&self) -> ManifestData {
        ManifestData {
            entries: self.entries.clone(),
            metadata: self.metadata_map(),
            ids: self.ids(),
            generated_at: Utc::now(),
        }
    }

    /// Writes both artifacts into `out_dir`; each write is atomic
    pub fn write_artifacts(&self, out_dir: &Path) -> Result<()> {
        let data = self.data();
        let json = serde_json::to_string_pretty(&data).context("Failed to serialize manifest")?;
        write_atomic(&out_dir.join("manifest.json"), &json)?;
        write_atomic(&out_dir.join("manifest.rs"), &self.module_source(&json))?;
        Ok(())
    }

    /// Renders the generated source module: sorted ids, id -> import path
    /// pairs, and the embedded manifest JSON
    pub fn module_source(&self, json: &str) -> String {
        let mut out = String::new();
        out.push_str("// Generated by lexcat. Do not edit.\n\n");

        out.push_str("/// Sorted document ids.\npub static DOCUMENT_IDS: &[&str] = &[\n");
        for entry in &self.entries {
            out.push_str(&format!("    {:?},\n", entry.id));
        }
        out.push_str("];\n\n");

        out.push_str(
            "/// Document id -> definition import path, sorted by id.\n\
             pub static DOCUMENT_IMPORTS: &[(&str, &str)] = &[\n",
        );
        for entry in &self.entries {
            out.push_str(&format!("    ({:?}, {:?}),\n", entry.id, entry.import_path));
        }
        out.push_str("];\n\n");

        let hashes = raw_string_hashes(json);
        out.push_str("/// Full manifest data as JSON.\n");
        out.push_str(&format!(
            "pub static MANIFEST_JSON: &str = r{h}\"{json}\"{h};\n",
            h = hashes,
            json = json
        ));

        out
    }
}

/// Assembles the manifest from discovered documents.
///
/// Later documents with an already-seen id are dropped with a warning -
/// catalog ids are unique by contract.
pub fn assemble(
    documents: Vec<ExtractedDocument>,
    config: &ProjectConfig,
    out_dir: &Path,
) -> Manifest {
    let mut entries: Vec<ManifestEntry> = Vec::with_capacity(documents.len());

    for document in documents {
        let entry = ManifestEntry {
            id: document.metadata.id.clone(),
            import_path: import_path(out_dir, &document.path),
            meta: build_meta(&document, config),
        };
        entries.push(entry);
    }

    entries.sort_by(|a, b| a.id.cmp(&b.id));
    let mut seen = std::collections::HashSet::new();
    entries.retain(|entry| {
        if seen.insert(entry.id.clone()) {
            true
        } else {
            warn!(id = %entry.id, path = %entry.import_path, "duplicate document id, dropping");
            false
        }
    });

    Manifest { entries }
}

/// Builds the merged meta for one document
fn build_meta(document: &ExtractedDocument, config: &ProjectConfig) -> DocumentMeta {
    let meta = &document.metadata;

    let mut translations = BTreeMap::new();
    for locale in &config.locales {
        translations.insert(locale.code().to_string(), normalize(meta, *locale));
    }

    // Title and description always come from the default locale
    let default_text = normalize(meta, Locale::En);

    // Keywords collapse across the top level and every locale into tags
    let mut tag_sources: Vec<String> = meta.keywords.clone();
    for locale in &config.locales {
        if let Some(text) = meta.translation(locale.code()) {
            tag_sources.extend(text.keywords.iter().cloned());
        }
    }

    // Aliases collapse across the normalized locales plus the top level
    let mut alias_sources: Vec<String> = Vec::new();
    for locale in &config.locales {
        if let Some(text) = translations.get(locale.code()) {
            alias_sources.extend(text.aliases.iter().cloned());
        }
    }
    alias_sources.extend(meta.aliases.iter().cloned());

    DocumentMeta {
        id: meta.id.clone(),
        title: default_text.name,
        description: default_text.description,
        category: meta
            .category
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| config.default_category.clone()),
        jurisdiction: meta
            .jurisdiction
            .as_deref()
            .unwrap_or(&config.default_jurisdiction)
            .to_lowercase(),
        tags: normalize_strings(&tag_sources),
        aliases: normalize_strings(&alias_sources),
        requires_notary: meta.requires_notary,
        official_form: meta.official_form,
        states: meta.states.clone(),
        estimated_time: meta.estimated_time.clone(),
        complexity: meta.complexity,
        translations,
    }
}

/// Computes the import path of a definition file relative to the artifact
/// directory, with forward slashes
fn import_path(out_dir: &Path, definition: &Path) -> String {
    let relative = relative_path(out_dir, definition);
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let joined = parts.join("/");
    if joined.starts_with("..") {
        joined
    } else {
        format!("./{}", joined)
    }
}

/// Relative path from directory `from` to file `to`
fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from_parts: Vec<Component> = from.components().collect();
    let to_parts: Vec<Component> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..from_parts.len() {
        result.push("..");
    }
    for part in &to_parts[common..] {
        result.push(part);
    }
    result
}

/// Picks enough `#` characters that the JSON can be embedded in a raw
/// string literal without terminating it early
fn raw_string_hashes(contents: &str) -> String {
    let mut hashes = 1;
    loop {
        let terminator = format!("\"{}", "#".repeat(hashes));
        if !contents.contains(&terminator) {
            return "#".repeat(hashes);
        }
        hashes += 1;
    }
}
