//! Document discovery
//!
//! Walks the definitions tree collecting files with the fixed definition
//! filename, extracting one exported declaration from each via the literal
//! evaluator. A file that yields nothing acceptable is logged and skipped;
//! only an unreadable root aborts the build.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::ExtractedMetadata;
use crate::syntax::{evaluate, parse_module, Statement};

/// Fixed filename holding a document's exported definition object
pub const DEFINITION_FILENAME: &str = "definition.ts";

/// Marker substring a declaration's type annotation must contain.
/// A loose textual match; no type resolution happens here.
pub const TYPE_MARKER: &str = "DocumentDefinition";

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Failed to read definitions root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One accepted definition file and its extracted metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    /// Path of the definition file
    pub path: PathBuf,
    pub metadata: ExtractedMetadata,
}

/// Returns true for bracket-delimited grouping directories (`[employment]`),
/// which are organizational and excluded from traversal
pub fn is_group_dir(name: &str) -> bool {
    name.len() >= 2 && name.starts_with('[') && name.ends_with(']')
}

/// Recursively discovers document definitions under `root`.
///
/// Per-file failures are non-fatal; an unreadable root is the one fatal
/// condition in the build pipeline.
pub fn discover(root: &Path, filename: &str) -> Result<Vec<ExtractedDocument>, DiscoveryError> {
    let entries = fs::read_dir(root).map_err(|source| DiscoveryError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut documents = Vec::new();
    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        visit(&path, filename, &mut documents);
    }

    Ok(documents)
}

/// Visits one directory entry below the root; all failures here are
/// warn-and-skip
fn visit(path: &Path, filename: &str, documents: &mut Vec<ExtractedDocument>) {
    if path.is_dir() {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if is_group_dir(name) {
            debug!(dir = %path.display(), "skipping grouping directory");
            return;
        }

        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %path.display(), error = %e, "skipping unreadable directory");
                return;
            }
        };

        let mut children: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        children.sort();
        for child in children {
            visit(&child, filename, documents);
        }
        return;
    }

    if path.file_name().and_then(|n| n.to_str()) == Some(filename) {
        match extract_file(path) {
            Some(document) => documents.push(document),
            None => warn!(file = %path.display(), "no acceptable definition, skipping"),
        }
    }
}

/// Extracts the metadata from one definition file
fn extract_file(path: &Path) -> Option<ExtractedDocument> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            warn!(file = %path.display(), error = %e, "failed to read definition");
            return None;
        }
    };

    let value = extract_definition(&source, TYPE_MARKER)?;
    let metadata: ExtractedMetadata = match serde_json::from_value(value) {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!(file = %path.display(), error = %e, "definition has unexpected shape");
            return None;
        }
    };

    debug!(file = %path.display(), id = %metadata.id, "extracted definition");
    Some(ExtractedDocument {
        path: path.to_path_buf(),
        metadata,
    })
}

/// Finds and evaluates the first acceptable exported declaration in a
/// definition source: annotation contains the marker, the initializer
/// evaluates to an object, and the object carries a non-empty string `id`.
/// Later candidates in the same source are ignored.
pub fn extract_definition(source: &str, marker: &str) -> Option<serde_json::Value> {
    let module = parse_module(source);

    for statement in &module.statements {
        let Statement::ExportConst {
            annotation, init, ..
        } = statement
        else {
            continue;
        };
        if !annotation.contains(marker) {
            continue;
        }

        let Some(value) = evaluate(init) else {
            continue;
        };
        if !value.is_object() {
            continue;
        }
        match value.get("id") {
            Some(serde_json::Value::String(id)) if !id.is_empty() => return Some(value),
            _ => continue,
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_definition(dir: &Path, subdir: &str, contents: &str) {
        let doc_dir = dir.join(subdir);
        fs::create_dir_all(&doc_dir).unwrap();
        fs::write(doc_dir.join(DEFINITION_FILENAME), contents).unwrap();
    }

    const NDA: &str = r#"
import type { DocumentDefinition } from '../../types';

export const definition: DocumentDefinition = {
  id: 'nda',
  category: 'business',
  jurisdiction: 'US',
  states: 'all',
  keywords: ['nda', 'confidentiality'],
  translations: {
    en: { name: 'Non-Disclosure Agreement', description: 'Protects secrets', aliases: ['NDA'] },
    es: { name: 'Acuerdo de Confidencialidad' },
  },
};
"#;

    #[test]
    fn group_dir_predicate() {
        assert!(is_group_dir("[employment]"));
        assert!(is_group_dir("[a]"));
        assert!(!is_group_dir("employment"));
        assert!(!is_group_dir("[unclosed"));
        assert!(!is_group_dir(""));
    }

    #[test]
    fn discovers_nested_definitions() {
        let dir = TempDir::new().unwrap();
        write_definition(dir.path(), "business/nda", NDA);
        write_definition(
            dir.path(),
            "realestate/lease",
            "export const definition: DocumentDefinition = { id: 'lease' };",
        );

        let docs = discover(dir.path(), DEFINITION_FILENAME).unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.metadata.id.as_str()).collect();
        assert_eq!(ids, vec!["nda", "lease"]);
    }

    #[test]
    fn skips_group_directories() {
        let dir = TempDir::new().unwrap();
        write_definition(
            dir.path(),
            "[drafts]/secret",
            "export const definition: DocumentDefinition = { id: 'hidden' };",
        );
        write_definition(dir.path(), "business/nda", NDA);

        let docs = discover(dir.path(), DEFINITION_FILENAME).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].metadata.id, "nda");
    }

    #[test]
    fn name_es_survives_extraction_and_feeds_the_spanish_chain() {
        let source = r#"
export const definition: DocumentDefinition = {
  id: 'employment',
  name: 'Employment Contract',
  name_es: 'Contrato de Trabajo',
};
"#;

        let value = extract_definition(source, TYPE_MARKER).unwrap();
        let meta: ExtractedMetadata = serde_json::from_value(value).unwrap();

        assert_eq!(meta.name_es.as_deref(), Some("Contrato de Trabajo"));
        let es = crate::domain::normalize(&meta, crate::domain::Locale::Es);
        assert_eq!(es.name, "Contrato de Trabajo");
    }

    #[test]
    fn file_without_id_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        write_definition(
            dir.path(),
            "bad",
            "export const definition: DocumentDefinition = { category: 'x' };",
        );
        write_definition(dir.path(), "good/nda", NDA);

        let docs = discover(dir.path(), DEFINITION_FILENAME).unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn unreadable_root_is_fatal() {
        let result = discover(Path::new("/nonexistent/lexcat-defs"), DEFINITION_FILENAME);
        assert!(matches!(
            result,
            Err(DiscoveryError::RootUnreadable { .. })
        ));
    }

    #[test]
    fn first_matching_declaration_wins() {
        let source = "\
export const draft: DocumentDefinition = { id: 'first' };\n\
export const other: DocumentDefinition = { id: 'second' };";

        let value = extract_definition(source, TYPE_MARKER).unwrap();
        assert_eq!(value["id"], "first");
    }

    #[test]
    fn candidate_without_id_falls_through_to_next() {
        let source = "\
export const broken: DocumentDefinition = { id: makeId() };\n\
export const good: DocumentDefinition = { id: 'fallback' };";

        let value = extract_definition(source, TYPE_MARKER).unwrap();
        assert_eq!(value["id"], "fallback");
    }

    #[test]
    fn annotation_without_marker_is_ignored() {
        let source = "export const config: SiteConfig = { id: 'not-a-doc' };";
        assert!(extract_definition(source, TYPE_MARKER).is_none());
    }

    #[test]
    fn empty_id_rejects_candidate() {
        let source = "export const d: DocumentDefinition = { id: '' };";
        assert!(extract_definition(source, TYPE_MARKER).is_none());
    }

    #[test]
    fn mismatched_metadata_shape_is_skipped() {
        let dir = TempDir::new().unwrap();
        // states must be 'all' or an array; a number rejects the file
        write_definition(
            dir.path(),
            "bad",
            "export const d: DocumentDefinition = { id: 'x', states: 42 };",
        );

        let docs = discover(dir.path(), DEFINITION_FILENAME).unwrap();
        assert!(docs.is_empty());
    }
}
