//! Lazy, memoized loading of full document definitions
//!
//! The manifest carries metadata only; questions and the rest of a
//! definition stay in the source file until something asks for them. The
//! registry maps ids to definition paths, runs the extractor on first
//! access, and caches the result for the life of the process.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::debug;

use super::discovery::{extract_definition, TYPE_MARKER};
use super::manifest::Manifest;
use crate::domain::DocumentDefinition;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unknown document id '{0}'")]
    UnknownId(String),

    #[error("Failed to read definition at {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Definition at {path} is not loadable: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Id -> definition path map with a memoizing load path
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    paths: HashMap<String, PathBuf>,
    cache: Mutex<HashMap<String, Arc<DocumentDefinition>>>,
}

impl DocumentRegistry {
    /// Builds a registry from an assembled manifest. Import paths are
    /// relative to the artifact directory, so that directory anchors them.
    pub fn from_manifest(manifest: &Manifest, out_dir: &Path) -> Self {
        let paths = manifest
            .entries
            .iter()
            .map(|e| (e.id.clone(), resolve_import(out_dir, &e.import_path)))
            .collect();
        DocumentRegistry {
            paths,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.paths.contains_key(id)
    }

    /// Known ids in ascending order
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.paths.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Loads the full definition for `id`, reading and evaluating the
    /// source file on first access and serving the cache afterwards
    pub fn load(&self, id: &str) -> Result<Arc<DocumentDefinition>, RegistryError> {
        if let Some(cached) = self.cache.lock().unwrap().get(id) {
            debug!(id, "registry cache hit");
            return Ok(Arc::clone(cached));
        }

        let path = self
            .paths
            .get(id)
            .ok_or_else(|| RegistryError::UnknownId(id.to_string()))?;

        let definition = Arc::new(load_definition(path)?);
        self.cache
            .lock()
            .unwrap()
            .insert(id.to_string(), Arc::clone(&definition));
        Ok(definition)
    }

    /// Drops every cached definition; the next load re-reads the source
    pub fn reset(&self) {
        self.cache.lock().unwrap().clear();
    }
}

/// Anchors an import path at the artifact directory, resolving `..` and `.`
/// lexically. The artifact directory itself need not exist; a path that
/// steps back through it must still resolve to the definition file.
fn resolve_import(out_dir: &Path, import_path: &str) -> PathBuf {
    let mut resolved = out_dir.to_path_buf();
    for component in Path::new(import_path).components() {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            other => resolved.push(other),
        }
    }
    resolved
}

fn load_definition(path: &Path) -> Result<DocumentDefinition, RegistryError> {
    let source = std::fs::read_to_string(path).map_err(|source| RegistryError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let value =
        extract_definition(&source, TYPE_MARKER).ok_or_else(|| RegistryError::Invalid {
            path: path.to_path_buf(),
            reason: "no evaluable definition export found".to_string(),
        })?;

    serde_json::from_value(value).map_err(|e| RegistryError::Invalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{assemble, discover, ProjectConfig, DEFINITION_FILENAME};
    use tempfile::TempDir;

    const LEASE: &str = r#"
export const leaseDefinition: DocumentDefinition = {
  id: 'lease',
  category: 'housing',
  questions: [
    { id: 'landlord_name', type: 'text', label: 'Landlord name', required: true, group: 'parties' },
    { id: 'pet_deposit', type: 'number', label: 'Pet deposit', required: true, group: 'terms',
      conditionalOn: { field: 'pets_allowed', value: true } },
  ],
};
"#;

    fn project_with_lease() -> (TempDir, DocumentRegistry) {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("documents").join("lease");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(docs.join(DEFINITION_FILENAME), LEASE).unwrap();

        let out_dir = dir.path().join("generated");
        let documents = discover(&dir.path().join("documents"), DEFINITION_FILENAME).unwrap();
        let manifest = assemble(documents, &ProjectConfig::default(), &out_dir);
        let registry = DocumentRegistry::from_manifest(&manifest, &out_dir);
        (dir, registry)
    }

    #[test]
    fn resolve_import_is_lexical() {
        assert_eq!(
            resolve_import(Path::new("/p/generated"), "../documents/x/definition.ts"),
            PathBuf::from("/p/documents/x/definition.ts")
        );
        assert_eq!(
            resolve_import(Path::new("/p/generated"), "./local.ts"),
            PathBuf::from("/p/generated/local.ts")
        );
    }

    #[test]
    fn loads_before_the_artifact_directory_exists() {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("documents").join("lease");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(docs.join(DEFINITION_FILENAME), LEASE).unwrap();

        // The registry must not depend on the artifact directory being
        // present on disk
        let out_dir = dir.path().join("generated");
        assert!(!out_dir.exists());

        let documents = discover(&dir.path().join("documents"), DEFINITION_FILENAME).unwrap();
        let manifest = assemble(documents, &ProjectConfig::default(), &out_dir);
        let registry = DocumentRegistry::from_manifest(&manifest, &out_dir);

        assert_eq!(registry.load("lease").unwrap().metadata.id, "lease");
    }

    #[test]
    fn load_returns_full_definition() {
        let (_dir, registry) = project_with_lease();

        let def = registry.load("lease").unwrap();
        assert_eq!(def.metadata.id, "lease");
        assert_eq!(def.questions.len(), 2);
        assert_eq!(def.questions[1].id, "pet_deposit");
    }

    #[test]
    fn repeated_loads_share_one_instance() {
        let (_dir, registry) = project_with_lease();

        let first = registry.load("lease").unwrap();
        let second = registry.load("lease").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn reset_drops_the_cache() {
        let (_dir, registry) = project_with_lease();

        let first = registry.load("lease").unwrap();
        registry.reset();
        let second = registry.load("lease").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.metadata.id, second.metadata.id);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let (_dir, registry) = project_with_lease();

        match registry.load("deed") {
            Err(RegistryError::UnknownId(id)) => assert_eq!(id, "deed"),
            other => panic!("expected UnknownId, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn deleted_source_is_unreadable() {
        let (dir, registry) = project_with_lease();
        std::fs::remove_file(
            dir.path()
                .join("documents")
                .join("lease")
                .join(DEFINITION_FILENAME),
        )
        .unwrap();

        assert!(matches!(
            registry.load("lease"),
            Err(RegistryError::Unreadable { .. })
        ));
    }
}
