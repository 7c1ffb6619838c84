//! Build pipeline: discovery, assembly, artifact emission, lazy loading
//!
//! One-shot, single-threaded, offline. The only side effects are the two
//! artifact writes, which are atomic; a failed extraction skips that file,
//! never the batch. The [`DocumentRegistry`] is the runtime counterpart:
//! lazy, memoized loading of full definitions by id.

mod config;
mod discovery;
mod manifest;
mod artifact;
mod registry;

pub use config::{Config, GlobalConfig, OutputFormat, ProjectConfig};
pub use discovery::{
    discover, extract_definition, is_group_dir, DiscoveryError, ExtractedDocument,
    DEFINITION_FILENAME, TYPE_MARKER,
};
pub use manifest::{assemble, Manifest, ManifestData, ManifestEntry};
pub use artifact::write_atomic;
pub use registry::{DocumentRegistry, RegistryError};
