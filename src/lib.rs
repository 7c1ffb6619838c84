//! Lexcat - a build-time compiler and rule resolver for legal document catalogs
//!
//! Lexcat scans a directory of independently authored document definitions,
//! extracts their metadata without executing any definition code, merges
//! multi-locale text with fallback semantics, and assembles a sorted,
//! queryable manifest. It also ships two pure runtime services: a
//! per-jurisdiction compliance resolver and a conditional question
//! activation model for form validation.

pub mod syntax;
pub mod domain;
pub mod compiler;
pub mod cli;

pub use domain::{ComplianceDisplay, DocumentMeta, LocalizedText, Locale, Question};
pub use compiler::{DocumentRegistry, Manifest, ManifestEntry};
