//! Domain models and pure runtime services
//!
//! Everything here is I/O-free: metadata shapes shared by the compiler and
//! its consumers, the locale fallback normalizer, the per-jurisdiction
//! compliance resolver, and the conditional question activation model.

mod metadata;
mod locale;
mod compliance;
mod question;

pub use metadata::{
    Complexity, DocumentDefinition, DocumentMeta, ExtractedMetadata, RawLocaleText, States,
};
pub use locale::{normalize, normalize_strings, Locale, LocalizedText};
pub use compliance::{
    resolve_display, resolve_summary, Badge, ComplianceDisplay, ComplianceRule, Enforcement,
    Message, Severity,
};
pub use question::{compute_active, validate_required, Answers, Condition, Question, QuestionType};
