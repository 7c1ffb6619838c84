//! Per-jurisdiction compliance rule resolution
//!
//! A small static fact table (one row per state, embedded at compile time)
//! drives the user-facing badges and messages. The badge/message order is a
//! contract: adoption -> workplace restrictions -> enforcement -> duration
//! (message only) -> data privacy -> non-compete restrictions -> free-text
//! note last. Both resolvers are total functions - an unknown state yields
//! a conservative default, never an error.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Duration bound assumed when a state has no rule row
const DEFAULT_MAX_DURATION_MONTHS: u32 = 24;

static RULES: OnceLock<HashMap<String, ComplianceRule>> = OnceLock::new();

/// How aggressively the jurisdiction enforces restrictive covenants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enforcement {
    Strict,
    Moderate,
    Lenient,
}

impl Enforcement {
    pub fn label(&self) -> &'static str {
        match self {
            Enforcement::Strict => "strict",
            Enforcement::Moderate => "moderate",
            Enforcement::Lenient => "lenient",
        }
    }
}

/// One static fact row for a jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRule {
    /// Two-letter state code, uppercase
    pub state: String,

    /// Whether the state adopted the uniform trade secrets standard
    pub uniform_act_adopted: bool,

    /// Whether state-specific workplace restrictions apply
    pub workplace_restrictions: bool,

    pub enforcement: Enforcement,

    /// Maximum enforceable restriction duration; 0 means effectively banned
    pub max_duration_months: u32,

    /// Whether a comprehensive state data-privacy law is in force
    pub data_privacy_law: bool,

    /// Whether non-compete agreements are restricted or void
    pub non_compete_restricted: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Severity tag shared by badges and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Info,
}

/// A short user-facing badge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub text: String,
}

/// A longer user-facing guidance message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub text: String,
}

/// Derived display data, computed fresh on every call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceDisplay {
    pub badges: Vec<Badge>,
    pub messages: Vec<Message>,
}

/// The process-wide rule table, parsed once from the embedded JSON
fn rules() -> &'static HashMap<String, ComplianceRule> {
    RULES.get_or_init(|| {
        let rows: Vec<ComplianceRule> = serde_json::from_str(include_str!("compliance_rules.json"))
            .expect("embedded compliance rule table is valid JSON");
        rows.into_iter().map(|r| (r.state.clone(), r)).collect()
    })
}

/// Looks up the rule row for a state code, case-insensitively
pub fn rule_for(state: &str) -> Option<&'static ComplianceRule> {
    rules().get(state.to_ascii_uppercase().as_str())
}

/// Resolves the badges and messages to display for a state.
///
/// Unknown states get the conservative default: no badges, one warning
/// advising consultation with a local attorney. This path never fails.
pub fn resolve_display(state: &str) -> ComplianceDisplay {
    let Some(rule) = rule_for(state) else {
        return ComplianceDisplay {
            badges: vec![],
            messages: vec![Message {
                severity: Severity::Warning,
                text: format!(
                    "No state-specific guidance is available for {}. \
                     Consult a local attorney before using this document.",
                    state.to_ascii_uppercase()
                ),
            }],
        };
    };

    let mut display = ComplianceDisplay::default();

    // Fixed predicate order - a contract, not incidental.
    if rule.uniform_act_adopted {
        display.badges.push(Badge {
            severity: Severity::Success,
            text: "Uniform act adopted".into(),
        });
        display.messages.push(Message {
            severity: Severity::Info,
            text: format!(
                "{} has adopted the uniform trade secrets standard.",
                rule.state
            ),
        });
    }

    if rule.workplace_restrictions {
        display.badges.push(Badge {
            severity: Severity::Warning,
            text: "Workplace restrictions".into(),
        });
        display.messages.push(Message {
            severity: Severity::Warning,
            text: format!(
                "{} imposes additional workplace restrictions that may affect this document.",
                rule.state
            ),
        });
    }

    let (enforcement_severity, enforcement_text) = match rule.enforcement {
        Enforcement::Strict => (Severity::Warning, "Strictly enforced"),
        Enforcement::Moderate => (Severity::Info, "Moderately enforced"),
        Enforcement::Lenient => (Severity::Success, "Leniently enforced"),
    };
    display.badges.push(Badge {
        severity: enforcement_severity,
        text: enforcement_text.into(),
    });
    display.messages.push(Message {
        severity: enforcement_severity,
        text: format!(
            "Courts in {} apply {} scrutiny to restrictive covenants.",
            rule.state,
            rule.enforcement.label()
        ),
    });

    // Duration is message-only, never a badge
    display.messages.push(Message {
        severity: if rule.max_duration_months == 0 {
            Severity::Warning
        } else {
            Severity::Info
        },
        text: if rule.max_duration_months == 0 {
            format!("Restrictive covenants are effectively unenforceable in {}.", rule.state)
        } else {
            format!(
                "Restriction duration is capped at {} months in {}.",
                rule.max_duration_months, rule.state
            )
        },
    });

    if rule.data_privacy_law {
        display.badges.push(Badge {
            severity: Severity::Info,
            text: "Data privacy law".into(),
        });
        display.messages.push(Message {
            severity: Severity::Info,
            text: format!(
                "{} has a comprehensive data-privacy law; review any personal-data clauses.",
                rule.state
            ),
        });
    }

    if rule.non_compete_restricted {
        display.badges.push(Badge {
            severity: Severity::Warning,
            text: "Non-competes restricted".into(),
        });
        display.messages.push(Message {
            severity: Severity::Warning,
            text: format!(
                "Non-compete provisions are restricted or void in {}.",
                rule.state
            ),
        });
    }

    // Free-text note, verbatim, always last
    if let Some(note) = &rule.note {
        display.messages.push(Message {
            severity: Severity::Info,
            text: note.clone(),
        });
    }

    display
}

/// Produces a short comma-joined summary for a state; never fails
pub fn resolve_summary(state: &str) -> String {
    let Some(rule) = rule_for(state) else {
        return format!(
            "no state-specific rules for {}, moderate enforcement assumed, \
             max duration {} months",
            state.to_ascii_uppercase(),
            DEFAULT_MAX_DURATION_MONTHS
        );
    };

    let mut parts = vec![
        if rule.uniform_act_adopted {
            "uniform act adopted".to_string()
        } else {
            "uniform act not adopted".to_string()
        },
        format!("{} enforcement", rule.enforcement.label()),
        format!("max duration {} months", rule.max_duration_months),
    ];

    if rule.workplace_restrictions {
        parts.push("workplace restrictions apply".into());
    }
    if rule.non_compete_restricted {
        parts.push("non-competes restricted".into());
    }

    parts.join(", ")
}
