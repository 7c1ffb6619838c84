//! Conditional question activation
//!
//! Each document declares a static list of form questions; which ones are
//! currently active depends on the live answers. A question with no
//! condition is always active; a conditional question is active only when
//! the referenced answer is present and strictly equal to the declared
//! value. Missing answers are non-matches - hide by default. The active set
//! is recomputed in full on every call, never cached.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Live form answers, keyed by question/field id
pub type Answers = HashMap<String, Value>;

/// Input widget kind for a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Textarea,
    Select,
    Number,
    Date,
    Checkbox,
}

/// Activation condition: the referenced answer must strictly equal `value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub value: Value,
}

/// One statically declared form question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: QuestionType,

    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    #[serde(default)]
    pub group: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_on: Option<Condition>,
}

impl Question {
    /// Returns true if this question is active for the given answers
    pub fn is_active(&self, answers: &Answers) -> bool {
        match &self.conditional_on {
            None => true,
            Some(condition) => answers
                .get(&condition.field)
                .is_some_and(|answer| answer == &condition.value),
        }
    }
}

/// Computes the set of currently active question ids.
///
/// Full recomputation, no incremental diffing: the result can never go
/// stale relative to the answers it was computed from.
pub fn compute_active(questions: &[Question], answers: &Answers) -> HashSet<String> {
    questions
        .iter()
        .filter(|q| q.is_active(answers))
        .map(|q| q.id.clone())
        .collect()
}

/// Returns the ids of required, active questions that lack a usable answer.
///
/// Inactive questions are always satisfied regardless of their `required`
/// flag. An answer is usable unless it is missing, null, or an empty string.
pub fn validate_required(questions: &[Question], answers: &Answers) -> Vec<String> {
    questions
        .iter()
        .filter(|q| q.required && q.is_active(answers))
        .filter(|q| !has_answer(answers, &q.id))
        .map(|q| q.id.clone())
        .collect()
}

fn has_answer(answers: &Answers, id: &str) -> bool {
    match answers.get(id) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(id: &str, required: bool, conditional_on: Option<Condition>) -> Question {
        Question {
            id: id.into(),
            kind: QuestionType::Text,
            label: id.into(),
            required,
            options: vec![],
            group: "general".into(),
            conditional_on,
        }
    }

    fn answers(pairs: &[(&str, Value)]) -> Answers {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn unconditional_questions_are_always_active() {
        let questions = vec![question("a", false, None), question("b", true, None)];
        let active = compute_active(&questions, &Answers::new());

        assert!(active.contains("a"));
        assert!(active.contains("b"));
    }

    #[test]
    fn condition_requires_strict_equality() {
        let questions = vec![question(
            "details",
            true,
            Some(Condition {
                field: "has_details".into(),
                value: json!(true),
            }),
        )];

        // Matching answer activates
        let active = compute_active(&questions, &answers(&[("has_details", json!(true))]));
        assert!(active.contains("details"));

        // Wrong value does not
        let active = compute_active(&questions, &answers(&[("has_details", json!(false))]));
        assert!(!active.contains("details"));

        // Wrong type does not: "true" is not true
        let active = compute_active(&questions, &answers(&[("has_details", json!("true"))]));
        assert!(!active.contains("details"));
    }

    #[test]
    fn missing_answer_is_a_non_match() {
        let questions = vec![question(
            "details",
            true,
            Some(Condition {
                field: "has_details".into(),
                value: json!(true),
            }),
        )];

        let active = compute_active(&questions, &Answers::new());
        assert!(!active.contains("details"));
    }

    #[test]
    fn string_valued_conditions() {
        let questions = vec![question(
            "other_reason",
            false,
            Some(Condition {
                field: "reason".into(),
                value: json!("other"),
            }),
        )];

        let active = compute_active(&questions, &answers(&[("reason", json!("other"))]));
        assert!(active.contains("other_reason"));

        let active = compute_active(&questions, &answers(&[("reason", json!("cause"))]));
        assert!(!active.contains("other_reason"));
    }

    #[test]
    fn inactive_required_question_is_satisfied() {
        let questions = vec![question(
            "details",
            true,
            Some(Condition {
                field: "has_details".into(),
                value: json!(true),
            }),
        )];

        // Condition not met: no missing answers even though required
        let missing = validate_required(&questions, &Answers::new());
        assert!(missing.is_empty());

        // Condition met and unanswered: reported
        let missing = validate_required(&questions, &answers(&[("has_details", json!(true))]));
        assert_eq!(missing, vec!["details"]);
    }

    #[test]
    fn empty_and_null_answers_do_not_satisfy_required() {
        let questions = vec![question("name", true, None)];

        assert_eq!(
            validate_required(&questions, &answers(&[("name", json!(""))])),
            vec!["name"]
        );
        assert_eq!(
            validate_required(&questions, &answers(&[("name", json!(null))])),
            vec!["name"]
        );
        assert!(validate_required(&questions, &answers(&[("name", json!("Ada"))])).is_empty());
        // false is a real answer (an unchecked checkbox, for example)
        assert!(validate_required(&questions, &answers(&[("name", json!(false))])).is_empty());
    }

    #[test]
    fn question_deserializes_from_definition_shape() {
        let q: Question = serde_json::from_value(json!({
            "id": "term_months",
            "type": "number",
            "label": "Term in months",
            "required": true,
            "group": "terms",
            "conditionalOn": { "field": "fixed_term", "value": true }
        }))
        .unwrap();

        assert_eq!(q.kind, QuestionType::Number);
        assert_eq!(q.conditional_on.as_ref().unwrap().field, "fixed_term");
    }
}
