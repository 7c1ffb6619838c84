//! Literal evaluator
//!
//! Folds the closed literal grammar into plain [`serde_json::Value`] data.
//! `None` means "no value": the node is outside the grammar and the caller
//! decides whether that matters. The evaluator never executes anything and
//! never resolves a reference - an identifier is data it refuses to invent.

use serde_json::{Map, Value};

use super::ast::{Expr, ObjectEntry};

/// Evaluates one expression into plain data, or `None` for anything
/// outside the closed literal grammar.
///
/// Array elements that evaluate to no value are dropped, not nulled.
/// Object properties whose value evaluates to no value are omitted.
pub fn evaluate(expr: &Expr) -> Option<Value> {
    match expr {
        Expr::Str(s) => Some(Value::String(s.clone())),
        Expr::Num(n) => number_value(*n),
        Expr::Bool(b) => Some(Value::Bool(*b)),
        Expr::Null => Some(Value::Null),
        Expr::Template { text, has_spans } => {
            if *has_spans {
                None
            } else {
                Some(Value::String(text.clone()))
            }
        }
        Expr::Array(elements) => Some(Value::Array(
            elements.iter().filter_map(evaluate).collect(),
        )),
        Expr::Object(entries) => {
            let mut map = Map::new();
            for entry in entries {
                if let ObjectEntry::Property { key, value } = entry {
                    if let Some(v) = evaluate(value) {
                        map.insert(key.as_string(), v);
                    }
                }
            }
            Some(Value::Object(map))
        }
        Expr::Paren(inner) => evaluate(inner),
        Expr::Unsupported(_) => None,
    }
}

/// Converts a numeric literal, preferring integer representation when the
/// value is integral (so `5` serializes as `5`, not `5.0`)
fn number_value(n: f64) -> Option<Value> {
    if !n.is_finite() {
        return None;
    }
    if n.fract() == 0.0 && n.abs() < (i64::MAX as f64) {
        Some(Value::from(n as i64))
    } else {
        serde_json::Number::from_f64(n).map(Value::Number)
    }
}
