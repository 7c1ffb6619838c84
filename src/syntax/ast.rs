//! Tagged-union syntax tree for definition expressions
//!
//! The tree distinguishes the closed literal grammar from everything else.
//! Unsupported constructs are not parse errors: they become
//! [`Expr::Unsupported`] nodes carrying a short kind label, and the
//! evaluator turns them into "no value".

/// A parsed definition module: the flat list of top-level statements
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub statements: Vec<Statement>,
}

/// A top-level statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `export const <name>: <annotation> = <init>;`
    ExportConst {
        name: String,
        /// Raw annotation text, empty when the declaration is untyped.
        /// Matched by substring only - no type resolution happens here.
        annotation: String,
        init: Expr,
    },
    /// Imports, interfaces, plain statements - anything we don't extract from
    Other,
}

/// An expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
    /// Template literal; evaluates to a string only when `has_spans` is false
    Template { text: String, has_spans: bool },
    Array(Vec<Expr>),
    Object(Vec<ObjectEntry>),
    Paren(Box<Expr>),
    /// Anything outside the closed grammar (call, identifier, arrow, spread,
    /// member access, ...). The label names the construct for diagnostics.
    Unsupported(&'static str),
}

/// One entry in an object literal
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectEntry {
    /// `key: value` with a plain identifier, string, or numeric key
    Property { key: PropertyKey, value: Expr },
    /// Spread, computed key, shorthand, method - dropped by the evaluator
    Unsupported,
}

/// A supported property key
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Ident(String),
    Str(String),
    Num(f64),
}

impl PropertyKey {
    /// The key as it appears in the evaluated data.
    /// Numeric keys fold to their canonical decimal form, as in JSON.
    pub fn as_string(&self) -> String {
        match self {
            PropertyKey::Ident(s) | PropertyKey::Str(s) => s.clone(),
            PropertyKey::Num(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
        }
    }
}
