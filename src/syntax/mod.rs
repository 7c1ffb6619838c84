//! Constrained-grammar syntax layer for document definitions
//!
//! Definition files are scanned, not executed: a tolerant lexer and parser
//! turn the source into a tagged-union expression tree, and the literal
//! evaluator folds the closed literal subset of that tree into plain data.
//! Anything outside the closed grammar survives parsing as an
//! `Expr::Unsupported` node and simply evaluates to no value.

mod lexer;
mod ast;
mod parser;
mod eval;

pub use ast::{Expr, Module, ObjectEntry, PropertyKey, Statement};
pub use lexer::{tokenize, Token};
pub use parser::parse_module;
pub use eval::evaluate;
