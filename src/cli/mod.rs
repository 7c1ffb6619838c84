//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Scaffold a project |
//! | `build` / `watch` | Compile the catalog |
//! | `list` / `show` | Read the catalog back |
//! | `compliance` | State rule display |
//! | `questions` | Conditional question activation |
//!
//! All commands support `--format text|json` and `--verbose`. Call
//! [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod build;
mod catalog;
mod compliance_cmd;
mod question_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
