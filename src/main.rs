//! Lexcat CLI - document catalog compiler and compliance resolver

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = lexcat_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
