//! `compliance`: state rule lookup and display

use anyhow::Result;

use super::output::Output;
use crate::domain::{resolve_display, resolve_summary, Severity};

pub fn run(output: &Output, state: &str, summary: bool) -> Result<()> {
    if summary {
        let line = resolve_summary(state);
        if output.is_json() {
            output.data(&serde_json::json!({
                "state": state.to_uppercase(),
                "summary": line,
            }));
        } else {
            println!("{}", line);
        }
        return Ok(());
    }

    let display = resolve_display(state);

    if output.is_json() {
        output.data(&serde_json::json!({
            "state": state.to_uppercase(),
            "badges": display.badges,
            "messages": display.messages,
        }));
        return Ok(());
    }

    println!("Compliance for {}", state.to_uppercase());
    for badge in &display.badges {
        println!("  {} {}", tag(badge.severity), badge.text);
    }
    if !display.badges.is_empty() {
        output.blank();
    }
    for message in &display.messages {
        println!("  {} {}", tag(message.severity), message.text);
    }

    Ok(())
}

fn tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "[ok]  ",
        Severity::Warning => "[warn]",
        Severity::Info => "[info]",
    }
}
