//! `questions`: conditional activation against a set of answers

use anyhow::{Context, Result};

use super::catalog::load_manifest;
use super::output::Output;
use crate::compiler::{Config, DocumentRegistry};
use crate::domain::{compute_active, validate_required, Answers};

pub fn run(output: &Output, config: &Config, id: &str, answers_json: &str) -> Result<()> {
    let answers: Answers =
        serde_json::from_str(answers_json).context("Answers must be a JSON object")?;

    let (manifest, out_dir) = load_manifest(config)?;
    let registry = DocumentRegistry::from_manifest(&manifest, &out_dir);
    let definition = registry.load(id)?;

    let active = compute_active(&definition.questions, &answers);
    let missing = validate_required(&definition.questions, &answers);

    if output.is_json() {
        let shown: Vec<_> = definition
            .questions
            .iter()
            .filter(|q| active.contains(&q.id))
            .collect();
        output.data(&serde_json::json!({
            "document": id,
            "active": shown,
            "missingRequired": missing,
        }));
        return Ok(());
    }

    println!("Questions for '{}'", id);
    for question in &definition.questions {
        if !active.contains(&question.id) {
            continue;
        }
        let marker = if question.required { "*" } else { " " };
        println!("  {} {:<24} {}", marker, question.id, question.label);
    }

    output.blank();
    if missing.is_empty() {
        println!("All required questions answered");
    } else {
        println!("Missing required answers: {}", missing.join(", "));
    }

    Ok(())
}
