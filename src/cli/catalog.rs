//! `list` and `show`: reading the compiled catalog back

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use super::output::Output;
use crate::compiler::{Config, DocumentRegistry, Manifest, ManifestData};

/// Loads the manifest artifact, pointing at `lexcat build` when absent
pub(super) fn load_manifest(config: &Config) -> Result<(Manifest, PathBuf)> {
    let out_dir = config.output_dir()?;
    let path = out_dir.join("manifest.json");
    if !path.exists() {
        bail!("No catalog found at {}. Run 'lexcat build' first.", path.display());
    }

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let data: ManifestData = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok((Manifest { entries: data.entries }, out_dir))
}

pub fn list(output: &Output, config: &Config, category: Option<&str>) -> Result<()> {
    let (manifest, _) = load_manifest(config)?;

    let entries: Vec<_> = manifest
        .entries
        .iter()
        .filter(|e| category.map(|c| e.meta.category == c).unwrap_or(true))
        .collect();

    if output.is_json() {
        output.data(&entries);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No documents found");
        return Ok(());
    }

    println!("{:<24} {:<16} {:<6} TITLE", "ID", "CATEGORY", "JUR");
    println!("{}", "-".repeat(70));
    for entry in &entries {
        println!(
            "{:<24} {:<16} {:<6} {}",
            entry.id, entry.meta.category, entry.meta.jurisdiction, entry.meta.title
        );
    }
    output.blank();
    println!("{} document(s)", entries.len());

    Ok(())
}

pub fn show(output: &Output, config: &Config, id: &str) -> Result<()> {
    let (manifest, out_dir) = load_manifest(config)?;

    let entry = manifest
        .entry(id)
        .with_context(|| format!("Unknown document id '{}'", id))?;

    let registry = DocumentRegistry::from_manifest(&manifest, &out_dir);
    let definition = registry.load(id)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "entry": entry,
            "questions": definition.questions,
        }));
        return Ok(());
    }

    let meta = &entry.meta;
    println!("{} ({})", meta.title, meta.id);
    println!("  Category:     {}", meta.category);
    println!("  Jurisdiction: {}", meta.jurisdiction);
    if let Some(time) = &meta.estimated_time {
        println!("  Time:         {}", time);
    }
    if let Some(complexity) = meta.complexity {
        println!("  Complexity:   {:?}", complexity);
    }
    if !meta.description.is_empty() {
        println!("  {}", meta.description);
    }
    if !meta.tags.is_empty() {
        println!("  Tags:         {}", meta.tags.join(", "));
    }
    if !meta.aliases.is_empty() {
        println!("  Aliases:      {}", meta.aliases.join(", "));
    }
    for (code, text) in &meta.translations {
        println!("  [{}] {}", code, text.name);
    }
    println!("  Questions:    {}", definition.questions.len());
    println!("  Source:       {}", entry.import_path);

    Ok(())
}
