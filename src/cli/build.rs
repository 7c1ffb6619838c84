//! `init`, `build`, and `watch`: the compile pipeline commands

use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use tracing::{info, warn};

use super::output::Output;
use crate::compiler::{assemble, discover, Config, Manifest, ProjectConfig};

/// Scaffolds a new project: the config file and an empty definitions tree
pub fn init(output: &Output, path: &str) -> Result<()> {
    let root = Path::new(path);
    std::fs::create_dir_all(root)
        .with_context(|| format!("Failed to create directory {}", root.display()))?;
    let root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", root.display()))?;

    if root.join("lexcat.toml").exists() {
        bail!("{} is already a lexcat project", root.display());
    }

    let config = Config {
        project: ProjectConfig::default(),
        global: Default::default(),
        project_root: Some(root.clone()),
    };
    config.save_project()?;

    std::fs::create_dir_all(root.join(&config.project.definitions_dir))?;

    output.success(&format!("Initialized lexcat project at {}", root.display()));
    Ok(())
}

/// One compile pass: discover, assemble, write both artifacts
pub fn run(output: &Output, config: &Config) -> Result<()> {
    let manifest = compile(config)?;
    let out_dir = config.output_dir()?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "documents": manifest.entries.len(),
            "ids": manifest.ids(),
            "outDir": out_dir.display().to_string(),
        }));
    } else {
        output.success(&format!(
            "Compiled {} document(s) into {}",
            manifest.entries.len(),
            out_dir.display()
        ));
    }
    Ok(())
}

pub(super) fn compile(config: &Config) -> Result<Manifest> {
    let definitions = config.definitions_root()?;
    let out_dir = config.output_dir()?;

    let documents = discover(&definitions, &config.project.definition_filename)?;
    let manifest = assemble(documents, &config.project, &out_dir);
    manifest.write_artifacts(&out_dir)?;

    Ok(manifest)
}

/// Watches the definitions tree and recompiles on every debounced change
pub fn watch(output: &Output, config: &Config, debounce_seconds: u64) -> Result<()> {
    let definitions = config.definitions_root()?;
    let out_dir = config.output_dir()?;

    // First pass before waiting on events
    match compile(config) {
        Ok(manifest) => {
            output.success(&format!("Compiled {} document(s)", manifest.entries.len()))
        }
        Err(e) => warn!("initial compile failed: {:#}", e),
    }

    let (tx, rx) = mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_secs(debounce_seconds), tx)?;
    debouncer
        .watcher()
        .watch(&definitions, RecursiveMode::Recursive)?;

    output.success(&format!(
        "Watching {} (debounce: {}s)",
        definitions.display(),
        debounce_seconds
    ));

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events
                    .iter()
                    .filter(|e| !should_ignore_path(&e.path, &out_dir))
                    .count();
                if relevant == 0 {
                    continue;
                }

                info!("detected {} change(s), recompiling", relevant);
                match compile(config) {
                    Ok(manifest) => output.success(&format!(
                        "Recompiled {} document(s)",
                        manifest.entries.len()
                    )),
                    Err(e) => warn!("compile failed: {:#}", e),
                }
            }
            Ok(Err(error)) => {
                warn!("watch error: {:?}", error);
            }
            Err(_) => break,
        }
    }

    Ok(())
}

/// Editor temp files and our own artifacts never trigger a rebuild
fn should_ignore_path(path: &Path, out_dir: &Path) -> bool {
    if path.starts_with(out_dir) {
        return true;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("tmp") | Some("swp") => true,
        _ => path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.') || n.ends_with('~'))
            .unwrap_or(false),
    }
}
