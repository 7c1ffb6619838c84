//! Atomic artifact writes
//!
//! Artifacts are written to a temp file under an exclusive lock and renamed
//! into place, so a concurrent reader can never observe a half-written
//! manifest.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

/// Temp-file name for an artifact. The original extension is kept so
/// sibling artifacts (`manifest.json`, `manifest.rs`) never share a temp
/// file under concurrent writers.
fn temp_path(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_extension(format!("{}.tmp", ext)),
        None => path.with_extension("tmp"),
    }
}

/// Writes `contents` to `path` atomically (temp file + rename)
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let temp_path = temp_path(path);

    {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on artifact")?;

        let mut writer = BufWriter::new(&file);
        writer
            .write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write artifact: {}", temp_path.display()))?;
        writer.flush().context("Failed to flush artifact")?;
    }

    fs::rename(&temp_path, path).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            path.display()
        )
    })?;

    Ok(())
}
