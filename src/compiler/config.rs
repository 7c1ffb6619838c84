//! Configuration handling
//!
//! Build configuration lives in `lexcat.toml` at the project root; a small
//! global config under the user config directory carries cross-project
//! preferences. Both layers fall back to defaults when absent.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Locale;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Project-level build configuration (`lexcat.toml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directory of document definitions, relative to the project root
    pub definitions_dir: PathBuf,

    /// Directory the artifacts are emitted into, relative to the project root
    pub out_dir: PathBuf,

    /// Fixed definition filename collected by discovery
    pub definition_filename: String,

    /// Category assigned when a definition declares none
    pub default_category: String,

    /// Jurisdiction assigned when a definition declares none
    pub default_jurisdiction: String,

    /// Locales the manifest is normalized for
    pub locales: Vec<Locale>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            definitions_dir: PathBuf::from("documents"),
            out_dir: PathBuf::from("generated"),
            definition_filename: super::discovery::DEFINITION_FILENAME.to_string(),
            default_category: "general".to_string(),
            default_jurisdiction: "us".to_string(),
            locales: Locale::ALL.to_vec(),
        }
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration for a specific project root
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Loads configuration from the current directory or a parent
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;

        match Self::find_project_root() {
            Some(root) => {
                let project = Self::load_project_config(&root)?;
                Ok(Self {
                    project,
                    global,
                    project_root: Some(root),
                })
            }
            None => Ok(Self {
                project: ProjectConfig::default(),
                global,
                project_root: None,
            }),
        }
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "lexcat", "lexcat-cli").map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join("lexcat.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")
    }

    /// Finds the project root by looking for `lexcat.toml`
    pub fn find_project_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join("lexcat.toml").is_file() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns the project root, or an error if not in a project
    pub fn require_project_root(&self) -> Result<&Path> {
        self.project_root
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not in a lexcat project. Run 'lexcat init' first."))
    }

    /// Absolute path of the definitions directory
    pub fn definitions_root(&self) -> Result<PathBuf> {
        Ok(self.require_project_root()?.join(&self.project.definitions_dir))
    }

    /// Absolute path of the artifact output directory
    pub fn output_dir(&self) -> Result<PathBuf> {
        Ok(self.require_project_root()?.join(&self.project.out_dir))
    }

    /// Saves the project configuration
    pub fn save_project(&self) -> Result<()> {
        let root = self.require_project_root()?;
        let config_path = root.join("lexcat.toml");

        let content =
            toml::to_string_pretty(&self.project).context("Failed to serialize project config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write project config: {}", config_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = ProjectConfig::default();

        assert_eq!(config.definitions_dir, PathBuf::from("documents"));
        assert_eq!(config.definition_filename, "definition.ts");
        assert_eq!(config.default_category, "general");
        assert_eq!(config.default_jurisdiction, "us");
        assert_eq!(config.locales, vec![Locale::En, Locale::Es]);
    }

    #[test]
    fn parse_project_config() {
        let toml = r#"
definitions_dir = "defs"
out_dir = "dist"
locales = ["en"]
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.definitions_dir, PathBuf::from("defs"));
        assert_eq!(config.out_dir, PathBuf::from("dist"));
        assert_eq!(config.locales, vec![Locale::En]);
        // Unset keys keep their defaults
        assert_eq!(config.definition_filename, "definition.ts");
    }

    #[test]
    fn missing_project_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::for_project(dir.path()).unwrap();

        assert_eq!(config.project.default_category, "general");
        assert_eq!(config.project_root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn save_and_reload_project_config() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::for_project(dir.path()).unwrap();
        config.project.default_category = "legal".to_string();
        config.save_project().unwrap();

        let reloaded = Config::for_project(dir.path()).unwrap();
        assert_eq!(reloaded.project.default_category, "legal");
    }

    #[test]
    fn config_not_in_project() {
        let config = Config {
            project: ProjectConfig::default(),
            global: GlobalConfig::default(),
            project_root: None,
        };

        assert!(config.require_project_root().is_err());
    }
}
