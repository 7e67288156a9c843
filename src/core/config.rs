//! Configuration management for Plangate.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::workflow::{Platform, StepCatalog, WorkflowError, WorkflowResult};

/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = ".plangate.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Workflow settings
    pub workflow: WorkflowConfig,
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Project root holding the planning documents, relative to the
    /// directory the config was found in
    pub root: PathBuf,

    /// Output format for reports
    pub output_format: OutputFormat,
}

/// How reports are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Workflow settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Target platform, chosen once by the vision step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,

    /// Replacement step catalog (TOML), relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { root: PathBuf::from("."), output_format: OutputFormat::Text }
    }
}

impl Config {
    /// Load configuration for a project root.
    ///
    /// Looks for config in:
    /// 1. `.plangate.toml` in the project root
    /// 2. `~/.config/plangate/config.toml`
    /// 3. Falls back to defaults
    pub fn load(root: &Path) -> WorkflowResult<Self> {
        let local_config = Self::local_path(root);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = Self::config_dir() {
            let global_config = config_dir.join("config.toml");
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> WorkflowResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| WorkflowError::io(path, e))?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Save configuration to the project's `.plangate.toml`.
    pub fn save_local(&self, root: &Path) -> WorkflowResult<PathBuf> {
        let path = Self::local_path(root);
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content).map_err(|e| WorkflowError::io(&path, e))?;
        tracing::info!(path = %path.display(), "Saved config");
        Ok(path)
    }

    /// Record the platform for this project.
    ///
    /// Returns `true` if the config changed. Once set, the platform cannot be
    /// replaced by a different one.
    pub fn select_platform(&mut self, platform: Platform) -> WorkflowResult<bool> {
        match self.workflow.platform {
            None => {
                self.workflow.platform = Some(platform);
                Ok(true)
            }
            Some(current) if current == platform => Ok(false),
            Some(current) => {
                Err(WorkflowError::PlatformLocked { current, requested: platform })
            }
        }
    }

    /// Step catalog for this project: the configured file or the built-in table.
    pub fn catalog(&self, root: &Path) -> WorkflowResult<StepCatalog> {
        match &self.workflow.catalog {
            Some(path) if path.is_absolute() => StepCatalog::load_from_file(path),
            Some(path) => StepCatalog::load_from_file(&root.join(path)),
            None => Ok(StepCatalog::builtin().clone()),
        }
    }

    /// Project root named by `[general] root`, resolved against `base`.
    pub fn project_root(&self, base: &Path) -> PathBuf {
        let root = &self.general.root;
        if root.is_absolute() {
            root.clone()
        } else if root == Path::new(".") {
            base.to_path_buf()
        } else {
            base.join(root)
        }
    }

    /// Path of the project-local config file.
    pub fn local_path(root: &Path) -> PathBuf {
        root.join(LOCAL_CONFIG_FILE)
    }

    /// Get the global config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("plangate"))
    }
}
