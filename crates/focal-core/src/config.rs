use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::undo::DEFAULT_UNDO_WINDOW_SECONDS;

/// Workspace-local configuration, read from `.focal/config.toml`.
/// A missing file yields defaults; a malformed file is an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub undo: UndoConfig,
    #[serde(default)]
    pub suggest: SuggestConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            undo: UndoConfig::default(),
            suggest: SuggestConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoConfig {
    /// How long a deleted task stays restorable.
    #[serde(default = "default_undo_window")]
    pub window_seconds: u64,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            window_seconds: default_undo_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Maximum number of "what now" suggestions.
    #[serde(default = "default_suggestion_limit")]
    pub limit: usize,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            limit: default_suggestion_limit(),
        }
    }
}

const fn default_undo_window() -> u64 {
    DEFAULT_UNDO_WINDOW_SECONDS
}

const fn default_suggestion_limit() -> usize {
    5
}

/// Load the config for the workspace rooted at `workspace_root` (the
/// directory containing `.focal/`).
pub fn load_project_config(workspace_root: &Path) -> Result<ProjectConfig> {
    let path = workspace_root.join(".focal/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
