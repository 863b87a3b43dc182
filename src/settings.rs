//! Persisted suggestion settings
//!
//! Tuning knobs stored as pretty JSON under the platform config directory.
//! Missing files and unknown fields fall back to defaults; loading never
//! fails.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::context::TokenBudget;
use crate::strategy::ContextLimits;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionSettings {
    /// Strategy id override; `None` picks the default strategy
    #[serde(default)]
    pub strategy_id: Option<String>,
    /// Lines on each side of the cursor used for similarity ranking
    #[serde(default = "default_context_window_lines")]
    pub context_window_lines: u32,
    /// Recent operations included in a prompt at most
    #[serde(default = "default_max_context_operations")]
    pub max_context_operations: usize,
    /// Token budget for the recent-operations context section
    #[serde(default = "default_max_context_tokens")]
    pub max_context_tokens: usize,
}

fn default_context_window_lines() -> u32 {
    5
}

fn default_max_context_operations() -> usize {
    3
}

fn default_max_context_tokens() -> usize {
    TokenBudget::small().available_for_context()
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            strategy_id: None,
            context_window_lines: default_context_window_lines(),
            max_context_operations: default_max_context_operations(),
            max_context_tokens: default_max_context_tokens(),
        }
    }
}

impl SuggestionSettings {
    pub fn context_limits(&self) -> ContextLimits {
        ContextLimits {
            window_lines: self.context_window_lines,
            max_operations: self.max_context_operations,
            max_tokens: self.max_context_tokens,
        }
    }
}

pub fn default_settings_path() -> PathBuf {
    let Some(dirs) = ProjectDirs::from("dev", "inlay", "inlay") else {
        return Path::new("inlay-suggestions.json").to_path_buf();
    };
    dirs.config_dir().join("suggestions.json")
}

pub fn load_settings(path: &Path) -> SuggestionSettings {
    let Ok(bytes) = fs::read(path) else {
        return SuggestionSettings::default();
    };
    serde_json::from_slice::<SuggestionSettings>(&bytes).unwrap_or_default()
}

pub fn save_settings(path: &Path, settings: &SuggestionSettings) -> Result<(), String> {
    let json = serde_json::to_vec_pretty(settings).map_err(|e| e.to_string())?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    fs::write(path, json).map_err(|e| e.to_string())
}
