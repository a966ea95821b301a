//! Configuration management for Planwright.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Context aggregation limits
    pub context: ContextConfig,

    /// Reasoning backend settings
    pub ai: AiConfig,

    /// Workflow session settings
    pub workflow: WorkflowConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Minimum length (in characters, trimmed) of a feature request
    pub min_request_len: usize,

    /// Minimum length (in characters, trimmed) of a clarification answer
    pub min_answer_len: usize,

    /// Whether execute/restart ask for confirmation
    pub confirm: bool,
}

/// Limits applied while scanning a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Maximum number of key files kept across all patterns
    pub max_total_files: usize,

    /// Files larger than this (bytes) are skipped
    pub max_file_size: u64,

    /// Maximum depth of the rendered directory tree
    pub tree_depth: usize,

    /// Maximum children listed per directory in the tree
    pub max_tree_entries: usize,

    /// Characters of each config file surfaced in prompts
    pub excerpt_chars: usize,
}

/// Reasoning backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Whether the backend is used at all (fallback only when false)
    pub enabled: bool,

    /// Backend provider (claude)
    pub provider: String,

    /// Model to use
    pub model: Option<String>,

    /// API key from the settings store (takes priority over every other source)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Maximum tokens per response
    pub max_tokens: u32,

    /// Optional request timeout in seconds (none by default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Workflow session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Key the session state is persisted under
    pub session_key: String,

    /// Directory holding persisted state (defaults to the data dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration for the project at `root`.
    ///
    /// Looks for config in:
    /// 1. `.planwright.toml` in the project root
    /// 2. `~/.config/planwright/config.toml`
    /// 3. Falls back to defaults
    pub fn load_for_project(root: &Path) -> anyhow::Result<Self> {
        let local_config = root.join(".planwright.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(global_config) = Self::config_dir().map(|d| d.join("config.toml")) {
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Save configuration to the global config file.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        std::fs::create_dir_all(&config_dir)?;

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_dir.join("config.toml"), content)?;

        Ok(())
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("planwright"))
    }

    /// Get the data directory path (for session state).
    pub fn data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("planwright"))
    }

    /// Directory session state is written to.
    pub fn state_dir(&self) -> PathBuf {
        self.workflow
            .state_dir
            .clone()
            .or_else(Self::data_dir)
            .unwrap_or_else(|| PathBuf::from(".planwright"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            context: ContextConfig::default(),
            ai: AiConfig::default(),
            workflow: WorkflowConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { min_request_len: 10, min_answer_len: 2, confirm: true }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_total_files: 20,
            max_file_size: 50 * 1024,
            tree_depth: 3,
            max_tree_entries: 40,
            excerpt_chars: 600,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: "claude".to_string(),
            model: None,
            api_key: None,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            max_tokens: 2048,
            timeout_secs: None,
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self { session_key: "planwright.session".to_string(), state_dir: None }
    }
}
