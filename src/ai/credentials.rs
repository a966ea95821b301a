//! API key resolution.
//!
//! Sources are tried in a fixed order and the first non-empty value wins:
//!
//! 1. `ai.api_key` in the loaded configuration
//! 2. the environment variable named by `ai.api_key_env`
//! 3. the project's `.env` file
//! 4. `.env` in the planwright config directory
//!
//! `.env` files are read in place and never exported into the process
//! environment.

use std::fmt;
use std::path::{Path, PathBuf};

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::core::{AiConfig, Config};

/// A secret value that is zeroed on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretValue {
    value: String,
}

impl SecretValue {
    /// Wrap a secret.
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    /// The raw secret. Never log the result.
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Whether the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretValue([REDACTED])")
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// Where a credential was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// `ai.api_key` in the configuration file
    Settings,
    /// A process environment variable
    Environment(String),
    /// The project's `.env` file
    ProjectFile(PathBuf),
    /// The tool-wide `.env` file
    ToolFile(PathBuf),
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settings => write!(f, "config file"),
            Self::Environment(var) => write!(f, "${var}"),
            Self::ProjectFile(path) | Self::ToolFile(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A resolved key and its origin.
#[derive(Debug, Clone)]
pub struct ResolvedCredential {
    pub secret: SecretValue,
    pub source: CredentialSource,
}

/// Looks up the backend API key.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    settings_key: Option<String>,
    env_var: String,
    project_root: Option<PathBuf>,
    tool_dir: Option<PathBuf>,
}

impl CredentialResolver {
    /// Resolver for the given backend settings, using the default tool directory.
    pub fn new(config: &AiConfig) -> Self {
        Self {
            settings_key: config.api_key.clone(),
            env_var: config.api_key_env.clone(),
            project_root: None,
            tool_dir: Config::config_dir(),
        }
    }

    /// Also look in `<root>/.env`.
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    /// Override the directory holding the tool-wide `.env` (`None` disables it).
    pub fn with_tool_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.tool_dir = dir;
        self
    }

    /// First credential found, in priority order.
    pub fn resolve(&self) -> Option<ResolvedCredential> {
        let found = |value: String, source: CredentialSource| {
            tracing::debug!(%source, "Resolved backend credential");
            Some(ResolvedCredential { secret: SecretValue::new(value), source })
        };

        if let Some(key) = self.settings_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            return found(key.to_string(), CredentialSource::Settings);
        }

        if let Some(key) = std::env::var(&self.env_var).ok().filter(|k| !k.trim().is_empty()) {
            return found(
                key.trim().to_string(),
                CredentialSource::Environment(self.env_var.clone()),
            );
        }

        if let Some(path) = self.project_root.as_ref().map(|root| root.join(".env")) {
            if let Some(key) = read_env_file(&path, &self.env_var) {
                return found(key, CredentialSource::ProjectFile(path));
            }
        }

        if let Some(path) = self.tool_dir.as_ref().map(|dir| dir.join(".env")) {
            if let Some(key) = read_env_file(&path, &self.env_var) {
                return found(key, CredentialSource::ToolFile(path));
            }
        }

        tracing::debug!(env_var = %self.env_var, "No backend credential found");
        None
    }
}

/// Read `var` from a dotenv file without touching the process environment.
fn read_env_file(path: &Path, var: &str) -> Option<String> {
    if !path.is_file() {
        return None;
    }

    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not read .env file");
            return None;
        }
    };

    entries
        .filter_map(Result::ok)
        .find(|(key, _)| key == var)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
