use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/register";
pub const DEFAULT_ADMIN_KEY_ENV: &str = "MRS_ADMIN_KEY";

/// A validation error in the configuration
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {}", self.field, self.message)
    }
}

/// Where the admin key was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminKeySource {
    Direct,
    Env(String),
    Missing,
}

impl std::fmt::Display for AdminKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "<direct>"),
            Self::Env(name) => write!(f, "${}", name),
            Self::Missing => write!(f, "<none>"),
        }
    }
}

/// Main configuration structure. Every field is optional so that file
/// layers only override what they set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: Option<String>,
    /// The admin key itself; keep it in config.local.toml, not in git
    #[serde(default)]
    pub admin_key: Option<String>,
    /// Environment variable consulted when `admin_key` is unset
    #[serde(default)]
    pub admin_key_env: Option<String>,
    /// Files merged into this config, in load order
    #[serde(skip)]
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Built-in defaults: local endpoint, key read from $MRS_ADMIN_KEY
    pub fn with_defaults() -> Self {
        Config {
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            admin_key: None,
            admin_key_env: Some(DEFAULT_ADMIN_KEY_ENV.to_string()),
            sources: Vec::new(),
        }
    }

    /// Load configuration from the home and project directories
    /// Priority: local (.mrs/config.local.toml) > project (.mrs/config.toml) > user (~/.mrs/config.toml)
    pub fn load_layers(home: Option<&Path>, project: &Path) -> Result<Self> {
        let mut config = Self::with_defaults();

        let mut candidates = Vec::new();
        if let Some(home) = home {
            candidates.push(home.join(".mrs").join("config.toml"));
        }
        candidates.push(project.join(".mrs").join("config.toml"));
        candidates.push(project.join(".mrs").join("config.local.toml"));

        // Running from $HOME makes the user and project files the same file
        let mut seen = Vec::new();
        for path in candidates {
            if !path.exists() {
                continue;
            }
            let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
            if seen.contains(&canonical) {
                continue;
            }
            seen.push(canonical);
            let layer = Self::load_from(&path)?;
            config.merge(layer);
        }

        Ok(config)
    }

    /// Load a single file over the built-in defaults
    pub fn load_with_defaults(path: &Path) -> Result<Self> {
        let mut config = Self::with_defaults();
        config.merge(Self::load_from(path)?);
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.sources.push(path.to_path_buf());
        Ok(config)
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Config) {
        if other.endpoint.is_some() {
            self.endpoint = other.endpoint;
        }
        if other.admin_key.is_some() {
            self.admin_key = other.admin_key;
        }
        if other.admin_key_env.is_some() {
            self.admin_key_env = other.admin_key_env;
        }
        self.sources.extend(other.sources);
    }

    /// Apply command-line values on top of every file layer
    pub fn apply_overrides(&mut self, endpoint: Option<&str>, admin_key: Option<&str>) {
        if let Some(endpoint) = endpoint {
            self.endpoint = Some(endpoint.to_string());
        }
        if let Some(admin_key) = admin_key {
            self.admin_key = Some(admin_key.to_string());
        }
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Resolve the admin key from config or environment
    pub fn resolve_admin_key(&self) -> Option<String> {
        self.resolve_admin_key_with_source().0
    }

    pub fn admin_key_source(&self) -> AdminKeySource {
        self.resolve_admin_key_with_source().1
    }

    fn resolve_admin_key_with_source(&self) -> (Option<String>, AdminKeySource) {
        // Direct key takes priority
        if let Some(key) = self.admin_key.as_deref().filter(|k| !k.is_empty()) {
            return (Some(key.to_string()), AdminKeySource::Direct);
        }

        if let Some(env_var) = &self.admin_key_env {
            if let Ok(key) = std::env::var(env_var) {
                if !key.is_empty() {
                    return (Some(key), AdminKeySource::Env(env_var.clone()));
                }
            }
        }

        (None, AdminKeySource::Missing)
    }

    /// Validate configuration and return any errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(endpoint) = &self.endpoint {
            if endpoint.trim().is_empty() {
                errors.push(ValidationError {
                    field: "endpoint".to_string(),
                    message: "Must not be empty".to_string(),
                });
            } else if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                errors.push(ValidationError {
                    field: "endpoint".to_string(),
                    message: format!("Expected an http:// or https:// URL, got '{}'", endpoint),
                });
            }
        }

        if self.admin_key.as_deref() == Some("") {
            errors.push(ValidationError {
                field: "admin_key".to_string(),
                message: "Must not be empty; remove it to fall back to admin_key_env".to_string(),
            });
        }

        if let Some(env_var) = &self.admin_key_env {
            if env_var.trim().is_empty() {
                errors.push(ValidationError {
                    field: "admin_key_env".to_string(),
                    message: "Must not be empty".to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
