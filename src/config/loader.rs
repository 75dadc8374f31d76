//! Configuration loader with tier-based merging.
//!
//! Tiers, lowest priority first: compiled defaults, the project file
//! (`./todo/config.yaml`), the user file (`~/.todo/config.yaml`), then
//! environment variables.

use super::merge::merge_layers;
use super::types::Config;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the config file inside each tier's directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// File tiers, lowest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    Project,
    User,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
        }
    }
}

/// Directories searched for each file tier.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project-level config directory
    pub project_dir: Option<PathBuf>,
    /// User-level config directory
    pub user_dir: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover configuration paths from environment and defaults.
    pub fn discover() -> Self {
        // User dir: TODO_USER_DIR or ~/.todo
        let user_dir = std::env::var("TODO_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".todo")));

        // Project dir: TODO_PROJECT_DIR or $CWD/todo
        let project_dir = std::env::var("TODO_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("todo")));

        Self {
            project_dir,
            user_dir,
        }
    }

    /// Create paths with explicit directories.
    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
        }
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    pub paths: ConfigPaths,
    config: Config,
    /// The highest-priority config file that was read, if any.
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Load configuration from `paths`, reading variables through `env`.
    ///
    /// `TODO_CONFIG_PATH` names a single file that replaces the file tiers.
    pub fn load_with<F>(paths: ConfigPaths, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(explicit_path) = env("TODO_CONFIG_PATH") {
            let path = PathBuf::from(explicit_path);
            let mut config = Config::load(&path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?;
            apply_env_overrides(&mut config, &env);
            return Ok(Self {
                paths,
                config,
                config_path: Some(path),
            });
        }

        let mut layers: Vec<Value> = vec![serde_json::to_value(Config::default())?];
        let mut config_path = None;

        for (tier, dir) in [
            (ConfigTier::Project, paths.project_dir.as_deref()),
            (ConfigTier::User, paths.user_dir.as_deref()),
        ] {
            let Some(dir) = dir else { continue };
            let file = dir.join(CONFIG_FILE_NAME);
            if let Some(layer) = read_layer(&file, tier) {
                layers.push(layer);
                config_path = Some(file);
            }
        }

        let merged = merge_layers(layers);
        let mut config: Config = serde_json::from_value(merged)?;
        apply_env_overrides(&mut config, &env);

        Ok(Self {
            paths,
            config,
            config_path,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

/// Read one YAML tier. Missing files are skipped; broken ones are skipped
/// with a warning.
fn read_layer(file: &Path, tier: ConfigTier) -> Option<Value> {
    if !file.exists() {
        return None;
    }
    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %file.display(), %tier, error = %e, "Skipping unreadable config");
            return None;
        }
    };
    match serde_yaml::from_str::<Value>(&content) {
        Ok(value) => {
            debug!(path = %file.display(), %tier, "Loaded config layer");
            Some(value)
        }
        Err(e) => {
            warn!(path = %file.display(), %tier, error = %e, "Skipping malformed config");
            None
        }
    }
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides<F>(config: &mut Config, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(file) = env("TODO_TASKS_FILE") {
        config.tasks.file = PathBuf::from(file);
    }

    if let Some(db_path) = env("TODO_DB_PATH") {
        config.server.db_path = PathBuf::from(db_path);
    }

    if let Some(host) = env("TODO_HOST") {
        config.server.host = host;
    }

    if let Some(port) = env("TODO_PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!(value = %port, "Ignoring invalid TODO_PORT"),
        }
    }

    if let Some(origins) = env("TODO_CORS_ORIGINS") {
        config.server.cors_origins = origins
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
    }
}
