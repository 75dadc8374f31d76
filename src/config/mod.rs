//! Unified configuration system.
//!
//! Consolidates configuration from several tiers with field-by-field YAML merging:
//! 1. **Defaults** - compiled in
//! 2. **Project** - `$CWD/todo/config.yaml`
//! 3. **User** - `~/.todo/config.yaml`
//! 4. **Environment** - variables below
//!
//! ## Environment Variables
//! - `TODO_CONFIG_PATH` - Explicit config file (replaces the file tiers)
//! - `TODO_TASKS_FILE` - JSON task file used by the CLI
//! - `TODO_DB_PATH` - SQLite database used by the API
//! - `TODO_HOST` / `TODO_PORT` - API bind address
//! - `TODO_CORS_ORIGINS` - Comma-separated allowed origins
//! - `TODO_USER_DIR` - User config dir (default: `~/.todo`)
//! - `TODO_PROJECT_DIR` - Project config dir (default: `./todo`)

mod loader;
mod merge;
mod types;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader, ConfigPaths, ConfigTier, apply_env_overrides};
pub use merge::{merge_layer, merge_layers};
pub use types::*;
