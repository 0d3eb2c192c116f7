//! Configuration for complysync
//!
//! Settings are resolved in order of precedence:
//! 1. CLI flags (highest priority)
//! 2. Configuration file (`--config`, or `.complysync.toml` in the working directory)
//! 3. Built-in defaults (lowest priority)

mod loader;
mod settings;
mod types;

pub use loader::{load_file_config, load_with_warnings, ConfigWarning, DEFAULT_CONFIG_FILE};
pub use settings::{ConfigError, GitSettings, OscalModel, RawSettings, Settings};
pub use types::{FileConfig, GitSection, ModelSection};
