//! Configuration file discovery and loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::settings::ConfigError;
use super::types::{FileConfig, KNOWN_KEYS};

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = ".complysync.toml";

/// Non-fatal configuration warning (e.g. an unknown key)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    /// 1-indexed
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Suggestions further than this many edits away are not offered
const MAX_SUGGESTION_DISTANCE: usize = 2;

impl ConfigWarning {
    /// Warning for the dotted `key_path` reported by `serde_ignored`
    fn unknown_key(key_path: &str, file: &Path, content: &str) -> Self {
        let key = key_path.rsplit('.').next().unwrap_or(key_path);
        Self {
            key: key.to_string(),
            file: file.to_path_buf(),
            line: content
                .lines()
                .position(|line| line.trim_start().starts_with(key))
                .map(|i| i + 1),
            suggestion: closest_known_key(key).map(str::to_string),
        }
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load a configuration file and collect warnings for unknown keys
pub fn load_with_warnings(path: &Path) -> Result<(FileConfig, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::InvalidFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: FileConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::InvalidFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .iter()
        .map(|key_path| ConfigWarning::unknown_key(key_path, path, &content))
        .collect();

    Ok((config, warnings))
}

/// Load the explicit file, or `<working_dir>/.complysync.toml` when present
///
/// An explicit path that does not exist is an error; a missing default file
/// yields an empty configuration. Warnings are logged.
pub fn load_file_config(explicit: Option<&Path>, working_dir: &Path) -> Result<FileConfig, ConfigError> {
    let path = match explicit {
        Some(path) if !path.is_file() => {
            return Err(ConfigError::InvalidFile {
                path: path.to_path_buf(),
                message: "file not found".to_string(),
            })
        }
        Some(path) => path.to_path_buf(),
        None => {
            let default = working_dir.join(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                return Ok(FileConfig::default());
            }
            default
        }
    };

    debug!(path = %path.display(), "loading configuration file");
    let (config, warnings) = load_with_warnings(&path)?;
    for warning in &warnings {
        warn!("{}", warning);
    }
    Ok(config)
}

fn closest_known_key(unknown: &str) -> Option<&'static str> {
    KNOWN_KEYS
        .iter()
        .map(|known| (*known, edit_distance(unknown, known)))
        .filter(|(_, distance)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(_, distance)| *distance)
        .map(|(known, _)| known)
}

/// Levenshtein distance over chars, keeping a single row
fn edit_distance(from: &str, to: &str) -> usize {
    let to: Vec<char> = to.chars().collect();
    let mut row: Vec<usize> = (0..=to.len()).collect();

    for (i, a) in from.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, b) in to.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if a == *b {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }

    row[to.len()]
}
