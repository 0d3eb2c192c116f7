//! Control markdown reader
//!
//! Handles extraction of YAML frontmatter from control markdown files and
//! discovery of those files under an authored object's directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::services::ControlBody;
use crate::error::{ComplySyncError, ComplySyncResult};

/// Delimiter for frontmatter sections
const FRONTMATTER_DELIMITER: &str = "---";

/// Result of extracting frontmatter from content
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFrontmatter {
    /// The raw YAML content of the frontmatter
    pub yaml: String,
    /// The content body after the frontmatter
    pub body: String,
}

/// A parsed control file: typed frontmatter plus structured body
#[derive(Debug, Clone)]
pub struct ControlFile<T> {
    pub path: PathBuf,
    pub frontmatter: T,
    pub body: ControlBody,
}

/// Extract frontmatter from file content
///
/// Frontmatter must be at the start of the file, delimited by `---` lines.
///
/// # Example
/// ```text
/// ---
/// control-id: ac-1
/// ---
/// # ac-1 - Policy and Procedures
/// ```
pub fn extract_frontmatter(content: &str, file: &Path) -> ComplySyncResult<ExtractedFrontmatter> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.is_empty() || lines[0].trim() != FRONTMATTER_DELIMITER {
        return Err(ComplySyncError::NoFrontmatter {
            file: file.to_path_buf(),
        });
    }

    let closing_line = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| line.trim() == FRONTMATTER_DELIMITER)
        .map(|(i, _)| i)
        .ok_or_else(|| ComplySyncError::UnclosedFrontmatter {
            file: file.to_path_buf(),
        })?;

    let yaml = lines[1..closing_line].join("\n");

    let body = if closing_line + 1 < lines.len() {
        lines[closing_line + 1..].join("\n")
    } else {
        String::new()
    };

    Ok(ExtractedFrontmatter { yaml, body })
}

/// Parse frontmatter YAML into a typed header
pub fn parse_frontmatter<T: DeserializeOwned>(yaml: &str, file: &Path) -> ComplySyncResult<T> {
    serde_yaml_ng::from_str(yaml).map_err(|e| ComplySyncError::InvalidFrontmatter {
        file: file.to_path_buf(),
        message: format_yaml_frontmatter_error(yaml, &e),
    })
}

/// Render a typed header and body as a complete markdown document
pub fn render_document<T: Serialize>(frontmatter: &T, body: &str, file: &Path) -> ComplySyncResult<String> {
    let yaml = serde_yaml_ng::to_string(frontmatter).map_err(|e| ComplySyncError::InvalidFrontmatter {
        file: file.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(format!("{FRONTMATTER_DELIMITER}\n{yaml}{FRONTMATTER_DELIMITER}\n\n{body}"))
}

/// Parse a single control markdown file
pub fn parse_control_file<T: DeserializeOwned>(path: &Path) -> ComplySyncResult<ControlFile<T>> {
    let content = fs::read_to_string(path)?;
    let extracted = extract_frontmatter(&content, path)?;
    let frontmatter = parse_frontmatter(&extracted.yaml, path)?;

    Ok(ControlFile {
        path: path.to_path_buf(),
        frontmatter,
        body: ControlBody::parse(&extracted.body),
    })
}

/// Find all control markdown files below `dir`, sorted by path
///
/// Hidden directories and `README.md` files are skipped.
pub fn find_markdown_files(dir: &Path) -> ComplySyncResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ComplySyncError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    find_markdown_recursive(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn find_markdown_recursive(current: &Path, files: &mut Vec<PathBuf>) -> ComplySyncResult<()> {
    for entry in fs::read_dir(current)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            if !path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with('.'))
                .unwrap_or(false)
            {
                find_markdown_recursive(&path, files)?;
            }
        } else if path.extension().map(|e| e == "md").unwrap_or(false) {
            if path.file_name() == Some(std::ffi::OsStr::new("README.md")) {
                continue;
            }
            files.push(path);
        }
    }

    Ok(())
}

fn format_yaml_frontmatter_error(yaml: &str, err: &serde_yaml_ng::Error) -> String {
    let mut message = String::new();

    let err_str = err.to_string();
    match err.location() {
        Some(loc) => message.push_str(&format!("Line {}: Invalid YAML - {}", loc.line(), err_str)),
        None => message.push_str(&format!("Invalid YAML - {}", err_str)),
    }

    if should_hint_colon_quotes(yaml, &err_str) {
        message.push_str("\nHint: Strings with colons need quotes: title: \"Policy: Access\"");
    }

    message
}

fn should_hint_colon_quotes(yaml: &str, err_str: &str) -> bool {
    // Heuristic: common YAML parse error when unquoted scalars contain `: `.
    err_str.contains("mapping values are not allowed")
        || err_str.contains("unexpected ':'")
        || yaml
            .lines()
            .any(|l| l.matches(": ").count() > 1 && l.trim_start().starts_with("title"))
}
