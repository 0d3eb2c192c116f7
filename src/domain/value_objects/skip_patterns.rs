//! Skip patterns value object
//!
//! Object names excluded from assemble/regenerate runs, matched with
//! gitignore semantics (`*`, `?`, `[...]`, `!` negation).

use std::fmt;
use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

#[derive(Debug, Clone)]
pub struct SkipPatterns {
    matcher: Gitignore,
    patterns: Vec<String>,
}

impl Default for SkipPatterns {
    fn default() -> Self {
        Self::empty()
    }
}

impl SkipPatterns {
    /// A pattern set that matches nothing
    pub fn empty() -> Self {
        Self {
            matcher: Gitignore::empty(),
            patterns: Vec::new(),
        }
    }

    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, SkipPatternError> {
        let mut builder = GitignoreBuilder::new("");
        let mut kept = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            builder
                .add_line(None, pattern)
                .map_err(|e| SkipPatternError {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;
            kept.push(pattern.to_string());
        }

        let matcher = builder.build().map_err(|e| SkipPatternError {
            pattern: kept.join(","),
            message: e.to_string(),
        })?;

        Ok(Self {
            matcher,
            patterns: kept,
        })
    }

    /// Whether the object directory `name` is skipped
    pub fn is_skipped(&self, name: &str) -> bool {
        !self.patterns.is_empty() && self.matcher.matched(Path::new(name), true).is_ignore()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// A skip pattern with invalid glob syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipPatternError {
    pub pattern: String,
    pub message: String,
}

impl fmt::Display for SkipPatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid skip pattern '{}': {}", self.pattern, self.message)
    }
}

impl std::error::Error for SkipPatternError {}
