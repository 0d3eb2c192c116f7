//! Index entity - maps authored object names to their governing content
//!
//! The index is a pure data structure; loading and saving are handled by
//! `IndexRepository`. Once loaded it is passed by reference and never
//! mutated during a workflow run.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

/// Lookup failure for a name that is absent from the index
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexLookupError {
    #[error("object {name} does not exist in the index")]
    NotFound { name: String },
}

/// Metadata for one authored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    profile: String,
    components: BTreeSet<String>,
}

impl IndexEntry {
    pub fn new<I, S>(profile: impl Into<String>, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            profile: profile.into(),
            components: components.into_iter().map(Into::into).collect(),
        }
    }

    /// Name of the profile governing this object
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Names of the component definitions this object covers
    pub fn components(&self) -> &BTreeSet<String> {
        &self.components
    }
}

/// Name -> entry mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    entries: BTreeMap<String, IndexEntry>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_entry(&self, name: &str) -> Result<&IndexEntry, IndexLookupError> {
        self.entries
            .get(name)
            .ok_or_else(|| IndexLookupError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn get_components(&self, name: &str) -> Result<&BTreeSet<String>, IndexLookupError> {
        self.get_entry(name).map(IndexEntry::components)
    }

    pub fn get_profile(&self, name: &str) -> Result<&str, IndexLookupError> {
        self.get_entry(name).map(IndexEntry::profile)
    }

    /// Add or replace an entry, returning the previous one
    pub fn insert(&mut self, name: impl Into<String>, entry: IndexEntry) -> Option<IndexEntry> {
        self.entries.insert(name.into(), entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over entries in name order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
