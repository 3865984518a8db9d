use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use kindred_types::models::{Category, Entry};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate entry id {0}")]
    DuplicateId(u32),
}

#[derive(Deserialize)]
struct CatalogFile {
    version: String,
    entries: Vec<Entry>,
}

/// Read-only glossary dataset, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: String,
    entries: Vec<Entry>,
    index: HashMap<u32, usize>,
}

impl Catalog {
    pub fn new(version: impl Into<String>, entries: Vec<Entry>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter().enumerate() {
            if index.insert(entry.id, pos).is_some() {
                return Err(CatalogError::DuplicateId(entry.id));
            }
        }

        Ok(Self {
            version: version.into(),
            entries,
            index,
        })
    }

    /// Parse `{"version": "...", "entries": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.version, file.entries)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        info!(
            "Loaded catalog {} ({} entries) from {}",
            catalog.version,
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: u32) -> Option<&Entry> {
        self.index.get(&id).map(|&pos| &self.entries[pos])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Categories that have at least one entry, in display order.
    pub fn categories(&self) -> Vec<Category> {
        let present: BTreeSet<Category> = self.entries.iter().map(|e| e.category).collect();
        present.into_iter().collect()
    }

    /// Every distinct tag, sorted.
    pub fn tags(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .flat_map(|e| e.tags.iter().map(String::as_str))
            .collect()
    }
}
