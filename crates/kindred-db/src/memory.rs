use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};

use crate::BlobStore;

/// Process-local blob store. Used by tests and when no database path is set.
#[derive(Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let blobs = self.blobs.lock().map_err(|e| anyhow!("store lock poisoned: {}", e))?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, blob: &str) -> Result<()> {
        let mut blobs = self.blobs.lock().map_err(|e| anyhow!("store lock poisoned: {}", e))?;
        blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}
