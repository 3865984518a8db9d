use kindred_types::models::JournalEntry;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::notes::next_time_id;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        author: &str,
        prompt: Option<&str>,
        body: &str,
        now_ms: i64,
    ) -> CoreResult<&JournalEntry> {
        let body = body.trim();
        if body.is_empty() {
            return Err(CoreError::EmptyJournalEntry);
        }

        let last = self.entries.iter().map(|e| e.id).max();
        self.entries.push(JournalEntry {
            id: next_time_id(last, now_ms),
            author: author.to_string(),
            prompt: prompt.map(str::trim).filter(|p| !p.is_empty()).map(String::from),
            body: body.to_string(),
            created_at: now_ms,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// One author's entries, newest first.
    pub fn entries_by<'a>(&'a self, author: &'a str) -> impl Iterator<Item = &'a JournalEntry> {
        self.entries.iter().rev().filter(move |e| e.author == author)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
