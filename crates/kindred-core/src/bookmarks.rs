use std::collections::HashMap;

use kindred_types::models::BookmarkMark;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Per-user bookmark marks: user name -> entry id -> mark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkLedger {
    by_user: HashMap<String, HashMap<u32, BookmarkMark>>,
}

impl BookmarkLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle `mark` on an entry: the same mark clears it, a different one
    /// replaces it. Returns the mark now in effect.
    pub fn toggle(
        &mut self,
        user: Option<&str>,
        entry_id: u32,
        mark: BookmarkMark,
    ) -> CoreResult<Option<BookmarkMark>> {
        let user = user.ok_or(CoreError::NotAuthenticated)?;
        let marks = self.by_user.entry(user.to_string()).or_default();

        if marks.get(&entry_id) == Some(&mark) {
            marks.remove(&entry_id);
            Ok(None)
        } else {
            marks.insert(entry_id, mark);
            Ok(Some(mark))
        }
    }

    pub fn get(&self, user: &str, entry_id: u32) -> Option<BookmarkMark> {
        self.by_user.get(user).and_then(|m| m.get(&entry_id)).copied()
    }

    /// Snapshot of one user's marks; empty for unknown users.
    pub fn marks_for(&self, user: &str) -> HashMap<u32, BookmarkMark> {
        self.by_user.get(user).cloned().unwrap_or_default()
    }

    pub fn count(&self, user: &str, mark: BookmarkMark) -> usize {
        self.by_user
            .get(user)
            .map(|m| m.values().filter(|&&v| v == mark).count())
            .unwrap_or(0)
    }
}
