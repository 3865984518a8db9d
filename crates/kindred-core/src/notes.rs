use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use kindred_types::models::Note;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// What a group of notes is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextId {
    Term(u32),
    Favor(u64),
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term(id) => write!(f, "term-{}", id),
            Self::Favor(id) => write!(f, "favor-{}", id),
        }
    }
}

impl FromStr for ContextId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidInput(format!("bad context id: {}", s));

        if let Some(id) = s.strip_prefix("term-") {
            id.parse().map(Self::Term).map_err(|_| invalid())
        } else if let Some(id) = s.strip_prefix("favor-") {
            id.parse().map(Self::Favor).map_err(|_| invalid())
        } else {
            Err(invalid())
        }
    }
}

/// Append-only notes keyed by context (`term-<id>` / `favor-<id>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationLog {
    by_context: HashMap<String, Vec<Note>>,
}

impl AnnotationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        context: ContextId,
        author: &str,
        text: &str,
        now_ms: i64,
    ) -> CoreResult<&Note> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::EmptyNote);
        }

        let id = next_time_id(self.last_id(), now_ms);
        let notes = self.by_context.entry(context.to_string()).or_default();
        notes.push(Note {
            id,
            author: author.to_string(),
            text: text.to_string(),
            created_at: now_ms,
        });
        Ok(&notes[notes.len() - 1])
    }

    /// Oldest first, as stored.
    pub fn list(&self, context: ContextId) -> &[Note] {
        self.by_context
            .get(&context.to_string())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Newest first.
    pub fn recent(&self, context: ContextId) -> impl Iterator<Item = &Note> {
        self.list(context).iter().rev()
    }

    pub fn count(&self, context: ContextId) -> usize {
        self.list(context).len()
    }

    fn last_id(&self) -> Option<i64> {
        self.by_context.values().flatten().map(|n| n.id).max()
    }
}

/// Millisecond timestamp id, bumped past `last` so ids never repeat even
/// when two writes land in the same millisecond.
pub(crate) fn next_time_id(last: Option<i64>, now_ms: i64) -> i64 {
    match last {
        Some(last) if last >= now_ms => last + 1,
        _ => now_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_ids_format_and_parse() {
        assert_eq!(ContextId::Term(5).to_string(), "term-5");
        assert_eq!(ContextId::Favor(12).to_string(), "favor-12");
        assert_eq!("term-5".parse::<ContextId>().unwrap(), ContextId::Term(5));
        assert_eq!("favor-12".parse::<ContextId>().unwrap(), ContextId::Favor(12));
        assert!("term-".parse::<ContextId>().is_err());
        assert!("entry-3".parse::<ContextId>().is_err());
    }

    #[test]
    fn append_to_term() {
        let mut log = AnnotationLog::new();
        log.append(ContextId::Term(5), "Alice", "hello", 1_000).unwrap();

        let notes = log.list(ContextId::Term(5));
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].author, "Alice");
        assert_eq!(notes[0].text, "hello");
        assert_eq!(notes[0].created_at, 1_000);
    }

    #[test]
    fn blank_text_is_rejected() {
        let mut log = AnnotationLog::new();
        for text in ["", "   ", "\n\t"] {
            assert_eq!(log.append(ContextId::Term(5), "Alice", text, 1).unwrap_err(), CoreError::EmptyNote);
        }
        assert_eq!(log, AnnotationLog::new());
        assert!(log.list(ContextId::Term(5)).is_empty());
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut log = AnnotationLog::new();
        let a = log.append(ContextId::Term(1), "Alice", "a", 50).unwrap().id;
        let b = log.append(ContextId::Favor(1), "Bob", "b", 50).unwrap().id;
        let c = log.append(ContextId::Term(1), "Alice", "c", 40).unwrap().id;
        assert!(a < b && b < c);
    }

    #[test]
    fn list_is_oldest_first_and_recent_reverses() {
        let mut log = AnnotationLog::new();
        log.append(ContextId::Favor(2), "Alice", "first", 10).unwrap();
        log.append(ContextId::Favor(2), "Bob", "second", 20).unwrap();

        let stored: Vec<&str> = log.list(ContextId::Favor(2)).iter().map(|n| n.text.as_str()).collect();
        assert_eq!(stored, vec!["first", "second"]);

        let recent: Vec<&str> = log.recent(ContextId::Favor(2)).map(|n| n.text.as_str()).collect();
        assert_eq!(recent, vec!["second", "first"]);
        assert_eq!(log.count(ContextId::Term(2)), 0);
    }
}
