use serde::{Deserialize, Serialize};

use crate::models::{BookmarkMark, Favor, JournalEntry, Note, Partner, User};

/// Events pushed to the local client over the `/events` WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionEvent {
    /// Sent once when a client connects
    Ready { user: Option<User>, partner: Option<Partner> },

    SignedIn { user: User },

    SignedOut { name: String },

    PartnerPaired { partner: Partner },

    /// `mark` is the state after the toggle; `None` means cleared
    BookmarkToggled {
        user: String,
        entry_id: u32,
        mark: Option<BookmarkMark>,
    },

    FavorCreated { favor: Favor },

    /// Claimed, completed, or reopened
    FavorUpdated { favor: Favor },

    NoteAdded { context: String, note: Note },

    JournalEntryAdded { entry: JournalEntry },
}

impl SessionEvent {
    /// Name of the user whose action produced the event, if any.
    pub fn actor(&self) -> Option<&str> {
        match self {
            Self::SignedIn { user } => Some(&user.name),
            Self::SignedOut { name } => Some(name),
            Self::BookmarkToggled { user, .. } => Some(user),
            Self::FavorCreated { favor } => Some(&favor.created_by),
            Self::NoteAdded { note, .. } => Some(&note.author),
            Self::JournalEntryAdded { entry } => Some(&entry.author),
            // Ready, PartnerPaired, FavorUpdated have no single actor
            _ => None,
        }
    }
}
