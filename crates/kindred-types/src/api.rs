use serde::{Deserialize, Serialize};

use crate::models::{BookmarkMark, Category, ChatMessage, Entry, Favor, JournalEntry, Note, Partner, User};

// -- Session --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignInRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub adult_verified: bool,
    /// Sign in as the built-in demo account; other fields are ignored.
    #[serde(default)]
    pub demo: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: Option<User>,
    pub partner: Option<Partner>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PairPartnerRequest {
    pub connect_id: String,
    pub name: String,
}

// -- Terms --

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub version: String,
    pub total: usize,
    /// Categories with at least one entry, in display order.
    pub categories: Vec<Category>,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BucketsResponse {
    pub loved: Vec<Entry>,
    pub liked: Vec<Entry>,
    pub other: Vec<Entry>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TermResponse {
    pub entry: Entry,
    pub mark: Option<BookmarkMark>,
    pub note_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToggleBookmarkRequest {
    pub mark: BookmarkMark,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleBookmarkResponse {
    pub entry_id: u32,
    pub mark: Option<BookmarkMark>,
}

/// Partial update of the debounced directory view. Absent fields are untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryQueryRequest {
    pub search: Option<String>,
    /// A category name or `"all"`.
    pub category: Option<String>,
    pub toggle_tag: Option<String>,
    /// `default`, `az` or `za`.
    pub sort: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DirectoryResponse {
    /// Search text currently applied to the buckets.
    pub search: String,
    /// True while typed search text is still waiting out the debounce.
    pub pending: bool,
    pub buckets: BucketsResponse,
}

// -- Favors --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateFavorRequest {
    pub entry_id: u32,
    pub task: String,
    #[serde(default)]
    pub deadline: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FavorTransitionResponse {
    pub favor: Favor,
    /// False when the transition was not legal from the current status.
    pub applied: bool,
}

// -- Notes & journal --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddNoteRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotesResponse {
    pub context: String,
    pub notes: Vec<Note>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddJournalEntryRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JournalResponse {
    pub entries: Vec<JournalEntry>,
}

// -- Chat --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatRequest {
    #[serde(default)]
    pub text: Option<String>,
    /// Open a deep dive on this entry; `text` may be omitted.
    #[serde(default)]
    pub entry_id: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub failed: bool,
    pub history: Vec<ChatMessage>,
}
