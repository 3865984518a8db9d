use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// -- Catalog --

/// Fixed set of glossary categories. Order here is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Communication,
    Intimacy,
    Attachment,
    Conflict,
    Rituals,
    Wellbeing,
    Identity,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Communication,
        Category::Intimacy,
        Category::Attachment,
        Category::Conflict,
        Category::Rituals,
        Category::Wellbeing,
        Category::Identity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Communication => "communication",
            Self::Intimacy => "intimacy",
            Self::Attachment => "attachment",
            Self::Conflict => "conflict",
            Self::Rituals => "rituals",
            Self::Wellbeing => "wellbeing",
            Self::Identity => "identity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// A single glossary term. Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u32,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

impl Entry {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

// -- Bookmarks --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkMark {
    Liked,
    Loved,
}

impl FromStr for BookmarkMark {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "liked" => Ok(Self::Liked),
            "loved" => Ok(Self::Loved),
            other => Err(format!("unknown bookmark mark: {}", other)),
        }
    }
}

// -- Favors --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavorStatus {
    Available,
    Claimed,
    Done,
}

impl FromStr for FavorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "claimed" => Ok(Self::Claimed),
            "done" => Ok(Self::Done),
            other => Err(format!("unknown favor status: {}", other)),
        }
    }
}

/// A task offered in exchange for the referenced entry.
/// `entry` is a copy taken at creation time, not a live reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favor {
    pub id: u64,
    pub entry: Entry,
    pub task: String,
    /// Free text, never parsed.
    pub deadline: String,
    pub status: FavorStatus,
    pub created_by: String,
    #[serde(default)]
    pub claimed_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

// -- Notes & journal --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub author: String,
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub body: String,
    pub created_at: i64,
}

// -- People --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Pairing token handed to a partner, e.g. `ALEX-7Q2K`.
    pub connect_id: String,
    #[serde(default)]
    pub adult_verified: bool,
    #[serde(default)]
    pub demo: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub name: String,
    pub connect_id: String,
    pub paired_at: DateTime<Utc>,
}

// -- Assistant --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}
