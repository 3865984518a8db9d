/// Storage layout version. Bump when a persisted shape changes incompatibly;
/// old keys are then simply never read again.
pub const STORAGE_VERSION: &str = "v1";

pub const CURRENT_USER: &str = "current_user";
pub const PARTNER: &str = "partner";
pub const FAVORS: &str = "favors";
pub const NOTES: &str = "notes";
pub const BOOKMARKS: &str = "bookmarks";
pub const JOURNAL: &str = "journal";

/// Full storage key for a logical name, e.g. `kindred.v1.favors`.
pub fn storage_key(name: &str) -> String {
    format!("kindred.{}.{}", STORAGE_VERSION, name)
}
