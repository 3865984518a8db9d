//! Glossary directory, bookmarks, favors and notes for a single local session.

pub mod bookmarks;
pub mod catalog;
pub mod directory;
pub mod error;
pub mod favors;
pub mod filter;
pub mod journal;
pub mod notes;
pub mod session;
pub mod users;

pub use catalog::Catalog;
pub use error::{CoreError, CoreResult};
pub use session::Session;
