pub mod chat;
pub mod directory;
pub mod error;
pub mod favors;
pub mod journal;
pub mod notes;
pub mod router;
pub mod session;
pub mod state;
pub mod terms;
