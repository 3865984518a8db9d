//! Chat assistant used by the deep-dive and general help features.
//!
//! Everything here sits outside the ledgers: a failed or abandoned request
//! only ever affects the conversation it belongs to.

pub mod anthropic;
pub mod conversation;
pub mod error;
pub mod persona;
pub mod provider;

pub use anthropic::{AnthropicProvider, AssistantConfig};
pub use conversation::{Completion, Conversation, FAILURE_PLACEHOLDER, Ticket};
pub use error::{AssistantError, AssistantResult};
pub use provider::ChatProvider;
