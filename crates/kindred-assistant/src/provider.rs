use async_trait::async_trait;
use kindred_types::models::ChatMessage;

use crate::error::AssistantResult;

/// A text-generation backend. Implementations add the persona prompt
/// themselves; callers only pass the visible conversation.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &'static str;

    /// Send `new_text` after `history` (oldest first) and return the reply.
    async fn send_message(&self, history: &[ChatMessage], new_text: &str) -> AssistantResult<String>;
}
