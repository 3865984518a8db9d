use kindred_types::models::ChatMessage;
use tracing::{debug, warn};

use crate::error::{AssistantError, AssistantResult};
use crate::provider::ChatProvider;

/// Shown in place of a reply when the provider fails.
pub const FAILURE_PLACEHOLDER: &str =
    "Sorry, I couldn't reach the assistant just now. Please try again in a moment.";

/// Identifies one outstanding request. Stale after [`Conversation::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// What happened to a completed request.
#[derive(Debug)]
pub enum Completion {
    Reply(String),
    /// The provider failed; the placeholder was appended instead.
    Failed(AssistantError),
    /// The conversation was reset while the request was in flight.
    Discarded,
}

/// Visible chat history, oldest first.
///
/// A request is split into [`begin`](Self::begin) and
/// [`complete`](Self::complete) so no lock needs to be held while the
/// provider call is awaited.
#[derive(Debug, Default)]
pub struct Conversation {
    history: Vec<ChatMessage>,
    generation: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Record the user's turn. Returns the ticket for the reply and the
    /// history that precedes the new turn.
    pub fn begin(&mut self, text: &str) -> (Ticket, Vec<ChatMessage>) {
        let prior = self.history.clone();
        self.history.push(ChatMessage::user(text));
        (Ticket { generation: self.generation }, prior)
    }

    pub fn complete(&mut self, ticket: Ticket, result: AssistantResult<String>) -> Completion {
        if ticket.generation != self.generation {
            debug!("Dropping reply for abandoned conversation");
            return Completion::Discarded;
        }

        match result {
            Ok(reply) => {
                self.history.push(ChatMessage::assistant(reply.clone()));
                Completion::Reply(reply)
            }
            Err(e) => {
                warn!("Assistant request failed: {}", e);
                self.history.push(ChatMessage::assistant(FAILURE_PLACEHOLDER));
                Completion::Failed(e)
            }
        }
    }

    /// Forget the history and invalidate any request still in flight.
    pub fn reset(&mut self) {
        self.history.clear();
        self.generation += 1;
    }

    /// `begin`, call the provider, `complete`, for callers that own the
    /// conversation outright.
    pub async fn send(&mut self, provider: &dyn ChatProvider, text: &str) -> Completion {
        let (ticket, prior) = self.begin(text);
        let result = provider.send_message(&prior, text).await;
        self.complete(ticket, result)
    }
}
