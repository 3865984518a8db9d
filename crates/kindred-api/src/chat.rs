use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use kindred_assistant::persona::deep_dive_prompt;
use kindred_assistant::{Completion, FAILURE_PLACEHOLDER};
use kindred_core::CoreError;
use kindred_types::api::{ChatRequest, ChatResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Send one turn to the assistant. Failures come back as the placeholder
/// reply with `failed: true`; they never touch the ledgers.
pub async fn send_message(
    State(state): State<AppState>,
    Path(conversation): Path<String>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<impl IntoResponse> {
    let text = match (req.text.as_deref().map(str::trim), req.entry_id) {
        (Some(text), _) if !text.is_empty() => text.to_string(),
        (_, Some(entry_id)) => {
            let session = state.session()?;
            let entry = session
                .catalog()
                .get(entry_id)
                .ok_or(CoreError::UnknownEntry(entry_id))?;
            deep_dive_prompt(entry)
        }
        _ => return Err(ApiError::BadRequest("message text is empty".into())),
    };

    let (ticket, prior) = state.chats()?.entry(conversation.clone()).or_default().begin(&text);

    info!(
        "Chat '{}' -> {} ({} prior turns)",
        conversation,
        state.assistant.name(),
        prior.len()
    );
    let result = state.assistant.send_message(&prior, &text).await;

    let mut chats = state.chats()?;
    let chat = chats.entry(conversation).or_default();
    let (reply, failed) = match chat.complete(ticket, result) {
        Completion::Reply(reply) => (reply, false),
        Completion::Failed(_) => (FAILURE_PLACEHOLDER.to_string(), true),
        Completion::Discarded => return Ok((StatusCode::GONE, Json(ChatResponse {
            reply: String::new(),
            failed: false,
            history: chat.history().to_vec(),
        }))),
    };

    Ok((StatusCode::OK, Json(ChatResponse {
        reply,
        failed,
        history: chat.history().to_vec(),
    })))
}

/// The user navigated away: drop the history and any reply still in flight.
pub async fn abandon(
    State(state): State<AppState>,
    Path(conversation): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if let Some(chat) = state.chats()?.get_mut(&conversation) {
        chat.reset();
    }
    Ok(StatusCode::NO_CONTENT)
}
