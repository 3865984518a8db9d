use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use kindred_types::api::{AddJournalEntryRequest, JournalResponse};
use kindred_types::events::SessionEvent;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_entries(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let entries = state.session()?.journal_entries()?;
    Ok(Json(JournalResponse { entries }))
}

pub async fn add_entry(
    State(state): State<AppState>,
    Json(req): Json<AddJournalEntryRequest>,
) -> ApiResult<impl IntoResponse> {
    let entry = state
        .session()?
        .add_journal_entry(req.prompt.as_deref(), &req.body)?;

    state.dispatcher.broadcast(SessionEvent::JournalEntryAdded {
        entry: entry.clone(),
    });

    Ok((StatusCode::CREATED, Json(entry)))
}
