use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use kindred_core::notes::ContextId;
use kindred_types::api::{AddNoteRequest, NotesResponse};
use kindred_types::events::SessionEvent;
use kindred_types::models::Note;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteOrder {
    Oldest,
    /// Most recent first, as the note panels show them.
    #[default]
    Recent,
}

#[derive(Debug, Deserialize)]
pub struct NotesQuery {
    #[serde(default)]
    pub order: NoteOrder,
}

pub async fn list_notes(
    State(state): State<AppState>,
    Path(context): Path<String>,
    Query(query): Query<NotesQuery>,
) -> ApiResult<impl IntoResponse> {
    let context_id: ContextId = context.parse()?;

    let session = state.session()?;
    let notes: Vec<Note> = match query.order {
        NoteOrder::Oldest => session.notes().list(context_id).to_vec(),
        NoteOrder::Recent => session.notes().recent(context_id).cloned().collect(),
    };

    Ok(Json(NotesResponse {
        context: context_id.to_string(),
        notes,
    }))
}

pub async fn add_note(
    State(state): State<AppState>,
    Path(context): Path<String>,
    Json(req): Json<AddNoteRequest>,
) -> ApiResult<impl IntoResponse> {
    let context_id: ContextId = context.parse()?;

    let note = state.session()?.add_note(context_id, &req.text)?;

    state.dispatcher.broadcast(SessionEvent::NoteAdded {
        context: context_id.to_string(),
        note: note.clone(),
    });

    Ok((StatusCode::CREATED, Json(note)))
}
