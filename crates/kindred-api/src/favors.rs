use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::debug;

use kindred_core::{CoreError, CoreResult};
use kindred_types::api::{CreateFavorRequest, FavorTransitionResponse};
use kindred_types::events::SessionEvent;
use kindred_types::models::{Favor, FavorStatus};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavorParty {
    /// Favors the current user offered.
    Offered,
    /// Favors the current user claimed.
    Claimed,
}

#[derive(Debug, Deserialize)]
pub struct FavorQuery {
    pub status: Option<String>,
    pub party: Option<FavorParty>,
}

/// Newest first, optionally narrowed to one status or to the current
/// user's side of the exchange.
pub async fn list_favors(
    State(state): State<AppState>,
    Query(query): Query<FavorQuery>,
) -> ApiResult<impl IntoResponse> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<FavorStatus>)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let session = state.session()?;
    let ledger = session.favors();
    let mut favors: Vec<&Favor> = match query.party {
        None => ledger.recent().collect(),
        Some(party) => {
            let user = &session.current_user().ok_or(CoreError::NotAuthenticated)?.name;
            let mut mine: Vec<&Favor> = match party {
                FavorParty::Offered => ledger.created_by(user).collect(),
                FavorParty::Claimed => ledger.claimed_by(user).collect(),
            };
            mine.reverse();
            mine
        }
    };
    favors.retain(|f| status.is_none_or(|s| f.status == s));

    Ok(Json(favors.into_iter().cloned().collect::<Vec<Favor>>()))
}

pub async fn create_favor(
    State(state): State<AppState>,
    Json(req): Json<CreateFavorRequest>,
) -> ApiResult<impl IntoResponse> {
    let favor = state
        .session()?
        .create_favor(req.entry_id, &req.task, &req.deadline)?;

    state.dispatcher.broadcast(SessionEvent::FavorCreated {
        favor: favor.clone(),
    });

    Ok((StatusCode::CREATED, Json(favor)))
}

pub async fn claim_favor(
    State(state): State<AppState>,
    Path(favor_id): Path<u64>,
) -> ApiResult<impl IntoResponse> {
    transition(&state, favor_id, |session| session.claim_favor(favor_id))
}

pub async fn toggle_done(
    State(state): State<AppState>,
    Path(favor_id): Path<u64>,
) -> ApiResult<impl IntoResponse> {
    transition(&state, favor_id, |session| session.toggle_favor_done(favor_id))
}

/// Run a lifecycle transition. Illegal transitions are not errors for the
/// caller: they answer with the unchanged favor and `applied: false`.
fn transition<F>(state: &AppState, favor_id: u64, apply: F) -> ApiResult<Json<FavorTransitionResponse>>
where
    F: FnOnce(&mut kindred_core::Session) -> CoreResult<Favor>,
{
    let mut session = state.session()?;

    match apply(&mut *session) {
        Ok(favor) => {
            drop(session);
            state.dispatcher.broadcast(SessionEvent::FavorUpdated {
                favor: favor.clone(),
            });
            Ok(Json(FavorTransitionResponse { favor, applied: true }))
        }
        Err(e) if e.is_silent() => {
            debug!("Ignoring transition on favor {}: {}", favor_id, e);
            let favor = session
                .favors()
                .get(favor_id)
                .cloned()
                .ok_or(CoreError::FavorNotFound(favor_id))?;
            Ok(Json(FavorTransitionResponse { favor, applied: false }))
        }
        Err(e) => Err(e.into()),
    }
}
