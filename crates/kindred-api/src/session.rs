use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use kindred_core::users;
use kindred_types::api::{PairPartnerRequest, SessionResponse, SignInRequest};
use kindred_types::events::SessionEvent;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn get_session(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let session = state.session()?;
    Ok(Json(SessionResponse {
        user: session.current_user().cloned(),
        partner: session.partner().cloned(),
    }))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = if req.demo {
        users::demo_user()
    } else {
        let name = req
            .name
            .as_deref()
            .ok_or_else(|| ApiError::BadRequest("name is required".into()))?;
        let mut user = users::new_user(name, req.email.as_deref())?;
        if req.adult_verified {
            users::verify_adult(&mut user);
        }
        user
    };

    let mut session = state.session()?;
    let user = session.sign_in(user).clone();
    let partner = session.partner().cloned();
    drop(session);

    state.dispatcher.broadcast(SessionEvent::SignedIn { user: user.clone() });

    Ok(Json(SessionResponse {
        user: Some(user),
        partner,
    }))
}

pub async fn sign_out(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let user = state.session()?.sign_out()?;
    state.dispatcher.broadcast(SessionEvent::SignedOut { name: user.name });
    Ok(StatusCode::NO_CONTENT)
}

pub async fn pair_partner(
    State(state): State<AppState>,
    Json(req): Json<PairPartnerRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut session = state.session()?;
    let partner = session.pair_partner(&req.connect_id, &req.name)?.clone();
    let user = session.current_user().cloned();
    drop(session);

    state.dispatcher.broadcast(SessionEvent::PartnerPaired {
        partner: partner.clone(),
    });

    Ok(Json(SessionResponse {
        user,
        partner: Some(partner),
    }))
}
