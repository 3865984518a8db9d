use std::time::Instant;

use axum::{Json, extract::State, response::IntoResponse};

use kindred_types::api::{DirectoryQueryRequest, DirectoryResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::terms::buckets_response;

/// Current directory buckets. Search text that has waited out the debounce
/// is applied first.
pub async fn get_directory(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let mut view = state.directory()?;
    view.tick(Instant::now());
    render(&state, &view)
}

pub async fn update_query(
    State(state): State<AppState>,
    Json(req): Json<DirectoryQueryRequest>,
) -> ApiResult<impl IntoResponse> {
    let now = Instant::now();
    let mut view = state.directory()?;

    if let Some(category) = req.category.as_deref() {
        view.set_category(category.parse().map_err(ApiError::BadRequest)?);
    }
    if let Some(sort) = req.sort.as_deref() {
        view.set_sort(sort.parse().map_err(ApiError::BadRequest)?);
    }
    if let Some(tag) = req.toggle_tag.as_deref() {
        view.toggle_tag(tag.trim());
    }
    if let Some(search) = req.search {
        view.set_search(search, now);
    }

    view.tick(now);
    render(&state, &view)
}

/// Drop every filter, including search text still waiting on the debounce.
pub async fn clear_query(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let mut view = state.directory()?;
    view.clear_filters();
    render(&state, &view)
}

fn render(
    state: &AppState,
    view: &kindred_core::directory::DirectoryView,
) -> ApiResult<Json<DirectoryResponse>> {
    let session = state.session()?;
    let buckets = view.buckets(session.catalog(), &session.current_marks());

    Ok(Json(DirectoryResponse {
        search: view.query().search.clone(),
        pending: view.is_search_pending(),
        buckets: buckets_response(&buckets),
    }))
}
