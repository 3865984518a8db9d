use std::collections::BTreeSet;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use kindred_core::filter::{Buckets, FilterQuery};
use kindred_core::CoreError;
use kindred_core::notes::ContextId;
use kindred_types::api::{BucketsResponse, CatalogResponse, TermResponse, ToggleBookmarkRequest, ToggleBookmarkResponse};
use kindred_types::events::SessionEvent;
use kindred_types::models::Entry;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TermsQuery {
    #[serde(default)]
    pub search: String,
    pub category: Option<String>,
    /// Comma-separated; every tag must match.
    pub tags: Option<String>,
    pub sort: Option<String>,
}

impl TermsQuery {
    fn into_filter(self) -> ApiResult<FilterQuery> {
        let category = self
            .category
            .as_deref()
            .unwrap_or("all")
            .parse()
            .map_err(ApiError::BadRequest)?;
        let sort = self
            .sort
            .as_deref()
            .unwrap_or("default")
            .parse()
            .map_err(ApiError::BadRequest)?;
        let tags: BTreeSet<String> = self
            .tags
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();

        Ok(FilterQuery {
            search: self.search,
            category,
            tags,
            sort,
        })
    }
}

pub(crate) fn buckets_response(buckets: &Buckets<'_>) -> BucketsResponse {
    fn owned(entries: &[&Entry]) -> Vec<Entry> {
        entries.iter().map(|&e| e.clone()).collect()
    }

    BucketsResponse {
        loved: owned(&buckets.loved),
        liked: owned(&buckets.liked),
        other: owned(&buckets.other),
        total: buckets.len(),
    }
}

pub async fn get_catalog(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let session = state.session()?;
    let catalog = session.catalog();
    Ok(Json(CatalogResponse {
        version: catalog.version().to_string(),
        total: catalog.len(),
        categories: catalog.categories(),
        tags: catalog.tags().into_iter().map(String::from).collect(),
    }))
}

/// Filter immediately, without the debounce the directory view applies.
pub async fn list_terms(
    State(state): State<AppState>,
    Query(query): Query<TermsQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = query.into_filter()?;
    let session = state.session()?;
    let buckets = session.directory(&filter);
    Ok(Json(buckets_response(&buckets)))
}

pub async fn get_term(
    State(state): State<AppState>,
    Path(entry_id): Path<u32>,
) -> ApiResult<impl IntoResponse> {
    let session = state.session()?;
    let entry = session
        .catalog()
        .get(entry_id)
        .cloned()
        .ok_or(CoreError::UnknownEntry(entry_id))?;

    Ok(Json(TermResponse {
        mark: session.mark(entry_id),
        note_count: session.notes().count(ContextId::Term(entry_id)),
        entry,
    }))
}

pub async fn toggle_bookmark(
    State(state): State<AppState>,
    Path(entry_id): Path<u32>,
    Json(req): Json<ToggleBookmarkRequest>,
) -> ApiResult<impl IntoResponse> {
    let (user, mark) = {
        let mut session = state.session()?;
        let mark = session.toggle_bookmark(entry_id, req.mark)?;
        let user = session.current_user().map(|u| u.name.clone()).unwrap_or_default();
        (user, mark)
    };

    state.dispatcher.broadcast(SessionEvent::BookmarkToggled { user, entry_id, mark });

    Ok(Json(ToggleBookmarkResponse { entry_id, mark }))
}
