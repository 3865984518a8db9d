use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;
use crate::{chat, directory, favors, journal, notes, session, terms};

/// REST routes for the local session. The event stream is mounted by the
/// server binary.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/session", get(session::get_session))
        .route("/session/sign-in", post(session::sign_in))
        .route("/session/sign-out", post(session::sign_out))
        .route("/session/partner", post(session::pair_partner))
        .route("/catalog", get(terms::get_catalog))
        .route("/terms", get(terms::list_terms))
        .route("/terms/{entry_id}", get(terms::get_term))
        .route("/terms/{entry_id}/bookmark", post(terms::toggle_bookmark))
        .route("/directory", get(directory::get_directory))
        .route("/directory/query", post(directory::update_query))
        .route("/directory/clear", post(directory::clear_query))
        .route("/favors", get(favors::list_favors).post(favors::create_favor))
        .route("/favors/{favor_id}/claim", post(favors::claim_favor))
        .route("/favors/{favor_id}/done", post(favors::toggle_done))
        .route("/notes/{context}", get(notes::list_notes).post(notes::add_note))
        .route("/journal", get(journal::list_entries).post(journal::add_entry))
        .route("/chat/{conversation}", post(chat::send_message).delete(chat::abandon))
        .with_state(state)
}
