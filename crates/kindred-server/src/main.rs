mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use kindred_api::router;
use kindred_api::state::{AppState, AppStateInner};
use kindred_assistant::AnthropicProvider;
use kindred_core::Session;
use kindred_core::catalog::Catalog;
use kindred_core::directory::DirectoryView;
use kindred_db::{BlobStore, Database};
use kindred_gateway::connection;
use kindred_gateway::dispatcher::Dispatcher;
use kindred_types::events::SessionEvent;

use crate::config::Config;

const BUNDLED_CATALOG: &str = include_str!("../../../data/catalog.json");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kindred=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Catalog
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => {
            let catalog = Catalog::from_json(BUNDLED_CATALOG)?;
            info!("Using bundled catalog {} ({} entries)", catalog.version(), catalog.len());
            catalog
        }
    };

    // Storage
    let db = Database::open(&config.db_path)?;
    info!("{} stored blobs", db.list_keys()?.len());
    let store: Arc<dyn BlobStore> = Arc::new(db);
    let session = Session::hydrate(Arc::new(catalog), store);

    // Assistant
    if config.assistant.api_key.is_none() {
        warn!("ANTHROPIC_API_KEY is not set; chat replies will fail");
    }
    let assistant = Arc::new(AnthropicProvider::new(config.assistant.clone()));

    // Shared state
    info!("Search debounce {:?}", config.search_debounce);
    let state: AppState = Arc::new(AppStateInner::new(
        session,
        DirectoryView::new(config.search_debounce),
        Dispatcher::new(),
        assistant,
    ));

    let events_route = Router::new()
        .route("/events", get(ws_upgrade))
        .with_state(state.clone());

    let app = Router::new()
        .merge(router::routes(state))
        .merge(events_route)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Kindred listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let ready = match state.session() {
        Ok(session) => SessionEvent::Ready {
            user: session.current_user().cloned(),
            partner: session.partner().cloned(),
        },
        Err(e) => return e.into_response(),
    };

    let dispatcher = state.dispatcher.clone();
    ws.on_upgrade(move |socket| connection::handle_connection(socket, dispatcher, ready))
}
