pub mod handlers;
pub mod render;
pub mod types;

use crate::{
    Result,
    classifier::{Classifier, HttpClassifier},
    config::{Config, UiConfig},
    session::SessionStore,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

// room for multipart framing around the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router(
    sessions: Arc<SessionStore>,
    classifier: Arc<dyn Classifier>,
    ui: UiConfig,
) -> Router {
    let body_limit = ui.max_upload_bytes + MULTIPART_OVERHEAD;
    let app_state = handlers::AppState {
        sessions,
        classifier,
        ui: Arc::new(ui),
    };

    Router::new()
        .route("/", get(handlers::index))
        .route("/upload", post(handlers::upload))
        .route("/classify", post(handlers::classify))
        .route("/clear", post(handlers::clear))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn run(config: Config) -> Result<()> {
    let classifier = HttpClassifier::new(&config.api)?;
    info!(
        "Inference endpoint: {} (timeout {}s)",
        classifier.endpoint(),
        config.api.timeout_secs
    );

    let sessions = Arc::new(SessionStore::new(
        config.server.session_ttl_secs,
        config.server.max_sessions,
    ));
    let app = router(sessions, Arc::new(classifier), config.ui.clone());

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
