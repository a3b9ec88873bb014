pub mod handlers;
pub mod types;

pub use handlers::AppState;

use crate::{Result, config::Config, llm::create_model_client};
use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::post,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, info_span, warn};
use uuid::Uuid;

/// Any origin, method and header. Browser clients reach the service through
/// a tunnel hostname that changes between runs.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route(
            "/ocr",
            post(handlers::ocr).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/chatbot", post(handlers::chatbot))
        .route("/hpp", post(handlers::hpp))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                info_span!(
                    "request",
                    id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(cors_layer())
}

pub async fn run(config: Config) -> Result<()> {
    if config.llm.api_key.is_empty() {
        warn!("No LLM API key configured; every model call will fail until GOOGLE_API_KEY is set");
    }

    let model = create_model_client(config.llm.clone())?;
    info!(
        provider = %config.llm.provider,
        model = %config.llm.model,
        "Model client initialized"
    );

    let app = router(AppState::new(model), config.server.max_upload_bytes);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
