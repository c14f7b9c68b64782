use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use exam_generator_backend::{
    config::{get_config, init_config},
    middleware::rate_limit::{rps_middleware, RateLimiter},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    init_config()?;
    let config = get_config();

    let app_state = AppState::new(config)?;
    info!(
        model = %config.default_model,
        timeout_secs = config.llm_timeout_secs,
        "completion client ready"
    );

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let generation_api = Router::new()
        .route(
            "/api/questions/generate",
            post(routes::generation::generate_questions),
        )
        .route(
            "/api/questions/solve",
            post(routes::generation::solve_question),
        )
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::per_second(config.generation_rps),
            rps_middleware,
        ));

    let paper_api = Router::new().route(
        "/api/papers/outline",
        post(routes::generation::paper_outline),
    );

    let app = base_routes
        .merge(generation_api)
        .merge(paper_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
