use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;

use crate::observability;
use crate::state::AppState;

pub mod admin;
pub mod quotes;

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let store = state.store();
    Json(Health::ok(store.len(), store.author_count()))
}

async fn metrics() -> impl IntoResponse {
    observability::encode_metrics()
}

/// Build the full application router: quote page and API, health/metrics,
/// admin reload, and static files from `static_dir` for everything else.
pub fn build_router(state: AppState, cors: CorsLayer, static_dir: &str) -> Router {
    let public = Router::new()
        .route("/", get(quotes::index))
        .route("/api/quote", get(quotes::random_quote))
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    let admin_routes = Router::new().route("/admin/reload", post(admin::reload));

    public
        .merge(admin_routes)
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
