use std::sync::Arc;

use axum::{extract::State, Json};
use common::types::ReloadSummary;
use tracing::info;

use crate::errors::ApiError;
use crate::observability;
use crate::state::AppState;

/// Re-read the corpus files from the configured base path. On failure the
/// previous corpus keeps serving.
pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadSummary>, ApiError> {
    let store = Arc::clone(state.store());
    let base_path = state.base_path().to_path_buf();

    tokio::task::spawn_blocking(move || store.initialize(base_path))
        .await
        .map_err(|e| ApiError::internal(format!("reload task failed: {e}")))??;

    let store = state.store();
    observability::CORPUS_RELOADS_TOTAL.inc();
    observability::record_corpus_size(store.len());
    info!(event = "corpus_reload", quotes = store.len(), authors = store.author_count(), "quote corpus reloaded");

    Ok(Json(ReloadSummary {
        reloaded: true,
        quotes: store.len(),
        authors: store.author_count(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use service::quote::{AUTHORS_FILE, DATA_DIR, QUOTES_FILE};

    use crate::routes::test_support::{app, send, temp_site};

    #[tokio::test]
    async fn reload_picks_up_new_files() {
        let base = temp_site(None, None);
        let (router, store) = app(&base);
        assert!(store.is_empty());

        std::fs::write(base.join(DATA_DIR).join(QUOTES_FILE), "One\nTwo\n").unwrap();
        std::fs::write(base.join(DATA_DIR).join(AUTHORS_FILE), "Uno\n").unwrap();

        let (status, body) = send(&router, "POST", "/admin/reload").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json, serde_json::json!({"reloaded": true, "quotes": 2, "authors": 1}));
        assert_eq!(store.len(), 2);
        let _ = std::fs::remove_dir_all(&base);
    }

    #[tokio::test]
    async fn failed_reload_returns_500_and_keeps_corpus() {
        let base = temp_site(Some("Stay\n"), Some("Put\n"));
        let (router, store) = app(&base);

        std::fs::write(base.join(DATA_DIR).join(QUOTES_FILE), b"\xff\n").unwrap();

        let (status, body) = send(&router, "POST", "/admin/reload").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("not valid UTF-8"));
        let q = store.random_quote();
        assert_eq!((q.text(), q.author()), ("Stay", "Put"));
        let _ = std::fs::remove_dir_all(&base);
    }

    #[tokio::test]
    async fn reload_requires_post() {
        let base = temp_site(None, None);
        let (router, _) = app(&base);
        let (status, _) = send(&router, "GET", "/admin/reload").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        let _ = std::fs::remove_dir_all(&base);
    }
}
