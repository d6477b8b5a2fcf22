use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use service::QuoteStore;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::observability;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn parse_bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let addr = cfg.bind_addr();
    addr.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {addr}: {e}")))
}

/// Load the corpus once and build the router around it.
pub async fn build_app(cfg: &AppConfig) -> Result<(Router, Arc<QuoteStore>), StartupError> {
    common::env::ensure_env(&cfg.static_files.dir, &cfg.quotes.base_path).await?;

    let store = Arc::new(QuoteStore::new());
    store.initialize(&cfg.quotes.base_path)?;
    observability::record_corpus_size(store.len());

    let state = AppState::new(Arc::clone(&store), &cfg.quotes.base_path);
    let app = routes::build_router(state, build_cors(), &cfg.static_files.dir);
    Ok((app, store))
}

/// Public entry: load config (file, then env) and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_or_env()?;
    run_with_config(cfg).await
}

pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let addr = parse_bind_addr(&cfg)?;
    let (app, store) = build_app(&cfg).await?;

    info!(
        service = "server",
        event = "listen",
        %addr,
        quotes = store.len(),
        authors = store.author_count(),
        static_dir = %cfg.static_files.dir,
        "starting quote server"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_app_loads_corpus_from_config() -> anyhow::Result<()> {
        let base = crate::routes::test_support::temp_site(Some("Hi\n"), Some("Me\n"));
        let mut cfg = configs::parse("")?;
        cfg.quotes.base_path = base.to_string_lossy().into_owned();
        cfg.static_files.dir = cfg.quotes.base_path.clone();

        let (_, store) = build_app(&cfg).await?;
        assert_eq!(store.len(), 1);
        assert_eq!(store.random_quote().author(), "Me");
        let _ = std::fs::remove_dir_all(&base);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_corpus_is_fatal() -> anyhow::Result<()> {
        let base = crate::routes::test_support::temp_site(None, None);
        std::fs::write(base.join("data").join("quotes.txt"), b"\xff\xff")?;
        let mut cfg = configs::parse("")?;
        cfg.quotes.base_path = base.to_string_lossy().into_owned();

        assert!(matches!(build_app(&cfg).await, Err(StartupError::Corpus(_))));
        let _ = std::fs::remove_dir_all(&base);
        Ok(())
    }

    #[test]
    fn bad_host_is_invalid_config() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        assert!(matches!(parse_bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
    }
}
