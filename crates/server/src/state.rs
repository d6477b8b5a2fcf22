use std::path::{Path, PathBuf};
use std::sync::Arc;

use service::QuoteStore;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    store: Arc<QuoteStore>,
    base_path: Arc<PathBuf>,
}

impl AppState {
    /// `base_path` is where reloads read `data/quotes.txt` and `data/authors.txt`.
    pub fn new(store: Arc<QuoteStore>, base_path: impl Into<PathBuf>) -> Self {
        Self { store, base_path: Arc::new(base_path.into()) }
    }

    pub fn store(&self) -> &Arc<QuoteStore> {
        &self.store
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
