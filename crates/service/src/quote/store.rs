use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use rand::Rng;
use tracing::info;

use super::corpus::Corpus;
use super::model::{Quote, FALLBACK_AUTHOR, FALLBACK_TEXT};
use crate::errors::ServiceError;

/// In-memory quote corpus with lock-free reads and atomic reloads.
///
/// Create one at startup, call [`QuoteStore::initialize`], then share it as
/// `Arc<QuoteStore>`. Until the first successful initialize the corpus is
/// empty and every draw returns the fallback quote.
#[derive(Debug, Default)]
pub struct QuoteStore {
    corpus: ArcSwap<Corpus>,
}

impl QuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_corpus(corpus: Corpus) -> Self {
        Self { corpus: ArcSwap::from_pointee(corpus) }
    }

    /// Load `<base_path>/data/quotes.txt` and `<base_path>/data/authors.txt`
    /// and publish them together. Missing files load as empty; on error the
    /// current corpus is left untouched.
    pub fn initialize(&self, base_path: impl AsRef<Path>) -> Result<(), ServiceError> {
        let base_path = base_path.as_ref();
        let corpus = Corpus::load(base_path)?;
        info!(
            base_path = %base_path.display(),
            quotes = corpus.quotes.len(),
            authors = corpus.authors.len(),
            "quote corpus loaded"
        );
        self.replace(corpus);
        Ok(())
    }

    /// [`QuoteStore::initialize`] relative to the process working directory.
    pub fn initialize_from_current_dir(&self) -> Result<(), ServiceError> {
        let cwd = std::env::current_dir().map_err(|e| ServiceError::io(".", e))?;
        self.initialize(cwd)
    }

    /// Swap in a new corpus in one step.
    pub fn replace(&self, corpus: Corpus) {
        self.corpus.store(Arc::new(corpus));
    }

    /// Current corpus snapshot.
    pub fn snapshot(&self) -> Arc<Corpus> {
        self.corpus.load_full()
    }

    pub fn len(&self) -> usize {
        self.corpus.load().quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn author_count(&self) -> usize {
        self.corpus.load().authors.len()
    }

    pub fn random_quote(&self) -> Quote {
        self.random_quote_with(&mut rand::thread_rng())
    }

    /// Pick a quote uniformly at random using `rng`.
    pub fn random_quote_with<R: Rng>(&self, rng: &mut R) -> Quote {
        let corpus = self.corpus.load();
        if corpus.quotes.is_empty() {
            return Quote::fallback();
        }

        let index = rng.gen_range(0..corpus.quotes.len());
        let text = corpus.quotes.get(index).map(String::as_str).unwrap_or(FALLBACK_TEXT);
        let author = corpus.authors.get(index).map(String::as_str).unwrap_or(FALLBACK_AUTHOR);
        Self::build_quote(text, author)
    }

    /// Wrap any text/author pair as a [`Quote`].
    pub fn build_quote(text: impl Into<String>, author: impl Into<String>) -> Quote {
        Quote::new(text, author)
    }
}
