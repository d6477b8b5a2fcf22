//! Random quote selection.
//!
//! The corpus is two line-aligned files under `<base>/data/`: line `i` of
//! `quotes.txt` is attributed to line `i` of `authors.txt`. Either file may
//! be missing, and the author list may be shorter than the quote list.

mod corpus;
mod model;
mod store;

pub use corpus::{Corpus, AUTHORS_FILE, DATA_DIR, QUOTES_FILE};
pub use model::{Quote, FALLBACK_AUTHOR, FALLBACK_TEXT};
pub use store::QuoteStore;
