use serde::Serialize;

/// Text shown when no quote could be picked.
pub const FALLBACK_TEXT: &str = "Something went wrong";
/// Author shown when the picked line has no matching author.
pub const FALLBACK_AUTHOR: &str = "System";

/// A quote and who said it. Built by [`crate::QuoteStore`], read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    text: String,
    author: String,
}

impl Quote {
    pub(crate) fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self { text: text.into(), author: author.into() }
    }

    pub(crate) fn fallback() -> Self {
        Self::new(FALLBACK_TEXT, FALLBACK_AUTHOR)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn is_fallback(&self) -> bool {
        self.text == FALLBACK_TEXT && self.author == FALLBACK_AUTHOR
    }
}
