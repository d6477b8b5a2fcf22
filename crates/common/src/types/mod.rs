use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: String,
    pub quotes: usize,
    pub authors: usize,
}

impl Health {
    pub fn ok(quotes: usize, authors: usize) -> Self {
        Self { status: "ok".into(), quotes, authors }
    }
}

/// Body returned by the reload endpoint.
#[derive(Serialize, Deserialize, Debug)]
pub struct ReloadSummary {
    pub reloaded: bool,
    pub quotes: usize,
    pub authors: usize,
}
