use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::ServiceError;

pub const DATA_DIR: &str = "data";
pub const QUOTES_FILE: &str = "quotes.txt";
pub const AUTHORS_FILE: &str = "authors.txt";

/// One immutable snapshot of the loaded quote and author lines.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Corpus {
    pub(crate) quotes: Vec<String>,
    pub(crate) authors: Vec<String>,
}

impl Corpus {
    pub fn new(quotes: Vec<String>, authors: Vec<String>) -> Self {
        Self { quotes, authors }
    }

    /// Read `<base>/data/quotes.txt` and `<base>/data/authors.txt`.
    pub fn load(base: &Path) -> Result<Self, ServiceError> {
        let data_dir = base.join(DATA_DIR);
        let quotes = read_lines(&data_dir.join(QUOTES_FILE))?;
        let authors = read_lines(&data_dir.join(AUTHORS_FILE))?;
        if quotes.len() != authors.len() {
            warn!(
                quotes = quotes.len(),
                authors = authors.len(),
                "quote and author files differ in length; unmatched quotes get the default author"
            );
        }
        Ok(Self { quotes, authors })
    }

    pub fn quotes(&self) -> &[String] {
        &self.quotes
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }
}

/// Lines of `path`, HTML-entity decoded. A missing file is an empty list.
fn read_lines(path: &Path) -> Result<Vec<String>, ServiceError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "corpus file not found; treating as empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(ServiceError::io(path, e)),
    };

    let content = String::from_utf8(bytes).map_err(|e| ServiceError::Decode {
        path: PathBuf::from(path),
        offset: e.utf8_error().valid_up_to(),
    })?;

    let body = content.strip_prefix('\u{feff}').unwrap_or(content.as_str());
    let lines: Vec<String> = split_lines(body)
        .map(|line| html_escape::decode_html_entities(line).into_owned())
        .collect();
    debug!(path = %path.display(), lines = lines.len(), "corpus file loaded");
    Ok(lines)
}

/// Split on `\r\n`, `\n` or a bare `\r`. A trailing break adds no empty line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(|c: char| c == '\r' || c == '\n') {
            Some(i) => {
                let line = &rest[..i];
                let skip = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + skip..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}
