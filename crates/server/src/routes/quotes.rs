use axum::{extract::State, response::Html, Json};
use html_escape::encode_text;
use service::Quote;

use crate::observability;
use crate::state::AppState;

fn draw(state: &AppState) -> Quote {
    let quote = state.store().random_quote();
    observability::record_served(&quote);
    quote
}

/// JSON `{"text": ..., "author": ...}` of one random quote.
pub async fn random_quote(State(state): State<AppState>) -> Json<Quote> {
    Json(draw(&state))
}

/// Home page showing one random quote.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&draw(&state)))
}

pub fn render_page(quote: &Quote) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>TAKA</title>
    <link rel="stylesheet" href="/css/site.css" />
</head>
<body>
    <main class="quote">
        <blockquote>{text}</blockquote>
        <p class="author">&mdash; {author}</p>
    </main>
</body>
</html>
"#,
        text = encode_text(quote.text()),
        author = encode_text(quote.author()),
    )
}
