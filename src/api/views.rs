//! HTML rendering for the browse and recommend pages
//!
//! Pure functions from view data to markup. Every interpolated value goes
//! through `escape_html`.

use crate::models::{MetadataRecord, MovieRecord, Theme};

/// Posters per grid row
pub const GRID_COLUMNS: usize = 5;

const BASE_CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 24px; }
body.theme-light { background-color: #ffffff; color: #262730; }
body.theme-dark { background-color: #0e1117; color: white; }
header.top-bar { display: flex; justify-content: space-between; align-items: center; margin-bottom: 16px; }
.theme-switch a { margin-left: 8px; color: inherit; }
.page-title { text-align: center; color: #ff4b4b; }
.notice { padding: 12px 16px; border-radius: 6px; margin: 12px 0; }
.notice.error { background: #ffe3e3; color: #7d1a1a; }
.notice.warning { background: #fff4d6; color: #6b4e00; }
.search-box input { width: 100%; padding: 10px; font-size: 16px; border-radius: 6px; border: 1px solid #ccc; }
.poster-grid { display: grid; gap: 16px; margin-top: 16px; }
.poster-btn { background: none; border: none; padding: 0; cursor: pointer; }
.poster-btn img { border-radius: 8px; transition: transform 0.2s ease-in-out; width: 100%; }
.poster-btn img:hover { transform: scale(1.05); }
.poster-title { text-align: center; font-weight: bold; margin-top: 5px; color: #ff4b4b; }
.poster-container { position: relative; display: inline-block; width: 100%; }
.hover-info { position: absolute; bottom: 0; left: 0; width: 100%; box-sizing: border-box; background: rgba(0, 0, 0, 0.85); color: white; padding: 10px; font-size: 12px; opacity: 0; transition: opacity 0.3s ease-in-out; border-radius: 0 0 8px 8px; max-height: 200px; overflow-y: auto; }
.poster-container:hover .hover-info { opacity: 1; }
.hover-title { font-weight: bold; color: #ff4b4b; }
.hover-rating { color: gold; }
.hover-trailer a { color: #00adee; text-decoration: underline; }
.selected-poster { display: block; margin: 0 auto; max-width: 500px; width: 100%; border-radius: 8px; }
.back-form { margin-top: 24px; }
"#;

/// One clickable poster in a grid
#[derive(Debug, Clone, Copy)]
pub struct PosterCard<'a> {
    pub movie: &'a MovieRecord,
    pub metadata: &'a MetadataRecord,
}

/// A one-line message shown above the page content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Warning(String),
}

impl Notice {
    fn render(&self) -> String {
        let (class, text) = match self {
            Notice::Error(text) => ("error", text),
            Notice::Warning(text) => ("warning", text),
        };
        format!(r#"<div class="notice {}">{}</div>"#, class, escape_html(text))
    }
}

/// Escapes text for use in HTML content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(theme: Theme, body: &str) -> String {
    let theme_class = match theme {
        Theme::Light => "theme-light",
        Theme::Dark => "theme-dark",
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Movie Recommendation App</title>
    <style>{css}</style>
</head>
<body class="{theme_class}">
    <header class="top-bar">
        <a href="/" style="color: inherit; text-decoration: none;"><strong>Movie Recommendation App</strong></a>
        <span class="theme-switch">Theme: <a href="/?theme=light">🌞 Light</a><a href="/?theme=dark">🌚 Dark</a></span>
    </header>
    <main>
{body}
    </main>
</body>
</html>
"#,
        css = BASE_CSS,
        theme_class = theme_class,
        body = body
    )
}

fn poster_card(card: &PosterCard<'_>) -> String {
    let name = escape_html(&card.movie.name);
    let meta = card.metadata;

    format!(
        r#"<div class="poster-cell">
    <div class="poster-container">
        <form action="/" method="get" style="margin:0;">
            <button class="poster-btn" type="submit" name="selected" value="{name}">
                <img src="{poster}" width="400" alt="{name}">
            </button>
        </form>
        <div class="hover-info">
            <div class="hover-title">{title} ({year})</div>
            <div class="hover-rating">⭐ {rating}</div>
            <div class="hover-plot">{plot}</div>
            <div class="hover-trailer"><a href="{trailer}" target="_blank" rel="noopener">▶ Watch Trailer</a></div>
        </div>
    </div>
    <div class="poster-title">{name}</div>
</div>"#,
        name = name,
        poster = escape_html(&meta.poster_url),
        title = escape_html(&meta.title),
        year = escape_html(&meta.year),
        rating = escape_html(&meta.rating),
        plot = escape_html(&meta.plot),
        trailer = escape_html(&meta.trailer_link),
    )
}

/// Grid of poster cards, `GRID_COLUMNS` per row
pub fn poster_grid(cards: &[PosterCard<'_>]) -> String {
    let cells: Vec<String> = cards.iter().map(poster_card).collect();
    format!(
        "<section class=\"poster-grid\" style=\"grid-template-columns: repeat({}, 1fr);\">\n{}\n</section>",
        GRID_COLUMNS,
        cells.join("\n")
    )
}

/// Browse page: search box plus the (filtered) catalog
pub fn browse_page(
    theme: Theme,
    search_term: &str,
    cards: &[PosterCard<'_>],
    notice: Option<&Notice>,
) -> String {
    let notice = notice.map(Notice::render).unwrap_or_default();
    let results = if cards.is_empty() {
        format!(
            r#"<p class="empty">No movies match "{}".</p>"#,
            escape_html(search_term)
        )
    } else {
        poster_grid(cards)
    };

    let body = format!(
        r#"<h1 class="page-title">Select a Movie</h1>
{notice}
<form class="search-box" action="/" method="get">
    <input type="search" name="q" value="{term}" placeholder="🔍 Search for a movie">
</form>
{results}"#,
        notice = notice,
        term = escape_html(search_term),
        results = results
    );

    layout(theme, &body)
}

fn back_button() -> &'static str {
    r#"<form class="back-form" action="/back" method="post">
    <button type="submit">⬅ Back</button>
</form>"#
}

/// Recommend page: the selected movie followed by its recommendations
pub fn recommend_page(
    theme: Theme,
    selected: &PosterCard<'_>,
    recommendations: &[PosterCard<'_>],
    notice: Option<&Notice>,
) -> String {
    let name = escape_html(&selected.movie.name);

    let body = format!(
        r#"{notice}
<h1 class="page-title">{name}</h1>
<figure>
    <img class="selected-poster" src="{poster}" alt="{name}">
    <figcaption style="text-align:center;">{name}</figcaption>
</figure>
<hr>
<h2 style="color:#ff4b4b;">Recommended Movies</h2>
{grid}
{back}"#,
        notice = notice.map(Notice::render).unwrap_or_default(),
        name = name,
        poster = escape_html(&selected.metadata.poster_url),
        grid = poster_grid(recommendations),
        back = back_button()
    );

    layout(theme, &body)
}

/// Recommend page that could not produce results
pub fn recommend_notice_page(theme: Theme, notices: &[Notice]) -> String {
    let notices: Vec<String> = notices.iter().map(Notice::render).collect();
    let body = format!("{}\n{}", notices.join("\n"), back_button());
    layout(theme, &body)
}
