// ABOUTME: Plain-text and JSON rendering of listings, details and favorites for the terminal.
// ABOUTME: Pure string builders so output formats stay in one place.

use marquee_listing::{
    format_date, format_rating, format_runtime, release_year, truncate_text, BackdropSize,
    ImageUrls, Item, ItemDetails, MoviePage, PageState, PosterSize,
};

const OVERVIEW_WIDTH: usize = 280;

/// One numbered row: `  3. * Title (1999)  rating 7.8`.
pub fn item_line(position: usize, item: &Item, favorite: bool) -> String {
    let marker = if favorite { "* " } else { "" };
    let year = release_year(&item.release_date)
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    format!(
        "{:>3}. {}{}{}  rating {}",
        position,
        marker,
        item.title,
        year,
        format_rating(item.rating)
    )
}

/// Rows for `items`, numbered from `first`.
pub fn item_lines(items: &[Item], first: usize, is_favorite: impl Fn(i64) -> bool) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| item_line(first + i, item, is_favorite(item.id)))
        .collect()
}

pub fn footer(state: &PageState) -> String {
    let more = if state.has_more() { ", more available" } else { "" };
    format!(
        "page {} of {} ({} results{})",
        state.current_page, state.total_pages, state.total_results, more
    )
}

/// Full listing: every row, then the footer. Empty listings get a short notice.
pub fn listing(state: &PageState, is_favorite: impl Fn(i64) -> bool) -> String {
    if state.items.is_empty() {
        return "No movies found.".to_string();
    }
    let mut lines = item_lines(&state.items, 1, is_favorite);
    lines.push(footer(state));
    lines.join("\n")
}

/// The accumulated listing in the BFF page shape.
pub fn listing_json(state: &PageState) -> serde_json::Result<String> {
    let page = MoviePage {
        page: state.current_page,
        results: state.items.clone(),
        total_pages: state.total_pages,
        total_results: state.total_results,
    };
    serde_json::to_string_pretty(&page)
}

pub fn details(details: &ItemDetails, images: &ImageUrls, favorite: bool) -> String {
    let item = &details.item;
    let mut lines = vec![item.title.clone()];
    if !details.tagline.is_empty() {
        lines.push(format!("\"{}\"", details.tagline));
    }

    let mut facts = Vec::new();
    let date = format_date(&item.release_date);
    if !date.is_empty() {
        facts.push(date);
    }
    let runtime = format_runtime(i64::from(details.runtime));
    if !runtime.is_empty() {
        facts.push(runtime);
    }
    facts.push(format!(
        "rating {} ({} votes)",
        format_rating(item.rating),
        item.vote_count
    ));
    lines.push(facts.join(" | "));

    if !details.genres.is_empty() {
        lines.push(format!("Genres: {}", details.genre_names()));
    }
    if !item.overview.is_empty() {
        lines.push(String::new());
        lines.push(truncate_text(&item.overview, OVERVIEW_WIDTH));
        lines.push(String::new());
    }
    if let Some(url) = images.poster_url(item.poster_path.as_deref(), PosterSize::W500) {
        lines.push(format!("Poster: {}", url));
    }
    if let Some(url) = images.backdrop_url(item.backdrop_path.as_deref(), BackdropSize::W1280) {
        lines.push(format!("Backdrop: {}", url));
    }
    lines.push(if favorite {
        "In your favorites".to_string()
    } else {
        "Not in your favorites".to_string()
    });
    lines.join("\n")
}
