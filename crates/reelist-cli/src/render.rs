use std::fmt::Write;

use reelist_core::models::{MovieCard, MAX_RATING};
use reelist_runtime::{NoticeKind, UiState};

fn stars(rating: u8) -> String {
    let filled = rating.min(MAX_RATING) as usize;
    let mut s = "*".repeat(filled);
    s.push_str(&".".repeat(MAX_RATING as usize - filled));
    s
}

fn card_line(card: &MovieCard) -> String {
    let mut line = String::new();
    match (&card.key, card.movie_id) {
        (Some(key), _) => {
            let _ = write!(line, "[{key}] ");
        }
        (None, Some(id)) => {
            let _ = write!(line, "#{id} ");
        }
        (None, None) => {}
    }
    line.push_str(&card.title);
    if let Some(year) = card.year.get(..4) {
        let _ = write!(line, " ({year})");
    }
    if let Some(rating) = card.rating {
        let _ = write!(line, "  {}", stars(rating));
    }
    if card.favorite == Some(true) {
        line.push_str("  fav");
    }
    line
}

/// Text rendering of the page: header, visible panel, cards, notice.
pub fn page(state: &UiState) -> String {
    let mut out = String::new();

    let who = state
        .user
        .as_ref()
        .map(|u| u.display_name.as_str())
        .unwrap_or("signed out");
    let _ = writeln!(out, "== {} == ({who})", state.view);

    if state.cards.is_empty() {
        out.push_str("  (nothing to show)\n");
    }
    for card in &state.cards {
        let _ = writeln!(out, "  {}", card_line(card));
    }

    if let Some(notice) = &state.notice {
        let tag = match notice.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
            NoticeKind::Info => "info",
        };
        let _ = writeln!(out, "[{tag}] {}", notice.message);
    }
    out
}
