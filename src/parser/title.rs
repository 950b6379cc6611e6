//! Title normalization
//!
//! Filmow renders a single title string per poster, e.g.
//! `"Cidade de Deus (City of God)"` or
//! `"Dark (1ª Temporada) (Dark (Season 1))"`. This module splits it into the
//! localized and the original title.

use crate::constants::SEASON_MARKER;

/// Split a raw poster title into `(localized, original)`
///
/// Rules, first match wins:
/// 1. season entries (`"... Temporada)"`) split on the first `") "`; the
///    right part loses one wrapping pair of parentheses;
/// 2. `"Localized (Original)"` splits on the first `" ("`;
/// 3. anything else is used for both titles.
///
/// A season entry without `") "`, such as `"Sintonia (1ª Temporada)"`, is a
/// season with no original title: the whole string is used for both titles.
/// It is not split as `"Localized (Original)"` (which would give
/// `("Sintonia", "1ª Temporada")`) and gets no extra closing parenthesis.
///
/// Never fails: input that would leave either side empty falls back to the
/// trimmed raw string for both.
pub fn normalize(raw: &str) -> (String, String) {
    let (localized, original) = if raw.contains(SEASON_MARKER) {
        split_season(raw)
    } else if raw.contains(" (") && raw.ends_with(')') {
        split_original(raw)
    } else {
        (raw.to_string(), raw.to_string())
    };

    let localized = localized.trim();
    let original = original.trim();

    if localized.is_empty() || original.is_empty() {
        let fallback = raw.trim().to_string();
        return (fallback.clone(), fallback);
    }

    (localized.to_string(), original.to_string())
}

fn split_season(raw: &str) -> (String, String) {
    let Some((left, right)) = raw.split_once(") ") else {
        return (raw.to_string(), raw.to_string());
    };

    let localized = format!("{})", left);
    let right = right.trim();
    if right.is_empty() {
        return (localized.clone(), localized);
    }

    let original = strip_wrapping_parens(right).to_string();
    (localized, original)
}

fn split_original(raw: &str) -> (String, String) {
    match raw.split_once(" (") {
        Some((left, rest)) => {
            let original = rest.strip_suffix(')').unwrap_or(rest);
            (left.to_string(), original.to_string())
        }
        None => (raw.to_string(), raw.to_string()),
    }
}

fn strip_wrapping_parens(text: &str) -> &str {
    text.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(text)
}
