//! Parser module for extracting structured data from HTML
//!
//! This module turns Filmow listing pages into `MediaRecord`s and works out
//! how many pages a listing has.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::constants::{selectors, PAGE_PARAM};
use crate::models::{MediaCategory, MediaRecord};

pub mod title;

pub use title::normalize;

/// Why a single listing item was skipped
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("poster wrapper not found in item")]
    MissingWrapper,

    #[error("image not found in poster wrapper")]
    MissingImage,

    #[error("image alt text is missing or empty")]
    MissingTitle,
}

/// Pagination could not be worked out from the markup
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCountError {
    #[error("could not determine page count: no pagination and no items")]
    PageCountUndetermined,
}

/// Compile a selector from one of the literals in [`selectors`]
fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {:?}: {:?}", css, e))
}

/// Selectors used inside a listing item, compiled once per page
pub struct ItemSelectors {
    wrapper: Selector,
    image: Selector,
    rating: Selector,
}

impl ItemSelectors {
    pub fn new() -> Self {
        Self {
            wrapper: selector(selectors::WRAPPER),
            image: selector(selectors::IMAGE),
            rating: selector(selectors::RATING),
        }
    }
}

impl Default for ItemSelectors {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one listing item
///
/// The title comes from the `alt` text of the poster image; the rating is
/// only looked up for categories that carry one.
pub fn parse_media_item(item: ElementRef<'_>, category: MediaCategory) -> Result<MediaRecord, ParseFailure> {
    parse_media_item_with(item, category, &ItemSelectors::new())
}

/// Parse one listing item with already compiled selectors
pub fn parse_media_item_with(
    item: ElementRef<'_>,
    category: MediaCategory,
    item_selectors: &ItemSelectors,
) -> Result<MediaRecord, ParseFailure> {
    let wrapper = item
        .select(&item_selectors.wrapper)
        .next()
        .ok_or(ParseFailure::MissingWrapper)?;

    let image = wrapper
        .select(&item_selectors.image)
        .next()
        .ok_or(ParseFailure::MissingImage)?;

    let full_title = image
        .value()
        .attr("alt")
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .ok_or(ParseFailure::MissingTitle)?;

    let (title_localized, title_original) = normalize(full_title);

    let user_rating = if category.has_rating() {
        extract_user_rating(item, &item_selectors.rating)
    } else {
        None
    };

    Ok(MediaRecord {
        title_localized,
        title_original,
        user_rating,
        is_favorite: category == MediaCategory::Favorites,
    })
}

/// Parse a standalone item fragment, e.g. `<li class="movie_list_item">...</li>`
pub fn parse_media_item_html(fragment: &str, category: MediaCategory) -> Result<MediaRecord, ParseFailure> {
    let fragment = Html::parse_fragment(fragment);
    parse_media_item(fragment.root_element(), category)
}

/// Read the user's star rating of an item, if any
///
/// Failures never propagate: a malformed rating only costs the rating.
fn extract_user_rating(item: ElementRef<'_>, rating: &Selector) -> Option<f64> {
    let Some(stars) = item.select(rating).next() else {
        tracing::debug!("No rating element in item");
        return None;
    };

    let Some(text) = stars.value().attr("title") else {
        tracing::debug!("Rating element has no title attribute");
        return None;
    };

    match parse_rating_text(text) {
        Ok(rating) => Some(rating),
        Err(e) => {
            tracing::warn!("Error parsing rating {:?}: {}", text, e);
            None
        }
    }
}

/// Parse a rating label such as `"Nota: 4,5 estrelas"` into `4.5`
pub fn parse_rating_text(text: &str) -> Result<f64, String> {
    let token = text
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| "missing rating value".to_string())?;

    let rating: f64 = token
        .replace(',', ".")
        .parse()
        .map_err(|e| format!("invalid rating value {:?}: {}", token, e))?;

    if !rating.is_finite() {
        return Err(format!("invalid rating value {:?}", token));
    }

    Ok(rating)
}

/// Parse every item of a listing page
///
/// Items that cannot be parsed are logged and skipped; the rest of the page
/// is still processed.
pub fn parse_media_page(html: &str, category: MediaCategory) -> Vec<MediaRecord> {
    let document = Html::parse_document(html);
    let item_selector = selector(selectors::ITEM);
    let item_selectors = ItemSelectors::new();

    let mut records = Vec::new();

    for (index, item) in document.select(&item_selector).enumerate() {
        match parse_media_item_with(item, category, &item_selectors) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("Skipping item {} of {} page: {}", index + 1, category, e),
        }
    }

    records
}

/// Work out the number of pages of a listing from its first page
///
/// Resolution order:
/// 1. no pagination control but items present: one page;
/// 2. the "última página" link of the pagination control;
/// 3. the last pagination link whose href carries a page number;
/// 4. the largest page number written as link text;
/// 5. items present: one page.
///
/// A page with neither pagination nor items is undetermined.
pub fn resolve_page_count(html: &str) -> Result<u32, PageCountError> {
    let document = Html::parse_document(html);
    let has_items = document.select(&selector(selectors::ITEM)).next().is_some();

    let Some(pagination) = document.select(&selector(selectors::PAGINATION)).next() else {
        return if has_items {
            Ok(1)
        } else {
            Err(PageCountError::PageCountUndetermined)
        };
    };

    let last_page = pagination
        .select(&selector(selectors::LAST_PAGE))
        .filter_map(|link| link.value().attr("href"))
        .find_map(page_from_href);
    if let Some(page) = last_page {
        return Ok(page);
    }

    let links: Vec<ElementRef<'_>> = pagination.select(&selector(selectors::PAGE_LINK)).collect();
    if let Some(page) = links
        .iter()
        .rev()
        .filter_map(|link| link.value().attr("href"))
        .find_map(page_from_href)
    {
        return Ok(page);
    }

    let numbered = pagination
        .select(&selector(selectors::LINK))
        .filter_map(|link| link.text().collect::<String>().trim().parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .max();
    if let Some(page) = numbered {
        return Ok(page);
    }

    if has_items {
        Ok(1)
    } else {
        Err(PageCountError::PageCountUndetermined)
    }
}

/// Extract the page number from a link such as `?pagina=12`
pub fn page_from_href(href: &str) -> Option<u32> {
    let query = href.split_once('?').map_or(href, |(_, query)| query);

    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key != PAGE_PARAM {
            return None;
        }
        let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse::<u32>().ok().filter(|page| *page >= 1)
    })
}
