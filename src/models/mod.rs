//! Data models for the Filmow scraper
//!
//! This module contains the records extracted from profile listings and the
//! enumerations that identify a listing (media type and category).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of media a listing holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Movie,
    TvShow,
}

impl MediaType {
    pub const ALL: [MediaType; 2] = [MediaType::Movie, MediaType::TvShow];

    /// Path segment used by the profile URLs
    pub fn slug(self) -> &'static str {
        match self {
            MediaType::Movie => "filmes",
            MediaType::TvShow => "series",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// User-curated sub-collection of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCategory {
    Favorites,
    Watched,
    ToWatch,
}

impl MediaCategory {
    /// Path segment used by the profile URLs
    pub fn slug(self) -> &'static str {
        match self {
            MediaCategory::Favorites => "favoritos",
            MediaCategory::Watched => "ja-vi",
            MediaCategory::ToWatch => "quero-ver",
        }
    }

    /// Whether items in this category carry a personal rating
    pub fn has_rating(self) -> bool {
        matches!(self, MediaCategory::Watched | MediaCategory::Favorites)
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Language used for labels, field names and console messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pt" => Ok(Language::Pt),
            "en" => Ok(Language::En),
            other => Err(format!("Unsupported language '{}', expected 'pt' or 'en'", other)),
        }
    }
}

/// Exported fields of a record, in canonical column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordField {
    LocalizedTitle,
    OriginalTitle,
    UserRating,
    Favorite,
}

impl RecordField {
    pub const ALL: [RecordField; 4] = [
        RecordField::LocalizedTitle,
        RecordField::OriginalTitle,
        RecordField::UserRating,
        RecordField::Favorite,
    ];

    /// Column name for the given language
    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (RecordField::LocalizedTitle, Language::Pt) => "Título nacional",
            (RecordField::OriginalTitle, Language::Pt) => "Título original",
            (RecordField::UserRating, Language::Pt) => "Nota do usuário",
            (RecordField::Favorite, Language::Pt) => "Favorito",
            (RecordField::LocalizedTitle, Language::En) => "Localized title",
            (RecordField::OriginalTitle, Language::En) => "Original title",
            (RecordField::UserRating, Language::En) => "User rating",
            (RecordField::Favorite, Language::En) => "Favorite",
        }
    }
}

/// A movie or TV show extracted from a profile listing
///
/// Serializes to a flat, sparse field set: the rating is only present when
/// the item has one and the favorite flag only when it is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaRecord {
    /// Title as shown on the site (Portuguese release title)
    #[serde(rename = "Título nacional")]
    pub title_localized: String,
    /// Original release title, equal to the localized one when absent
    #[serde(rename = "Título original")]
    pub title_original: String,
    /// Personal rating, only for watched and favorite items
    #[serde(
        rename = "Nota do usuário",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_rating: Option<f64>,
    #[serde(rename = "Favorito", default, skip_serializing_if = "is_false")]
    pub is_favorite: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl MediaRecord {
    pub fn new(title_localized: impl Into<String>, title_original: impl Into<String>) -> Self {
        Self {
            title_localized: title_localized.into(),
            title_original: title_original.into(),
            user_rating: None,
            is_favorite: false,
        }
    }

    pub fn with_rating(mut self, rating: Option<f64>) -> Self {
        self.user_rating = rating;
        self
    }

    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Identity used to match the same title across categories
    pub fn title_pair(&self) -> (&str, &str) {
        (&self.title_localized, &self.title_original)
    }

    /// Fields present in the serialized form, in canonical order
    pub fn fields(&self) -> Vec<(RecordField, Value)> {
        let mut fields = vec![
            (
                RecordField::LocalizedTitle,
                Value::String(self.title_localized.clone()),
            ),
            (
                RecordField::OriginalTitle,
                Value::String(self.title_original.clone()),
            ),
        ];

        if let Some(rating) = self.user_rating {
            fields.push((RecordField::UserRating, Value::from(rating)));
        }
        if self.is_favorite {
            fields.push((RecordField::Favorite, Value::Bool(true)));
        }

        fields
    }
}

/// The three lists extracted for one media type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaCollection {
    pub watched: Vec<MediaRecord>,
    pub favorites: Vec<MediaRecord>,
    pub to_watch: Vec<MediaRecord>,
}

impl MediaCollection {
    /// Total number of records across the three lists
    pub fn len(&self) -> usize {
        self.watched.len() + self.favorites.len() + self.to_watch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the list for a category
    pub fn get(&self, category: MediaCategory) -> &[MediaRecord] {
        match category {
            MediaCategory::Watched => &self.watched,
            MediaCategory::Favorites => &self.favorites,
            MediaCategory::ToWatch => &self.to_watch,
        }
    }

    /// Mutably borrow the list for a category
    pub fn get_mut(&mut self, category: MediaCategory) -> &mut Vec<MediaRecord> {
        match category {
            MediaCategory::Watched => &mut self.watched,
            MediaCategory::Favorites => &mut self.favorites,
            MediaCategory::ToWatch => &mut self.to_watch,
        }
    }
}

/// Which media types a run should extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaSelection {
    pub movies: bool,
    pub tv_shows: bool,
}

impl Default for MediaSelection {
    fn default() -> Self {
        Self {
            movies: true,
            tv_shows: true,
        }
    }
}

impl MediaSelection {
    pub fn includes(&self, media_type: MediaType) -> bool {
        match media_type {
            MediaType::Movie => self.movies,
            MediaType::TvShow => self.tv_shows,
        }
    }
}

/// Every collection extracted for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaLibrary {
    pub movies: MediaCollection,
    pub tv_shows: MediaCollection,
}

impl MediaLibrary {
    pub fn get(&self, media_type: MediaType) -> &MediaCollection {
        match media_type {
            MediaType::Movie => &self.movies,
            MediaType::TvShow => &self.tv_shows,
        }
    }

    pub fn get_mut(&mut self, media_type: MediaType) -> &mut MediaCollection {
        match media_type {
            MediaType::Movie => &mut self.movies,
            MediaType::TvShow => &mut self.tv_shows,
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len() + self.tv_shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
