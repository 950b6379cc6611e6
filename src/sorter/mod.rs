//! Sorting of extracted collections
//!
//! Every sort is driven by a prioritized list of typed keys. Keys are
//! evaluated in order and the first one that tells two records apart decides
//! their order; records equal under every key keep their relative order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::models::{MediaCollection, MediaLibrary, MediaRecord};

/// Errors raised by a sort request
///
/// These signal a misconfigured request, never bad data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("sort field '{0}' is absent from every record")]
    MissingSortKey(SortField),

    #[error("sort field '{0}' is listed more than once")]
    InconsistentKeys(SortField),

    #[error("unknown sort field '{0}'")]
    UnknownField(String),

    #[error("invalid sort key '{0}'")]
    InvalidKeySpec(String),
}

/// Record field a key sorts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Title,
    OriginalTitle,
    Rating,
    Favorite,
}

impl SortField {
    /// Value type the field is naturally compared as
    pub fn natural_type(self) -> ValueType {
        match self {
            SortField::Title | SortField::OriginalTitle => ValueType::String,
            SortField::Rating => ValueType::Numeric,
            SortField::Favorite => ValueType::Boolean,
        }
    }

    fn value(self, record: &MediaRecord) -> Option<FieldValue<'_>> {
        match self {
            SortField::Title => Some(FieldValue::Text(&record.title_localized)),
            SortField::OriginalTitle => Some(FieldValue::Text(&record.title_original)),
            SortField::Rating => record.user_rating.map(FieldValue::Number),
            SortField::Favorite => Some(FieldValue::Flag(record.is_favorite)),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortField::Title => "title",
            SortField::OriginalTitle => "original_title",
            SortField::Rating => "rating",
            SortField::Favorite => "favorite",
        };
        f.write_str(name)
    }
}

impl FromStr for SortField {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SortField::Title),
            "original_title" | "original" => Ok(SortField::OriginalTitle),
            "rating" => Ok(SortField::Rating),
            "favorite" => Ok(SortField::Favorite),
            other => Err(SortError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// How two field values are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Case-insensitive lexicographic
    String,
    /// Floating point, comma accepted as decimal separator
    Numeric,
    /// Truthy values rank above everything else
    Boolean,
}

/// Treatment of records lacking the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nulls {
    /// A present value sorts before an absent one, whatever the direction
    #[default]
    PresentFirst,
    /// An absent value counts as the value type's default ("", 0.0, false)
    AsDefault,
}

/// One entry of a prioritized sort key list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKeySpec {
    pub field: SortField,
    pub direction: SortDirection,
    pub value_type: ValueType,
    pub nulls: Nulls,
}

impl SortKeySpec {
    pub fn new(field: SortField, direction: SortDirection, value_type: ValueType) -> Self {
        Self {
            field,
            direction,
            value_type,
            nulls: Nulls::PresentFirst,
        }
    }

    pub fn asc(field: SortField) -> Self {
        Self::new(field, SortDirection::Asc, field.natural_type())
    }

    pub fn desc(field: SortField) -> Self {
        Self::new(field, SortDirection::Desc, field.natural_type())
    }

    pub fn with_nulls(mut self, nulls: Nulls) -> Self {
        self.nulls = nulls;
        self
    }

    /// Compare two records under this key alone
    pub fn compare(&self, a: &MediaRecord, b: &MediaRecord) -> Ordering {
        let (left, right) = match (self.field.value(a), self.field.value(b)) {
            (None, None) => return Ordering::Equal,
            (Some(_), None) if self.nulls == Nulls::PresentFirst => return Ordering::Less,
            (None, Some(_)) if self.nulls == Nulls::PresentFirst => return Ordering::Greater,
            (left, right) => {
                let default = FieldValue::default_for(self.value_type);
                (left.unwrap_or(default), right.unwrap_or(default))
            }
        };

        let ordering = left.compare(&right, self.value_type);
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortKeySpec {
    type Err = SortError;

    /// Parse `field[:asc|desc[:string|numeric|boolean]]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SortError::InvalidKeySpec(s.trim().to_string());
        let mut parts = s.split(':').map(str::trim);

        let field: SortField = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?.parse()?;

        let direction = match parts.next().map(str::to_lowercase).as_deref() {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(_) => return Err(invalid()),
        };

        let value_type = match parts.next().map(str::to_lowercase).as_deref() {
            None => field.natural_type(),
            Some("string") => ValueType::String,
            Some("numeric") => ValueType::Numeric,
            Some("boolean") => ValueType::Boolean,
            Some(_) => return Err(invalid()),
        };

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(SortKeySpec::new(field, direction, value_type))
    }
}

/// Parse a comma separated key list such as `favorite:desc,rating:desc,title`
pub fn parse_key_specs(text: &str) -> Result<Vec<SortKeySpec>, SortError> {
    text.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse::<SortKeySpec>)
        .collect()
}

/// A field value borrowed from a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Flag(bool),
}

impl<'a> FieldValue<'a> {
    fn default_for(value_type: ValueType) -> Self {
        match value_type {
            ValueType::String => FieldValue::Text(""),
            ValueType::Numeric => FieldValue::Number(0.0),
            ValueType::Boolean => FieldValue::Flag(false),
        }
    }

    /// Case-folded string form
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(text) => text.to_lowercase(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Flag(b) => b.to_string(),
        }
    }

    /// Numeric form; empty, unparseable and non-finite values are 0.0
    pub fn as_number(&self) -> f64 {
        let value = match self {
            FieldValue::Text(text) => {
                let text = text.trim();
                if text.is_empty() || text.eq_ignore_ascii_case("none") {
                    0.0
                } else {
                    text.replace(',', ".").parse().unwrap_or(0.0)
                }
            }
            FieldValue::Number(n) => *n,
            FieldValue::Flag(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
        };

        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    /// Whether the value belongs to the truthy set
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Text(text) => matches!(
                text.trim().to_lowercase().as_str(),
                "true" | "1" | "yes" | "sim" | "favorite" | "favorito"
            ),
            FieldValue::Number(n) => *n == 1.0,
            FieldValue::Flag(b) => *b,
        }
    }

    /// Ascending comparison under a value type
    pub fn compare(&self, other: &FieldValue<'_>, value_type: ValueType) -> Ordering {
        match value_type {
            ValueType::String => self.as_text().cmp(&other.as_text()),
            ValueType::Numeric => self
                .as_number()
                .partial_cmp(&other.as_number())
                .unwrap_or(Ordering::Equal),
            ValueType::Boolean => self.is_truthy().cmp(&other.is_truthy()),
        }
    }
}

/// Compare two records under a prioritized key list
pub fn compare_records(a: &MediaRecord, b: &MediaRecord, keys: &[SortKeySpec]) -> Ordering {
    keys.iter()
        .fold(Ordering::Equal, |ordering, key| ordering.then_with(|| key.compare(a, b)))
}

/// Check a key list against the records it will sort
pub fn validate_keys(records: &[MediaRecord], keys: &[SortKeySpec]) -> Result<(), SortError> {
    for (index, key) in keys.iter().enumerate() {
        if keys[..index].iter().any(|earlier| earlier.field == key.field) {
            return Err(SortError::InconsistentKeys(key.field));
        }

        let present_anywhere = records.iter().any(|r| key.field.value(r).is_some());
        if key.nulls == Nulls::PresentFirst && !records.is_empty() && !present_anywhere {
            return Err(SortError::MissingSortKey(key.field));
        }
    }

    Ok(())
}

/// Sort records by a prioritized key list
///
/// Returns a new vector; the input is left untouched. The sort is stable and
/// an empty key list keeps the input order.
pub fn sort(records: &[MediaRecord], keys: &[SortKeySpec]) -> Result<Vec<MediaRecord>, SortError> {
    validate_keys(records, keys)?;
    Ok(sort_lenient(records, keys))
}

/// Sort without validating the key list
pub fn sort_lenient(records: &[MediaRecord], keys: &[SortKeySpec]) -> Vec<MediaRecord> {
    let mut sorted = records.to_vec();
    if !keys.is_empty() {
        sorted.sort_by(|a, b| compare_records(a, b, keys));
    }
    sorted
}

/// Alphabetical by localized title
pub fn sort_by_title(records: &[MediaRecord], direction: SortDirection) -> Vec<MediaRecord> {
    let key = SortKeySpec::new(SortField::Title, direction, ValueType::String).with_nulls(Nulls::AsDefault);
    sort_lenient(records, &[key])
}

/// By user rating; a missing rating counts as 0.0
pub fn sort_by_rating(records: &[MediaRecord], direction: SortDirection) -> Vec<MediaRecord> {
    let key = SortKeySpec::new(SortField::Rating, direction, ValueType::Numeric).with_nulls(Nulls::AsDefault);
    sort_lenient(records, &[key])
}

/// By favorite status; descending puts favorites first
pub fn sort_by_favorite(records: &[MediaRecord], direction: SortDirection) -> Vec<MediaRecord> {
    let key = SortKeySpec::new(SortField::Favorite, direction, ValueType::Boolean).with_nulls(Nulls::AsDefault);
    sort_lenient(records, &[key])
}

/// Apply the same sorting function to several lists
pub fn sort_lists<F>(lists: &[&[MediaRecord]], sort_fn: F) -> Vec<Vec<MediaRecord>>
where
    F: Fn(&[MediaRecord]) -> Vec<MediaRecord>,
{
    lists.iter().map(|&list| sort_fn(list)).collect()
}

/// Favorites first, then by rating, then alphabetical
pub fn ranking_keys() -> [SortKeySpec; 3] {
    [
        SortKeySpec::desc(SortField::Favorite),
        SortKeySpec::desc(SortField::Rating),
        SortKeySpec::asc(SortField::Title),
    ]
}

/// Named sorting strategies for whole collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPreset {
    /// Every list alphabetical
    #[default]
    Title,
    /// Rated lists by rating, to-watch alphabetical, watched ranked
    Rating,
    /// Watched by favorite status then ranked, other lists alphabetical
    Favorite,
    /// Keep extraction order
    None,
}

impl FromStr for SortPreset {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SortPreset::Title),
            "rating" => Ok(SortPreset::Rating),
            "favorite" => Ok(SortPreset::Favorite),
            "none" => Ok(SortPreset::None),
            other => Err(SortError::InvalidKeySpec(other.to_string())),
        }
    }
}

impl SortPreset {
    /// Sort the three lists of a collection
    pub fn apply(self, collection: &MediaCollection) -> MediaCollection {
        fn by_title(records: &[MediaRecord]) -> Vec<MediaRecord> {
            sort_by_title(records, SortDirection::Asc)
        }

        match self {
            SortPreset::None => collection.clone(),
            SortPreset::Title => {
                let lists = [
                    collection.watched.as_slice(),
                    collection.favorites.as_slice(),
                    collection.to_watch.as_slice(),
                ];
                let mut sorted = sort_lists(&lists, by_title).into_iter();
                MediaCollection {
                    watched: sorted.next().unwrap_or_default(),
                    favorites: sorted.next().unwrap_or_default(),
                    to_watch: sorted.next().unwrap_or_default(),
                }
            }
            SortPreset::Rating => {
                let watched = sort_by_rating(&collection.watched, SortDirection::Desc);
                MediaCollection {
                    watched: sort_lenient(&watched, &ranking_keys()),
                    favorites: sort_by_rating(&collection.favorites, SortDirection::Desc),
                    to_watch: by_title(&collection.to_watch),
                }
            }
            SortPreset::Favorite => {
                let watched = sort_by_favorite(&collection.watched, SortDirection::Desc);
                MediaCollection {
                    watched: sort_lenient(&watched, &ranking_keys()),
                    favorites: by_title(&collection.favorites),
                    to_watch: by_title(&collection.to_watch),
                }
            }
        }
    }

    pub fn apply_library(self, library: &MediaLibrary) -> MediaLibrary {
        MediaLibrary {
            movies: self.apply(&library.movies),
            tv_shows: self.apply(&library.tv_shows),
        }
    }
}

/// Sort every list of a library with explicit keys
///
/// A list the keys cannot sort is logged and keeps its extraction order.
pub fn sort_library_by_keys(library: &MediaLibrary, keys: &[SortKeySpec]) -> MediaLibrary {
    fn sort_or_keep(records: &[MediaRecord], keys: &[SortKeySpec]) -> Vec<MediaRecord> {
        sort(records, keys).unwrap_or_else(|e| {
            warn!("Keeping extraction order: {}", e);
            records.to_vec()
        })
    }

    fn sort_collection(collection: &MediaCollection, keys: &[SortKeySpec]) -> MediaCollection {
        MediaCollection {
            watched: sort_or_keep(&collection.watched, keys),
            favorites: sort_or_keep(&collection.favorites, keys),
            to_watch: sort_or_keep(&collection.to_watch, keys),
        }
    }

    MediaLibrary {
        movies: sort_collection(&library.movies, keys),
        tv_shows: sort_collection(&library.tv_shows, keys),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, rating: Option<f64>, favorite: bool) -> MediaRecord {
        MediaRecord::new(title, title)
            .with_rating(rating)
            .with_favorite(favorite)
    }

    fn titles(records: &[MediaRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title_localized.as_str()).collect()
    }

    #[test]
    fn test_sort_by_title_is_case_insensitive() {
        let records = vec![
            record("banana", None, false),
            record("Abacaxi", None, false),
            record("cereja", None, false),
        ];
        let sorted = sort_by_title(&records, SortDirection::Asc);
        assert_eq!(titles(&sorted), vec!["Abacaxi", "banana", "cereja"]);

        let sorted = sort_by_title(&records, SortDirection::Desc);
        assert_eq!(titles(&sorted), vec!["cereja", "banana", "Abacaxi"]);
    }

    #[test]
    fn test_sort_leaves_input_untouched() {
        let records = vec![record("B", None, false), record("A", None, false)];
        let sorted = sort(&records, &[SortKeySpec::asc(SortField::Title)]).unwrap();
        assert_eq!(titles(&records), vec!["B", "A"]);
        assert_eq!(titles(&sorted), vec!["A", "B"]);
    }

    #[test]
    fn test_sort_by_rating_missing_counts_as_zero() {
        let records = vec![
            record("unrated", None, false),
            record("zero", Some(0.0), false),
            record("high", Some(4.5), false),
        ];
        let sorted = sort_by_rating(&records, SortDirection::Desc);
        assert_eq!(titles(&sorted), vec!["high", "unrated", "zero"]);

        let sorted = sort_by_rating(&records, SortDirection::Asc);
        assert_eq!(titles(&sorted), vec!["unrated", "zero", "high"]);
    }

    #[test]
    fn test_numeric_comma_and_dot_are_equal() {
        let comma = FieldValue::Text("8,5");
        let dot = FieldValue::Number(8.5);
        assert_eq!(comma.compare(&dot, ValueType::Numeric), Ordering::Equal);
        assert_eq!(FieldValue::Text("").as_number(), 0.0);
        assert_eq!(FieldValue::Text("None").as_number(), 0.0);
        assert_eq!(FieldValue::Text("abc").as_number(), 0.0);
        assert_eq!(FieldValue::Number(f64::NAN).as_number(), 0.0);
    }

    #[test]
    fn test_truthy_set() {
        for text in ["true", "1", "yes", "sim", "Sim", "TRUE", "Favorito"] {
            assert!(FieldValue::Text(text).is_truthy(), "{} should be truthy", text);
        }
        for text in ["false", "0", "no", "não", ""] {
            assert!(!FieldValue::Text(text).is_truthy(), "{} should be falsy", text);
        }
        assert!(FieldValue::Flag(true).is_truthy());
        assert!(FieldValue::Number(1.0).is_truthy());
        assert!(!FieldValue::Number(2.0).is_truthy());
    }

    #[test]
    fn test_boolean_truthy_ranks_higher_ascending() {
        let records = vec![record("fav", None, true), record("plain", None, false)];
        let sorted = sort(&records, &[SortKeySpec::asc(SortField::Favorite)]).unwrap();
        assert_eq!(titles(&sorted), vec!["plain", "fav"]);
    }

    #[test]
    fn test_favorite_outranks_higher_rating() {
        let records = vec![
            record("Nao favorito", Some(10.0), false),
            record("Favorito", Some(9.0), true),
        ];
        let keys = [
            SortKeySpec::new(SortField::Favorite, SortDirection::Desc, ValueType::Boolean),
            SortKeySpec::new(SortField::Rating, SortDirection::Desc, ValueType::Numeric),
            SortKeySpec::new(SortField::Title, SortDirection::Asc, ValueType::String),
        ];
        let sorted = sort(&records, &keys).unwrap();
        assert_eq!(titles(&sorted), vec!["Favorito", "Nao favorito"]);
    }

    #[test]
    fn test_later_keys_break_ties() {
        let records = vec![
            record("C", Some(3.0), false),
            record("B", Some(4.0), false),
            record("A", Some(3.0), false),
        ];
        let sorted = sort(&records, &ranking_keys()).unwrap();
        assert_eq!(titles(&sorted), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_present_value_first_regardless_of_direction() {
        let records = vec![record("unrated", None, false), record("rated", Some(1.0), false)];

        let asc = sort(&records, &[SortKeySpec::asc(SortField::Rating)]).unwrap();
        assert_eq!(titles(&asc), vec!["rated", "unrated"]);

        let desc = sort(&records, &[SortKeySpec::desc(SortField::Rating)]).unwrap();
        assert_eq!(titles(&desc), vec!["rated", "unrated"]);
    }

    #[test]
    fn test_both_missing_falls_through_to_next_key() {
        let records = vec![
            record("B", None, false),
            record("A", None, false),
            record("C", Some(2.0), false),
        ];
        let keys = [SortKeySpec::desc(SortField::Rating), SortKeySpec::asc(SortField::Title)];
        let sorted = sort(&records, &keys).unwrap();
        assert_eq!(titles(&sorted), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_all_ties_keep_input_order() {
        let records = vec![
            record("same", Some(1.0), false),
            MediaRecord::new("same", "other").with_rating(Some(1.0)),
        ];
        let sorted = sort(&records, &[SortKeySpec::asc(SortField::Title)]).unwrap();
        assert_eq!(sorted, records);
    }

    #[test]
    fn test_empty_keys_keep_order() {
        let records = vec![record("B", None, false), record("A", None, false)];
        assert_eq!(sort(&records, &[]).unwrap(), records);
    }

    #[test]
    fn test_missing_sort_key() {
        let records = vec![record("A", None, false), record("B", None, false)];
        assert_eq!(
            sort(&records, &[SortKeySpec::desc(SortField::Rating)]),
            Err(SortError::MissingSortKey(SortField::Rating))
        );

        // Empty input and lenient keys never fail
        assert!(sort(&[], &[SortKeySpec::desc(SortField::Rating)]).is_ok());
        let lenient = SortKeySpec::desc(SortField::Rating).with_nulls(Nulls::AsDefault);
        assert!(sort(&records, &[lenient]).is_ok());
    }

    #[test]
    fn test_inconsistent_keys() {
        let records = vec![record("A", Some(1.0), false)];
        let keys = [SortKeySpec::asc(SortField::Title), SortKeySpec::desc(SortField::Title)];
        assert_eq!(
            sort(&records, &keys),
            Err(SortError::InconsistentKeys(SortField::Title))
        );
    }

    #[test]
    fn test_parse_key_specs() {
        let keys = parse_key_specs("favorite:desc:boolean, rating:desc ,title").unwrap();
        assert_eq!(
            keys,
            vec![
                SortKeySpec::new(SortField::Favorite, SortDirection::Desc, ValueType::Boolean),
                SortKeySpec::new(SortField::Rating, SortDirection::Desc, ValueType::Numeric),
                SortKeySpec::new(SortField::Title, SortDirection::Asc, ValueType::String),
            ]
        );
    }

    #[test]
    fn test_parse_key_specs_errors() {
        assert_eq!(
            parse_key_specs("year:desc"),
            Err(SortError::UnknownField("year".to_string()))
        );
        assert!(matches!(
            parse_key_specs("title:sideways"),
            Err(SortError::InvalidKeySpec(_))
        ));
        assert!(matches!(
            parse_key_specs("title:asc:string:extra"),
            Err(SortError::InvalidKeySpec(_))
        ));
        assert!(matches!(
            parse_key_specs("rating:asc:date"),
            Err(SortError::InvalidKeySpec(_))
        ));
    }

    #[test]
    fn test_sort_lists() {
        let first = vec![record("B", None, false), record("A", None, false)];
        let empty: Vec<MediaRecord> = Vec::new();
        let lists = [first.as_slice(), empty.as_slice()];
        let sorted = sort_lists(&lists, |r| sort_by_title(r, SortDirection::Asc));
        assert_eq!(titles(&sorted[0]), vec!["A", "B"]);
        assert!(sorted[1].is_empty());
    }

    fn sample_collection() -> MediaCollection {
        MediaCollection {
            watched: vec![
                record("Zeta", Some(10.0), false),
                record("Alpha", None, false),
                record("Beta", Some(9.0), true),
            ],
            favorites: vec![record("Beta", Some(9.0), true), record("Aurora", Some(9.5), true)],
            to_watch: vec![record("Omega", None, false), record("Delta", None, false)],
        }
    }

    #[test]
    fn test_preset_title() {
        let sorted = SortPreset::Title.apply(&sample_collection());
        assert_eq!(titles(&sorted.watched), vec!["Alpha", "Beta", "Zeta"]);
        assert_eq!(titles(&sorted.favorites), vec!["Aurora", "Beta"]);
        assert_eq!(titles(&sorted.to_watch), vec!["Delta", "Omega"]);
    }

    #[test]
    fn test_preset_rating() {
        let sorted = SortPreset::Rating.apply(&sample_collection());
        assert_eq!(titles(&sorted.watched), vec!["Beta", "Zeta", "Alpha"]);
        assert_eq!(titles(&sorted.favorites), vec!["Aurora", "Beta"]);
        assert_eq!(titles(&sorted.to_watch), vec!["Delta", "Omega"]);
    }

    #[test]
    fn test_preset_favorite() {
        let sorted = SortPreset::Favorite.apply(&sample_collection());
        assert_eq!(titles(&sorted.watched), vec!["Beta", "Zeta", "Alpha"]);
        assert_eq!(titles(&sorted.favorites), vec!["Aurora", "Beta"]);
    }

    #[test]
    fn test_preset_none_keeps_order() {
        let collection = sample_collection();
        assert_eq!(SortPreset::None.apply(&collection), collection);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("Rating".parse::<SortPreset>().unwrap(), SortPreset::Rating);
        assert!("year".parse::<SortPreset>().is_err());
    }

    #[test]
    fn test_library_by_keys_keeps_unsortable_lists() {
        let library = MediaLibrary {
            movies: sample_collection(),
            tv_shows: MediaCollection::default(),
        };
        let keys = [SortKeySpec::desc(SortField::Rating)];

        let sorted = sort_library_by_keys(&library, &keys);

        assert_eq!(titles(&sorted.movies.watched), vec!["Zeta", "Beta", "Alpha"]);
        assert_eq!(titles(&sorted.movies.favorites), vec!["Aurora", "Beta"]);
        // no to-watch record has a rating
        assert_eq!(titles(&sorted.movies.to_watch), vec!["Omega", "Delta"]);
        assert!(sorted.tv_shows.is_empty());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arbitrary_record() -> impl Strategy<Value = MediaRecord> {
        (
            "[A-Za-z ]{1,12}",
            prop::option::of(0u32..=10u32),
            any::<bool>(),
        )
            .prop_map(|(title, rating, favorite)| {
                MediaRecord::new(title.clone(), title)
                    .with_rating(rating.map(|r| r as f64 / 2.0))
                    .with_favorite(favorite)
            })
    }

    proptest! {
        /// Sorting an already sorted list changes nothing
        #[test]
        fn property_sort_by_title_idempotent(records in prop::collection::vec(arbitrary_record(), 0..30)) {
            let once = sort_by_title(&records, SortDirection::Asc);
            let twice = sort_by_title(&once, SortDirection::Asc);
            prop_assert_eq!(once, twice);
        }

        /// Sorting permutes, never adds or drops records
        #[test]
        fn property_sort_is_a_permutation(records in prop::collection::vec(arbitrary_record(), 0..30)) {
            let sorted = sort_lenient(&records, &ranking_keys());
            prop_assert_eq!(sorted.len(), records.len());
            for record in &records {
                let expected = records.iter().filter(|r| *r == record).count();
                let found = sorted.iter().filter(|r| *r == record).count();
                prop_assert_eq!(expected, found);
            }
        }

        /// Adjacent records respect the comparator
        #[test]
        fn property_sorted_output_is_ordered(records in prop::collection::vec(arbitrary_record(), 0..30)) {
            let keys = ranking_keys();
            let sorted = sort_lenient(&records, &keys);
            for pair in sorted.windows(2) {
                prop_assert_ne!(compare_records(&pair[0], &pair[1], &keys), Ordering::Greater);
            }
        }
    }
}
