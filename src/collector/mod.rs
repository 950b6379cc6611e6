//! Collection orchestration
//!
//! Resolves how many pages a listing has, fetches them with bounded
//! concurrency and aggregates the parsed records. Favorites are collected
//! before the watched list so that watched records can be flagged.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::constants::endpoints;
use crate::models::{MediaCategory, MediaCollection, MediaLibrary, MediaRecord, MediaSelection, MediaType};
use crate::parser::{parse_media_page, resolve_page_count, PageCountError};
use crate::scraper::{HttpTransport, Scraper, ScraperError, Transport};

/// Errors from the strict page count lookup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectError {
    #[error("Scraping error: {0}")]
    Scraping(#[from] ScraperError),

    #[error(transparent)]
    PageCount(#[from] PageCountError),
}

/// Progress of [`Collector::collect_all`], reported per media type
#[derive(Debug, Clone, Copy)]
pub enum CollectProgress<'a> {
    Started(MediaType),
    Finished(MediaType, &'a MediaCollection),
}

/// Extracts every listing of one user's profile
pub struct Collector<T = HttpTransport> {
    scraper: Scraper<T>,
    base_url: String,
    username: String,
    workers: usize,
    show_progress: bool,
}

impl Collector<HttpTransport> {
    /// Build a collector talking to the network
    pub fn from_config(config: &Config, username: &str) -> Result<Self, ScraperError> {
        let scraper = Scraper::new(config.scraper.clone())?;
        Ok(Collector::new(scraper, &config.base_url, username).with_workers(config.workers))
    }
}

impl<T: Transport> Collector<T> {
    pub fn new(scraper: Scraper<T>, base_url: &str, username: &str) -> Self {
        Self {
            scraper,
            base_url: base_url.to_string(),
            username: username.to_string(),
            workers: 1,
            show_progress: false,
        }
    }

    /// Maximum number of pages fetched at the same time (at least 1)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Draw one progress bar per listing on stderr
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn scraper(&self) -> &Scraper<T> {
        &self.scraper
    }

    fn listing_url(&self, media_type: MediaType, category: MediaCategory, page: u32) -> String {
        endpoints::listing(&self.base_url, &self.username, media_type, category, page)
    }

    /// Number of pages of a listing, failing on network errors and ambiguity
    pub async fn try_page_count(&self, media_type: MediaType, category: MediaCategory) -> Result<u32, CollectError> {
        let url = self.listing_url(media_type, category, 1);
        let result = self.scraper.fetch_page(&url).await?;
        Ok(resolve_page_count(&result.html)?)
    }

    /// Number of pages of a listing, assuming one page on any failure
    pub async fn page_count(&self, media_type: MediaType, category: MediaCategory) -> u32 {
        match self.try_page_count(media_type, category).await {
            Ok(count) => count,
            Err(e) => {
                error!("Error getting page count for {}/{}: {}", media_type, category, e);
                1
            }
        }
    }

    /// Fetch and parse one page of a listing
    ///
    /// A page that cannot be fetched contributes no records.
    pub async fn fetch_page(&self, media_type: MediaType, category: MediaCategory, page: u32) -> Vec<MediaRecord> {
        let url = self.listing_url(media_type, category, page);

        match self.scraper.fetch_page(&url).await {
            Ok(result) => {
                let records = parse_media_page(&result.html, category);
                debug!(
                    "Parsed {} items from page {} of {}/{}",
                    records.len(),
                    page,
                    media_type,
                    category
                );
                records
            }
            Err(e) => {
                error!("Error fetching page {} for {}/{}: {}", page, media_type, category, e);
                Vec::new()
            }
        }
    }

    /// Every record of one listing, in no particular order
    pub async fn collect_category(&self, media_type: MediaType, category: MediaCategory) -> Vec<MediaRecord> {
        let page_count = self.page_count(media_type, category).await;
        info!(
            "Extracting {} (category {}). {} pages detected.",
            media_type, category, page_count
        );

        let bar = self.progress_bar(media_type, category, page_count);
        let records = self.collect_pages(media_type, category, page_count, &bar).await;
        info!("Collected {} items from {}/{}", records.len(), media_type, category);
        records
    }

    /// Fetch pages `1..=page_count`, advancing `bar` as each one completes
    async fn collect_pages(
        &self,
        media_type: MediaType,
        category: MediaCategory,
        page_count: u32,
        bar: &ProgressBar,
    ) -> Vec<MediaRecord> {
        let pages: Vec<Vec<MediaRecord>> = stream::iter(1..=page_count)
            .map(|page| self.fetch_page(media_type, category, page))
            .buffer_unordered(self.workers)
            .inspect(|_| bar.inc(1))
            .collect()
            .await;
        bar.finish();

        pages.into_iter().flatten().collect()
    }

    fn progress_bar(&self, media_type: MediaType, category: MediaCategory, page_count: u32) -> ProgressBar {
        let bar = if self.show_progress {
            ProgressBar::new(u64::from(page_count))
        } else {
            let bar = ProgressBar::hidden();
            bar.set_length(u64::from(page_count));
            bar
        };

        if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}") {
            bar.set_style(style);
        }
        bar.set_message(format!("{}/{}", media_type, category));
        bar
    }

    /// Watched, favorite and to-watch lists of one media type
    ///
    /// Watched records are flagged as favorites by title match against the
    /// favorites list, which is therefore collected first.
    pub async fn collect(&self, media_type: MediaType) -> MediaCollection {
        let favorites = self.collect_category(media_type, MediaCategory::Favorites).await;
        let watched = self.collect_category(media_type, MediaCategory::Watched).await;
        let watched = mark_favorites(watched, &favorites);
        let to_watch = self.collect_category(media_type, MediaCategory::ToWatch).await;

        MediaCollection {
            watched,
            favorites,
            to_watch,
        }
    }

    /// Collections for every selected media type
    ///
    /// `on_progress` is called before and after each media type.
    pub async fn collect_all<F>(&self, selection: MediaSelection, mut on_progress: F) -> MediaLibrary
    where
        F: FnMut(CollectProgress<'_>),
    {
        let mut library = MediaLibrary::default();

        for media_type in MediaType::ALL {
            if !selection.includes(media_type) {
                continue;
            }
            info!("Fetching {}...", media_type);
            on_progress(CollectProgress::Started(media_type));
            let collection = self.collect(media_type).await;
            on_progress(CollectProgress::Finished(media_type, &collection));
            *library.get_mut(media_type) = collection;
        }

        library
    }
}

/// Rebuild watched records with their favorite flag taken from `favorites`
pub fn mark_favorites(watched: Vec<MediaRecord>, favorites: &[MediaRecord]) -> Vec<MediaRecord> {
    let favorite_titles: HashSet<(&str, &str)> = favorites.iter().map(MediaRecord::title_pair).collect();

    watched
        .into_iter()
        .map(|record| {
            let is_favorite = favorite_titles.contains(&record.title_pair());
            record.with_favorite(is_favorite)
        })
        .collect()
}
