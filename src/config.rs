//! Configuration module for the Filmow scraper
//!
//! Handles loading environment variables and application configuration.
//! Command line flags are merged on top by the binary.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::models::Language;
use crate::scraper::ScraperConfig;

pub const DEFAULT_BASE_URL: &str = "https://filmow.com";
pub const DEFAULT_WORKERS: usize = 5;
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Root URL of the site, without the `/usuario/...` path
    pub base_url: String,
    /// Profile to extract, prompted for when absent
    pub username: Option<String>,
    /// Pages fetched concurrently per listing
    pub workers: usize,
    /// Directory receiving the exported files
    pub output_dir: PathBuf,
    /// Language of labels and console messages
    pub language: Language,
    /// HTTP, retry and backoff settings
    pub scraper: ScraperConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: None,
            workers: DEFAULT_WORKERS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            language: Language::default(),
            scraper: ScraperConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// A `.env` file is read first when present. Unset variables take their
    /// defaults; malformed values are logged and replaced by the default.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let scraper_defaults = defaults.scraper.clone();

        let scraper = ScraperConfig {
            timeout_secs: parse_or(&lookup, "FILMOW_TIMEOUT_SECS", scraper_defaults.timeout_secs),
            max_retries: parse_or(&lookup, "FILMOW_MAX_RETRIES", scraper_defaults.max_retries),
            ..scraper_defaults
        };

        Self {
            base_url: non_empty(&lookup, "FILMOW_BASE_URL").unwrap_or(defaults.base_url),
            username: non_empty(&lookup, "FILMOW_USERNAME"),
            workers: parse_or(&lookup, "FILMOW_WORKERS", defaults.workers).max(1),
            output_dir: non_empty(&lookup, "FILMOW_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            language: parse_or(&lookup, "FILMOW_LANGUAGE", defaults.language),
            scraper,
        }
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match non_empty(lookup, key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid value {:?} for {}", raw, key);
            default
        }),
        None => default,
    }
}
