//! Command line arguments
//!
//! Flags override the `FILMOW_*` environment configuration.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::export::ExportFormats;
use crate::models::{Language, MediaSelection};
use crate::sorter::{parse_key_specs, SortError, SortKeySpec, SortPreset};

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "warning", "error"];

/// Extract and export your Filmow.com media collections
#[derive(Parser, Debug)]
#[command(name = "filmow-scraper", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Filmow username (prompted for when absent)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Directory for output files
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output formats: json, xlsx, csv or all (comma-separated)
    #[arg(short, long, default_value = "all")]
    pub formats: String,

    /// Sorting preset: title, rating, favorite or none
    #[arg(short, long, default_value = "title")]
    pub sort: String,

    /// Explicit sort keys, e.g. "favorite:desc,rating:desc,title"
    #[arg(long, value_name = "KEYS")]
    pub sort_keys: Option<String>,

    /// Only scrape movies, skip TV shows
    #[arg(long, conflicts_with = "tv_only")]
    pub movies_only: bool,

    /// Only scrape TV shows, skip movies
    #[arg(long)]
    pub tv_only: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Number of pages fetched concurrently
    #[arg(long)]
    pub workers: Option<usize>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Interface language (pt or en)
    #[arg(short, long)]
    pub language: Option<String>,
}

/// How the extracted lists get ordered
#[derive(Debug, Clone, PartialEq)]
pub enum SortPlan {
    Preset(SortPreset),
    Keys(Vec<SortKeySpec>),
}

impl CliArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        let level = self.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(format!(
                "Invalid log level '{}'. Valid levels are: trace, debug, info, warn, error",
                self.log_level
            ));
        }

        if self.workers == Some(0) {
            return Err("workers must be greater than 0".to_string());
        }

        if self.timeout == Some(0) {
            return Err("timeout must be greater than 0".to_string());
        }

        if let Some(language) = &self.language {
            language.parse::<Language>()?;
        }

        self.export_formats()?;
        self.sort_plan().map_err(|e| e.to_string())?;

        Ok(())
    }

    /// Level directive for the log filter
    pub fn log_directive(&self) -> String {
        match self.log_level.to_lowercase().as_str() {
            "warning" => "warn".to_string(),
            other => other.to_string(),
        }
    }

    pub fn export_formats(&self) -> Result<ExportFormats, String> {
        ExportFormats::parse(&self.formats)
    }

    /// Explicit keys take precedence over the preset
    pub fn sort_plan(&self) -> Result<SortPlan, SortError> {
        match &self.sort_keys {
            Some(keys) => Ok(SortPlan::Keys(parse_key_specs(keys)?)),
            None => Ok(SortPlan::Preset(self.sort.parse()?)),
        }
    }

    pub fn selection(&self) -> MediaSelection {
        MediaSelection {
            movies: !self.tv_only,
            tv_shows: !self.movies_only,
        }
    }

    /// Override environment configuration with the flags that were given
    pub fn apply_to(&self, config: &mut Config) -> Result<(), String> {
        if let Some(username) = self.username.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            config.username = Some(username.to_string());
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(workers) = self.workers {
            config.workers = workers.max(1);
        }
        if let Some(timeout) = self.timeout {
            config.scraper.timeout_secs = timeout;
        }
        if let Some(language) = &self.language {
            config.language = language.parse()?;
        }
        Ok(())
    }
}
