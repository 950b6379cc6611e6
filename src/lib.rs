//! Filmow Scraper Library
//!
//! This library extracts the movie and TV show lists of a Filmow.com profile
//! (watched, favorites, to watch), sorts them and exports them as JSON,
//! Excel and CSV.

pub mod cli;
pub mod collector;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod models;
pub mod parser;
pub mod scraper;
pub mod sorter;
