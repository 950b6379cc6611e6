//! Global error handling module for the Filmow scraper
//!
//! This module provides a unified error type for everything that can abort a
//! run, with user-facing messages for the command line.

use thiserror::Error;

use crate::export::ExportError;
use crate::scraper::ScraperError;
use crate::sorter::SortError;

/// Application-wide error type that unifies all error sources
#[derive(Debug, Error)]
pub enum AppError {
    /// Scraping-related errors (network, HTTP, client setup)
    #[error("Scraping error: {0}")]
    Scraping(#[from] ScraperError),

    /// Invalid sort configuration
    #[error("Sort error: {0}")]
    Sort(#[from] SortError),

    /// Writing output files failed
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Validation errors (bad arguments)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Validation(_) | AppError::Sort(_) => 2,
            _ => 1,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),

            AppError::Scraping(scraper_err) => match scraper_err {
                ScraperError::NetworkError(msg) => format!("Failed to connect to server: {}", msg),
                ScraperError::HttpError(status) => {
                    format!("Server returned error status: {}", status)
                }
                ScraperError::ResponseError(msg) => format!("Failed to read response: {}", msg),
                ScraperError::ClientError(msg) => format!("Failed to set up HTTP client: {}", msg),
            },

            AppError::Sort(sort_err) => format!("Invalid sort configuration: {}", sort_err),

            AppError::Export(export_err) => match export_err {
                ExportError::Io(e) => format!("Failed to write output files: {}", e),
                ExportError::Json(e) => format!("Failed to write JSON: {}", e),
                ExportError::Csv(e) => format!("Failed to write CSV: {}", e),
                ExportError::Xlsx(e) => format!("Failed to write Excel file: {}", e),
            },
        }
    }
}

/// Result type alias for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;
