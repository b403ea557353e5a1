//! Error types for land-scout
//!
//! Only session acquisition and setup problems are errors. Endpoint
//! failures are reported as [`crate::scrapers::land::FetchStatus`] values.

use thiserror::Error;

/// Failure to derive a usable identity from the browser warm-up visit
#[derive(Error, Debug)]
pub enum SessionAcquisitionError {
    /// Navigation failed, timed out, or the root document was not 2xx
    #[error("warm-up navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// Cookies could not be read from the browser context
    #[error("failed to read browser cookies: {0}")]
    Cookies(String),

    /// `navigator.userAgent` could not be evaluated
    #[error("failed to read browser user agent: {0}")]
    UserAgent(String),
}

/// Errors that abort a whole area crawl
#[derive(Error, Debug)]
pub enum CrawlError {
    /// Center or radius cannot describe a bounding box
    #[error("invalid crawl area: {0}")]
    InvalidArea(String),

    /// No session identity, so no endpoint may be called
    #[error("session acquisition failed: {0}")]
    Session(#[from] SessionAcquisitionError),

    /// HTTP client could not be built
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}
