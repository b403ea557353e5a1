//! Naver land map crawler
//!
//! Warms up a browser session, then replays the map's JSON endpoints to
//! collect complexes, their detail and articles, and development plans for
//! one area.

pub mod config;
pub mod error;
pub mod models;
pub mod scrapers;

pub use config::CrawlConfig;
pub use error::{CrawlError, SessionAcquisitionError};
pub use models::{AreaCrawlResult, GeoBounds, PlanType, SessionIdentity};
pub use scrapers::{AreaCrawler, ChromeDriver};
