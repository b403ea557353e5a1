//! Crawl configuration
//!
//! Every field has a default matching the vendor web app, so a TOML file only
//! needs the keys it wants to change.

use crate::scrapers::types::MarkerFilter;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://new.land.naver.com";
pub const DEFAULT_WARMUP_URL: &str =
    "https://new.land.naver.com/complexes?ms=37.3642443,127.1084674,16&a=APT:ABYG:JGC:PRE&e=RETAIL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Vendor API root; also the Referer sent with every call
    pub base_url: String,

    /// Page visited by the browser to obtain session cookies
    pub warmup_url: String,

    /// Launch Chrome without a window
    pub headless: bool,

    /// Per-request timeout for endpoint calls
    pub request_timeout_secs: u64,

    /// Upper bound on the warm-up navigation
    pub navigation_timeout_secs: u64,

    /// Quiet period with no new network activity that counts as idle
    pub idle_window_ms: u64,

    /// Extra wait after idle so deferred scripts can set cookies
    pub settle_delay_ms: u64,

    /// Minimum spacing between per-complex iterations
    pub complex_interval_ms: u64,

    /// Minimum spacing between development plan calls
    pub plan_interval_ms: u64,

    /// How many complexes get detail and article fetches
    pub max_complexes: usize,

    /// Extra identity acquisition attempts after the first failure
    pub session_retries: u32,

    /// Overall wall-clock budget for one crawl
    pub deadline_secs: Option<u64>,

    /// Article trade type: A1 (sale), B1 (jeonse), B2 (monthly rent)
    pub trade_type: String,

    pub markers: MarkerFilter,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            warmup_url: DEFAULT_WARMUP_URL.to_string(),
            headless: true,
            request_timeout_secs: 30,
            navigation_timeout_secs: 60,
            idle_window_ms: 500,
            settle_delay_ms: 2000,
            complex_interval_ms: 1000,
            plan_interval_ms: 500,
            max_complexes: 5,
            session_retries: 0,
            deadline_secs: None,
            trade_type: "A1".to_string(),
            markers: MarkerFilter::default(),
        }
    }
}

impl CrawlConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than 0");
        }
        if self.navigation_timeout_secs == 0 {
            bail!("navigation_timeout_secs must be greater than 0");
        }
        if self.markers.zoom == 0 {
            bail!("markers.zoom must be greater than 0");
        }
        Ok(())
    }

    /// `base_url` without a trailing slash
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn idle_window(&self) -> Duration {
        Duration::from_millis(self.idle_window_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn complex_interval(&self) -> Duration {
        Duration::from_millis(self.complex_interval_ms)
    }

    pub fn plan_interval(&self) -> Duration {
        Duration::from_millis(self.plan_interval_ms)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}
