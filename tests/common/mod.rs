//! Common test utilities

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use land_scout::scrapers::{BrowserCookie, BrowserDriver};
use land_scout::CrawlConfig;
use std::sync::{Arc, Mutex};

pub const TEST_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) LandScoutTest/1.0";

/// What the fake browser saw during a crawl
#[derive(Debug, Default)]
pub struct DriverLog {
    pub navigations: Vec<String>,
    pub closes: usize,
}

/// Browser stand-in that hands out a fixed identity
pub struct FakeDriver {
    log: Arc<Mutex<DriverLog>>,
    failing_navigations: usize,
}

impl FakeDriver {
    pub fn new() -> (Self, Arc<Mutex<DriverLog>>) {
        Self::failing(0)
    }

    /// Driver whose first `count` navigations fail
    pub fn failing(count: usize) -> (Self, Arc<Mutex<DriverLog>>) {
        let log = Arc::new(Mutex::new(DriverLog::default()));
        let driver = Self {
            log: Arc::clone(&log),
            failing_navigations: count,
        };
        (driver, log)
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.log.lock().unwrap().navigations.push(url.to_string());
        if self.failing_navigations > 0 {
            self.failing_navigations -= 1;
            return Err(anyhow!("root document returned HTTP 503"));
        }
        Ok(())
    }

    async fn cookies(&mut self) -> Result<Vec<BrowserCookie>> {
        Ok(vec![
            BrowserCookie::new("NNB", "test-nnb"),
            BrowserCookie::new("REALESTATE", "test-session"),
        ])
    }

    async fn user_agent(&mut self) -> Result<String> {
        Ok(TEST_USER_AGENT.to_string())
    }

    async fn close(&mut self) -> Result<()> {
        self.log.lock().unwrap().closes += 1;
        Ok(())
    }

    fn driver_name(&self) -> &'static str {
        "fake browser"
    }
}

/// Config pointing at a mock server, with pacing and settle delays off
pub fn test_config(base_url: &str) -> CrawlConfig {
    CrawlConfig {
        base_url: base_url.to_string(),
        warmup_url: format!("{}/complexes", base_url),
        request_timeout_secs: 5,
        settle_delay_ms: 0,
        complex_interval_ms: 0,
        plan_interval_ms: 0,
        ..Default::default()
    }
}
