use crate::config::CrawlConfig;
use crate::error::{CrawlError, SessionAcquisitionError};
use crate::models::{marker_id, AreaCrawlResult, GeoBounds, PlanType, SessionIdentity};
use crate::scrapers::land::EndpointFetcher;
use crate::scrapers::pacer::Pacer;
use crate::scrapers::session::SessionBridge;
use crate::scrapers::traits::BrowserDriver;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Four-stage crawl of one map area
///
/// Owns the browser driver and HTTP client for its whole life. A crawler
/// runs exactly one crawl: [`AreaCrawler::crawl_area`] consumes it and the
/// browser is closed before it returns, whatever the outcome.
pub struct AreaCrawler<D: BrowserDriver> {
    driver: D,
    fetcher: EndpointFetcher,
    config: CrawlConfig,
}

impl<D: BrowserDriver> AreaCrawler<D> {
    pub fn new(driver: D, config: CrawlConfig) -> Result<Self, CrawlError> {
        let fetcher = EndpointFetcher::from_config(&config)?;
        Ok(Self {
            driver,
            fetcher,
            config,
        })
    }

    /// Crawl the square of half-width `radius` degrees around the center.
    ///
    /// Only an invalid area or a failed session warm-up is an error; every
    /// endpoint failure just leaves its part of the result empty.
    pub async fn crawl_area(
        mut self,
        center_lat: f64,
        center_lon: f64,
        radius: f64,
    ) -> Result<AreaCrawlResult, CrawlError> {
        let outcome = self.run(center_lat, center_lon, radius).await;

        if let Err(e) = self.driver.close().await {
            warn!("Failed to release {}: {:#}", self.driver.driver_name(), e);
        }

        outcome
    }

    async fn run(
        &mut self,
        center_lat: f64,
        center_lon: f64,
        radius: f64,
    ) -> Result<AreaCrawlResult, CrawlError> {
        let bounds = GeoBounds::around(center_lat, center_lon, radius)?;
        let deadline = self.config.deadline().map(|budget| Instant::now() + budget);

        info!("Starting area crawl at ({}, {}), radius {}", center_lat, center_lon, radius);
        debug!("Bounds: {:?}", bounds);

        let identity = self.acquire_identity().await?;
        let mut result = AreaCrawlResult::new(center_lat, center_lon, radius, bounds);

        // Stage 1: complex markers
        if past(deadline) {
            return Ok(self.cut_short(result, "complex markers"));
        }
        let complexes = self
            .fetcher
            .complex_markers(&bounds, &self.config.markers, &identity)
            .await;
        let targets: Vec<String> = complexes
            .iter()
            .take(self.config.max_complexes)
            .filter_map(|complex| {
                let id = marker_id(complex);
                if id.is_none() {
                    debug!("Skipping complex without markerId");
                }
                id
            })
            .collect();
        result.complexes = complexes;

        // Stage 2: detail and articles for the first few complexes
        if past(deadline) {
            return Ok(self.cut_short(result, "complex details"));
        }
        let pacer = Pacer::new("complex", self.config.complex_interval());
        for complex_no in &targets {
            if past(deadline) {
                return Ok(self.cut_short(result, "complex details"));
            }
            pacer.ready().await;
            self.collect_complex(complex_no, &identity, &mut result).await;
        }

        // Stage 3: development plans
        let pacer = Pacer::new("plan", self.config.plan_interval());
        for plan in PlanType::ALL {
            if past(deadline) {
                return Ok(self.cut_short(result, "development plans"));
            }
            pacer.ready().await;
            let plans = self
                .fetcher
                .development_plans(&bounds, plan, self.config.markers.zoom, &identity)
                .await;
            result.development_plans.insert(plan, plans);
        }

        info!(
            "Area crawl finished: {} complexes, {} details, {} articles",
            result.complexes.len(),
            result.complex_details.len(),
            result.total_articles()
        );
        Ok(result)
    }

    async fn collect_complex(
        &self,
        complex_no: &str,
        identity: &SessionIdentity,
        result: &mut AreaCrawlResult,
    ) {
        if let Some(detail) = self.fetcher.complex_detail(complex_no, identity).await {
            result.complex_details.insert(complex_no.to_string(), detail);
        }

        let articles = self
            .fetcher
            .complex_articles(complex_no, &self.config.trade_type, identity)
            .await;
        result.articles.insert(complex_no.to_string(), articles);
    }

    async fn acquire_identity(&mut self) -> Result<SessionIdentity, SessionAcquisitionError> {
        let attempts = self.config.session_retries + 1;
        let mut attempt = 1;

        loop {
            let acquired = SessionBridge::new(&mut self.driver, self.config.settle_delay())
                .acquire_identity(&self.config.warmup_url)
                .await;

            match acquired {
                Ok(identity) => return Ok(identity),
                Err(e) if attempt < attempts => {
                    let backoff = retry_backoff(self.config.complex_interval(), attempt);
                    warn!(
                        "Session attempt {}/{} failed: {}; retrying in {:?}",
                        attempt, attempts, e, backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!("Session acquisition failed: {}", e);
                    return Err(e);
                }
            }
        }
    }

    fn cut_short(&self, mut result: AreaCrawlResult, stage: &str) -> AreaCrawlResult {
        warn!("Crawl deadline exceeded before {}; returning partial result", stage);
        result.deadline_exceeded = true;
        result
    }
}

fn past(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

/// Exponential backoff, doubling from `base` per failed attempt
fn retry_backoff(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)))
}
