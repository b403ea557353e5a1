use crate::config::CrawlConfig;
use crate::scrapers::traits::{BrowserCookie, BrowserDriver};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const IDLE_POLL: Duration = Duration::from_millis(100);

// Chrome stops buffering resource entries at 250, so the count is kept by an
// observer that sees every entry whether or not the buffer has room.
const RESOURCE_COUNT_JS: &str = r#"
(() => {
    if (window.__landScoutResources === undefined) {
        performance.setResourceTimingBufferSize(100000);
        window.__landScoutResources = performance.getEntriesByType('resource').length;
        new PerformanceObserver((list) => {
            window.__landScoutResources += list.getEntries().length;
        }).observe({ type: 'resource' });
    }
    return window.__landScoutResources;
})()
"#;

const DOCUMENT_STATUS_JS: &str = r#"
(() => {
    const nav = performance.getEntriesByType('navigation')[0];
    return nav && nav.responseStatus ? nav.responseStatus : 0;
})()
"#;

/// Headless Chrome driver for the session warm-up
///
/// `headless_chrome` is blocking, so every call runs on the blocking pool.
/// Chrome is shut down by `close`, or when the driver is dropped.
pub struct ChromeDriver {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
    idle_window: Duration,
    navigation_timeout: Duration,
}

impl ChromeDriver {
    /// Launch Chrome and open the tab used for the warm-up visit
    pub fn launch(config: &CrawlConfig) -> Result<Self> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .idle_browser_timeout(config.navigation_timeout() * 2)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;
        tab.set_default_timeout(config.navigation_timeout());

        Ok(Self {
            browser: Some(browser),
            tab: Some(tab),
            idle_window: config.idle_window(),
            navigation_timeout: config.navigation_timeout(),
        })
    }

    async fn on_tab<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Tab) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let tab = self.tab.clone().context("Browser is already closed")?;
        tokio::task::spawn_blocking(move || op(&tab))
            .await
            .context("Browser task panicked")?
    }
}

/// Tracks how long the resource count has stayed unchanged
struct IdleTracker {
    window: Duration,
    last_count: Option<u64>,
    quiet_since: Instant,
}

impl IdleTracker {
    fn new(window: Duration, now: Instant) -> Self {
        Self {
            window,
            last_count: None,
            quiet_since: now,
        }
    }

    /// Record a sample; true once the count has held still for the window
    fn observe(&mut self, count: Option<u64>, now: Instant) -> bool {
        if count != self.last_count {
            self.last_count = count;
            self.quiet_since = now;
            return false;
        }
        now.duration_since(self.quiet_since) >= self.window
    }
}

/// Poll the resource count until it stops growing for `window`
fn wait_for_network_idle(tab: &Tab, window: Duration, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    let mut tracker = IdleTracker::new(window, Instant::now());

    loop {
        let count = tab
            .evaluate(RESOURCE_COUNT_JS, false)?
            .value
            .and_then(|value| value.as_u64());

        if tracker.observe(count, Instant::now()) {
            debug!("Network idle after {:?} quiet ({:?} resources)", window, count);
            return Ok(());
        }

        if Instant::now() >= deadline {
            bail!("network did not go idle within {:?}", timeout);
        }
        thread::sleep(IDLE_POLL);
    }
}

#[async_trait]
impl BrowserDriver for ChromeDriver {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let url = url.to_string();
        let window = self.idle_window;
        let timeout = self.navigation_timeout;

        self.on_tab(move |tab| {
            tab.navigate_to(&url)
                .with_context(|| format!("Failed to navigate to {}", url))?;
            tab.wait_until_navigated()
                .context("Page did not finish loading")?;

            // 0 means the browser did not expose a status; accept it
            let status = tab
                .evaluate(DOCUMENT_STATUS_JS, false)?
                .value
                .and_then(|value| value.as_u64())
                .unwrap_or(0);
            if status != 0 && !(200..300).contains(&status) {
                bail!("root document returned HTTP {}", status);
            }

            wait_for_network_idle(tab, window, timeout)
        })
        .await
    }

    async fn cookies(&mut self) -> Result<Vec<BrowserCookie>> {
        self.on_tab(|tab| {
            let cookies = tab
                .get_cookies()
                .context("Failed to read cookies")?
                .into_iter()
                .map(|cookie| BrowserCookie::new(cookie.name, cookie.value))
                .collect();
            Ok(cookies)
        })
        .await
    }

    async fn user_agent(&mut self) -> Result<String> {
        self.on_tab(|tab| {
            let result = tab.evaluate("navigator.userAgent", false)?;
            match result.value {
                Some(value) => Ok(value.as_str().unwrap_or_default().to_string()),
                None => bail!("navigator.userAgent evaluated to nothing"),
            }
        })
        .await
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(tab) = self.tab.take() {
            let closed = tokio::task::spawn_blocking(move || tab.close(false)).await;
            match closed {
                Ok(Ok(_)) => debug!("Browser tab closed"),
                Ok(Err(e)) => warn!("Failed to close browser tab: {}", e),
                Err(e) => warn!("Browser close task panicked: {}", e),
            }
        }
        if self.browser.take().is_some() {
            info!("Headless Chrome released");
        }
        Ok(())
    }

    fn driver_name(&self) -> &'static str {
        "headless Chrome"
    }
}
