use anyhow::Result;
use async_trait::async_trait;

/// A cookie as seen by the browser context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserCookie {
    pub name: String,
    pub value: String,
}

impl BrowserCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Browser capability used for the session warm-up visit
///
/// Implementations own one browser page. `close` must be safe to call more
/// than once.
#[async_trait]
pub trait BrowserDriver: Send {
    /// Navigate to `url` and return once the page's network activity is idle.
    /// Fails on navigation errors, a non-2xx document, or timeout.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// All cookies scoped to the navigated context
    async fn cookies(&mut self) -> Result<Vec<BrowserCookie>>;

    /// `navigator.userAgent` as reported by the page
    async fn user_agent(&mut self) -> Result<String>;

    /// Release the browser resource
    async fn close(&mut self) -> Result<()>;

    /// Name used in log lines
    fn driver_name(&self) -> &'static str;
}
