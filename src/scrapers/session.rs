use crate::error::SessionAcquisitionError;
use crate::models::SessionIdentity;
use crate::scrapers::traits::BrowserDriver;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

/// Turns a browser warm-up visit into a [`SessionIdentity`]
///
/// The bridge borrows the driver; closing it is the owner's job. It does
/// not retry.
pub struct SessionBridge<'a, D: BrowserDriver + ?Sized> {
    driver: &'a mut D,
    settle_delay: Duration,
}

impl<'a, D: BrowserDriver + ?Sized> SessionBridge<'a, D> {
    pub fn new(driver: &'a mut D, settle_delay: Duration) -> Self {
        Self {
            driver,
            settle_delay,
        }
    }

    pub async fn acquire_identity(
        &mut self,
        target_url: &str,
    ) -> Result<SessionIdentity, SessionAcquisitionError> {
        info!("Warming up session via {} at {}", self.driver.driver_name(), target_url);

        self.driver
            .navigate(target_url)
            .await
            .map_err(|e| SessionAcquisitionError::Navigation {
                url: target_url.to_string(),
                reason: format!("{:#}", e),
            })?;

        // Deferred scripts keep setting cookies after the network goes quiet
        if !self.settle_delay.is_zero() {
            debug!("Settling for {:?}", self.settle_delay);
            tokio::time::sleep(self.settle_delay).await;
        }

        let cookies: BTreeMap<String, String> = self
            .driver
            .cookies()
            .await
            .map_err(|e| SessionAcquisitionError::Cookies(format!("{:#}", e)))?
            .into_iter()
            .map(|cookie| (cookie.name, cookie.value))
            .collect();

        let user_agent = self
            .driver
            .user_agent()
            .await
            .map_err(|e| SessionAcquisitionError::UserAgent(format!("{:#}", e)))?;
        if user_agent.trim().is_empty() {
            return Err(SessionAcquisitionError::UserAgent(
                "browser reported an empty user agent".to_string(),
            ));
        }

        info!("Session ready ({} cookies)", cookies.len());
        Ok(SessionIdentity::new(cookies, user_agent))
    }
}
