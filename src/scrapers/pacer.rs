use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::time::Duration;
use tracing::debug;

/// Minimum-interval gate for one crawl stage
///
/// The first call to [`Pacer::ready`] passes immediately; each later call
/// waits until at least `interval` has elapsed since the previous one.
/// A zero interval disables pacing.
pub struct Pacer {
    name: &'static str,
    interval: Duration,
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl Pacer {
    pub fn new(name: &'static str, interval: Duration) -> Self {
        // One cell per period with no burst allowance gives strict spacing.
        let limiter = Quota::with_period(interval).map(RateLimiter::direct);
        Self {
            name,
            interval,
            limiter,
        }
    }

    pub async fn ready(&self) {
        if let Some(limiter) = &self.limiter {
            debug!("{} pacer: waiting for slot ({:?} interval)", self.name, self.interval);
            limiter.until_ready().await;
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_first_slot_is_immediate() {
        let pacer = Pacer::new("test", Duration::from_secs(60));
        let start = Instant::now();
        pacer.ready().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_slots_are_spaced() {
        let interval = Duration::from_millis(50);
        let pacer = Pacer::new("test", interval);

        let mut starts = Vec::new();
        for _ in 0..3 {
            pacer.ready().await;
            starts.push(Instant::now());
        }

        for pair in starts.windows(2) {
            // governor's clock and Instant can disagree by a hair
            assert!(pair[1] - pair[0] >= interval - Duration::from_millis(5));
        }
    }

    #[tokio::test]
    async fn test_zero_interval_disables_pacing() {
        let pacer = Pacer::new("test", Duration::ZERO);
        let start = Instant::now();
        for _ in 0..100 {
            pacer.ready().await;
        }
        assert!(start.elapsed() < Duration::from_millis(500));
        assert_eq!(pacer.interval(), Duration::ZERO);
    }
}
