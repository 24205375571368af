//! Inter-category crawl pacing.
//!
//! A full crawl pauses for a fixed delay between categories to bound the
//! request rate against the target site. The pause is an explicit policy
//! object so tests can disable it, and it is cancellable: an interrupt
//! during the pause abandons the rest of the run.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct CrawlPacing {
    delay: Duration,
}

impl CrawlPacing {
    /// Pacing with a fixed delay between categories.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No delay at all. The pause still observes cancellation.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleep for the configured delay, or return [`AppError::Interrupted`]
    /// if the token fires first (or already has).
    pub async fn pause(&self, cancel: &CancellationToken) -> Result<(), AppError> {
        if cancel.is_cancelled() {
            return Err(AppError::Interrupted);
        }
        if self.delay.is_zero() {
            return Ok(());
        }
        tokio::select! {
            () = tokio::time::sleep(self.delay) => Ok(()),
            () = cancel.cancelled() => Err(AppError::Interrupted),
        }
    }
}

impl Default for CrawlPacing {
    /// 1 second between categories, matching the site's tolerance.
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
