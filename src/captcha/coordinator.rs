//! Process-wide serialization of human CAPTCHA resolution
//!
//! Two locks, always taken in the same order:
//!
//! 1. `pause_lock` is acquired directly by the task that found a challenge
//!    and held for the whole episode, so a second challenged task queues here.
//! 2. `resolution_lock` is scoped around "bring the page to front, wait for
//!    the human, persist fresh state".
//!
//! Release is the reverse: resolution first, then pause, on every exit path.
//! Tasks that never meet a challenge never touch either lock, so unrelated
//! navigations keep running while a human is solving one.

use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};

use super::detector::CaptchaDetector;
use super::errors::CaptchaError;
use crate::browser::BrowserPage;
use crate::utils::{DEFAULT_CAPTCHA_POLL_INTERVAL, DEFAULT_CAPTCHA_TIMEOUT};

/// Grace period after a challenge clears, before the page is used again
const POST_RESOLUTION_SETTLE: Duration = Duration::from_millis(500);

pub struct CaptchaCoordinator {
    detector: CaptchaDetector,
    pause_lock: Mutex<()>,
    resolution_lock: Mutex<()>,
    poll_interval: Duration,
    timeout: Duration,
}

impl Default for CaptchaCoordinator {
    fn default() -> Self {
        Self::new(
            CaptchaDetector::default(),
            DEFAULT_CAPTCHA_POLL_INTERVAL,
            DEFAULT_CAPTCHA_TIMEOUT,
        )
    }
}

impl CaptchaCoordinator {
    #[must_use]
    pub fn new(detector: CaptchaDetector, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            detector,
            pause_lock: Mutex::new(()),
            resolution_lock: Mutex::new(()),
            poll_interval,
            timeout,
        }
    }

    #[must_use]
    pub fn detector(&self) -> &CaptchaDetector {
        &self.detector
    }

    /// Shorthand for the detector's probe
    pub async fn is_captcha_page<P: BrowserPage>(&self, page: &P) -> bool {
        self.detector.is_captcha_page(page).await
    }

    /// Poll until the page stops looking like a challenge
    ///
    /// # Errors
    /// [`CaptchaError::Timeout`] once the configured timeout has elapsed.
    pub async fn wait_for_resolution<P: BrowserPage>(&self, page: &P) -> Result<(), CaptchaError> {
        let start = Instant::now();
        loop {
            if start.elapsed() > self.timeout {
                return Err(CaptchaError::Timeout {
                    waited: self.timeout,
                });
            }

            if !self.detector.is_captcha_page(page).await {
                tokio::time::sleep(POST_RESOLUTION_SETTLE).await;
                return Ok(());
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Present a detected challenge to the operator and wait for it to clear
    ///
    /// `on_resolved` runs inside the resolution section once the challenge is
    /// gone (used to persist the engine's fresh session state).
    ///
    /// # Errors
    /// [`CaptchaError::Timeout`] if the operator did not solve it in time. Both
    /// locks are released before the error is returned.
    pub async fn resolve_challenge<P, F, Fut>(
        &self,
        page: &P,
        engine: &str,
        on_resolved: F,
    ) -> Result<(), CaptchaError>
    where
        P: BrowserPage,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let pause_guard = self.pause_lock.lock().await;
        info!("[{engine}] CAPTCHA detected, other challenged tasks are queued until it is resolved");

        let outcome = {
            let _resolution_guard = self.resolution_lock.lock().await;

            if let Err(e) = page.bring_to_front().await {
                warn!("[{engine}] Failed to bring challenge page to front: {e:#}");
            }
            info!("[{engine}] Waiting up to {:?} for the operator to solve the challenge", self.timeout);

            match self.wait_for_resolution(page).await {
                Ok(()) => {
                    info!("[{engine}] CAPTCHA resolved");
                    on_resolved().await;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        };

        drop(pause_guard);
        outcome
    }
}
