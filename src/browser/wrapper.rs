//! Browser lifecycle ownership
//!
//! Owns the chromiumoxide `Browser`, its CDP handler task and the temporary
//! profile directory. The handler must be aborted when the browser goes away
//! or it keeps polling a dead connection.

use anyhow::{Context, Result};
use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::browser::{Bounds, GetWindowForTargetParams, SetWindowBoundsParams};
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::utils::{OFFSCREEN_HEIGHT, OFFSCREEN_WIDTH, OFFSCREEN_X, OFFSCREEN_Y};

pub struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    profile_dir: Option<PathBuf>,
}

impl BrowserWrapper {
    pub(crate) fn new(browser: Browser, handler: JoinHandle<()>, profile_dir: PathBuf) -> Self {
        Self {
            browser,
            handler,
            profile_dir: Some(profile_dir),
        }
    }

    #[must_use]
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Open a blank tab that stays open for the whole run
    ///
    /// In headed mode it keeps the window alive while search tabs come and go,
    /// and is the handle used to move the window off-screen.
    pub async fn open_keepalive_page(&self) -> Result<Page> {
        self.browser
            .new_page("about:blank")
            .await
            .context("Failed to open keep-alive page")
    }

    /// Close Chrome, stop the handler and remove the profile directory
    pub async fn shutdown(mut self) -> Result<()> {
        info!("Shutting down browser");
        if let Err(e) = self.browser.close().await {
            warn!("Browser close command failed: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Waiting for browser exit failed: {e}");
        }
        self.handler.abort();
        self.remove_profile_dir();
        Ok(())
    }

    fn remove_profile_dir(&mut self) {
        if let Some(path) = self.profile_dir.take() {
            debug!("Removing browser profile {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!("Failed to remove browser profile {}: {e}", path.display());
            }
        }
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        self.handler.abort();
        if self.profile_dir.is_some() {
            warn!("BrowserWrapper dropped without shutdown(); cleaning up in Drop");
            self.remove_profile_dir();
        }
    }
}

/// Move the window hosting `page` far off-screen
///
/// Headed mode keeps real rendering and an operator-reachable window for
/// CAPTCHA solving without covering the desktop. Failures are logged only.
pub async fn move_window_offscreen(page: &Page) {
    let window = match page.execute(GetWindowForTargetParams::default()).await {
        Ok(resp) => resp.result.window_id,
        Err(e) => {
            warn!("Could not resolve browser window: {e}");
            return;
        }
    };

    let bounds = Bounds {
        left: Some(OFFSCREEN_X),
        top: Some(OFFSCREEN_Y),
        width: Some(OFFSCREEN_WIDTH),
        height: Some(OFFSCREEN_HEIGHT),
        ..Default::default()
    };
    match page.execute(SetWindowBoundsParams::new(window, bounds)).await {
        Ok(_) => info!("Moved browser window off-screen to ({OFFSCREEN_X}, {OFFSCREEN_Y})"),
        Err(e) => warn!("Failed to move browser window off-screen: {e}"),
    }
}
