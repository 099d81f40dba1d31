//! Per-tab preparation applied before a tab's first navigation

use anyhow::{Context, Result};
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;

use crate::utils::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

/// Register `init_scripts` for every future document and pin a desktop viewport
///
/// Must run while the tab is still on `about:blank`; scripts only apply to
/// documents created after registration.
pub async fn enhance_page(page: &Page, init_scripts: &[&str]) -> Result<()> {
    for source in init_scripts {
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(*source))
            .await
            .context("Failed to register init script")?;
    }

    page.execute(
        SetDeviceMetricsOverrideParams::builder()
            .width(VIEWPORT_WIDTH)
            .height(VIEWPORT_HEIGHT)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(anyhow::Error::msg)?,
    )
    .await
    .context("Failed to set viewport")?;

    log::debug!("Prepared tab with {} init script(s)", init_scripts.len());
    Ok(())
}
