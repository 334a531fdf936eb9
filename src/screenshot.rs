//! Full-page screenshot capture

use crate::browser::PageSession;
use crate::error::{Error, Result};
use base64::Engine as Base64Engine;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::Tab;
use log::warn;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct DocumentExtent {
    width: f64,
    height: f64,
}

/// Capture the entire scrollable page as a PNG data URL.
///
/// A missing screenshot degrades the report but must not abort the
/// analysis, so every failure is logged and `None` is returned.
pub fn capture(session: &PageSession) -> Option<String> {
    match capture_png(session.tab()) {
        Ok(bytes) => Some(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&bytes)
        )),
        Err(e) => {
            warn!("screenshot capture failed: {}", e);
            None
        }
    }
}

fn capture_png(tab: &Arc<Tab>) -> Result<Vec<u8>> {
    let extent = read_extent(tab)?;

    // Clip over the whole document, not just the viewport.
    let clip = Page::Viewport {
        x: 0.0,
        y: 0.0,
        width: extent.width,
        height: extent.height,
        scale: 1.0,
    };

    tab.capture_screenshot(
        Page::CaptureScreenshotFormatOption::Png,
        None,
        Some(clip),
        true,
    )
    .map_err(|e| Error::Render(e.to_string()))
}

fn read_extent(tab: &Arc<Tab>) -> Result<DocumentExtent> {
    let result = tab
        .evaluate(
            "JSON.stringify({ width: document.documentElement.scrollWidth, \
             height: document.documentElement.scrollHeight })",
            false,
        )
        .map_err(|e| Error::Render(e.to_string()))?;

    let payload = result
        .value
        .as_ref()
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::Render("no document extent returned".to_string()))?;

    serde_json::from_str(payload)
        .map_err(|e| Error::Render(format!("malformed document extent: {}", e)))
}
