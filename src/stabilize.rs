//! Content stabilization
//!
//! Synthetic scrolling through the full page height triggers lazy-loaded
//! content and animation-gated sections before extraction. Settling is a
//! best-effort enhancement: every internal error is logged and absorbed.

use crate::browser::PageSession;
use crate::error::{Error, Result};
use headless_chrome::Tab;
use log::warn;
use serde::Deserialize;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const SCROLL_STEP_PX: i64 = 800;
const SCROLL_DELAY_MS: u64 = 100;

/// Pause after returning to the top, giving triggered lazy content time to
/// finish rendering.
const SETTLE_DELAY_MS: u64 = 2_000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageHeights {
    scroll_height: i64,
    client_height: i64,
}

/// Scroll through the page and settle it. Returns `false` when settling
/// failed and the page may still be loading lazily; the analysis proceeds
/// either way.
pub fn stabilize(session: &PageSession) -> bool {
    match scroll_through(session.tab()) {
        Ok(()) => true,
        Err(e) => {
            warn!("content stabilization failed, continuing: {}", e);
            false
        }
    }
}

fn scroll_through(tab: &Arc<Tab>) -> Result<()> {
    let heights = read_heights(tab)?;
    if heights.scroll_height <= heights.client_height {
        return Ok(());
    }

    // The step bound is computed once up front so the traversal terminates
    // even if the height keeps growing while we scroll.
    let max_steps = (heights.scroll_height + SCROLL_STEP_PX - 1) / SCROLL_STEP_PX;
    let mut position: i64 = 0;

    for _ in 0..max_steps {
        if position >= heights.scroll_height {
            break;
        }
        scroll_to(tab, position)?;
        thread::sleep(Duration::from_millis(SCROLL_DELAY_MS));
        position += SCROLL_STEP_PX;
    }

    scroll_to(tab, 0)?;
    thread::sleep(Duration::from_millis(SETTLE_DELAY_MS));
    Ok(())
}

fn read_heights(tab: &Arc<Tab>) -> Result<PageHeights> {
    let result = tab
        .evaluate(
            "JSON.stringify({ scrollHeight: document.body.scrollHeight, \
             clientHeight: document.documentElement.clientHeight })",
            false,
        )
        .map_err(|e| Error::Render(e.to_string()))?;

    let payload = result
        .value
        .as_ref()
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::Render("no page metrics returned".to_string()))?;

    serde_json::from_str(payload)
        .map_err(|e| Error::Render(format!("malformed page metrics: {}", e)))
}

fn scroll_to(tab: &Arc<Tab>, position: i64) -> Result<()> {
    tab.evaluate(&format!("window.scrollTo(0, {})", position), false)
        .map_err(|e| Error::Render(e.to_string()))?;
    Ok(())
}
