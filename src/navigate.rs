//! Page navigation with fallback strategies
//!
//! Pages with slow background network chatter (ads, analytics) must not be
//! treated as unreachable when the document itself loaded, so navigation
//! runs a strict strategy first and falls back to a lenient one before
//! giving up.

use crate::browser::PageSession;
use crate::error::{Error, Result};
use headless_chrome::Tab;
use log::{debug, warn};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Bound on the secondary body-readiness wait.
const BODY_WAIT_MS: u64 = 3_000;

/// Grace added to the caller's timeout for the lenient fallback strategy.
const DOM_READY_GRACE_MS: u64 = 5_000;

const READY_POLL_INTERVAL_MS: u64 = 250;

/// Outcome of a successful navigation.
#[derive(Debug, Clone, Copy)]
pub struct NavigationOutcome {
    /// Whether the secondary body-readiness wait succeeded. A `false` here
    /// degrades the analysis but does not fail it.
    pub body_ready: bool,
}

/// Drive the session's tab to `url`.
///
/// Strategy 1 waits for the page's load event under the caller's timeout;
/// on any failure strategy 2 re-navigates and only waits for initial DOM
/// construction under `timeout_ms` plus a fixed grace. The last error is
/// propagated only when both strategies fail.
pub fn navigate(session: &PageSession, url: &str, timeout_ms: u64) -> Result<NavigationOutcome> {
    let tab = session.tab();

    if let Err(first) = full_load(tab, url, timeout_ms) {
        warn!("full-load navigation failed ({}), retrying with DOM-ready strategy", first);
        dom_ready(tab, url, timeout_ms + DOM_READY_GRACE_MS)?;
    }

    // Minimal readiness signal; failure is non-fatal.
    let body_ready = match tab
        .wait_for_element_with_custom_timeout("body", Duration::from_millis(BODY_WAIT_MS))
    {
        Ok(_) => true,
        Err(e) => {
            warn!("body readiness wait failed, continuing: {}", e);
            false
        }
    };

    Ok(NavigationOutcome { body_ready })
}

/// Strict strategy: navigate and wait for the load event, which only fires
/// once network activity has quieted.
fn full_load(tab: &Arc<Tab>, url: &str, timeout_ms: u64) -> Result<()> {
    tab.set_default_timeout(Duration::from_millis(timeout_ms));
    tab.navigate_to(url)
        .map_err(|e| Error::Navigation(e.to_string()))?;
    tab.wait_until_navigated()
        .map_err(|e| Error::Navigation(e.to_string()))?;
    Ok(())
}

/// Lenient strategy: re-navigate and poll `document.readyState` until the
/// DOM has been constructed, bounded by `deadline_ms`.
fn dom_ready(tab: &Arc<Tab>, url: &str, deadline_ms: u64) -> Result<()> {
    let deadline = Instant::now() + Duration::from_millis(deadline_ms);

    tab.navigate_to(url)
        .map_err(|e| Error::Navigation(e.to_string()))?;

    loop {
        match tab.evaluate("document.readyState", false) {
            Ok(result) => {
                let state = result.value.as_ref().and_then(|v| v.as_str());
                if matches!(state, Some(s) if s != "loading") {
                    return Ok(());
                }
            }
            // The probe can race document teardown between navigations.
            Err(e) => debug!("readyState probe failed: {}", e),
        }

        if Instant::now() >= deadline {
            return Err(Error::Timeout(deadline_ms));
        }
        thread::sleep(Duration::from_millis(READY_POLL_INTERVAL_MS));
    }
}
