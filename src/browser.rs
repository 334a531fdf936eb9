//! Browser lifecycle management and page sessions
//!
//! One headless Chrome instance is shared process-wide: created lazily on
//! the first analysis, reused while it stays connected, and relaunched on a
//! detected disconnect. Launching is serialized behind the manager's lock so
//! concurrent cold starts cannot race two instances into existence.

use crate::error::{Error, Result};
use crate::VIEWPORT;
use headless_chrome::browser::tab::{RequestInterceptor, RequestPausedDecision};
use headless_chrome::protocol::cdp::Fetch::events::RequestPausedEvent;
use headless_chrome::protocol::cdp::Fetch::FailRequest;
use headless_chrome::protocol::cdp::Network::{ErrorReason, ResourceType};
use headless_chrome::{Browser, LaunchOptions, Tab};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;

/// Desktop Chrome user agent presented to analyzed pages.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// How long an idle shared instance may sit between analyses before the
/// backend reaps it. Kept high: the instance is meant to be long-lived.
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(600);

static SHARED: OnceLock<Arc<BrowserManager>> = OnceLock::new();

/// Owns the shared browser instance.
///
/// The slot is explicit process-wide state: `None` until the first
/// `acquire`, replaced only when the held instance stops answering, and
/// cleared by `shutdown`. Every mutation happens under the one lock.
pub struct BrowserManager {
    browser: Mutex<Option<Browser>>,
}

impl BrowserManager {
    pub fn new() -> Self {
        Self {
            browser: Mutex::new(None),
        }
    }

    /// The process-wide manager used by [`crate::Analyzer`].
    pub fn shared() -> Arc<BrowserManager> {
        SHARED.get_or_init(|| Arc::new(BrowserManager::new())).clone()
    }

    /// Open a [`PageSession`] on a live browser instance, launching or
    /// relaunching the instance if needed.
    pub fn acquire(&self) -> Result<PageSession> {
        Ok(PageSession::new(self.checkout_tab()?))
    }

    /// Hand out a tab on a connected instance. The lock is held for the
    /// whole checkout, so concurrent cold starts cannot race-launch two
    /// instances; per-session configuration happens after release.
    fn checkout_tab(&self) -> Result<Arc<Tab>> {
        let mut slot = self.browser.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(browser) = slot.as_ref() {
            if browser.get_version().is_ok() {
                match browser.new_tab() {
                    Ok(tab) => return Ok(tab),
                    Err(e) => warn!("browser instance went stale: {}", e),
                }
            } else {
                info!("browser instance disconnected, relaunching");
            }
        }

        let browser = Self::launch()?;
        let tab = browser
            .new_tab()
            .map_err(|e| Error::Session(format!("failed to create tab: {}", e)))?;
        *slot = Some(browser);

        Ok(tab)
    }

    fn launch() -> Result<Browser> {
        info!(
            "launching browser ({}x{})",
            VIEWPORT.width, VIEWPORT.height
        );

        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .window_size(Some((VIEWPORT.width, VIEWPORT.height)))
            .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
            .args(vec![
                OsStr::new("--disable-setuid-sandbox"),
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-background-timer-throttling"),
                OsStr::new("--disable-backgrounding-occluded-windows"),
                OsStr::new("--disable-renderer-backgrounding"),
                OsStr::new("--no-first-run"),
                OsStr::new("--disable-extensions"),
                OsStr::new("--hide-scrollbars"),
                OsStr::new("--blink-settings=imagesEnabled=false"),
            ])
            .build()
            .map_err(|e| Error::Launch(format!("invalid launch options: {}", e)))?;

        Browser::new(launch_options).map_err(|e| Error::Launch(e.to_string()))
    }

    /// Drop the held instance. Normal operation never calls this; it exists
    /// for explicit teardown at process exit.
    pub fn shutdown(&self) {
        let mut slot = self.browser.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            info!("browser instance closed");
        }
    }
}

impl Default for BrowserManager {
    fn default() -> Self {
        Self::new()
    }
}

/// One rendering context (tab) used for exactly one analysis.
///
/// Dropping the session closes the tab, so release happens on every exit
/// path of the owning request.
pub struct PageSession {
    tab: Arc<Tab>,
}

impl PageSession {
    fn new(tab: Arc<Tab>) -> Self {
        let session = Self { tab };
        session.configure();
        session
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Apply the page hardening the analysis expects: a desktop identity and
    /// network-layer blocking of image/media/font fetches and tracker URLs.
    /// Setup failures are logged and tolerated; they slow the page down but
    /// do not invalidate the analysis.
    fn configure(&self) {
        if let Err(e) = self
            .tab
            .set_user_agent(USER_AGENT, Some("en-US,en;q=0.9"), None)
        {
            warn!("failed to set user agent: {}", e);
        }

        let headers: HashMap<&str, &str> = HashMap::from([
            (
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
            ("Cache-Control", "no-cache"),
        ]);
        if let Err(e) = self.tab.set_extra_http_headers(headers) {
            warn!("failed to set extra headers: {}", e);
        }

        let _ = self
            .tab
            .enable_fetch(None, Some(false))
            .map_err(|e| warn!("failed to enable fetch domain: {}", e))
            .ok();

        let interceptor: Arc<dyn RequestInterceptor + Send + Sync> =
            Arc::new(|_transport, _session_id, event: RequestPausedEvent| {
                if should_block(&event) {
                    RequestPausedDecision::Fail(FailRequest {
                        request_id: event.params.request_id.clone(),
                        error_reason: ErrorReason::BlockedByClient,
                    })
                } else {
                    RequestPausedDecision::Continue(None)
                }
            });
        let _ = self
            .tab
            .enable_request_interception(interceptor)
            .map_err(|e| warn!("failed to enable request interception: {}", e))
            .ok();
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(true) {
            debug!("tab close failed: {}", e);
        }
    }
}

/// Heavy or tracking resources are failed at the network layer; the
/// analysis only needs markup, styles, and scripts.
fn should_block(event: &RequestPausedEvent) -> bool {
    if matches!(
        event.params.resource_Type,
        ResourceType::Image | ResourceType::Media | ResourceType::Font
    ) {
        return true;
    }
    let url = &event.params.request.url;
    url.contains("analytics") || url.contains("tracking")
}
