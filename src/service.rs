//! Async analysis facade
//!
//! `headless_chrome` is a blocking API, so each analysis runs on its own
//! worker thread and reports back over a oneshot channel. Independent
//! requests therefore run concurrently, each against its own page session
//! drawn from the one shared browser instance.

use crate::analysis;
use crate::browser::BrowserManager;
use crate::error::{Error, Result};
use crate::{AnalysisOptions, AnalysisReport};
use std::sync::Arc;
use std::thread;
use tokio::sync::oneshot;

/// A cloneable handle for running analyses from async contexts.
#[derive(Clone)]
pub struct Analyzer {
    manager: Arc<BrowserManager>,
}

impl Analyzer {
    /// An analyzer backed by the process-wide browser instance.
    pub fn new() -> Self {
        Self {
            manager: BrowserManager::shared(),
        }
    }

    /// An analyzer backed by a dedicated manager. Useful for tests that
    /// must not share browser state with the rest of the process.
    pub fn with_manager(manager: Arc<BrowserManager>) -> Self {
        Self { manager }
    }

    /// Analyze one page.
    pub async fn analyze(&self, url: &str, options: AnalysisOptions) -> Result<AnalysisReport> {
        let (tx, rx) = oneshot::channel();
        let manager = self.manager.clone();
        let url = url.to_string();

        thread::spawn(move || {
            let _ = tx.send(analysis::run(&manager, &url, &options));
        });

        rx.await
            .map_err(|e| Error::Other(format!("analysis worker canceled: {}", e)))?
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}
