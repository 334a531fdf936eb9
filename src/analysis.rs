//! The rendering-and-extraction pipeline
//!
//! One analysis drives one page session through navigation, stabilization,
//! and the three post-stabilization reads (elements, screenshot, title).
//! The reads run concurrently against the settled page; all three are
//! read-only. Soft failures degrade the report and are recorded in its
//! metadata; hard failures propagate to the caller for classification.

use crate::browser::BrowserManager;
use crate::error::{Error, Result};
use crate::{
    extract, navigate, screenshot, stabilize, summary, AnalysisMetadata, AnalysisOptions,
    AnalysisReport, DegradedStage, TypographyElement, VIEWPORT,
};
use log::{info, warn};
use std::thread;
use std::time::Instant;

/// Placeholder when the page title cannot be read.
const UNTITLED_PAGE: &str = "Untitled Page";

/// Run one full analysis against the shared browser instance.
///
/// The page session is released on every exit path: it lives on this
/// function's stack and closes its tab when dropped.
pub fn run(
    manager: &BrowserManager,
    url: &str,
    options: &AnalysisOptions,
) -> Result<AnalysisReport> {
    let started = Instant::now();
    info!("analyzing {}", url);

    let session = manager.acquire()?;
    let mut degraded = Vec::new();

    let outcome = navigate::navigate(&session, url, options.timeout_ms)?;
    if !outcome.body_ready {
        degraded.push(DegradedStage::BodyReady);
    }

    if !stabilize::stabilize(&session) {
        degraded.push(DegradedStage::Stabilize);
    }

    let (elements_result, screenshot_result, title_result) = thread::scope(|scope| {
        let elements_job = scope.spawn(|| {
            extract::extract(&session, options.include_hidden, options.max_elements)
        });
        let screenshot_job = scope.spawn(|| screenshot::capture(&session));
        let title_job = scope.spawn(|| session.tab().get_title().ok());
        (
            elements_job.join(),
            screenshot_job.join(),
            title_job.join(),
        )
    });

    let elements = match elements_result {
        Ok(result) => result?,
        Err(_) => return Err(Error::Extraction("extraction task panicked".to_string())),
    };

    let screenshot = match screenshot_result {
        Ok(Some(data_url)) => data_url,
        _ => {
            degraded.push(DegradedStage::Screenshot);
            String::new()
        }
    };

    let page_title = match title_result {
        Ok(Some(title)) => title,
        _ => {
            warn!("page title read failed, using placeholder");
            degraded.push(DegradedStage::PageTitle);
            UNTITLED_PAGE.to_string()
        }
    };

    let report = assemble(url, elements, screenshot, page_title, degraded, &started);
    info!(
        "analysis completed: {} elements in {}ms",
        report.summary.total_elements, report.metadata.analysis_time_ms
    );
    Ok(report)
}

fn assemble(
    url: &str,
    elements: Vec<TypographyElement>,
    screenshot: String,
    page_title: String,
    degraded: Vec<DegradedStage>,
    started: &Instant,
) -> AnalysisReport {
    let summary = summary::summarize(&elements);
    AnalysisReport {
        url: url.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        screenshot,
        elements,
        summary,
        metadata: AnalysisMetadata {
            page_title,
            viewport: VIEWPORT,
            analysis_time_ms: started.elapsed().as_millis() as u64,
            degraded,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoxSpacing, ElementBox, TextStyles};

    fn sample_element() -> TypographyElement {
        TypographyElement {
            id: "element-0".into(),
            tag_name: "h1".into(),
            text: "Heading".into(),
            styles: TextStyles {
                font_family: "Georgia".into(),
                font_size: "32px".into(),
                color: "#111111".into(),
                ..Default::default()
            },
            position: ElementBox {
                x: 0,
                y: 0,
                width: 640,
                height: 48,
            },
            spacing: BoxSpacing::default(),
        }
    }

    #[test]
    fn test_degraded_screenshot_still_yields_full_report() {
        let started = Instant::now();
        let report = assemble(
            "https://example.com",
            vec![sample_element()],
            String::new(),
            UNTITLED_PAGE.to_string(),
            vec![DegradedStage::Screenshot, DegradedStage::PageTitle],
            &started,
        );

        assert_eq!(report.screenshot, "");
        assert_eq!(report.url, "https://example.com");
        assert_eq!(report.summary.total_elements, 1);
        assert_eq!(report.summary.unique_fonts, vec!["Georgia"]);
        assert_eq!(report.metadata.page_title, UNTITLED_PAGE);
        assert!(report
            .metadata
            .degraded
            .contains(&DegradedStage::Screenshot));
        assert!(!report.timestamp.is_empty());
    }

    #[test]
    fn test_clean_report_has_no_degraded_stages() {
        let started = Instant::now();
        let report = assemble(
            "https://example.com",
            vec![sample_element()],
            "data:image/png;base64,AAAA".to_string(),
            "Example Domain".to_string(),
            Vec::new(),
            &started,
        );
        assert!(report.metadata.degraded.is_empty());
        assert_eq!(report.metadata.viewport, VIEWPORT);
        assert!(report.screenshot.starts_with("data:image/png;base64,"));
    }
}
