//! Typolens
//!
//! A typography analysis engine for rendered web pages. Typolens drives a
//! shared headless Chrome instance over the DevTools protocol, settles the
//! page (scroll-triggered lazy content), then extracts the computed
//! typography of every visible text-bearing element together with a
//! full-page screenshot and a deduplicated style summary.
//!
//! # Example
//!
//! ```no_run
//! use typolens::{AnalysisOptions, Analyzer};
//!
//! # #[tokio::main]
//! # async fn main() -> typolens::Result<()> {
//! let analyzer = Analyzer::new();
//! let report = analyzer
//!     .analyze("https://example.com", AnalysisOptions::default())
//!     .await?;
//! println!(
//!     "{} elements, {} distinct fonts",
//!     report.summary.total_elements,
//!     report.summary.unique_fonts.len()
//! );
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{classify, ClassifiedError, Error, Result};

pub mod browser;
pub use browser::{BrowserManager, PageSession};

pub mod analysis;
pub mod color;
pub mod extract;
pub mod navigate;
pub mod screenshot;
pub mod service;
pub mod stabilize;
pub mod summary;

pub use service::Analyzer;

/// Default element cap when the caller does not supply one.
pub const DEFAULT_MAX_ELEMENTS: usize = 500;

/// Hard ceiling on extracted elements, enforced independently of the
/// caller-supplied cap.
pub const MAX_ELEMENTS_ABSOLUTE: usize = 1_000;

/// Navigation timeout bounds and default, in milliseconds.
pub const MIN_TIMEOUT_MS: u64 = 5_000;
pub const MAX_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Viewport every analysis renders at.
pub const VIEWPORT: Viewport = Viewport {
    width: 1920,
    height: 1080,
};

/// Per-analysis options.
///
/// Values are expected to arrive pre-validated from the caller; [`clamped`]
/// coerces out-of-range values into the supported contract for surfaces
/// (like the CLI) that accept raw input.
///
/// [`clamped`]: AnalysisOptions::clamped
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    /// Keep elements hidden via `display`, `visibility`, or zero opacity.
    pub include_hidden: bool,
    /// Maximum number of element records to extract (1..=1000).
    pub max_elements: usize,
    /// Navigation timeout in milliseconds (5000..=60000).
    pub timeout_ms: u64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            include_hidden: false,
            max_elements: DEFAULT_MAX_ELEMENTS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl AnalysisOptions {
    /// Coerce the options into their supported ranges.
    pub fn clamped(mut self) -> Self {
        self.max_elements = self.max_elements.clamp(1, MAX_ELEMENTS_ABSOLUTE);
        self.timeout_ms = self.timeout_ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS);
        self
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        VIEWPORT
    }
}

/// One extracted text-bearing element.
///
/// Every record satisfies the extraction invariants: non-empty trimmed text
/// of at most 300 characters, and a rendered box with positive width and
/// height. Coordinates are absolute document coordinates (viewport-relative
/// box plus the scroll offset at extraction time).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyElement {
    /// Sequential identifier within one extraction pass (`element-N`).
    pub id: String,
    /// Lowercase tag name.
    pub tag_name: String,
    /// Trimmed visible text, truncated to 300 characters.
    pub text: String,
    pub styles: TextStyles,
    pub position: ElementBox,
    pub spacing: BoxSpacing,
}

/// Computed typography values for one element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyles {
    pub font_family: String,
    pub font_size: String,
    pub font_weight: String,
    pub line_height: String,
    /// Canonical uppercase hex where the browser reported `rgb()`/`rgba()`;
    /// otherwise the raw value verbatim.
    pub color: String,
    pub letter_spacing: String,
    pub text_align: String,
    pub text_transform: String,
    pub font_style: String,
    pub text_decoration: String,
    pub font_variant: String,
}

/// Rendered geometry in absolute document coordinates, rounded to pixels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBox {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Vertical margins and paddings of one element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxSpacing {
    pub margin_top: String,
    pub margin_bottom: String,
    pub padding_top: String,
    pub padding_bottom: String,
}

/// Deduplicated, capped style sets over one extraction pass.
///
/// Each set preserves first-seen order among elements. `total_elements` is
/// the un-capped count of input records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographySummary {
    pub total_elements: usize,
    pub unique_fonts: Vec<String>,
    pub font_sizes: Vec<String>,
    pub colors: Vec<String>,
    pub font_weights: Vec<String>,
    pub text_alignments: Vec<String>,
}

/// A stage that failed softly during an analysis.
///
/// Soft failures degrade the report instead of aborting it; the affected
/// stages are recorded here so callers can observe degraded artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedStage {
    /// Scroll-settling failed; extraction ran against the unsettled page.
    Stabilize,
    /// The post-navigation body readiness wait timed out.
    BodyReady,
    /// Screenshot capture failed; the report carries an empty screenshot.
    Screenshot,
    /// The page title could not be read; a placeholder is used.
    PageTitle,
}

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub page_title: String,
    pub viewport: Viewport,
    /// Wall-clock analysis duration in milliseconds.
    pub analysis_time_ms: u64,
    pub degraded: Vec<DegradedStage>,
}

/// The final analysis artifact for one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Source URL as requested.
    pub url: String,
    /// RFC 3339 completion timestamp.
    pub timestamp: String,
    /// `data:image/png;base64,...`, or empty when capture degraded.
    pub screenshot: String,
    pub elements: Vec<TypographyElement>,
    pub summary: TypographySummary,
    pub metadata: AnalysisMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = AnalysisOptions::default();
        assert!(!options.include_hidden);
        assert_eq!(options.max_elements, 500);
        assert_eq!(options.timeout_ms, 30_000);
    }

    #[test]
    fn test_options_clamping() {
        let options = AnalysisOptions {
            include_hidden: true,
            max_elements: 50_000,
            timeout_ms: 1,
        }
        .clamped();
        assert_eq!(options.max_elements, MAX_ELEMENTS_ABSOLUTE);
        assert_eq!(options.timeout_ms, MIN_TIMEOUT_MS);

        let options = AnalysisOptions {
            max_elements: 0,
            timeout_ms: 600_000,
            ..Default::default()
        }
        .clamped();
        assert_eq!(options.max_elements, 1);
        assert_eq!(options.timeout_ms, MAX_TIMEOUT_MS);
    }

    #[test]
    fn test_report_wire_shape_is_camel_case() {
        let report = AnalysisReport {
            url: "https://example.com".into(),
            timestamp: "2024-01-01T00:00:00+00:00".into(),
            screenshot: String::new(),
            elements: vec![],
            summary: TypographySummary::default(),
            metadata: AnalysisMetadata {
                page_title: "Example".into(),
                viewport: VIEWPORT,
                analysis_time_ms: 12,
                degraded: vec![DegradedStage::Screenshot],
            },
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"totalElements\""));
        assert!(json.contains("\"pageTitle\""));
        assert!(json.contains("\"analysisTimeMs\""));
        assert!(json.contains("\"degraded\":[\"screenshot\"]"));
    }
}
