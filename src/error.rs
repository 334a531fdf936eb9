//! Error taxonomy and boundary classification

use thiserror::Error;

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while analyzing a page
#[derive(Error, Debug)]
pub enum Error {
    /// The browser process could not be started
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// A page session could not be created or configured
    #[error("page session failed: {0}")]
    Session(String),

    /// Every navigation strategy was exhausted
    #[error("failed to load URL: {0}")]
    Navigation(String),

    /// A navigation deadline expired
    #[error("navigation timeout after {0}ms")]
    Timeout(u64),

    /// The DOM walk failed; the report is meaningless without elements
    #[error("typography extraction failed: {0}")]
    Extraction(String),

    /// A rendering-side read (screenshot, metrics) failed
    #[error("rendering failed: {0}")]
    Render(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Stable user-facing shape for a hard failure.
///
/// Raw engine and network error text never crosses the boundary; callers
/// see only the classified message, code, and status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedError {
    pub message: &'static str,
    pub code: &'static str,
    pub status: u16,
}

/// Ordered signature table. Order is significant for overlapping
/// substrings; new signatures are appended, never reordered past existing
/// more-specific entries.
const SIGNATURES: &[(&str, ClassifiedError)] = &[
    (
        "net::err_name_not_resolved",
        ClassifiedError {
            message: "Website not found",
            code: "WEBSITE_NOT_FOUND",
            status: 404,
        },
    ),
    (
        "timeout",
        ClassifiedError {
            message: "Connection timeout",
            code: "CONNECTION_TIMEOUT",
            status: 408,
        },
    ),
    (
        "net::err_connection_refused",
        ClassifiedError {
            message: "Connection refused",
            code: "CONNECTION_REFUSED",
            status: 503,
        },
    ),
    (
        "ssl",
        ClassifiedError {
            message: "SSL/TLS error",
            code: "SSL_ERROR",
            status: 400,
        },
    ),
    (
        "browser launch failed",
        ClassifiedError {
            message: "Browser initialization failed",
            code: "BROWSER_LAUNCH_FAILED",
            status: 500,
        },
    ),
];

const FALLBACK: ClassifiedError = ClassifiedError {
    message: "Failed to process webpage",
    code: "PAGE_PROCESSING_FAILED",
    status: 500,
};

/// Map a hard failure onto the stable error taxonomy.
///
/// Case-insensitive substring matching against the rendered error text;
/// first match wins, unknown signatures fall back to a generic entry.
pub fn classify(error: &Error) -> ClassifiedError {
    let text = error.to_string().to_lowercase();
    SIGNATURES
        .iter()
        .find(|(signature, _)| text.contains(signature))
        .map(|(_, classified)| *classified)
        .unwrap_or(FALLBACK)
}
