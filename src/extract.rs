//! Typography extraction
//!
//! The DOM walk needs live computed-style and geometry information, so it
//! runs inside the page's own rendering context: a script is sent to the
//! engine, walks the candidate elements in document order, and returns the
//! raw records as one JSON string. The Rust side parses the payload,
//! normalizes colors, assigns identifiers, and enforces the element caps.

use crate::browser::PageSession;
use crate::error::{Error, Result};
use crate::{color, BoxSpacing, ElementBox, TextStyles, TypographyElement, MAX_ELEMENTS_ABSOLUTE};
use serde::Deserialize;

/// Candidate text-bearing selectors, walked in document order.
const TEXT_SELECTORS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "div", "a", "li", "td",
    "th", "button", "label", "blockquote", "cite", "code", "pre", "strong",
    "b", "em", "i", "small", "mark", "time", "address",
    "input[type=\"text\"]", "input[type=\"email\"]", "input[type=\"search\"]",
    "input[type=\"url\"]", "textarea", "legend", "caption", "figcaption",
];

/// Visible text is truncated to this many characters per element.
const MAX_TEXT_LEN: usize = 300;

/// Page-side walk. Tokens are substituted textually (not `format!`) so the
/// script can use braces freely.
const EXTRACT_TEMPLATE: &str = r#"(function() {
    const selectors = __SELECTORS__;
    const includeHidden = __INCLUDE_HIDDEN__;
    const maxElements = __MAX_ELEMENTS__;
    const records = [];
    const nodes = document.querySelectorAll(selectors.join(", "));

    for (const node of nodes) {
        if (records.length >= maxElements) break;

        const text = (node.innerText || "").trim();
        if (!text || text.length < 1) continue;

        const style = window.getComputedStyle(node);
        if (!includeHidden &&
            (style.display === "none" ||
             style.visibility === "hidden" ||
             parseFloat(style.opacity) === 0)) continue;

        const rect = node.getBoundingClientRect();
        if (rect.width === 0 || rect.height === 0) continue;

        records.push({
            tagName: node.tagName.toLowerCase(),
            text: text.slice(0, __MAX_TEXT_LEN__),
            styles: {
                fontFamily: style.fontFamily || "",
                fontSize: style.fontSize || "",
                fontWeight: style.fontWeight || "",
                lineHeight: style.lineHeight || "",
                color: style.color || "",
                letterSpacing: style.letterSpacing || "",
                textAlign: style.textAlign || "",
                textTransform: style.textTransform || "",
                fontStyle: style.fontStyle || "",
                textDecoration: style.textDecoration || "",
                fontVariant: style.fontVariant || ""
            },
            position: {
                x: Math.round(rect.left + window.scrollX),
                y: Math.round(rect.top + window.scrollY),
                width: Math.round(rect.width),
                height: Math.round(rect.height)
            },
            spacing: {
                marginTop: style.marginTop || "",
                marginBottom: style.marginBottom || "",
                paddingTop: style.paddingTop || "",
                paddingBottom: style.paddingBottom || ""
            }
        });
    }

    return JSON.stringify(records);
})()"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    tag_name: String,
    text: String,
    styles: TextStyles,
    position: ElementBox,
    spacing: BoxSpacing,
}

/// Walk the rendered DOM and return at most `max_elements` element records.
///
/// Extraction expects the scroll position to have been reset to the top
/// (the stabilizer's postcondition) so coordinates are comparable across
/// runs. The absolute ceiling is enforced here regardless of the caller's
/// cap.
pub fn extract(
    session: &PageSession,
    include_hidden: bool,
    max_elements: usize,
) -> Result<Vec<TypographyElement>> {
    let effective_cap = max_elements.min(MAX_ELEMENTS_ABSOLUTE);
    let script = build_script(include_hidden, effective_cap);

    let result = session
        .tab()
        .evaluate(&script, true)
        .map_err(|e| Error::Extraction(e.to_string()))?;

    let payload = result
        .value
        .as_ref()
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::Extraction("no payload returned from page".to_string()))?;

    parse_records(payload, effective_cap)
}

fn build_script(include_hidden: bool, max_elements: usize) -> String {
    // The selector list is embedded as a JSON array literal.
    let selectors =
        serde_json::to_string(TEXT_SELECTORS).expect("selector list serializes");
    EXTRACT_TEMPLATE
        .replace("__SELECTORS__", &selectors)
        .replace("__INCLUDE_HIDDEN__", if include_hidden { "true" } else { "false" })
        .replace("__MAX_ELEMENTS__", &max_elements.to_string())
        .replace("__MAX_TEXT_LEN__", &MAX_TEXT_LEN.to_string())
}

/// Parse the page's JSON payload into element records: normalize colors,
/// assign sequential identifiers, and cut at `cap` again in case the page
/// script was tampered with.
fn parse_records(payload: &str, cap: usize) -> Result<Vec<TypographyElement>> {
    let raw: Vec<RawRecord> = serde_json::from_str(payload)
        .map_err(|e| Error::Extraction(format!("malformed extraction payload: {}", e)))?;

    Ok(raw
        .into_iter()
        .take(cap)
        .enumerate()
        .map(|(index, record)| {
            let mut styles = record.styles;
            styles.color = color::to_hex(&styles.color);
            TypographyElement {
                id: format!("element-{}", index),
                tag_name: record.tag_name,
                text: record.text,
                styles,
                position: record.position,
                spacing: record.spacing,
            }
        })
        .collect())
}
