//! Color normalization
//!
//! Browsers report computed colors as `rgb()`/`rgba()` strings; the report
//! carries canonical uppercase hex instead. Unparseable values pass through
//! verbatim rather than erroring, so normalization is total and idempotent
//! on its own output.

use regex::Regex;
use std::sync::OnceLock;

static RGB_PATTERN: OnceLock<Regex> = OnceLock::new();

fn rgb_pattern() -> &'static Regex {
    RGB_PATTERN.get_or_init(|| {
        Regex::new(r"rgba?\((\d+),\s*(\d+),\s*(\d+)(?:,\s*[\d.]+)?\)")
            .expect("rgb pattern is valid")
    })
}

/// Convert a browser-reported color to canonical `#RRGGBB` uppercase hex.
///
/// Hex-prefixed input is uppercased unchanged; `rgb()`/`rgba()` values with
/// all channels in `0..=255` are converted (any alpha component is
/// dropped); everything else is returned verbatim.
pub fn to_hex(color: &str) -> String {
    if color.starts_with('#') {
        return color.to_uppercase();
    }

    let Some(caps) = rgb_pattern().captures(color) else {
        return color.to_string();
    };

    let mut channels = [0u8; 3];
    for (slot, index) in channels.iter_mut().zip(1..=3) {
        match caps[index].parse::<u16>() {
            Ok(value) if value <= 255 => *slot = value as u8,
            // Out-of-range channels are not an error, just not normalized.
            _ => return color.to_string(),
        }
    }

    format!("#{:02X}{:02X}{:02X}", channels[0], channels[1], channels[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_hex() {
        assert_eq!(to_hex("rgb(255, 0, 128)"), "#FF0080");
        assert_eq!(to_hex("rgb(0, 0, 0)"), "#000000");
        assert_eq!(to_hex("rgb(255,255,255)"), "#FFFFFF");
    }

    #[test]
    fn test_rgba_drops_alpha() {
        assert_eq!(to_hex("rgba(0,0,0,0.5)"), "#000000");
        assert_eq!(to_hex("rgba(18, 52, 86, 1)"), "#123456");
    }

    #[test]
    fn test_hex_passthrough_uppercases() {
        assert_eq!(to_hex("#abc"), "#ABC");
        assert_eq!(to_hex("#ff0080"), "#FF0080");
        assert_eq!(to_hex("#FF0080"), "#FF0080");
    }

    #[test]
    fn test_unparseable_passthrough() {
        assert_eq!(to_hex("invalid-color-name"), "invalid-color-name");
        assert_eq!(to_hex("transparent"), "transparent");
        assert_eq!(to_hex(""), "");
        assert_eq!(to_hex("hsl(120, 50%, 50%)"), "hsl(120, 50%, 50%)");
    }

    #[test]
    fn test_out_of_range_channels_passthrough() {
        assert_eq!(to_hex("rgb(300, 0, 0)"), "rgb(300, 0, 0)");
        assert_eq!(
            to_hex("rgb(99999999999, 0, 0)"),
            "rgb(99999999999, 0, 0)"
        );
    }

    #[test]
    fn test_idempotent() {
        for input in [
            "rgb(255, 0, 128)",
            "rgba(0,0,0,0.5)",
            "#abc",
            "invalid-color-name",
            "rgb(300, 0, 0)",
            "",
        ] {
            let once = to_hex(input);
            assert_eq!(to_hex(&once), once, "not idempotent for {:?}", input);
        }
    }
}
