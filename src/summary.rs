//! Summary aggregation over extracted elements

use crate::{TypographyElement, TypographySummary};

const MAX_FONTS: usize = 50;
const MAX_SIZES: usize = 30;
const MAX_COLORS: usize = 30;
const MAX_WEIGHTS: usize = 20;
const MAX_ALIGNMENTS: usize = 10;

/// Reduce the element list into deduplicated, capped style sets.
///
/// Pure and deterministic: per dimension, empty values are dropped,
/// duplicates collapse to their first occurrence, and the set is cut at the
/// dimension's cap. `total_elements` is the un-capped input count.
pub fn summarize(elements: &[TypographyElement]) -> TypographySummary {
    TypographySummary {
        total_elements: elements.len(),
        unique_fonts: unique_values(elements, |e| &e.styles.font_family, MAX_FONTS),
        font_sizes: unique_values(elements, |e| &e.styles.font_size, MAX_SIZES),
        colors: unique_values(elements, |e| &e.styles.color, MAX_COLORS),
        font_weights: unique_values(elements, |e| &e.styles.font_weight, MAX_WEIGHTS),
        text_alignments: unique_values(elements, |e| &e.styles.text_align, MAX_ALIGNMENTS),
    }
}

fn unique_values(
    elements: &[TypographyElement],
    field: impl Fn(&TypographyElement) -> &str,
    cap: usize,
) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for element in elements {
        let value = field(element);
        if value.is_empty() || values.iter().any(|seen| seen == value) {
            continue;
        }
        values.push(value.to_string());
        if values.len() == cap {
            break;
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoxSpacing, ElementBox, TextStyles};

    fn element(font: &str, size: &str, color: &str, weight: &str, align: &str) -> TypographyElement {
        TypographyElement {
            id: "element-0".into(),
            tag_name: "p".into(),
            text: "sample".into(),
            styles: TextStyles {
                font_family: font.into(),
                font_size: size.into(),
                font_weight: weight.into(),
                color: color.into(),
                text_align: align.into(),
                ..Default::default()
            },
            position: ElementBox {
                x: 0,
                y: 0,
                width: 100,
                height: 20,
            },
            spacing: BoxSpacing::default(),
        }
    }

    #[test]
    fn test_summary_of_empty_input() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_elements, 0);
        assert!(summary.unique_fonts.is_empty());
        assert!(summary.colors.is_empty());
    }

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let elements = vec![
            element("Georgia", "16px", "#000000", "400", "left"),
            element("Arial", "14px", "#FF0080", "700", "center"),
            element("Georgia", "16px", "#000000", "400", "left"),
            element("Menlo", "13px", "#000000", "400", "right"),
        ];
        let summary = summarize(&elements);
        assert_eq!(summary.total_elements, 4);
        assert_eq!(summary.unique_fonts, vec!["Georgia", "Arial", "Menlo"]);
        assert_eq!(summary.font_sizes, vec!["16px", "14px", "13px"]);
        assert_eq!(summary.colors, vec!["#000000", "#FF0080"]);
        assert_eq!(summary.font_weights, vec!["400", "700"]);
        assert_eq!(summary.text_alignments, vec!["left", "center", "right"]);
    }

    #[test]
    fn test_empty_values_are_dropped() {
        let elements = vec![
            element("", "16px", "#000000", "", "left"),
            element("Arial", "", "", "700", ""),
        ];
        let summary = summarize(&elements);
        assert_eq!(summary.unique_fonts, vec!["Arial"]);
        assert_eq!(summary.font_sizes, vec!["16px"]);
        assert_eq!(summary.colors, vec!["#000000"]);
        assert_eq!(summary.font_weights, vec!["700"]);
        assert_eq!(summary.text_alignments, vec!["left"]);
        assert_eq!(summary.total_elements, 2);
    }

    #[test]
    fn test_dimension_caps_are_enforced() {
        let elements: Vec<TypographyElement> = (0..100)
            .map(|i| {
                element(
                    &format!("Font {}", i),
                    &format!("{}px", i),
                    &format!("#{:06X}", i),
                    &format!("{}", 100 + i),
                    &format!("align-{}", i),
                )
            })
            .collect();
        let summary = summarize(&elements);
        assert_eq!(summary.total_elements, 100);
        assert_eq!(summary.unique_fonts.len(), 50);
        assert_eq!(summary.font_sizes.len(), 30);
        assert_eq!(summary.colors.len(), 30);
        assert_eq!(summary.font_weights.len(), 20);
        assert_eq!(summary.text_alignments.len(), 10);
        // Caps keep the earliest distinct values.
        assert_eq!(summary.unique_fonts[0], "Font 0");
        assert_eq!(summary.text_alignments[9], "align-9");
    }

    #[test]
    fn test_no_duplicates_in_any_dimension() {
        let elements: Vec<TypographyElement> = (0..40)
            .map(|i| element("Arial", "14px", "#000000", "400", if i % 2 == 0 { "left" } else { "right" }))
            .collect();
        let summary = summarize(&elements);
        assert_eq!(summary.unique_fonts, vec!["Arial"]);
        assert_eq!(summary.text_alignments, vec!["left", "right"]);
        assert_eq!(summary.total_elements, 40);
    }
}
