use criterion::{black_box, criterion_group, criterion_main, Criterion};
use typolens::{color, summary, BoxSpacing, ElementBox, TextStyles, TypographyElement};

fn synthetic_elements(count: usize) -> Vec<TypographyElement> {
    (0..count)
        .map(|i| TypographyElement {
            id: format!("element-{}", i),
            tag_name: "p".to_string(),
            text: format!("Synthetic text {}", i),
            styles: TextStyles {
                font_family: format!("Font {}", i % 60),
                font_size: format!("{}px", 10 + i % 40),
                font_weight: format!("{}", 100 * (1 + i % 9)),
                color: format!("#{:06X}", i % 40),
                text_align: ["left", "right", "center", "justify"][i % 4].to_string(),
                ..Default::default()
            },
            position: ElementBox {
                x: 0,
                y: (i as i64) * 24,
                width: 640,
                height: 24,
            },
            spacing: BoxSpacing::default(),
        })
        .collect()
}

fn bench_color_normalization(c: &mut Criterion) {
    let inputs = [
        "rgb(255, 0, 128)",
        "rgba(0,0,0,0.5)",
        "#abc",
        "invalid-color-name",
        "rgb(300, 0, 0)",
    ];
    c.bench_function("color_to_hex", |b| {
        b.iter(|| {
            for input in &inputs {
                let _ = color::to_hex(black_box(input));
            }
        })
    });
}

fn bench_summarize(c: &mut Criterion) {
    let elements = synthetic_elements(1000);
    c.bench_function("summarize_1000", |b| {
        b.iter(|| summary::summarize(black_box(&elements)))
    });
}

criterion_group!(benches, bench_color_normalization, bench_summarize);
criterion_main!(benches);
