//! Layout and export benchmarks
//!
//! Fills A4 pages at 300 DPI with fixed-advance metrics so the numbers reflect
//! the line-fill loop and the exporters rather than font shaping.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use page_synth::annotations::{build_document, yolo};
use page_synth::layout::{layout, MonospaceMeasure, PageConfig};

/// Pseudo-random words of 2 to 9 characters
fn words(count: usize) -> Vec<String> {
    let mut s = 0x9E37_79B9_7F4A_7C15u64;
    (0..count)
        .map(|_| {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
            let len = 2 + (s >> 60) as usize % 8;
            (0..len)
                .map(|i| (b'a' + ((s >> (i * 5)) % 26) as u8) as char)
                .collect()
        })
        .collect()
}

fn a4_page() -> PageConfig {
    PageConfig::new(2480, 3508, 56)
        .with_margins(234, 180, 180, 180)
        .with_line_spacing(56)
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let page = a4_page();
    let measure = MonospaceMeasure::new(30.0, 56.0);

    for count in [100, 1_000, 10_000] {
        let input = words(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| black_box(layout(black_box(input), &page, &measure)))
        });
    }
    group.finish();
}

fn bench_exporters(c: &mut Criterion) {
    let page = a4_page();
    let result = layout(&words(10_000), &page, &MonospaceMeasure::new(30.0, 56.0));

    c.bench_function("yolo_text", |b| {
        b.iter(|| black_box(yolo::to_text(&result.placed, result.page_width, result.page_height)))
    });
    c.bench_function("xml_document", |b| {
        b.iter(|| {
            let doc = build_document(&result.placed, "page.png", result.page_width, result.page_height);
            black_box(doc.to_xml().unwrap())
        })
    });
}

criterion_group!(benches, bench_layout, bench_exporters);
criterion_main!(benches);
