//! Benchmarks for end-to-end document conversion.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use orgmark::convert;

/// Generate an Org document with the given structure.
fn generate_document(sections: usize, paragraphs_per_section: usize) -> String {
    let mut text = String::with_capacity(sections * paragraphs_per_section * 120);
    text.push_str("#+TITLE: Benchmark Document\n#+AUTHOR: Bench\n\n");

    for i in 0..sections {
        text.push_str(&format!("* Section {i}\n\n"));
        for j in 0..paragraphs_per_section {
            text.push_str(&format!(
                "Paragraph {j} in section {i} with *bold* and /italic/ and a [[https://example.com/{i}][link]].\n\n"
            ));
        }
    }
    text
}

fn bench_convert_simple(c: &mut Criterion) {
    c.bench_function("convert_simple", |b| {
        b.iter(|| convert("#+TITLE: T\n* Hello\nSimple content."));
    });
}

fn bench_convert_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_by_size");

    for (sections, paragraphs) in [(5, 2), (20, 3), (50, 5)] {
        let text = generate_document(sections, paragraphs);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("org", format!("{sections}s_{paragraphs}p")),
            &text,
            |b, text| b.iter(|| convert(text)),
        );
    }

    group.finish();
}

fn bench_convert_tables_and_code(c: &mut Criterion) {
    let text = "#+TITLE: Mixed\n\n\
        | Name | Value | Notes |\n\
        |------|-------|-------|\n\
        | one  | 1     | first |\n\
        | two  | 2     | second |\n\n\
        #+BEGIN_SRC rust\n\
        fn main() {\n    println!(\"hello\");\n}\n\
        #+END_SRC\n\n\
        - item one\n- item two\n- item three\n";

    c.bench_function("convert_tables_and_code", |b| {
        b.iter(|| convert(text));
    });
}

fn bench_convert_large_document(c: &mut Criterion) {
    let text = generate_document(100, 5);

    let mut group = c.benchmark_group("large_document");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("convert", |b| b.iter(|| convert(&text)));
    group.finish();
}

criterion_group!(
    benches,
    bench_convert_simple,
    bench_convert_varying_sizes,
    bench_convert_tables_and_code,
    bench_convert_large_document,
);

criterion_main!(benches);
