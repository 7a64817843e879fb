//! Detection and formatting benchmarks
//!
//! Measures document-level detection, per-line scanning and the format ladder.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use jsonsql_core::{
    SafeFormatOptions, SpanScanner, SqlDetector, SqlFormatPrinter, SqlVocabulary, manual_format,
    safe_format_with,
};

fn large_document(entries: usize) -> String {
    let body: Vec<String> = (0..entries)
        .map(|i| {
            format!(
                "  \"query_{i}\": \"SELECT id, name FROM table_{i} WHERE id = {{id}}#{i} ORDER BY name\",\n  \"label_{i}\": \"Report number {i}\""
            )
        })
        .collect();
    format!("{{\n{}\n}}", body.join(",\n"))
}

fn bench_detection(c: &mut Criterion) {
    let detector = SqlDetector::new(SqlVocabulary::standard());
    let doc = large_document(500);

    c.bench_function("detector/has_sql_content_500", |b| {
        b.iter(|| black_box(detector.has_sql_content(black_box(&doc))));
    });

    c.bench_function("detector/keyword_count_500", |b| {
        b.iter(|| black_box(detector.keyword_count(black_box(&doc))));
    });
}

fn bench_scanning(c: &mut Criterion) {
    let scanner = SpanScanner::new(SqlVocabulary::standard());
    let doc = large_document(500);

    c.bench_function("scanner/scan_lines_500", |b| {
        b.iter(|| black_box(scanner.scan_lines(black_box(&doc)).count()));
    });
}

fn bench_formatting(c: &mut Criterion) {
    let sql = "select o.id, o.total, c.name from orders o join customers c on c.id = o.customer_id where o.region = <region> and o.created > {since}#1 order by o.total desc";
    let options = SafeFormatOptions::default();

    c.bench_function("format/safe_format", |b| {
        b.iter(|| black_box(safe_format_with(black_box(sql), &SqlFormatPrinter, &options)));
    });

    c.bench_function("format/manual", |b| {
        b.iter(|| black_box(manual_format(black_box(sql))));
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench_detection, bench_scanning, bench_formatting
);

criterion_main!(benches);
