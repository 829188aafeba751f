// SPDX-License-Identifier: PMPL-1.0-or-later
//
// Criterion benchmarks for the gazetteer-document crate. Currently benchmarks
// pattern matching and highlighting on a synthetic gazette page, the per-page
// hot path of every scan.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use gazetteer_document::PatternSet;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Build a page-sized blob of filler text with one keyword hit near the end,
/// approximating a dense gazette page where most lines are misses.
fn synthetic_page() -> String {
    let mut text = String::new();
    for i in 0..400 {
        text.push_str("Notice ");
        text.push_str(&i.to_string());
        text.push_str(": routine administrative announcement of the registry.\n");
    }
    text.push_str("Final item: disciplinary resolution adopted by the board.\n");
    text
}

fn bench_matcher(c: &mut Criterion) {
    let patterns =
        PatternSet::parse("disciplinary resolution\nrevocation of licen[cs]e\n懲戒決議").unwrap();
    let page = synthetic_page();

    c.bench_function("is_match (dense page, 3 patterns)", |b| {
        b.iter(|| patterns.is_match(black_box(&page)));
    });

    c.bench_function("highlight (dense page, 3 patterns)", |b| {
        b.iter(|| patterns.highlight(black_box(&page)));
    });
}

criterion_group!(benches, bench_matcher);
criterion_main!(benches);
