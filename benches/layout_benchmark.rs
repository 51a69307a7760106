//! Row layout benchmarks.
//!
//! A layout pass rebuilds the Fenwick-backed row index from the height cache
//! and then resolves the visible range. Both should stay cheap as the list
//! grows: building is O(n), range lookup O(log n).
//!
//! Run with: cargo bench --bench layout_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use campaign_browser::model::Size;
use campaign_browser::view_state::ListLayout;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Rows alternating between the default height and a measured one.
fn sizes(count: usize) -> Vec<Size> {
    (0..count)
        .map(|i| Size::new(375.0, if i % 3 == 0 { 200.0 } else { 295.0 + (i % 7) as f64 }))
        .collect()
}

fn benchmark_layout_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_build");
    for count in [100, 1_000, 10_000] {
        let rows = sizes(count);
        group.bench_with_input(BenchmarkId::new("from_sizes", count), &rows, |b, rows| {
            b.iter(|| ListLayout::from_sizes(black_box(rows)))
        });
    }
    group.finish();
}

fn benchmark_visible_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("visible_rows");
    for count in [1_000, 10_000, 100_000] {
        let layout = ListLayout::from_sizes(&sizes(count));
        let total = layout.content_height();
        group.bench_with_input(BenchmarkId::new("visible_rows", count), &layout, |b, layout| {
            b.iter(|| {
                for offset in [0, total / 4, total / 2, total * 3 / 4, total.saturating_sub(667)] {
                    black_box(layout.visible_rows(black_box(offset), 667));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_layout_build, benchmark_visible_rows);
criterion_main!(benches);
