use std::hint::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use ef_graph::SecondaryStructureGraph;

/// A stem-loop with unpaired tails, e.g. `..((((....))))..` scaled up.
fn hairpin_structure(len: usize) -> String {
    let tail = len / 8;
    let stem = len / 4;
    let rest = len - 2 * tail - 2 * stem;
    format!(
        "{}{}{}{}{}",
        ".".repeat(tail),
        "(".repeat(stem),
        ".".repeat(rest),
        ")".repeat(stem),
        ".".repeat(tail),
    )
}

fn all_pairs_for_len(len: usize) {
    let db = hairpin_structure(len);
    let graph = SecondaryStructureGraph::try_from(db.as_str()).expect("invalid structure");
    black_box(graph.all_pairs_distances());
}

fn bench_all_pairs(c: &mut Criterion) {
    c.bench_function("all_pairs_len50", |b| b.iter(|| all_pairs_for_len(black_box(50))));
    c.bench_function("all_pairs_len100", |b| b.iter(|| all_pairs_for_len(black_box(100))));
    c.bench_function("all_pairs_len250", |b| b.iter(|| all_pairs_for_len(black_box(250))));
}

criterion_group!(benches, bench_all_pairs);
criterion_main!(benches);
