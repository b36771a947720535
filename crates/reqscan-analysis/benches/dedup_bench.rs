//! Dedup benchmarks: candidate batches against a fixed corpus, with and
//! without length-ratio pruning.
//!
//! Run with: cargo bench -p reqscan-analysis --bench dedup_bench

use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use reqscan_analysis::dedup::{DedupEngine, DedupOptions};
use reqscan_analysis::text::{jaccard, TokenCache};
use reqscan_core::types::{CandidateRecord, Evidence, Priority, SourceKind};

const WORDS: &[&str] = &[
    "budsjett", "møte", "agenda", "medlem", "faktura", "påminnelse", "eksport", "rapport",
    "tilgang", "rolle", "protokoll", "regnskap", "konto", "periode", "varsel", "skjema",
];

fn sentence(i: usize, len: usize) -> String {
    let words: Vec<&str> = (0..len).map(|k| WORDS[(i * 7 + k * 3) % WORDS.len()]).collect();
    format!("Systemet skal {} {i}.", words.join(" "))
}

fn candidates(n: usize) -> Vec<CandidateRecord> {
    (0..n)
        .map(|i| {
            CandidateRecord::new(
                sentence(i, 3 + i % 6),
                SourceKind::DataField,
                Priority::Should,
                Evidence::Field {
                    sheet: "Ark".into(),
                    field: format!("felt{i}"),
                },
            )
        })
        .collect()
}

fn dedup_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("dedup");
    group.sample_size(10);

    let existing: Vec<String> = (0..200).map(|i| sentence(i + 10_000, 5)).collect();
    let options = DedupOptions {
        yield_pause: Duration::ZERO,
        ..Default::default()
    };

    for n in [100usize, 400, 1200] {
        let input = candidates(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| {
                let cache = TokenCache::default();
                DedupEngine::new(&cache, options).run(input.clone(), &existing)
            });
        });
    }

    group.finish();
}

fn jaccard_pruning(c: &mut Criterion) {
    let mut group = c.benchmark_group("jaccard");
    let cache = TokenCache::default();
    let short = sentence(1, 2);
    let long = sentence(2, 40);

    group.bench_function("unpruned", |b| b.iter(|| jaccard(&cache, &short, &long, None)));
    group.bench_function("pruned", |b| b.iter(|| jaccard(&cache, &short, &long, Some(0.78))));

    group.finish();
}

criterion_group!(benches, dedup_candidates, jaccard_pruning);
criterion_main!(benches);
