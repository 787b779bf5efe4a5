//! Criterion benches for per-cluster rupture enumeration (group "search").
//!
//! - Largest cluster of a synthetic network, default rules vs. no rules.
//! - Full rupture-set build, sequential vs. rayon.
//!
//! Networks come from `synth::generate` with fixed seeds, so runs are stable.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rupgen::api::*;

fn network(num_parents: usize) -> FaultInputs {
    generate_synthetic(&SynthCfg {
        num_parents,
        seed: 2024,
        ..SynthCfg::default()
    })
    .unwrap()
}

fn bench_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(20);
    let inputs = network(12);
    let full = compute_connections(
        &inputs.model,
        &inputs.distances,
        None,
        ConnectCfg::default(),
    )
    .unwrap();
    let part = partition(&inputs.model, &full, None).unwrap();
    let Some(cluster) = part.largest().cloned() else {
        return;
    };
    let rules = FilterChain::from_cfg(&FilterCfg::default(), &inputs).unwrap();
    let search = SearchCfg::default();
    group.bench_function(BenchmarkId::new("enumerate", "default_rules"), |b| {
        b.iter(|| enumerate(&cluster, &inputs.model, &part.graph, &rules, search).len())
    });
    // Unfiltered growth is exponential; bound depth to keep the bench short.
    let shallow = SearchCfg {
        max_sections_per_rupture: Some(6),
        ..search
    };
    let open = FilterChain::new();
    group.bench_function(BenchmarkId::new("enumerate", "no_rules_depth6"), |b| {
        b.iter(|| enumerate(&cluster, &inputs.model, &part.graph, &open, shallow).len())
    });
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    let inputs = network(40);
    for parallel in [false, true] {
        let cfg = BuildCfg {
            parallel,
            ..BuildCfg::default()
        };
        let label = if parallel { "rayon" } else { "sequential" };
        group.bench_with_input(BenchmarkId::new("build", label), &cfg, |b, cfg| {
            b.iter(|| {
                RuptureSetBuilder::new(&inputs, cfg.clone())
                    .build()
                    .unwrap()
                    .num_ruptures()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_enumerate, bench_build);
criterion_main!(benches);
