use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strata_analysis::{
    AnalysisOptions, analyze, build_condensation, find_components, shortest_and_longest,
    topological_sort,
};
use strata_core::Graph;
use strata_core::metrics::Metrics;

struct Tier {
    name: &'static str,
    nodes: usize,
    edges_per_node: usize,
}

const TIERS: [Tier; 3] = [
    Tier {
        name: "1k",
        nodes: 1_000,
        edges_per_node: 3,
    },
    Tier {
        name: "10k",
        nodes: 10_000,
        edges_per_node: 3,
    },
    Tier {
        name: "100k",
        nodes: 100_000,
        edges_per_node: 2,
    },
];

/// Mostly-forward random graph with a sprinkling of back edges, so there
/// are both non-trivial components and a deep condensation.
fn random_graph(tier: &Tier, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new(tier.nodes);
    for u in 0..tier.nodes {
        for _ in 0..tier.edges_per_node {
            let span = rng.gen_range(1..=16);
            let v = if rng.gen_bool(0.05) {
                u.saturating_sub(span)
            } else {
                (u + span).min(tier.nodes - 1)
            };
            let weight = f64::from(rng.gen_range(1_u32..=10));
            graph.add_edge(u, v, weight).expect("edge in range");
        }
    }
    graph
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline.stages");

    for tier in &TIERS {
        let graph = random_graph(tier, 0x5742_u64 + tier.nodes as u64);
        group.throughput(Throughput::Elements(graph.edge_count() as u64));

        group.bench_with_input(BenchmarkId::new("scc", tier.name), &graph, |b, graph| {
            b.iter(|| black_box(find_components(graph)));
        });

        let components = find_components(&graph);
        group.bench_with_input(
            BenchmarkId::new("condense", tier.name),
            &graph,
            |b, graph| b.iter(|| black_box(build_condensation(graph, &components))),
        );

        let condensed = build_condensation(&graph, &components).expect("matching partition");
        group.bench_with_input(
            BenchmarkId::new("topo", tier.name),
            &condensed,
            |b, condensed| b.iter(|| black_box(topological_sort(condensed))),
        );

        let order = topological_sort(&condensed).expect("condensation is acyclic");
        let source = components.component_of(0).expect("non-empty graph");
        group.bench_with_input(
            BenchmarkId::new("paths", tier.name),
            &condensed,
            |b, condensed| {
                b.iter(|| {
                    black_box(shortest_and_longest(
                        condensed,
                        &order,
                        source,
                        &mut Metrics::new(),
                    ))
                });
            },
        );
    }

    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline.analyze");
    group.sample_size(20);

    for tier in &TIERS {
        let graph = random_graph(tier, 0xA11_u64 + tier.nodes as u64);
        group.throughput(Throughput::Elements(graph.edge_count() as u64));
        group.bench_with_input(BenchmarkId::new("analyze", tier.name), &graph, |b, graph| {
            b.iter(|| black_box(analyze(graph, &AnalysisOptions::default())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_stages, bench_end_to_end);
criterion_main!(benches);
