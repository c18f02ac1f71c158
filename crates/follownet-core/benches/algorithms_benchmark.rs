//! Follows-graph Algorithm Benchmark
//!
//! Measures the analysis kernels on random graphs of growing size:
//! - Ingestion of generated files
//! - Sampled average shortest path
//! - Louvain phase one
//! - Prim spanning tree

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use follownet_core::generator::{generate_connections, generate_locations};
use follownet_core::graph::{
    CommunityDetector, GraphStore, NodeId, PathSampler, SpanningTreeBuilder, UndirectedGraph,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

const FOLLOWS_PER_USER: usize = 8;

fn random_store(users: usize, seed: u64) -> GraphStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::with_capacity(users * FOLLOWS_PER_USER);
    for source in 1..=users as NodeId {
        for _ in 0..rng.gen_range(0..=FOLLOWS_PER_USER) {
            edges.push((source, rng.gen_range(1..=users as NodeId)));
        }
    }
    GraphStore::from_edges(users, edges)
}

fn benchmark_ingestion(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingestion");
    group.sample_size(10);

    for users in [1_000, 10_000, 50_000] {
        let dir = TempDir::new().unwrap();
        let locations = dir.path().join("locations.txt");
        let connections = dir.path().join("connections.txt");
        let mut rng = StdRng::seed_from_u64(users as u64);
        generate_locations(&locations, users, &mut rng).unwrap();
        generate_connections(&connections, users, FOLLOWS_PER_USER, &mut rng).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_users", users)),
            &users,
            |b, _| {
                b.iter(|| {
                    let mut store = GraphStore::new();
                    store.load_locations(&locations, 10_000).unwrap();
                    store.load_connections(&connections, 10_000).unwrap();
                    black_box(store.edge_count())
                });
            },
        );
    }
    group.finish();
}

fn benchmark_path_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("average_shortest_path");
    group.sample_size(10);

    for users in [1_000, 10_000, 50_000] {
        let store = random_store(users, 1);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_users", users)),
            &store,
            |b, store| {
                let mut rng = StdRng::seed_from_u64(2);
                b.iter(|| {
                    PathSampler::new(store).average_shortest_path_length(black_box(Some(100)), &mut rng)
                });
            },
        );
    }
    group.finish();
}

fn benchmark_communities(c: &mut Criterion) {
    let mut group = c.benchmark_group("louvain_phase_one");
    group.sample_size(10);

    for users in [1_000, 10_000] {
        let graph = UndirectedGraph::from_store(&random_store(users, 3));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_users", users)),
            &graph,
            |b, graph| {
                let mut rng = StdRng::seed_from_u64(4);
                b.iter(|| CommunityDetector::default().run(black_box(graph), &mut rng));
            },
        );
    }
    group.finish();
}

fn benchmark_spanning_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("prim_spanning_tree");
    group.sample_size(10);

    for users in [1_000, 10_000, 50_000] {
        let graph = UndirectedGraph::from_store(&random_store(users, 5));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_users", users)),
            &graph,
            |b, graph| {
                b.iter(|| SpanningTreeBuilder::new().run(black_box(graph)));
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_ingestion,
    benchmark_path_sampling,
    benchmark_communities,
    benchmark_spanning_tree
);
criterion_main!(benches);
