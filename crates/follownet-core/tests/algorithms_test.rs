//! Algorithm tests over the loaded store
//!
//! Scenario tests on small hand-built graphs plus property tests on
//! random edge lists.

use follownet_core::graph::{
    CommunityDetector, GraphStore, NativeMetrics, NodeId, PathSampler, SpanningTreeBuilder,
    StructuralMetrics, UndirectedGraph,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;

fn disconnected_triangles() -> GraphStore {
    GraphStore::from_edges(6, vec![(1, 2), (2, 3), (3, 1), (4, 5), (5, 6), (6, 4)])
}

#[test]
fn test_disconnected_triangles_spanning_tree() {
    let store = disconnected_triangles();
    let graph = UndirectedGraph::from_store(&store);
    let tree = SpanningTreeBuilder::new().run(&graph);

    assert_eq!(tree.root, Some(1));
    assert_eq!(tree.edges.len(), 2);
    assert_eq!(tree.visited, 3);
    for &(u, v) in &tree.edges {
        assert!(u <= 3 && v <= 3);
    }

    let other = SpanningTreeBuilder::new().run_from(&graph, 5);
    assert_eq!(other.edges.len(), 2);
    assert!(other.edges.iter().all(|&(u, v)| u >= 4 && v >= 4));
}

#[test]
fn test_disconnected_triangles_paths_stay_inside() {
    let store = disconnected_triangles();
    let sampler = PathSampler::new(&store);
    let mut rng = StdRng::seed_from_u64(3);

    let estimate = sampler.average_shortest_path_length(None, &mut rng);
    assert_eq!(estimate.sources, 6);
    assert_eq!(estimate.reachable_pairs, 12);
    assert!(!estimate.sampled);
    assert!((estimate.average - 1.5).abs() < 1e-12);

    assert_eq!(sampler.shortest_path(1, 4, None), None);
    assert_eq!(sampler.shortest_path(1, 3, None), Some(vec![1, 2, 3]));
    assert_eq!(sampler.shortest_path(1, 3, Some(1)), None);
}

#[test]
fn test_bfs_from_chain() {
    let store = GraphStore::from_edges(4, vec![(1, 2), (2, 3), (3, 4)]);
    let distances = PathSampler::new(&store).bfs(1);
    assert_eq!(distances.len(), 4);
    assert_eq!(distances[&1], 0);
    assert_eq!(distances[&4], 3);

    let distances = PathSampler::new(&store).bfs(4);
    assert_eq!(distances.len(), 1);
    assert!(PathSampler::new(&store).bfs(9).is_empty());
}

#[test]
fn test_sampling_uses_distinct_sources() {
    let edges: Vec<(NodeId, NodeId)> = (1..50).map(|n| (n, n + 1)).collect();
    let store = GraphStore::from_edges(50, edges);
    let mut rng = StdRng::seed_from_u64(9);

    let estimate = PathSampler::new(&store).average_shortest_path_length(Some(10), &mut rng);
    assert_eq!(estimate.sources, 10);
    assert!(estimate.sampled);
    assert!(estimate.average >= 1.0);

    let capped = PathSampler::new(&store)
        .with_exact_limit(5)
        .average_shortest_path_length(None, &mut rng);
    assert_eq!(capped.sources, 5);
    assert!(capped.sampled);
}

#[test]
fn test_communities_on_triangles() {
    let store = disconnected_triangles();
    let graph = UndirectedGraph::from_store(&store);
    let mut rng = StdRng::seed_from_u64(21);
    let result = CommunityDetector::default().run(&graph, &mut rng);

    let groups: Vec<Vec<NodeId>> = result.communities().into_values().collect();
    assert_eq!(groups.len(), 2);
    assert!(groups.contains(&vec![1, 2, 3]));
    assert!(groups.contains(&vec![4, 5, 6]));
    assert!(result.modularity() > 0.0);
}

#[test]
fn test_components_on_triangles() {
    let store = disconnected_triangles();
    let graph = UndirectedGraph::from_store(&store);
    let membership = NativeMetrics.component_membership(&graph);
    assert_eq!(membership.component_count(), 2);
    assert!(membership.connected(1, 3));
    assert!(!membership.connected(3, 4));
}

fn edge_lists() -> impl Strategy<Value = (usize, Vec<(NodeId, NodeId)>)> {
    (1usize..40).prop_flat_map(|n| {
        let id = 1..=(n as NodeId);
        (Just(n), prop::collection::vec((id.clone(), id), 0..120))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_edge_count_matches_adjacency((n, edges) in edge_lists()) {
        let store = GraphStore::from_edges(n, edges);
        let total: usize = store.nodes().map(|v| store.out_degree(v)).sum();
        prop_assert_eq!(total, store.edge_count());
        let incoming: usize = store.precompute_in_degrees().iter().sum();
        prop_assert_eq!(incoming, store.edge_count());
    }

    #[test]
    fn prop_in_degree_cache_matches_scan((n, edges) in edge_lists()) {
        let store = GraphStore::from_edges(n, edges);
        let scanned: Vec<usize> = store.nodes().map(|v| store.in_degree(v)).collect();
        prop_assert_eq!(store.precompute_in_degrees(), scanned.as_slice());
    }

    #[test]
    fn prop_bfs_levels_are_consistent((n, edges) in edge_lists(), pick in 0usize..40) {
        let store = GraphStore::from_edges(n, edges);
        let source = (pick % n) as NodeId + 1;
        let distances = PathSampler::new(&store).bfs(source);

        prop_assert_eq!(distances.get(&source), Some(&0));
        for (&u, &du) in &distances {
            for &v in store.neighbors(u) {
                let dv = distances.get(&v);
                prop_assert!(dv.is_some());
                prop_assert!(*dv.unwrap() <= du + 1);
            }
            if du > 0 {
                let has_parent = distances
                    .iter()
                    .any(|(&p, &dp)| dp + 1 == du && store.neighbors(p).contains(&u));
                prop_assert!(has_parent);
            }
        }
    }

    #[test]
    fn prop_spanning_tree_covers_component((n, edges) in edge_lists()) {
        let store = GraphStore::from_edges(n, edges);
        let graph = UndirectedGraph::from_store(&store);
        let tree = SpanningTreeBuilder::new().run(&graph);
        let membership = NativeMetrics.component_membership(&graph);

        let root = tree.root.unwrap();
        let component = membership.component(root).unwrap();
        prop_assert_eq!(tree.visited, membership.sizes[component]);
        prop_assert_eq!(tree.edges.len(), tree.visited - 1);

        let unique: HashSet<_> = tree.edges.iter().copied().collect();
        prop_assert_eq!(unique.len(), tree.edges.len());
        for &(u, v) in &tree.edges {
            prop_assert!(u < v);
            prop_assert!(graph.contains_edge(u, v));
        }
    }

    #[test]
    fn prop_community_modularity_never_drops((n, edges) in edge_lists(), seed in any::<u64>()) {
        let store = GraphStore::from_edges(n, edges);
        let graph = UndirectedGraph::from_store(&store);
        let mut rng = StdRng::seed_from_u64(seed);
        let result = CommunityDetector::default().run(&graph, &mut rng);

        prop_assert_eq!(result.membership.len(), n);
        prop_assert!(result.passes <= 5);
        for pair in result.modularity_by_pass.windows(2) {
            prop_assert!(pair[1] >= pair[0] - 1e-9);
        }
    }
}
