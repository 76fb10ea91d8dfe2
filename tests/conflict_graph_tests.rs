use sppsimulator::as_graph::ASGraph;
use sppsimulator::as_graph_generators::{ASGraphGenerator, ExampleTopology};
use sppsimulator::conflict_graph::{ConflictGraph, ConflictGraphBuilder};
use sppsimulator::shared::{ASGraphError, EdgeType, Relationships, Settings};
use sppsimulator::simulation_engine::{Path, SimulationEngine};

/// Example topology after propagation towards AS 0
fn create_simulated_graph() -> ASGraph {
    let mut as_graph = ExampleTopology::new().generate().unwrap();
    let mut engine = SimulationEngine::new(&mut as_graph).unwrap();
    engine.setup();
    assert!(engine.run());
    as_graph
}

#[test]
fn test_example_graph_size() {
    let as_graph = create_simulated_graph();
    let graph = ConflictGraph::build(&as_graph).unwrap();

    assert_eq!(graph.dst(), 0);
    assert_eq!(graph.as_count(), 8);
    assert_eq!(graph.node_count(), 70);
    assert_eq!(graph.edge_count(), 1946);
    assert_eq!(graph.edge_count_of(EdgeType::Preference), 407);
    assert_eq!(graph.edge_count_of(EdgeType::ConflictI), 1132);
    assert_eq!(graph.edge_count_of(EdgeType::ConflictII), 407);
}

#[test]
fn test_ranked_paths_follow_the_ribs() {
    let as_graph = create_simulated_graph();
    let graph = ConflictGraph::build(&as_graph).unwrap();

    for as_obj in as_graph.iter() {
        let ranked: Vec<Path> = graph.ranked_paths(as_obj.asn).cloned().collect();
        assert_eq!(ranked, as_obj.ranked_permitted_paths());
    }
    assert_eq!(graph.ranked_ids(0).len(), 1);
    assert_eq!(graph.ranked_ids(42).len(), 0);
}

#[test]
fn test_preference_edges_point_at_better_paths() {
    let as_graph = create_simulated_graph();
    let graph = ConflictGraph::build(&as_graph).unwrap();

    for edge in graph.edges() {
        if edge.edge_type != EdgeType::Preference {
            continue;
        }
        let holder = graph.path(edge.source).holder().unwrap();
        assert_eq!(graph.path(edge.target).holder(), Some(holder));

        let ranked = graph.ranked_ids(holder);
        let source_rank = ranked.iter().position(|&id| id == edge.source).unwrap();
        let target_rank = ranked.iter().position(|&id| id == edge.target).unwrap();
        assert!(target_rank < source_rank);
    }

    // Every pair of paths of one AS is ranked exactly once
    let pairs: usize = graph
        .ases()
        .map(|asn| {
            let n = graph.ranked_ids(asn).len();
            n * n.saturating_sub(1) / 2
        })
        .sum();
    assert_eq!(graph.edge_count_of(EdgeType::Preference), pairs);
}

#[test]
fn test_conflict_edges_cross_ases() {
    let as_graph = create_simulated_graph();
    let graph = ConflictGraph::build(&as_graph).unwrap();

    for edge in graph.edges() {
        let source = graph.path(edge.source);
        let target = graph.path(edge.target);
        match edge.edge_type {
            EdgeType::Preference => {}
            EdgeType::ConflictI => assert_ne!(source.holder(), target.holder()),
            EdgeType::ConflictII => {
                // The target is the upstream path of a rival of the source
                let holder = source.holder().unwrap();
                assert!(graph.ranked_paths(holder).any(|rival| target.is_parent_of(rival)));
                assert_ne!(source.holder(), target.holder());
            }
        }
    }
}

#[test]
fn test_small_graph_edges() {
    // 1 and 2 both connect to the destination and peer with each other
    let mut as_graph = ASGraph::from_edges(
        vec![
            (0, 1, Relationships::Providers),
            (0, 2, Relationships::Providers),
            (1, 2, Relationships::Peers),
        ],
        Settings::GaoRexford,
    );
    as_graph.set_dst(0).unwrap();
    let mut engine = SimulationEngine::new(&mut as_graph).unwrap();
    engine.setup();
    engine.run();
    drop(engine);

    let graph = ConflictGraph::build(&as_graph).unwrap();
    let id = |raw: Vec<u32>| graph.path_id(&Path::new(raw)).unwrap();

    assert_eq!(graph.node_count(), 5);
    let (d, p1, p21, p2, p12) = (id(vec![0]), id(vec![0, 1]), id(vec![0, 2, 1]), id(vec![0, 2]), id(vec![0, 1, 2]));
    assert_eq!(graph.ranked_ids(1), &[p1, p21]);
    assert_eq!(graph.ranked_ids(2), &[p2, p12]);

    assert!(graph.has_edge(p21, p1, EdgeType::Preference));
    assert!(graph.has_edge(p12, p2, EdgeType::Preference));

    // (0, 2, 1) builds on (0, 2), which AS 2 ranks against (0, 1, 2)
    assert!(graph.has_edge(p21, p12, EdgeType::ConflictI));
    // Taking (0, 1, 2) commits AS 1 to (0, 1), ranked against (0, 2, 1)
    assert!(graph.has_edge(p12, p21, EdgeType::ConflictI));
    // AS 2 prefers (0, 2) over (0, 1, 2), whose upstream path is (0, 1)
    assert!(graph.has_edge(p2, p1, EdgeType::ConflictII));
    assert!(graph.has_edge(p1, p2, EdgeType::ConflictII));
    assert!(!graph.has_edge(d, p1, EdgeType::ConflictI));
    assert_eq!(graph.edge_count(), 6);
}

#[test]
fn test_add_path_deduplicates() {
    let mut graph = ConflictGraph::new(0);
    let a = graph.add_path(Path::new(vec![0, 1]));
    let b = graph.add_path(Path::new(vec![0, 1]));
    assert_eq!(a, b);
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.ranked_ids(1), &[a]);

    graph.add_edge(a, a, EdgeType::ConflictI);
    graph.add_edge(a, a, EdgeType::ConflictI);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.successors_of_type(a, EdgeType::ConflictI), vec![a, a]);
}

#[test]
fn test_builder_requires_destination() {
    let as_graph = ASGraph::from_edges(vec![(1, 2, Relationships::Peers)], Settings::Bgp);
    assert!(matches!(
        ConflictGraphBuilder::new(&as_graph),
        Err(ASGraphError::MissingDestination)
    ));
}
