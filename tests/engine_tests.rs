use std::collections::{BTreeMap, BTreeSet};

use sppsimulator::as_graph::{ASGraph, ASN};
use sppsimulator::as_graph_generators::{ASGraphGenerator, ExampleTopology};
use sppsimulator::shared::{ASGraphError, Relationships, Settings};
use sppsimulator::simulation_engine::{Path, SimulationEngine};

fn create_example_graph() -> ASGraph {
    ExampleTopology::new().generate().unwrap()
}

fn as_sets(snapshot: BTreeMap<ASN, Vec<Path>>) -> BTreeMap<ASN, BTreeSet<Path>> {
    snapshot
        .into_iter()
        .map(|(asn, paths)| (asn, paths.into_iter().collect()))
        .collect()
}

#[test]
fn test_example_propagation() {
    let mut as_graph = create_example_graph();
    let mut engine = SimulationEngine::new(&mut as_graph).unwrap();
    assert_eq!(engine.max_rounds, None);
    assert_eq!(engine.round_budget(), 2);

    engine.setup();
    assert!(engine.run());
    assert_eq!(engine.accepted_announcements(), 69);
    assert_eq!(engine.rounds_run(), 2);

    let snapshot = engine.get_permitted_path_snapshot();
    assert_eq!(snapshot[&0], vec![Path::origin(0)]);
    assert!(snapshot[&3].contains(&Path::new(vec![0, 3])));
    assert!(snapshot[&6].contains(&Path::new(vec![0, 3, 6])));
    assert_eq!(snapshot.values().map(Vec::len).sum::<usize>(), 70);
}

#[test]
fn test_configured_round_budget_overrides_diameter() {
    let mut as_graph = create_example_graph();
    let mut engine = SimulationEngine::new(&mut as_graph)
        .unwrap()
        .with_max_rounds(Some(1));
    assert_eq!(engine.max_rounds, Some(1));
    assert_eq!(engine.round_budget(), 1);

    engine.setup();
    assert!(engine.run());
    assert_eq!(engine.rounds_run(), 1);
    assert!(!engine.converged());

    let engine = engine.with_max_rounds(None);
    assert_eq!(engine.round_budget(), 2);
}

#[test]
fn test_diameter_rounds_reach_final_paths() {
    let mut short = create_example_graph();
    let mut engine = SimulationEngine::new(&mut short).unwrap();
    engine.setup();
    assert!(engine.run());
    let short_snapshot = as_sets(engine.get_permitted_path_snapshot());

    let mut long = create_example_graph();
    let mut engine = SimulationEngine::new(&mut long)
        .unwrap()
        .with_max_rounds(Some(20));
    engine.setup();
    assert!(engine.run());
    assert!(engine.converged());
    assert!(engine.rounds_run() < 20);
    assert_eq!(engine.accepted_announcements(), 69);

    assert_eq!(short_snapshot, as_sets(engine.get_permitted_path_snapshot()));
}

#[test]
fn test_permitted_path_shape() {
    let mut as_graph = create_example_graph();
    let mut engine = SimulationEngine::new(&mut as_graph).unwrap();
    engine.setup();
    engine.run();

    for (asn, paths) in engine.get_permitted_path_snapshot() {
        for path in paths {
            assert_eq!(path[0], 0, "{} at AS {}", path, asn);
            assert_eq!(path.holder(), Some(asn));
            let distinct: BTreeSet<&ASN> = path.iter().collect();
            assert_eq!(distinct.len(), path.len(), "loop in {}", path);
        }
    }
}

#[test]
fn test_permitted_paths_are_valley_free() {
    let mut as_graph = create_example_graph();
    let mut engine = SimulationEngine::new(&mut as_graph).unwrap();
    engine.setup();
    engine.run();
    let snapshot = engine.get_permitted_path_snapshot();
    drop(engine);

    for paths in snapshot.values() {
        for path in paths {
            // Every transit hop received from or sent to one of its customers
            for i in 1..path.len() - 1 {
                let transit = as_graph.get(&path[i]).unwrap();
                let from = transit.relationship_to(path[i - 1]);
                let to = transit.relationship_to(path[i + 1]);
                assert!(
                    from == Some(Relationships::Customers) || to == Some(Relationships::Customers),
                    "valley at AS {} in {}",
                    path[i],
                    path
                );
            }
        }
    }
}

#[test]
fn test_propagation_is_idempotent() {
    let mut as_graph = create_example_graph();
    let mut engine = SimulationEngine::new(&mut as_graph).unwrap();
    engine.setup();
    engine.run();
    let first = engine.get_permitted_path_snapshot();
    let first_accepted = engine.accepted_announcements();

    engine.setup();
    engine.run();
    assert_eq!(engine.get_permitted_path_snapshot(), first);
    assert_eq!(engine.accepted_announcements(), first_accepted);
}

#[test]
fn test_announcement_cap() {
    let mut as_graph = create_example_graph();
    let mut engine = SimulationEngine::new(&mut as_graph)
        .unwrap()
        .with_announcement_cap(Some(10));
    engine.setup();

    assert!(!engine.run());
    assert_eq!(engine.accepted_announcements(), 10);
    assert!(!engine.converged());
}

#[test]
fn test_missing_destination() {
    let mut as_graph = ASGraph::from_edges(vec![(1, 2, Relationships::Providers)], Settings::GaoRexford);
    assert!(matches!(
        SimulationEngine::new(&mut as_graph),
        Err(ASGraphError::MissingDestination)
    ));

    as_graph.dst = Some(99);
    assert!(matches!(
        SimulationEngine::new(&mut as_graph),
        Err(ASGraphError::UnknownDestination(99))
    ));
}

#[test]
fn test_bgp_permits_more_paths() {
    let mut gao_rexford = create_example_graph();
    let mut engine = SimulationEngine::new(&mut gao_rexford).unwrap();
    engine.setup();
    engine.run();
    drop(engine);

    let mut bgp = ExampleTopology::new()
        .with_settings(Settings::Bgp)
        .generate()
        .unwrap();
    let mut engine = SimulationEngine::new(&mut bgp)
        .unwrap()
        .with_max_rounds(Some(10));
    engine.setup();
    assert!(engine.run());
    assert!(engine.converged());
    drop(engine);

    assert!(bgp.total_permitted_paths() > gao_rexford.total_permitted_paths());
}
