use std::env;
use std::error::Error;
use std::fs;

use log::info;

use sppsimulator::as_graph_generators::{ASGraphGenerator, ExampleTopology};
use sppsimulator::engine_runner::{EngineRunConfig, EngineRunner};
use sppsimulator::simulation_framework::{Simulation, SimulationConfig};
use sppsimulator::solvers::SolverKind;

/// Runs the example topology once towards AS 0, then towards every AS.
/// An optional first argument names a JSON engine run config.
fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => EngineRunConfig::from_json(&fs::read_to_string(path)?)?,
        None => EngineRunConfig::new("example").with_solvers(vec![
            SolverKind::Greedy,
            SolverKind::GreedyPlus,
            SolverKind::GraphBased,
            SolverKind::Exact,
        ]),
    };

    let mut as_graph = ExampleTopology::new()
        .with_settings(config.settings)
        .generate()?;
    info!(
        "Example topology: {} ASes, {} relationships",
        as_graph.len(),
        as_graph.edge_count()
    );

    let result = EngineRunner::new(config.clone()).run(&mut as_graph)?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    let destinations = as_graph.asns();
    let sim_config = SimulationConfig::new("example_all_destinations")
        .with_destinations(destinations)
        .with_run_config(config);
    let tracker = Simulation::new(as_graph).with_config(sim_config).run()?;

    for (solver, stats) in &tracker.solver_stats {
        println!(
            "{:<10} success {:>6.2}%  mean {:.6}s",
            solver.to_string(),
            stats.success_rate(),
            stats.mean_elapsed_secs()
        );
    }
    Ok(())
}
