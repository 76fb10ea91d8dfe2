use std::collections::BTreeMap;

use log::{info, warn};
use serde::Serialize;

use crate::as_graph::{ASGraph, ASN};
use crate::conflict_graph::ConflictGraph;
use crate::shared::{EdgeType, Outcomes, RunnerError};
use crate::simulation_engine::{Path, SimulationEngine};
use crate::solvers::{create_solver, SolverKind};

use super::engine_run_config::EngineRunConfig;

/// Result of one solver on one conflict graph
#[derive(Debug, Clone, Serialize)]
pub struct SolverReport {
    pub solver: SolverKind,
    pub status: Outcomes,
    pub elapsed_secs: f64,
    pub solution: BTreeMap<ASN, Path>,
    /// Set when the solver refused the instance
    pub error: Option<String>,
}

impl SolverReport {
    pub fn succeeded(&self) -> bool {
        self.status == Outcomes::Success
    }
}

/// Everything one engine run measured
#[derive(Debug, Clone, Serialize)]
pub struct EngineRunResult {
    pub name: String,
    pub dst: ASN,
    pub as_count: usize,
    pub relationship_count: usize,
    pub simulation_success: bool,
    pub rounds_run: u32,
    pub converged: bool,
    pub permitted_paths: usize,
    pub graph_nodes: usize,
    pub graph_edges: usize,
    pub preference_edges: usize,
    pub conflict_i_edges: usize,
    pub conflict_ii_edges: usize,
    pub reports: Vec<SolverReport>,
}

impl EngineRunResult {
    pub fn report(&self, solver: SolverKind) -> Option<&SolverReport> {
        self.reports.iter().find(|report| report.solver == solver)
    }
}

/// Propagates, builds the conflict graph and runs the configured solvers
pub struct EngineRunner {
    pub config: EngineRunConfig,
}

impl EngineRunner {
    pub fn new(config: EngineRunConfig) -> Self {
        EngineRunner { config }
    }

    /// Solvers only run if propagation stayed within the announcement cap.
    pub fn run(&self, as_graph: &mut ASGraph) -> Result<EngineRunResult, RunnerError> {
        let as_count = as_graph.len();
        let relationship_count = as_graph.edge_count();

        let mut engine = SimulationEngine::new(as_graph)?
            .with_max_rounds(self.config.max_rounds)
            .with_announcement_cap(self.config.announcement_cap);
        engine.setup();
        let simulation_success = engine.run();
        let dst = engine.dst();
        let rounds_run = engine.rounds_run();
        let converged = engine.converged();
        drop(engine);

        let mut result = EngineRunResult {
            name: self.config.name.clone(),
            dst,
            as_count,
            relationship_count,
            simulation_success,
            rounds_run,
            converged,
            permitted_paths: as_graph.total_permitted_paths(),
            graph_nodes: 0,
            graph_edges: 0,
            preference_edges: 0,
            conflict_i_edges: 0,
            conflict_ii_edges: 0,
            reports: Vec::new(),
        };

        if !simulation_success {
            warn!("{}: propagation towards AS {} did not stay within the cap", self.config.name, dst);
            return Ok(result);
        }

        let graph = ConflictGraph::build(as_graph)?;
        result.graph_nodes = graph.node_count();
        result.graph_edges = graph.edge_count();
        result.preference_edges = graph.edge_count_of(EdgeType::Preference);
        result.conflict_i_edges = graph.edge_count_of(EdgeType::ConflictI);
        result.conflict_ii_edges = graph.edge_count_of(EdgeType::ConflictII);

        for &kind in &self.config.solvers {
            result.reports.push(self.run_solver(kind, &graph));
        }

        info!(
            "{}: AS {} done, {}/{} solvers succeeded",
            self.config.name,
            dst,
            result.reports.iter().filter(|report| report.succeeded()).count(),
            result.reports.len()
        );
        Ok(result)
    }

    /// An instance the solver refuses ends up in the report, not as an error.
    fn run_solver(&self, kind: SolverKind, graph: &ConflictGraph) -> SolverReport {
        let solver = create_solver(kind, self.config.exact_node_limit);
        match solver.solve(graph) {
            Ok(outcome) => SolverReport {
                solver: kind,
                status: Outcomes::from(outcome.success),
                elapsed_secs: outcome.elapsed.as_secs_f64(),
                solution: outcome.assignment,
                error: None,
            },
            Err(err) => {
                warn!("{} skipped: {}", kind, err);
                SolverReport {
                    solver: kind,
                    status: Outcomes::Failed,
                    elapsed_secs: 0.0,
                    solution: BTreeMap::new(),
                    error: Some(err.to_string()),
                }
            }
        }
    }
}
