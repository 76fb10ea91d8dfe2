//! Solvers searching a stable path assignment on a [`ConflictGraph`].
//!
//! Every solver returns the chosen paths, whether all ASes got one, and the
//! time spent searching.

pub mod exact;
pub mod graph_based;
pub mod greedy;
pub mod greedy_plus;

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::as_graph::ASN;
use crate::conflict_graph::ConflictGraph;
use crate::shared::SolverError;
use crate::simulation_engine::Path;

pub use exact::ExactSolver;
pub use graph_based::GraphSolver;
pub use greedy::GreedySolver;
pub use greedy_plus::GreedyPlusSolver;

/// Chosen path per AS
pub type Assignment = BTreeMap<ASN, Path>;

#[derive(Debug, Clone, Serialize)]
pub struct SolverOutcome {
    pub assignment: Assignment,
    pub success: bool,
    pub elapsed: Duration,
}

impl SolverOutcome {
    /// Successful only if `paths` holds exactly one path for each of the
    /// `as_count` ASes. Later paths of an already assigned AS are dropped.
    pub fn from_paths(paths: Vec<Path>, as_count: usize, elapsed: Duration) -> Self {
        let selected = paths.len();
        let mut assignment = Assignment::new();
        for path in paths {
            if let Some(holder) = path.holder() {
                if assignment.contains_key(&holder) {
                    warn!("Dropping second path {} selected for AS {}", path, holder);
                    continue;
                }
                assignment.insert(holder, path);
            }
        }

        let success = selected == as_count && assignment.len() == as_count;
        SolverOutcome {
            assignment,
            success,
            elapsed,
        }
    }

    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }
}

pub trait Solver {
    fn name(&self) -> &str;

    /// Select paths, at most one per AS for a consistent answer.
    fn find(&self, graph: &ConflictGraph) -> Result<Vec<Path>, SolverError>;

    /// Run [`Solver::find`] and time it.
    fn solve(&self, graph: &ConflictGraph) -> Result<SolverOutcome, SolverError> {
        let start = Instant::now();
        let paths = self.find(graph)?;
        let elapsed = start.elapsed();

        let outcome = SolverOutcome::from_paths(paths, graph.as_count(), elapsed);
        info!(
            "{} [{} in {:.6}s]: {}/{} ASes assigned",
            self.name(),
            if outcome.success { "SUCCESS" } else { "FAILED" },
            elapsed.as_secs_f64(),
            outcome.len(),
            graph.as_count()
        );
        Ok(outcome)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SolverKind {
    Greedy,
    GreedyPlus,
    GraphBased,
    Exact,
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolverKind::Greedy => "Greedy",
            SolverKind::GreedyPlus => "Greedy+",
            SolverKind::GraphBased => "Greedy++",
            SolverKind::Exact => "Exact",
        };
        write!(f, "{}", s)
    }
}

/// Create a solver based on its kind
pub fn create_solver(kind: SolverKind, exact_node_limit: usize) -> Box<dyn Solver> {
    match kind {
        SolverKind::Greedy => Box::new(GreedySolver),
        SolverKind::GreedyPlus => Box::new(GreedyPlusSolver),
        SolverKind::GraphBased => Box::new(GraphSolver),
        SolverKind::Exact => Box::new(ExactSolver::new(exact_node_limit)),
    }
}
