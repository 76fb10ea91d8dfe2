// Re-export all public modules
pub mod shared;
pub mod as_graph;
pub mod as_graph_generators;
pub mod policies;
pub mod simulation_engine;
pub mod conflict_graph;
pub mod solvers;
pub mod engine_runner;
pub mod simulation_framework;

// Re-export commonly used types at the crate root
pub use as_graph::{AS, ASGraph, ASN};
pub use conflict_graph::{ConflictGraph, ConflictGraphBuilder};
pub use shared::{ASGraphError, EdgeType, Outcomes, Relationships, RunnerError, Settings, SolverError};
pub use simulation_engine::{Path, SimulationEngine};
pub use solvers::{Solver, SolverKind, SolverOutcome};
