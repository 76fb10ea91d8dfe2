pub mod data_tracker;
pub mod simulation;
pub mod simulation_config;

pub use data_tracker::{DataTracker, SolverStats, TrialRecord};
pub use simulation::Simulation;
pub use simulation_config::SimulationConfig;
