use std::collections::BTreeMap;

use serde::Serialize;

use crate::as_graph::ASN;
use crate::engine_runner::EngineRunResult;
use crate::shared::RunnerError;
use crate::solvers::SolverKind;

/// Outcome of one destination
#[derive(Debug, Clone, Serialize)]
pub struct TrialRecord {
    pub dst: ASN,
    pub simulation_success: bool,
    pub permitted_paths: usize,
    pub graph_edges: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SolverStats {
    pub runs: usize,
    pub successes: usize,
    pub total_elapsed_secs: f64,
}

impl SolverStats {
    /// Percentage of successful runs
    pub fn success_rate(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        (self.successes as f64) / (self.runs as f64) * 100.0
    }

    pub fn mean_elapsed_secs(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.total_elapsed_secs / (self.runs as f64)
    }
}

#[derive(Debug, Default, Serialize)]
pub struct DataTracker {
    /// Simulation label
    pub label: String,

    /// One record per destination, in run order
    pub trials: Vec<TrialRecord>,

    /// Aggregates per solver
    pub solver_stats: BTreeMap<SolverKind, SolverStats>,
}

impl DataTracker {
    pub fn new(label: String) -> Self {
        DataTracker {
            label,
            trials: Vec::new(),
            solver_stats: BTreeMap::new(),
        }
    }

    pub fn add_result(&mut self, result: &EngineRunResult) {
        self.trials.push(TrialRecord {
            dst: result.dst,
            simulation_success: result.simulation_success,
            permitted_paths: result.permitted_paths,
            graph_edges: result.graph_edges,
        });

        for report in &result.reports {
            let stats = self.solver_stats.entry(report.solver).or_default();
            stats.runs += 1;
            stats.total_elapsed_secs += report.elapsed_secs;
            if report.succeeded() {
                stats.successes += 1;
            }
        }
    }

    /// Percentage of destinations whose propagation stayed within the cap
    pub fn simulation_success_rate(&self) -> f64 {
        if self.trials.is_empty() {
            return 0.0;
        }
        let successes = self
            .trials
            .iter()
            .filter(|trial| trial.simulation_success)
            .count();
        (successes as f64) / (self.trials.len() as f64) * 100.0
    }

    pub fn success_rate(&self, solver: SolverKind) -> f64 {
        self.solver_stats
            .get(&solver)
            .map_or(0.0, SolverStats::success_rate)
    }

    pub fn mean_elapsed_secs(&self, solver: SolverKind) -> f64 {
        self.solver_stats
            .get(&solver)
            .map_or(0.0, SolverStats::mean_elapsed_secs)
    }

    pub fn to_json(&self) -> Result<String, RunnerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
