use serde::{Deserialize, Serialize};

use crate::shared::{RunnerError, Settings};
use crate::solvers::exact::DEFAULT_NODE_LIMIT;
use crate::solvers::SolverKind;

pub const DEFAULT_ANNOUNCEMENT_CAP: usize = 5000;

/// Configuration for a single engine run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineRunConfig {
    /// Name for this engine run
    pub name: String,

    /// Propagation rounds, the topology diameter if unset
    pub max_rounds: Option<u32>,

    /// Accepted paths after which propagation gives up
    pub announcement_cap: Option<usize>,

    /// Solvers to run on the conflict graph, in order
    pub solvers: Vec<SolverKind>,

    /// Largest conflict graph the exact solver accepts
    pub exact_node_limit: usize,

    /// Policy for topologies built through generators
    pub settings: Settings,
}

impl Default for EngineRunConfig {
    fn default() -> Self {
        EngineRunConfig {
            name: "engine_run".to_string(),
            max_rounds: None,
            announcement_cap: Some(DEFAULT_ANNOUNCEMENT_CAP),
            solvers: vec![SolverKind::Greedy, SolverKind::GreedyPlus, SolverKind::GraphBased],
            exact_node_limit: DEFAULT_NODE_LIMIT,
            settings: Settings::default(),
        }
    }
}

impl EngineRunConfig {
    pub fn new(name: &str) -> Self {
        EngineRunConfig {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_max_rounds(mut self, rounds: Option<u32>) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn with_announcement_cap(mut self, cap: Option<usize>) -> Self {
        self.announcement_cap = cap;
        self
    }

    pub fn with_solvers(mut self, solvers: Vec<SolverKind>) -> Self {
        self.solvers = solvers;
        self
    }

    pub fn with_exact_node_limit(mut self, limit: usize) -> Self {
        self.exact_node_limit = limit;
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, RunnerError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, RunnerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
