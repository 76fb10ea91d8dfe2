use serde::{Deserialize, Serialize};

use crate::as_graph::ASN;
use crate::engine_runner::EngineRunConfig;
use crate::shared::RunnerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Label used in logs and summaries
    pub label: String,

    /// Random stub destinations to draw when no destinations are given
    pub num_trials: usize,

    /// Run exactly these destinations instead of random stubs
    pub destinations: Option<Vec<ASN>>,

    /// Seed for drawing destinations
    pub seed: u64,

    /// Whether to draw a progress bar on stderr
    pub show_progress: bool,

    /// Settings for every engine run
    pub run_config: EngineRunConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            label: "simulation".to_string(),
            num_trials: 10,
            destinations: None,
            seed: 0,
            show_progress: true,
            run_config: EngineRunConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn new(label: &str) -> Self {
        SimulationConfig {
            label: label.to_string(),
            ..Default::default()
        }
    }

    pub fn with_num_trials(mut self, trials: usize) -> Self {
        self.num_trials = trials;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<ASN>) -> Self {
        self.destinations = Some(destinations);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_run_config(mut self, run_config: EngineRunConfig) -> Self {
        self.run_config = run_config;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, RunnerError> {
        Ok(serde_json::from_str(json)?)
    }
}
