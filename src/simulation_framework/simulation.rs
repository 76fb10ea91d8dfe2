use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::as_graph::{ASGraph, ASN};
use crate::engine_runner::{EngineRunConfig, EngineRunner};
use crate::shared::RunnerError;

use super::data_tracker::DataTracker;
use super::simulation_config::SimulationConfig;

/// Engine runs for several destinations of one topology
pub struct Simulation {
    pub config: SimulationConfig,

    /// Topology shared by all runs, its destination is replaced per trial
    pub as_graph: ASGraph,
}

impl Simulation {
    pub fn new(as_graph: ASGraph) -> Self {
        Simulation {
            config: SimulationConfig::default(),
            as_graph,
        }
    }

    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Configured destinations, or `num_trials` stubs drawn with the seed.
    pub fn destinations(&self) -> Vec<ASN> {
        if let Some(destinations) = &self.config.destinations {
            return destinations.clone();
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        (0..self.config.num_trials)
            .filter_map(|_| self.as_graph.random_stub(&mut rng))
            .collect()
    }

    /// Run the complete simulation
    pub fn run(&mut self) -> Result<DataTracker, RunnerError> {
        let destinations = self.destinations();
        info!(
            "Running {} over {} destinations",
            self.config.label,
            destinations.len()
        );
        let start_time = Instant::now();

        let pb = if self.config.show_progress {
            ProgressBar::new(destinations.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} destinations")?
                .progress_chars("##-"),
        );

        let mut tracker = DataTracker::new(self.config.label.clone());
        for (trial, dst) in destinations.into_iter().enumerate() {
            self.as_graph.set_dst(dst)?;

            let run_config = self.config.run_config.clone();
            let runner = EngineRunner::new(EngineRunConfig {
                name: format!("{}_{}_as{}", self.config.label, trial, dst),
                ..run_config
            });
            let result = runner.run(&mut self.as_graph)?;
            tracker.add_result(&result);
            pb.inc(1);
        }
        pb.finish();

        info!(
            "{} complete in {:.2}s",
            self.config.label,
            start_time.elapsed().as_secs_f64()
        );
        Ok(tracker)
    }
}
