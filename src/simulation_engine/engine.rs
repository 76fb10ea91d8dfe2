use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::as_graph::{ASGraph, ASN};
use crate::shared::ASGraphError;
use crate::simulation_engine::Path;

/// Round based path-vector propagation towards the graph's destination.
///
/// Every AS drains its queue of unannounced paths in ascending ASN order and
/// offers each path to all of its neighbors. The engine stops when the round
/// budget is used up, when a round delivers nothing new, or when the number of
/// accepted deliveries reaches the announcement cap.
pub struct SimulationEngine<'a> {
    pub as_graph: &'a mut ASGraph,
    /// Round budget, the topology diameter if unset
    pub max_rounds: Option<u32>,
    pub announcement_cap: Option<usize>,
    dst: ASN,
    order: Vec<ASN>,
    accepted: usize,
    rounds_run: u32,
    converged: bool,
}

impl<'a> SimulationEngine<'a> {
    /// Fails on a topology without a usable destination, before any propagation.
    pub fn new(as_graph: &'a mut ASGraph) -> Result<Self, ASGraphError> {
        let dst = as_graph.destination()?;
        let order = as_graph.asns();

        Ok(SimulationEngine {
            as_graph,
            max_rounds: None,
            announcement_cap: None,
            dst,
            order,
            accepted: 0,
            rounds_run: 0,
            converged: false,
        })
    }

    /// `None` falls back to the topology diameter.
    pub fn with_max_rounds(mut self, max_rounds: Option<u32>) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// The diameter is only computed when no budget was given.
    pub fn round_budget(&self) -> u32 {
        self.max_rounds.unwrap_or_else(|| self.as_graph.diameter())
    }

    pub fn with_announcement_cap(mut self, cap: Option<usize>) -> Self {
        self.announcement_cap = cap;
        self
    }

    /// Reset all RIBs to the initial state and clear the counters.
    pub fn setup(&mut self) {
        self.as_graph.reset_ribs();
        self.accepted = 0;
        self.rounds_run = 0;
        self.converged = false;
    }

    /// Returns `false` if the announcement cap was reached.
    pub fn run(&mut self) -> bool {
        let max_rounds = self.round_budget();
        info!(
            "Propagating towards AS {} over {} ASes (rounds: {}, cap: {:?})",
            self.dst,
            self.order.len(),
            max_rounds,
            self.announcement_cap
        );

        for round in 0..max_rounds {
            let before = self.accepted;
            let within_cap = self.propagate_round();
            self.rounds_run += 1;

            if !within_cap {
                warn!(
                    "Announcement cap {:?} reached in round {}, giving up",
                    self.announcement_cap, round
                );
                return false;
            }

            debug!(
                "Round {}: {} new paths, {} in total",
                round,
                self.accepted - before,
                self.accepted
            );

            if self.accepted == before {
                self.converged = true;
                break;
            }
        }

        info!(
            "Propagation finished after {} rounds with {} accepted paths (converged: {})",
            self.rounds_run, self.accepted, self.converged
        );
        true
    }

    /// One pass over all ASes. Returns `false` as soon as the cap is reached.
    fn propagate_round(&mut self) -> bool {
        for i in 0..self.order.len() {
            let asn = self.order[i];
            let neighbors: Vec<ASN> = match self.as_graph.get(&asn) {
                Some(as_obj) => as_obj.neighbor_asns().into_iter().collect(),
                None => continue,
            };

            while let Some(path) = self
                .as_graph
                .get_mut(&asn)
                .and_then(|as_obj| as_obj.unannounced.pop_front())
            {
                let within_cap = self.export_to_neighbors(asn, &path, &neighbors);

                if let Some(as_obj) = self.as_graph.get_mut(&asn) {
                    as_obj.announced.push(path);
                }

                if !within_cap {
                    return false;
                }
            }
        }
        true
    }

    fn export_to_neighbors(&mut self, asn: ASN, path: &Path, neighbors: &[ASN]) -> bool {
        for &neighbor in neighbors {
            let new_path = path.extended(neighbor);

            let exported = match self.as_graph.get(&asn) {
                Some(as_obj) => as_obj.export_filter(&new_path),
                None => false,
            };
            if !exported {
                continue;
            }

            if let Some(neighbor_obj) = self.as_graph.get_mut(&neighbor) {
                if neighbor_obj.import_filter(&new_path) {
                    neighbor_obj.unannounced.push_back(new_path);
                    self.accepted += 1;

                    if let Some(cap) = self.announcement_cap {
                        if self.accepted >= cap {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    pub fn dst(&self) -> ASN {
        self.dst
    }

    /// Deliveries accepted since the last setup
    pub fn accepted_announcements(&self) -> usize {
        self.accepted
    }

    pub fn rounds_run(&self) -> u32 {
        self.rounds_run
    }

    /// True if a round finished without any new delivery.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Permitted paths of every AS, in RIB order.
    pub fn get_permitted_path_snapshot(&self) -> BTreeMap<ASN, Vec<Path>> {
        self.as_graph
            .iter()
            .map(|as_obj| (as_obj.asn, as_obj.permitted_paths()))
            .collect()
    }
}
