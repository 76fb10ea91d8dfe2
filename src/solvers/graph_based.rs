//! Independent set search driven by the out-degree of the conflict graph.
//!
//! Each iteration selects a batch of paths, adds them to the solution and
//! removes them together with their neighbors. The batch is the first
//! non-empty one of:
//!
//! 1. paths without outgoing edges,
//! 2. paths without any incoming or outgoing preference edge,
//! 3. paths with the minimum out-degree.
//!
//! The search stops once it holds one path per AS or no path is left.

use std::fmt;

use log::trace;
use serde::Serialize;

use crate::conflict_graph::{ConflictGraph, PathId};
use crate::shared::{EdgeType, SolverError};
use crate::simulation_engine::Path;
use crate::solvers::Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BatchRule {
    ZeroOutDegree,
    NoPreference,
    MinOutDegree,
}

impl fmt::Display for BatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BatchRule::ZeroOutDegree => "zero out-degree",
            BatchRule::NoPreference => "no preference edge",
            BatchRule::MinOutDegree => "minimum out-degree",
        };
        write!(f, "{}", s)
    }
}

/// One iteration of the search
#[derive(Debug, Clone, Serialize)]
pub struct Iteration {
    pub rule: BatchRule,
    pub batch: Vec<PathId>,
    /// Paths still alive after the batch and its neighbors were removed
    pub remaining: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphSolverRun {
    pub solution: Vec<PathId>,
    pub iterations: Vec<Iteration>,
}

/// Removal overlay on top of an immutable [`ConflictGraph`].
///
/// Degrees count parallel edges separately and only edges whose both ends
/// are alive.
struct ResidualGraph<'a> {
    graph: &'a ConflictGraph,
    alive: Vec<bool>,
    alive_count: usize,
    out_degree: Vec<usize>,
    pref_degree: Vec<usize>,
}

impl<'a> ResidualGraph<'a> {
    fn new(graph: &'a ConflictGraph) -> Self {
        let n = graph.node_count();
        let mut out_degree = vec![0; n];
        let mut pref_degree = vec![0; n];
        for edge in graph.edges() {
            out_degree[edge.source] += 1;
            if edge.edge_type == EdgeType::Preference {
                pref_degree[edge.source] += 1;
                pref_degree[edge.target] += 1;
            }
        }

        ResidualGraph {
            graph,
            alive: vec![true; n],
            alive_count: n,
            out_degree,
            pref_degree,
        }
    }

    fn alive_nodes(&self) -> impl Iterator<Item = PathId> + '_ {
        (0..self.alive.len()).filter(move |&id| self.alive[id])
    }

    fn next_batch(&self) -> Option<(BatchRule, Vec<PathId>)> {
        let sinks: Vec<PathId> = self
            .alive_nodes()
            .filter(|&id| self.out_degree[id] == 0)
            .collect();
        if !sinks.is_empty() {
            return Some((BatchRule::ZeroOutDegree, sinks));
        }

        let unranked: Vec<PathId> = self
            .alive_nodes()
            .filter(|&id| self.pref_degree[id] == 0)
            .collect();
        if !unranked.is_empty() {
            return Some((BatchRule::NoPreference, unranked));
        }

        let min = self.alive_nodes().map(|id| self.out_degree[id]).min()?;
        let lowest = self
            .alive_nodes()
            .filter(|&id| self.out_degree[id] == min)
            .collect();
        Some((BatchRule::MinOutDegree, lowest))
    }

    /// Alive successors and predecessors of `id`, each listed once
    fn neighbors(&self, id: PathId) -> Vec<PathId> {
        let successors = self.graph.out_edges(id).map(|edge| edge.target);
        let predecessors = self.graph.in_edges(id).map(|edge| edge.source);
        let mut neighbors: Vec<PathId> = successors
            .chain(predecessors)
            .filter(|&other| self.alive[other])
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    fn remove(&mut self, id: PathId) {
        if !self.alive[id] {
            return;
        }
        self.alive[id] = false;
        self.alive_count -= 1;

        for edge in self.graph.in_edges(id) {
            if self.alive[edge.source] {
                self.out_degree[edge.source] -= 1;
                if edge.edge_type == EdgeType::Preference {
                    self.pref_degree[edge.source] -= 1;
                }
            }
        }
        for edge in self.graph.out_edges(id) {
            if self.alive[edge.target] && edge.edge_type == EdgeType::Preference {
                self.pref_degree[edge.target] -= 1;
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GraphSolver;

impl GraphSolver {
    /// Run the search and keep a record of every iteration.
    pub fn run(&self, graph: &ConflictGraph) -> GraphSolverRun {
        let as_count = graph.as_count();
        let mut residual = ResidualGraph::new(graph);
        let mut run = GraphSolverRun::default();

        while run.solution.len() < as_count && residual.alive_count > 0 {
            let Some((rule, batch)) = residual.next_batch() else {
                break;
            };

            // Neighborhoods are taken before anything of the batch is removed
            let neighborhoods: Vec<Vec<PathId>> =
                batch.iter().map(|&id| residual.neighbors(id)).collect();
            for (&id, neighbors) in batch.iter().zip(neighborhoods) {
                for neighbor in neighbors {
                    residual.remove(neighbor);
                }
                residual.remove(id);
            }

            trace!(
                "Iteration {}: {} paths by {}, {} left",
                run.iterations.len() + 1,
                batch.len(),
                rule,
                residual.alive_count
            );
            run.solution.extend(batch.iter().copied());
            run.iterations.push(Iteration {
                rule,
                batch,
                remaining: residual.alive_count,
            });
        }

        run
    }
}

impl Solver for GraphSolver {
    fn name(&self) -> &str {
        "Greedy++"
    }

    fn find(&self, graph: &ConflictGraph) -> Result<Vec<Path>, SolverError> {
        let run = self.run(graph);
        Ok(run
            .solution
            .into_iter()
            .map(|id| graph.path(id).clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_edges_give_one_neighbor() {
        let mut graph = ConflictGraph::new(0);
        graph.add_path(Path::new(vec![0]));
        let direct = graph.add_path(Path::new(vec![0, 1]));
        let detour = graph.add_path(Path::new(vec![0, 2, 1]));
        graph.add_edge(detour, direct, EdgeType::Preference);
        graph.add_edge(detour, direct, EdgeType::ConflictI);
        graph.add_edge(direct, detour, EdgeType::ConflictI);

        let mut residual = ResidualGraph::new(&graph);
        assert_eq!(residual.neighbors(direct), vec![detour]);
        assert_eq!(residual.out_degree[detour], 2);

        residual.remove(detour);
        assert!(residual.neighbors(direct).is_empty());
        assert_eq!(residual.out_degree[direct], 0);
        assert_eq!(residual.pref_degree[direct], 0);
    }
}
