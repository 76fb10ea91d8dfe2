use log::debug;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::conflict_graph::{ConflictGraph, PathId};
use crate::shared::SolverError;
use crate::simulation_engine::Path;
use crate::solvers::Solver;

pub const DEFAULT_NODE_LIMIT: usize = 128;

/// Maximum independent set of the conflict graph, ignoring edge direction
/// and type. Exponential, meant for validating the heuristics on small
/// instances.
#[derive(Debug, Clone)]
pub struct ExactSolver {
    pub node_limit: usize,
}

impl Default for ExactSolver {
    fn default() -> Self {
        ExactSolver::new(DEFAULT_NODE_LIMIT)
    }
}

impl ExactSolver {
    pub fn new(node_limit: usize) -> Self {
        ExactSolver { node_limit }
    }

    /// Simple undirected view of the conflict graph. Node weights are the
    /// path ids.
    pub fn undirected(graph: &ConflictGraph) -> UnGraph<PathId, ()> {
        let mut undirected = UnGraph::with_capacity(graph.node_count(), graph.edge_count());
        for id in 0..graph.node_count() {
            undirected.add_node(id);
        }
        for edge in graph.edges() {
            if edge.source != edge.target {
                undirected.update_edge(NodeIndex::new(edge.source), NodeIndex::new(edge.target), ());
            }
        }
        undirected
    }

    pub fn maximum_independent_set(&self, graph: &ConflictGraph) -> Result<Vec<PathId>, SolverError> {
        if graph.node_count() > self.node_limit {
            return Err(SolverError::InstanceTooLarge {
                nodes: graph.node_count(),
                limit: self.node_limit,
            });
        }

        let undirected = ExactSolver::undirected(graph);
        let adjacency: Vec<Vec<usize>> = undirected
            .node_indices()
            .map(|node| undirected.neighbors(node).map(|n| n.index()).collect())
            .collect();

        let mut search = BranchAndBound {
            adjacency: &adjacency,
            best: Vec::new(),
            visited: 0,
        };
        search.branch(vec![true; adjacency.len()], Vec::new());
        debug!(
            "Exact search visited {} branches, independent set of {} paths",
            search.visited,
            search.best.len()
        );

        let mut best = search.best;
        best.sort_unstable();
        Ok(best.into_iter().map(|node| undirected[NodeIndex::new(node)]).collect())
    }
}

struct BranchAndBound<'a> {
    adjacency: &'a [Vec<usize>],
    best: Vec<usize>,
    visited: usize,
}

impl BranchAndBound<'_> {
    fn degree(&self, node: usize, alive: &[bool]) -> usize {
        self.adjacency[node].iter().filter(|&&n| alive[n]).count()
    }

    /// Take `node` into the set, dropping it and its neighbors.
    fn take(&self, node: usize, alive: &mut [bool], current: &mut Vec<usize>) {
        current.push(node);
        alive[node] = false;
        for &n in &self.adjacency[node] {
            alive[n] = false;
        }
    }

    fn branch(&mut self, mut alive: Vec<bool>, mut current: Vec<usize>) {
        self.visited += 1;

        // Vertices of degree zero or one always belong to some maximum set
        while let Some(node) =
            (0..alive.len()).find(|&node| alive[node] && self.degree(node, &alive) <= 1)
        {
            self.take(node, &mut alive, &mut current);
        }

        let remaining = alive.iter().filter(|&&a| a).count();
        if remaining == 0 {
            if current.len() > self.best.len() {
                self.best = current;
            }
            return;
        }
        if current.len() + remaining <= self.best.len() {
            return;
        }

        let mut pivot = 0;
        let mut pivot_degree = 0;
        for node in (0..alive.len()).filter(|&node| alive[node]) {
            let degree = self.degree(node, &alive);
            if degree > pivot_degree {
                pivot = node;
                pivot_degree = degree;
            }
        }

        let mut with_alive = alive.clone();
        let mut with_current = current.clone();
        self.take(pivot, &mut with_alive, &mut with_current);
        self.branch(with_alive, with_current);

        alive[pivot] = false;
        self.branch(alive, current);
    }
}

impl Solver for ExactSolver {
    fn name(&self) -> &str {
        "Exact"
    }

    fn find(&self, graph: &ConflictGraph) -> Result<Vec<Path>, SolverError> {
        Ok(self
            .maximum_independent_set(graph)?
            .into_iter()
            .map(|id| graph.path(id).clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::EdgeType;

    #[test]
    fn test_independent_set_of_path_graph() {
        // 0 - 1 - 2 - 3 - 4 as a chain of conflicts
        let mut graph = ConflictGraph::new(0);
        let ids: Vec<PathId> = (0..5)
            .map(|i| graph.add_path(Path::new(vec![0, i + 1])))
            .collect();
        for pair in ids.windows(2) {
            graph.add_edge(pair[0], pair[1], EdgeType::ConflictI);
            graph.add_edge(pair[1], pair[0], EdgeType::ConflictI);
        }

        let set = ExactSolver::default().maximum_independent_set(&graph).unwrap();
        assert_eq!(set, vec![ids[0], ids[2], ids[4]]);
    }

    #[test]
    fn test_undirected_view_merges_parallel_edges() {
        let mut graph = ConflictGraph::new(0);
        let a = graph.add_path(Path::new(vec![0, 1]));
        let b = graph.add_path(Path::new(vec![0, 1, 2]));
        graph.add_edge(a, b, EdgeType::ConflictI);
        graph.add_edge(b, a, EdgeType::ConflictII);
        graph.add_edge(a, b, EdgeType::ConflictI);

        assert_eq!(ExactSolver::undirected(&graph).edge_count(), 1);
    }
}
