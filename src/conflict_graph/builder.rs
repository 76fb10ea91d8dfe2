use log::{debug, info};

use crate::as_graph::ASGraph;
use crate::conflict_graph::{ConflictGraph, PathId};
use crate::shared::{ASGraphError, EdgeType};

/// Incremental construction of a [`ConflictGraph`].
///
/// ASes are added one at a time in processing order. Conflict edges are only
/// derived against paths of ASes added earlier, using the preference edges
/// present at that moment, so the result depends on the order.
pub struct ConflictGraphBuilder<'a> {
    as_graph: &'a ASGraph,
    graph: ConflictGraph,
    all_paths: Vec<PathId>,
}

impl<'a> ConflictGraphBuilder<'a> {
    pub fn new(as_graph: &'a ASGraph) -> Result<Self, ASGraphError> {
        let dst = as_graph.destination()?;
        Ok(ConflictGraphBuilder {
            as_graph,
            graph: ConflictGraph::new(dst),
            all_paths: Vec::new(),
        })
    }

    pub fn build(mut self) -> Result<ConflictGraph, ASGraphError> {
        let as_graph = self.as_graph;
        for as_obj in as_graph.iter() {
            self.graph.add_as(as_obj.asn);

            let mut as_paths: Vec<PathId> = Vec::new();
            for path in as_obj.ranked_permitted_paths() {
                let id = self.graph.add_path(path);
                for &better in &as_paths {
                    self.graph.add_edge(id, better, EdgeType::Preference);
                }
                as_paths.push(id);
            }

            for &p in &as_paths {
                for i in 0..self.all_paths.len() {
                    let pp = self.all_paths[i];
                    if self.graph.path(pp).is_strict_prefix_of(self.graph.path(p)) {
                        self.link_prefix(p, pp);
                    } else if self.graph.path(p).is_strict_prefix_of(self.graph.path(pp)) {
                        self.link_prefix(pp, p);
                    }
                }
            }

            debug!("AS {}: {} ranked paths", as_obj.asn, as_paths.len());
            self.all_paths.extend(as_paths);
        }

        info!(
            "Conflict graph: {} paths, {} edges ({} preference, {} conflict I, {} conflict II)",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.graph.edge_count_of(EdgeType::Preference),
            self.graph.edge_count_of(EdgeType::ConflictI),
            self.graph.edge_count_of(EdgeType::ConflictII),
        );
        Ok(self.graph)
    }

    /// Relate `longer` to the paths ranked against its proper prefix `prefix`.
    fn link_prefix(&mut self, longer: PathId, prefix: PathId) {
        let mut rivals = self
            .graph
            .successors_of_type(prefix, EdgeType::Preference);
        rivals.extend(self.graph.predecessors_of_type(prefix, EdgeType::Preference));
        for rival in rivals {
            self.graph.add_edge(longer, rival, EdgeType::ConflictI);
        }

        if self.graph.path(prefix).is_parent_of(self.graph.path(longer)) {
            for better in self.graph.successors_of_type(longer, EdgeType::Preference) {
                self.graph.add_edge(better, prefix, EdgeType::ConflictII);
            }
        }
    }
}
