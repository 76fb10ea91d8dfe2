use std::collections::BTreeMap;

use crate::as_graph::ASN;
use crate::conflict_graph::ConflictGraph;
use crate::shared::SolverError;
use crate::simulation_engine::Path;
use crate::solvers::Solver;

/// Assigns ASes one by one, each taking its best path that extends an
/// already assigned path.
#[derive(Debug, Clone, Default)]
pub struct GreedySolver;

/// `path` extends some assigned path without crossing another assigned AS.
fn compatible_with_assignment(path: &Path, assignment: &BTreeMap<ASN, Path>) -> bool {
    assignment.values().any(|assigned| {
        path.starts_with(assigned)
            && path[assigned.len()..]
                .iter()
                .all(|asn| !assignment.contains_key(asn))
    })
}

impl Solver for GreedySolver {
    fn name(&self) -> &str {
        "Greedy"
    }

    fn find(&self, graph: &ConflictGraph) -> Result<Vec<Path>, SolverError> {
        let dst = graph.dst();
        let ases: Vec<ASN> = graph.ases().collect();

        let mut assignment = BTreeMap::new();
        assignment.insert(dst, Path::origin(dst));

        let mut found = true;
        while assignment.len() < ases.len() && found {
            found = false;
            for &asn in &ases {
                if assignment.contains_key(&asn) {
                    continue;
                }

                let candidate = graph
                    .ranked_paths(asn)
                    .find(|path| compatible_with_assignment(path, &assignment));

                // Only commit when the path hangs directly below an assigned AS
                if let Some(path) = candidate {
                    let next_hop_assigned = path
                        .next_hop()
                        .map_or(false, |hop| assignment.contains_key(&hop));
                    if next_hop_assigned {
                        assignment.insert(asn, path.clone());
                        found = true;
                    }
                }
            }
        }

        Ok(assignment.into_values().collect())
    }
}
