use std::collections::{BTreeMap, HashSet};

use log::trace;

use crate::as_graph::ASN;
use crate::conflict_graph::ConflictGraph;
use crate::shared::SolverError;
use crate::simulation_engine::Path;
use crate::solvers::Solver;

/// Greedy assignment over shrinking candidate lists.
///
/// Committing an AS to a single path cuts every candidate of its neighbors
/// ranked below the extension of that path, and a candidate only survives
/// while all of its prefixes are still candidates somewhere.
#[derive(Debug, Clone, Default)]
pub struct GreedyPlusSolver;

/// Every prefix of `path` with at least two hops is in `candidates`.
pub fn consistent_path(path: &[ASN], candidates: &HashSet<&[ASN]>) -> bool {
    let mut prefix = path;
    while prefix.len() >= 2 {
        if !candidates.contains(prefix) {
            return false;
        }
        prefix = &prefix[..prefix.len() - 1];
    }
    true
}

impl Solver for GreedyPlusSolver {
    fn name(&self) -> &str {
        "Greedy+"
    }

    fn find(&self, graph: &ConflictGraph) -> Result<Vec<Path>, SolverError> {
        let dst = graph.dst();
        let mut candidates: BTreeMap<ASN, Vec<Path>> = graph
            .ases()
            .map(|asn| (asn, graph.ranked_paths(asn).cloned().collect()))
            .collect();
        let mut pending: Vec<ASN> = graph.ases().filter(|&asn| asn != dst).collect();
        let mut committed: Vec<ASN> = vec![dst];

        while !pending.is_empty() {
            truncate_behind_committed(&mut candidates, &pending, &committed);
            prune_inconsistent(&mut candidates, &pending);

            let choice = pending.iter().position(|asn| match candidates[asn].first() {
                None => true,
                Some(best) => best
                    .next_hop()
                    .map_or(false, |hop| committed.contains(&hop)),
            });

            match choice {
                Some(i) => {
                    let asn = pending.remove(i);
                    if let Some(list) = candidates.get_mut(&asn) {
                        list.truncate(1);
                    }
                    trace!("Committed AS {} to {:?}", asn, candidates[&asn].first());
                    committed.push(asn);
                }
                None => break,
            }
        }

        Ok(committed
            .iter()
            .filter_map(|asn| candidates.get(asn).and_then(|list| list.first().cloned()))
            .collect())
    }
}

/// Once a committed AS is down to one path, its neighbors can not use
/// anything ranked below the extension of that path.
fn truncate_behind_committed(
    candidates: &mut BTreeMap<ASN, Vec<Path>>,
    pending: &[ASN],
    committed: &[ASN],
) {
    for &asn in pending {
        for &done in committed {
            let extension = match candidates.get(&done) {
                Some(list) if list.len() == 1 => list[0].extended(asn),
                _ => continue,
            };
            if let Some(list) = candidates.get_mut(&asn) {
                if let Some(i) = list.iter().position(|path| *path == extension) {
                    list.truncate(i + 1);
                }
            }
        }
    }
}

fn prune_inconsistent(candidates: &mut BTreeMap<ASN, Vec<Path>>, pending: &[ASN]) {
    let pruned: Vec<(ASN, Vec<Path>)> = {
        let all: HashSet<&[ASN]> = candidates
            .values()
            .flatten()
            .map(|path| path.as_slice())
            .collect();

        pending
            .iter()
            .map(|&asn| {
                let kept = candidates[&asn]
                    .iter()
                    .filter(|path| consistent_path(path, &all))
                    .cloned()
                    .collect();
                (asn, kept)
            })
            .collect()
    };

    candidates.extend(pruned);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistent_path_walks_all_prefixes() {
        let a: Vec<ASN> = vec![0, 1];
        let b: Vec<ASN> = vec![0, 1, 2];
        let c: Vec<ASN> = vec![0, 1, 2, 3];
        let set: HashSet<&[ASN]> = [a.as_slice(), c.as_slice()].into_iter().collect();

        assert!(consistent_path(&a, &set));
        assert!(!consistent_path(&c, &set));
        assert!(consistent_path(&[0], &set));

        let set: HashSet<&[ASN]> = [a.as_slice(), b.as_slice(), c.as_slice()]
            .into_iter()
            .collect();
        assert!(consistent_path(&c, &set));
    }
}
