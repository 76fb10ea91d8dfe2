use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use log::debug;
use petgraph::graph::{NodeIndex, UnGraph};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::policies::{self, Policy, PathScore};
use crate::shared::{ASGraphError, Relationships, Settings};
use crate::simulation_engine::Path;

pub type ASN = u32;

/// One routing domain: its neighbors, its RIBs and the policy it runs.
#[derive(Debug, Clone)]
pub struct AS {
    pub asn: ASN,
    pub dst: Option<ASN>,
    pub peers: BTreeSet<ASN>,
    pub providers: BTreeSet<ASN>,
    pub customers: BTreeSet<ASN>,
    /// Paths received but not yet exported, in arrival order
    pub unannounced: VecDeque<Path>,
    /// Paths already exported
    pub announced: Vec<Path>,
    pub policy: Arc<dyn Policy>,
}

impl AS {
    pub fn new(asn: ASN) -> Self {
        AS {
            asn,
            dst: None,
            peers: BTreeSet::new(),
            providers: BTreeSet::new(),
            customers: BTreeSet::new(),
            unannounced: VecDeque::new(),
            announced: Vec::new(),
            policy: policies::create_policy(Settings::default()),
        }
    }

    pub fn from_asn_sets(
        asn: ASN,
        peer_asns: HashSet<ASN>,
        provider_asns: HashSet<ASN>,
        customer_asns: HashSet<ASN>,
    ) -> Self {
        AS {
            peers: peer_asns.into_iter().collect(),
            providers: provider_asns.into_iter().collect(),
            customers: customer_asns.into_iter().collect(),
            ..AS::new(asn)
        }
    }

    pub fn with_policy(mut self, policy: Arc<dyn Policy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_dst(mut self, dst: ASN) -> Self {
        self.dst = Some(dst);
        self
    }

    pub fn get_neighbors(&self, rel: Relationships) -> &BTreeSet<ASN> {
        match rel {
            Relationships::Providers => &self.providers,
            Relationships::Peers => &self.peers,
            Relationships::Customers => &self.customers,
        }
    }

    /// All neighbors in ascending ASN order.
    pub fn neighbor_asns(&self) -> BTreeSet<ASN> {
        let mut result = BTreeSet::new();
        result.extend(&self.peers);
        result.extend(&self.providers);
        result.extend(&self.customers);
        result
    }

    /// What `asn` is to this AS, if they are adjacent.
    pub fn relationship_to(&self, asn: ASN) -> Option<Relationships> {
        if self.customers.contains(&asn) {
            Some(Relationships::Customers)
        } else if self.peers.contains(&asn) {
            Some(Relationships::Peers)
        } else if self.providers.contains(&asn) {
            Some(Relationships::Providers)
        } else {
            None
        }
    }

    pub fn is_stub(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn import_filter(&self, path: &[ASN]) -> bool {
        self.policy.import_filter(self, path)
    }

    pub fn export_filter(&self, path: &[ASN]) -> bool {
        self.policy.export_filter(self, path)
    }

    pub fn local_pref(&self, path: &[ASN]) -> u32 {
        self.policy.local_pref(self, path)
    }

    pub fn path_score(&self, path: &[ASN]) -> PathScore {
        policies::path_score(self, path)
    }

    /// Announced paths followed by the ones still waiting for export.
    pub fn permitted_paths(&self) -> Vec<Path> {
        self.announced
            .iter()
            .chain(self.unannounced.iter())
            .cloned()
            .collect()
    }

    /// Permitted paths, best first.
    pub fn ranked_permitted_paths(&self) -> Vec<Path> {
        let mut paths = self.permitted_paths();
        policies::rank_paths(self, &mut paths);
        paths
    }

    pub fn clear_ribs(&mut self) {
        self.unannounced.clear();
        self.announced.clear();
    }
}

/// AS topology towards a single destination.
///
/// ASes are kept in ascending ASN order, which is the processing order of
/// both the propagation rounds and the conflict graph construction.
#[derive(Debug, Clone, Default)]
pub struct ASGraph {
    pub as_dict: BTreeMap<ASN, AS>,
    pub dst: Option<ASN>,
}

impl ASGraph {
    pub fn new() -> Self {
        ASGraph {
            as_dict: BTreeMap::new(),
            dst: None,
        }
    }

    /// Build a topology from `(a, b, rel)` tuples, where `rel` is what `b` is to `a`.
    /// Every AS runs the policy selected by `settings`.
    pub fn from_edges(edges: Vec<(ASN, ASN, Relationships)>, settings: Settings) -> Self {
        let policy = policies::create_policy(settings);
        let mut as_graph = ASGraph::new();

        for (a, b, rel) in edges {
            for (asn, neighbor, rel) in [(a, b, rel), (b, a, rel.invert())] {
                let as_obj = as_graph
                    .as_dict
                    .entry(asn)
                    .or_insert_with(|| AS::new(asn).with_policy(policy.clone()));
                match rel {
                    Relationships::Customers => as_obj.customers.insert(neighbor),
                    Relationships::Providers => as_obj.providers.insert(neighbor),
                    Relationships::Peers => as_obj.peers.insert(neighbor),
                };
            }
        }

        as_graph
    }

    pub fn get(&self, asn: &ASN) -> Option<&AS> {
        self.as_dict.get(asn)
    }

    pub fn get_mut(&mut self, asn: &ASN) -> Option<&mut AS> {
        self.as_dict.get_mut(asn)
    }

    pub fn insert(&mut self, as_obj: AS) {
        self.as_dict.insert(as_obj.asn, as_obj);
    }

    /// ASes in processing order
    pub fn iter(&self) -> impl Iterator<Item = &AS> {
        self.as_dict.values()
    }

    pub fn asns(&self) -> Vec<ASN> {
        self.as_dict.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.as_dict.len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_dict.is_empty()
    }

    /// Number of undirected relationships
    pub fn edge_count(&self) -> usize {
        let ends: usize = self
            .as_dict
            .values()
            .map(|as_obj| as_obj.peers.len() + as_obj.providers.len() + as_obj.customers.len())
            .sum();
        ends / 2
    }

    /// The destination, checked to be part of the topology.
    pub fn destination(&self) -> Result<ASN, ASGraphError> {
        let dst = self.dst.ok_or(ASGraphError::MissingDestination)?;
        if !self.as_dict.contains_key(&dst) {
            return Err(ASGraphError::UnknownDestination(dst));
        }
        Ok(dst)
    }

    /// Point every AS at `dst` and reset all RIBs.
    pub fn set_dst(&mut self, dst: ASN) -> Result<(), ASGraphError> {
        if !self.as_dict.contains_key(&dst) {
            return Err(ASGraphError::UnknownDestination(dst));
        }

        self.dst = Some(dst);
        for as_obj in self.as_dict.values_mut() {
            as_obj.dst = Some(dst);
        }
        self.reset_ribs();
        Ok(())
    }

    /// Empty every RIB and seed the destination with its trivial path.
    pub fn reset_ribs(&mut self) {
        for as_obj in self.as_dict.values_mut() {
            as_obj.clear_ribs();
        }

        if let Some(dst) = self.dst {
            if let Some(as_obj) = self.as_dict.get_mut(&dst) {
                as_obj.unannounced.push_back(Path::origin(dst));
            }
        }
    }

    /// Every relationship must point at a known AS, be mirrored on the
    /// neighbor, and appear in only one of the three sets.
    pub fn check_relationships(&self) -> Result<(), ASGraphError> {
        for as_obj in self.as_dict.values() {
            for rel in [Relationships::Customers, Relationships::Peers, Relationships::Providers] {
                for &neighbor in as_obj.get_neighbors(rel) {
                    let neighbor_obj = self.as_dict.get(&neighbor).ok_or(
                        ASGraphError::UnknownNeighbor {
                            asn: as_obj.asn,
                            neighbor,
                        },
                    )?;

                    let mirrored = neighbor_obj.get_neighbors(rel.invert()).contains(&as_obj.asn);
                    if !mirrored || as_obj.relationship_to(neighbor) != Some(rel) {
                        return Err(ASGraphError::InconsistentRelationship {
                            a: as_obj.asn,
                            b: neighbor,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Longest shortest hop count between two connected ASes.
    pub fn diameter(&self) -> u32 {
        let mut graph: UnGraph<ASN, ()> = UnGraph::new_undirected();
        let index: HashMap<ASN, NodeIndex> = self
            .as_dict
            .keys()
            .map(|&asn| (asn, graph.add_node(asn)))
            .collect();

        for as_obj in self.as_dict.values() {
            for neighbor in as_obj.neighbor_asns() {
                if neighbor > as_obj.asn {
                    if let Some(&b) = index.get(&neighbor) {
                        graph.update_edge(index[&as_obj.asn], b, ());
                    }
                }
            }
        }

        let diameter = graph
            .node_indices()
            .filter_map(|start| {
                petgraph::algo::dijkstra(&graph, start, None, |_| 1u32)
                    .into_values()
                    .max()
            })
            .max()
            .unwrap_or(0);
        debug!("Topology with {} ASes has diameter {}", self.len(), diameter);
        diameter
    }

    /// ASes without customers, the usual destinations.
    pub fn stub_asns(&self) -> Vec<ASN> {
        self.as_dict
            .values()
            .filter(|as_obj| as_obj.is_stub())
            .map(|as_obj| as_obj.asn)
            .collect()
    }

    pub fn random_stub<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<ASN> {
        self.stub_asns().choose(rng).copied()
    }

    /// Number of permitted paths over all ASes
    pub fn total_permitted_paths(&self) -> usize {
        self.as_dict
            .values()
            .map(|as_obj| as_obj.announced.len() + as_obj.unannounced.len())
            .sum()
    }
}
