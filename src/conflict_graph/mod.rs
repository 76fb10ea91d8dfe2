//! Multigraph of preference and conflict relations between permitted paths.
//!
//! Paths live in an arena and are addressed by stable [`PathId`]s. Edges are
//! never removed; solvers that need node removal keep their own alive set on
//! top of the arena (see [`crate::solvers::graph_based`]).

mod builder;

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

pub use builder::ConflictGraphBuilder;

use crate::as_graph::{ASGraph, ASN};
use crate::shared::{ASGraphError, EdgeType};
use crate::simulation_engine::Path;

pub type PathId = usize;
pub type EdgeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: PathId,
    pub target: PathId,
    pub edge_type: EdgeType,
}

#[derive(Debug, Clone)]
pub struct ConflictGraph {
    dst: ASN,
    paths: Vec<Path>,
    index: HashMap<Path, PathId>,
    edges: Vec<Edge>,
    out_edges: Vec<Vec<EdgeId>>,
    in_edges: Vec<Vec<EdgeId>>,
    /// Paths of every AS, best first, keyed in processing order
    ranked: BTreeMap<ASN, Vec<PathId>>,
}

impl ConflictGraph {
    pub fn new(dst: ASN) -> Self {
        ConflictGraph {
            dst,
            paths: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            out_edges: Vec::new(),
            in_edges: Vec::new(),
            ranked: BTreeMap::new(),
        }
    }

    /// Build the graph from the RIBs of a simulated topology.
    pub fn build(as_graph: &ASGraph) -> Result<Self, ASGraphError> {
        ConflictGraphBuilder::new(as_graph)?.build()
    }

    pub fn dst(&self) -> ASN {
        self.dst
    }

    /// Register an AS, even if it ends up without any path.
    pub fn add_as(&mut self, asn: ASN) {
        self.ranked.entry(asn).or_default();
    }

    /// Add `path` unless an equal path exists. New paths are appended to
    /// their holder's ranking.
    pub fn add_path(&mut self, path: Path) -> PathId {
        if let Some(&id) = self.index.get(&path) {
            return id;
        }

        let id = self.paths.len();
        if let Some(holder) = path.holder() {
            self.ranked.entry(holder).or_default().push(id);
        }
        self.index.insert(path.clone(), id);
        self.paths.push(path);
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        id
    }

    /// Parallel edges are kept.
    pub fn add_edge(&mut self, source: PathId, target: PathId, edge_type: EdgeType) -> EdgeId {
        let id = self.edges.len();
        self.edges.push(Edge {
            source,
            target,
            edge_type,
        });
        self.out_edges[source].push(id);
        self.in_edges[target].push(id);
        id
    }

    pub fn node_count(&self) -> usize {
        self.paths.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_count_of(&self, edge_type: EdgeType) -> usize {
        self.edges
            .iter()
            .filter(|edge| edge.edge_type == edge_type)
            .count()
    }

    pub fn path(&self, id: PathId) -> &Path {
        &self.paths[id]
    }

    pub fn path_id(&self, path: &Path) -> Option<PathId> {
        self.index.get(path).copied()
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn out_edges(&self, id: PathId) -> impl Iterator<Item = &Edge> + '_ {
        self.out_edges[id].iter().map(move |&e| &self.edges[e])
    }

    pub fn in_edges(&self, id: PathId) -> impl Iterator<Item = &Edge> + '_ {
        self.in_edges[id].iter().map(move |&e| &self.edges[e])
    }

    /// Targets of the outgoing edges of `id` with the given type.
    pub fn successors_of_type(&self, id: PathId, edge_type: EdgeType) -> Vec<PathId> {
        self.out_edges(id)
            .filter(|edge| edge.edge_type == edge_type)
            .map(|edge| edge.target)
            .collect()
    }

    /// Sources of the incoming edges of `id` with the given type.
    pub fn predecessors_of_type(&self, id: PathId, edge_type: EdgeType) -> Vec<PathId> {
        self.in_edges(id)
            .filter(|edge| edge.edge_type == edge_type)
            .map(|edge| edge.source)
            .collect()
    }

    pub fn has_edge(&self, source: PathId, target: PathId, edge_type: EdgeType) -> bool {
        self.out_edges(source)
            .any(|edge| edge.target == target && edge.edge_type == edge_type)
    }

    /// ASes in processing order
    pub fn ases(&self) -> impl Iterator<Item = ASN> + '_ {
        self.ranked.keys().copied()
    }

    pub fn as_count(&self) -> usize {
        self.ranked.len()
    }

    /// Ranked path ids of `asn`, best first.
    pub fn ranked_ids(&self, asn: ASN) -> &[PathId] {
        self.ranked.get(&asn).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ranked paths of `asn`, best first.
    pub fn ranked_paths(&self, asn: ASN) -> impl Iterator<Item = &Path> + '_ {
        self.ranked_ids(asn).iter().map(move |&id| &self.paths[id])
    }
}
