use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::as_graph::ASN;

/// Business relationship of a neighbor, seen from the AS holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Relationships {
    Providers = 1,
    Peers = 2,
    Customers = 3,
}

impl Relationships {
    /// The same edge seen from the other end.
    pub fn invert(&self) -> Self {
        match self {
            Relationships::Providers => Relationships::Customers,
            Relationships::Customers => Relationships::Providers,
            Relationships::Peers => Relationships::Peers,
        }
    }
}

impl fmt::Display for Relationships {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relationships::Providers => "PROVIDERS",
            Relationships::Peers => "PEERS",
            Relationships::Customers => "CUSTOMERS",
        };
        write!(f, "{}", s)
    }
}

/// Routing policy an AS runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum Settings {
    /// Shape and loop checks only, every path may be exported.
    Bgp = 0,
    /// Valley-free export and customer-first local preference.
    GaoRexford = 1,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::GaoRexford
    }
}

/// Relation carried by an edge of the conflict graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EdgeType {
    /// Both paths belong to the same AS; the edge points at the preferred one.
    Preference = 0,
    /// Choosing the source commits to a prefix whose AS ranks the target.
    ConflictI = 1,
    /// Choosing the source forces the upstream target path.
    ConflictII = 2,
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EdgeType::Preference => "PREFERENCE",
            EdgeType::ConflictI => "CONFLICT_I",
            EdgeType::ConflictII => "CONFLICT_II",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Outcomes {
    Success = 0,
    Failed = 1,
}

impl fmt::Display for Outcomes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcomes::Success => "SUCCESS",
            Outcomes::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

impl From<bool> for Outcomes {
    fn from(success: bool) -> Self {
        if success {
            Outcomes::Success
        } else {
            Outcomes::Failed
        }
    }
}

/// Malformed topology input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ASGraphError {
    /// No destination has been set on the graph
    #[error("No destination AS set on the topology")]
    MissingDestination,
    /// The destination is not one of the graph's ASes
    #[error("Destination AS {0} is not part of the topology")]
    UnknownDestination(ASN),
    /// A relationship names an AS that is not in the graph
    #[error("AS {asn} lists unknown neighbor AS {neighbor}")]
    UnknownNeighbor { asn: ASN, neighbor: ASN },
    /// A relationship is not mirrored on the other side
    #[error("Relationship between AS {a} and AS {b} is not mirrored")]
    InconsistentRelationship { a: ASN, b: ASN },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolverError {
    /// The exact solver refuses graphs above its node limit
    #[error("Conflict graph has {nodes} paths, exact solver limit is {limit}")]
    InstanceTooLarge { nodes: usize, limit: usize },
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Topology Error: {0}")]
    ASGraphError(#[from] ASGraphError),
    #[error("Config Error: {0}")]
    ConfigError(#[from] serde_json::Error),
    #[error("Progress Bar Error: {0}")]
    ProgressTemplate(#[from] indicatif::style::TemplateError),
}
