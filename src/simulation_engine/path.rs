use std::fmt;
use std::ops::Deref;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::as_graph::ASN;

/// AS path from the destination (first) to the AS holding it (last).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<ASN>);

impl Path {
    pub fn new(asns: Vec<ASN>) -> Self {
        Path(asns)
    }

    /// The trivial path `(dst,)` seeded at the destination.
    pub fn origin(dst: ASN) -> Self {
        Path(vec![dst])
    }

    /// AS holding this path
    pub fn holder(&self) -> Option<ASN> {
        self.0.last().copied()
    }

    /// Neighbor the holder learned the path from
    pub fn next_hop(&self) -> Option<ASN> {
        self.0.len().checked_sub(2).map(|i| self.0[i])
    }

    /// Copy of the path with `asn` appended as the new holder.
    pub fn extended(&self, asn: ASN) -> Path {
        let mut asns = Vec::with_capacity(self.0.len() + 1);
        asns.extend_from_slice(&self.0);
        asns.push(asn);
        Path(asns)
    }

    /// The path without its holder, i.e. the path the next hop selected.
    pub fn parent(&self) -> &[ASN] {
        match self.0.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// True if `self` is a proper prefix of `other`.
    pub fn is_strict_prefix_of(&self, other: &[ASN]) -> bool {
        self.0.len() < other.len() && other.starts_with(&self.0)
    }

    /// True if `other` is exactly `self` plus one hop.
    pub fn is_parent_of(&self, other: &Path) -> bool {
        other.parent() == self.0.as_slice()
    }

    pub fn as_slice(&self) -> &[ASN] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<ASN> {
        self.0
    }
}

impl Deref for Path {
    type Target = [ASN];

    fn deref(&self) -> &[ASN] {
        &self.0
    }
}

impl From<Vec<ASN>> for Path {
    fn from(asns: Vec<ASN>) -> Self {
        Path(asns)
    }
}

impl From<&[ASN]> for Path {
    fn from(asns: &[ASN]) -> Self {
        Path(asns.to_vec())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_relations() {
        let short = Path::new(vec![0, 3]);
        let long = Path::new(vec![0, 3, 5]);
        let other = Path::new(vec![0, 2, 5]);

        assert!(short.is_strict_prefix_of(&long));
        assert!(!long.is_strict_prefix_of(&short));
        assert!(!short.is_strict_prefix_of(&short));
        assert!(!short.is_strict_prefix_of(&other));
        assert!(short.is_parent_of(&long));
        assert!(Path::origin(0).is_parent_of(&short));
        assert!(!Path::origin(0).is_parent_of(&long));
    }

    #[test]
    fn test_hops() {
        let path = Path::new(vec![0, 3, 5]);
        assert_eq!(path.holder(), Some(5));
        assert_eq!(path.next_hop(), Some(3));
        assert_eq!(path.extended(6).as_slice(), &[0, 3, 5, 6]);
        assert_eq!(Path::origin(0).next_hop(), None);
        assert_eq!(Path::origin(0).parent(), &[] as &[ASN]);
        assert_eq!(path.to_string(), "(0, 3, 5)");
    }
}
