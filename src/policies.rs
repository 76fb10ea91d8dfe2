use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::as_graph::{AS, ASN};
use crate::shared::Settings;
use crate::simulation_engine::Path;

/// Local preference given to paths without a better class.
pub const DEFAULT_LOCAL_PREF: u32 = 100;

/// Local preference of paths learned from a customer.
pub const CUSTOMER_LOCAL_PREF: u32 = 150;

/// Pluggable local preference, fixed when the policy is built.
pub type LocalPrefFn = fn(&AS, &[ASN]) -> u32;

/// Checks shared by import and export: a destination-rooted path of at least two hops.
fn valid_shape(as_obj: &AS, path: &[ASN]) -> bool {
    match as_obj.dst {
        Some(dst) => path.len() >= 2 && path[0] == dst,
        None => false,
    }
}

/// Per-AS routing policy.
///
/// All predicates are total: a malformed path is rejected, never an error.
pub trait Policy: Send + Sync + fmt::Debug {
    /// Accept `path` into the RIB of `as_obj`: rooted at the destination,
    /// held by `as_obj` and loop free.
    fn import_filter(&self, as_obj: &AS, path: &[ASN]) -> bool {
        if !valid_shape(as_obj, path) {
            return false;
        }

        match path.split_last() {
            Some((&holder, rest)) => holder == as_obj.asn && !rest.contains(&as_obj.asn),
            None => false,
        }
    }

    /// Allow `as_obj` to send `path` (which already ends in the receiver).
    fn export_filter(&self, as_obj: &AS, path: &[ASN]) -> bool {
        valid_shape(as_obj, path) && path[path.len() - 2] == as_obj.asn
    }

    /// Preference of `path` at `as_obj`; higher is better.
    fn local_pref(&self, _as_obj: &AS, _path: &[ASN]) -> u32 {
        DEFAULT_LOCAL_PREF
    }

    /// Get the policy name/type
    fn name(&self) -> &str;
}

/// Path-vector routing without business relationships.
#[derive(Debug, Clone, Default)]
pub struct BGPPolicy;

impl Policy for BGPPolicy {
    fn name(&self) -> &str {
        "BGP"
    }
}

/// Default Gao-Rexford ranking: customer routes before peer and provider routes.
pub fn default_local_pref(as_obj: &AS, path: &[ASN]) -> u32 {
    let learned_from = path.len().checked_sub(2).map(|i| path[i]);
    match learned_from {
        Some(asn) if as_obj.customers.contains(&asn) => CUSTOMER_LOCAL_PREF,
        _ => DEFAULT_LOCAL_PREF,
    }
}

/// Valley-free export with a configurable local preference.
#[derive(Clone)]
pub struct GaoRexfordPolicy {
    local_pref: LocalPrefFn,
}

impl GaoRexfordPolicy {
    pub fn new() -> Self {
        GaoRexfordPolicy {
            local_pref: default_local_pref,
        }
    }

    pub fn with_local_pref(local_pref: LocalPrefFn) -> Self {
        GaoRexfordPolicy { local_pref }
    }
}

impl Default for GaoRexfordPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GaoRexfordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GaoRexfordPolicy").finish_non_exhaustive()
    }
}

impl Policy for GaoRexfordPolicy {
    fn export_filter(&self, as_obj: &AS, path: &[ASN]) -> bool {
        if !valid_shape(as_obj, path) || path[path.len() - 2] != as_obj.asn {
            return false;
        }

        // Beyond the first hop a path only crosses a peer or provider edge
        // when it came from a customer or goes to a customer.
        if path.len() > 2 {
            let prev_hop = path[path.len() - 3];
            let next_hop = path[path.len() - 1];
            if !as_obj.customers.contains(&prev_hop) && !as_obj.customers.contains(&next_hop) {
                return false;
            }
        }

        true
    }

    fn local_pref(&self, as_obj: &AS, path: &[ASN]) -> u32 {
        (self.local_pref)(as_obj, path)
    }

    fn name(&self) -> &str {
        "GaoRexford"
    }
}

/// Create a policy based on settings
pub fn create_policy(settings: Settings) -> Arc<dyn Policy> {
    match settings {
        Settings::Bgp => Arc::new(BGPPolicy),
        Settings::GaoRexford => Arc::new(GaoRexfordPolicy::new()),
    }
}

/// Ranking key of a path at one AS. Greater scores are preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathScore {
    pub local_pref: u32,
    pub length: usize,
    pub tiebreak: Option<ASN>,
}

impl Ord for PathScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.local_pref
            .cmp(&other.local_pref)
            .then_with(|| other.length.cmp(&self.length))
            .then_with(|| self.tiebreak.cmp(&other.tiebreak))
    }
}

impl PartialOrd for PathScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub fn path_score(as_obj: &AS, path: &[ASN]) -> PathScore {
    PathScore {
        local_pref: as_obj.policy.local_pref(as_obj, path),
        length: path.len(),
        tiebreak: path.len().checked_sub(2).map(|i| path[i]),
    }
}

/// Sort `paths` best first. The sort is stable, so equal scores keep their RIB order.
pub fn rank_paths(as_obj: &AS, paths: &mut [Path]) {
    paths.sort_by_cached_key(|path| std::cmp::Reverse(path_score(as_obj, path)));
}
