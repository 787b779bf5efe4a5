//! Search configuration, rupture identities and per-cluster results.

use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::section::SectionId;

/// Search configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCfg {
    /// Resource valve: a cluster stops once accepting another rupture would
    /// exceed this count. A truncated cluster is an incomplete enumeration.
    pub max_ruptures_per_cluster: usize,
    /// Optional bound on sections per rupture (and thus on search depth).
    pub max_sections_per_rupture: Option<usize>,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            max_ruptures_per_cluster: 1_000_000,
            max_sections_per_rupture: None,
        }
    }
}

impl SearchCfg {
    pub fn with_cap(max_ruptures_per_cluster: usize) -> Self {
        Self {
            max_ruptures_per_cluster,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.max_ruptures_per_cluster == 0 {
            return Err(SetupError::config("max_ruptures_per_cluster must be positive"));
        }
        if self.max_sections_per_rupture == Some(0) {
            return Err(SetupError::config("max_sections_per_rupture must be positive"));
        }
        Ok(())
    }
}

/// Order-independent rupture identity: the sorted section ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniqueRupture(Box<[SectionId]>);

impl UniqueRupture {
    pub fn from_path(path: &[SectionId]) -> Self {
        let mut ids = path.to_vec();
        ids.sort_unstable();
        Self(ids.into_boxed_slice())
    }

    pub fn sections(&self) -> &[SectionId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Accepted rupture: section ids in traversal order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rupture {
    pub sections: Vec<SectionId>,
}

impl Rupture {
    pub fn new(sections: Vec<SectionId>) -> Self {
        Self { sections }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn identity(&self) -> UniqueRupture {
        UniqueRupture::from_path(&self.sections)
    }
}

/// Counters collected while searching one cluster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Candidates run through the filter chain (roots included).
    pub evaluated: u64,
    pub accepted: u64,
    /// Passing candidates whose section set was already accepted.
    pub duplicates: u64,
    pub continuable_failures: u64,
    pub fatal_failures: u64,
    /// Filter errors (each also counted as a fatal failure).
    pub filter_errors: u64,
    /// Longest candidate path evaluated.
    pub longest_path: usize,
}

impl SearchStats {
    pub fn merge(&mut self, other: &SearchStats) {
        self.evaluated += other.evaluated;
        self.accepted += other.accepted;
        self.duplicates += other.duplicates;
        self.continuable_failures += other.continuable_failures;
        self.fatal_failures += other.fatal_failures;
        self.filter_errors += other.filter_errors;
        self.longest_path = self.longest_path.max(other.longest_path);
    }
}

/// Result of searching one cluster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterRuptures {
    pub cluster: usize,
    pub sections: Vec<SectionId>,
    /// Discovery order; one entry per distinct section set.
    pub ruptures: Vec<Rupture>,
    /// The rupture cap was hit; `ruptures` is incomplete.
    pub truncated: bool,
    pub stats: SearchStats,
}

impl ClusterRuptures {
    pub fn len(&self) -> usize {
        self.ruptures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ruptures.is_empty()
    }
}

/// Diagnostic hook called for every candidate the chain rejects.
pub trait FailureHandler: Sync {
    /// `filter` names the first filter in the chain that rejected the
    /// candidate. `continuable` is false when the rejection was fatal.
    fn rupture_failed(&self, path: &[SectionId], filter: &'static str, continuable: bool);
}
