//! Verdicts, the candidate view handed to filters, and the filter trait.

use serde::{Deserialize, Serialize};

use crate::connect::ProximityGraph;
use crate::error::{FilterError, SetupError};
use crate::section::{Jump, Section, SectionId, SectionModel};

/// Outcome of a plausibility check.
///
/// Ordered by severity, so combining verdicts is `max`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Verdict {
    Pass,
    /// This candidate is rejected; extensions of it may still pass.
    FailContinuable,
    /// This candidate and every extension of it are rejected.
    FailFatal,
}

impl Verdict {
    /// Logical AND of two verdicts.
    #[inline]
    pub fn and(self, other: Verdict) -> Verdict {
        self.max(other)
    }
    #[inline]
    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }
    /// True unless fatal.
    #[inline]
    pub fn can_continue(self) -> bool {
        self != Verdict::FailFatal
    }
    /// `FailContinuable` or `FailFatal` depending on the filter's policy.
    #[inline]
    pub fn fail(continuable: bool) -> Verdict {
        if continuable {
            Verdict::FailContinuable
        } else {
            Verdict::FailFatal
        }
    }
}

/// Read-only view of a candidate rupture.
///
/// `jumps[k]` connects `path[k]` to `path[k + 1]`; each entry of `junctions`
/// is the index in `path` of a section reached by a parent-crossing jump.
#[derive(Clone, Copy, Debug)]
pub struct RuptureView<'a> {
    pub model: &'a SectionModel,
    pub path: &'a [SectionId],
    pub jumps: &'a [Jump],
    pub junctions: &'a [usize],
}

impl<'a> RuptureView<'a> {
    pub fn new(
        model: &'a SectionModel,
        path: &'a [SectionId],
        jumps: &'a [Jump],
        junctions: &'a [usize],
    ) -> Self {
        debug_assert!(!path.is_empty(), "candidate path must not be empty");
        debug_assert_eq!(jumps.len() + 1, path.len());
        Self {
            model,
            path,
            jumps,
            junctions,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    #[inline]
    pub fn last(&self) -> SectionId {
        self.path[self.path.len() - 1]
    }

    #[inline]
    pub fn section(&self, index: usize) -> &'a Section {
        &self.model[self.path[index]]
    }

    /// The newest jump, if any.
    #[inline]
    pub fn last_jump(&self) -> Option<Jump> {
        self.jumps.last().copied()
    }

    /// True if the newest section was reached by crossing parents.
    #[inline]
    pub fn last_is_junction(&self) -> bool {
        self.path.len() > 1 && self.junctions.last() == Some(&(self.path.len() - 1))
    }

    /// Jumps that cross between parent strands, in path order.
    pub fn junction_jumps(&self) -> impl Iterator<Item = Jump> + 'a {
        let jumps = self.jumps;
        self.junctions.iter().map(move |&j| jumps[j - 1])
    }

    /// Index in `path` where the run of the newest section's parent starts.
    #[inline]
    pub fn trailing_run_start(&self) -> usize {
        self.junctions.last().copied().unwrap_or(0)
    }
}

/// A plausibility rule evaluated incrementally as a rupture grows.
///
/// Filters see the whole path on every call, so rules over cumulative
/// quantities recompute from the jump history.
pub trait PlausibilityFilter: Send + Sync {
    /// Short stable name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Only evaluate when the newest step crossed parents.
    fn junctions_only(&self) -> bool {
        false
    }

    /// Check once, before any search, that the inputs this filter reads are
    /// present for every link of `graph`.
    fn check_inputs(
        &self,
        _model: &SectionModel,
        _graph: &ProximityGraph,
    ) -> Result<(), SetupError> {
        Ok(())
    }

    fn apply(&self, view: &RuptureView<'_>) -> Result<Verdict, FilterError>;
}
