//! Built-in plausibility rules.
//!
//! All angles are degrees. Cumulative rules recompute from the full jump
//! history on each call; the paths they see are short.

use std::sync::Arc;

use crate::connect::ProximityGraph;
use crate::error::{FilterError, SetupError};
use crate::section::{AzimuthMap, DistanceMap, Jump, SectionModel};

use super::types::{PlausibilityFilter, RuptureView, Verdict};

/// Change in strike direction going from `az1` to `az2`, in [-180, 180].
///
/// Inputs are assumed to lie in [-180, 180] (or [0, 360)); a single wrap suffices.
#[inline]
pub fn azimuth_difference(az1: f64, az2: f64) -> f64 {
    let diff = az2 - az1;
    if diff > 180.0 {
        diff - 360.0
    } else if diff < -180.0 {
        diff + 360.0
    } else {
        diff
    }
}

/// Absolute rake difference across the ±180° branch cut, in [0, 180].
#[inline]
pub fn rake_difference(r1: f64, r2: f64) -> f64 {
    let d = (r1 - r2).abs() % 360.0;
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

fn azimuth_of(az: &AzimuthMap, jump: Jump) -> Result<f64, FilterError> {
    az.of_jump(jump).ok_or(FilterError::MissingAzimuth {
        from: jump.from,
        to: jump.to,
    })
}

fn check_azimuth_coverage(
    name: &'static str,
    az: &AzimuthMap,
    graph: &ProximityGraph,
) -> Result<(), SetupError> {
    for (from, to) in graph.links() {
        if az.get(from, to).is_none() {
            return Err(SetupError::missing(
                name,
                format!("no azimuth for graph link {from}->{to}"),
            ));
        }
    }
    Ok(())
}

/// Every parent strand in a rupture must contribute at least `min` sections.
///
/// Leaving a strand with a short run is fatal: no extension can lengthen it.
/// A short trailing run only rejects this candidate.
#[derive(Clone, Debug)]
pub struct MinSectsPerParent {
    min: usize,
}

impl MinSectsPerParent {
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl PlausibilityFilter for MinSectsPerParent {
    fn name(&self) -> &'static str {
        "min_sects_per_parent"
    }

    fn apply(&self, view: &RuptureView<'_>) -> Result<Verdict, FilterError> {
        if view.last_is_junction() {
            let left_end = view.len() - 1;
            let left_start = view
                .junctions
                .len()
                .checked_sub(2)
                .map_or(0, |i| view.junctions[i]);
            if left_end - left_start < self.min {
                return Ok(Verdict::FailFatal);
            }
        }
        if view.len() - view.trailing_run_start() < self.min {
            return Ok(Verdict::FailContinuable);
        }
        Ok(Verdict::Pass)
    }
}

/// Sum of distances over parent-crossing jumps.
#[derive(Clone, Debug)]
pub struct CumulativeJumpDistance {
    max_km: f64,
    distances: Arc<DistanceMap>,
}

impl CumulativeJumpDistance {
    pub fn new(max_km: f64, distances: Arc<DistanceMap>) -> Self {
        Self { max_km, distances }
    }
}

impl PlausibilityFilter for CumulativeJumpDistance {
    fn name(&self) -> &'static str {
        "cumulative_jump_distance"
    }

    fn junctions_only(&self) -> bool {
        true
    }

    fn check_inputs(&self, model: &SectionModel, graph: &ProximityGraph) -> Result<(), SetupError> {
        for (a, b) in graph.links() {
            if model.is_junction(a, b) && self.distances.get(a, b).is_none() {
                return Err(SetupError::missing(
                    self.name(),
                    format!("no distance for cross-parent link {a}->{b}"),
                ));
            }
        }
        Ok(())
    }

    fn apply(&self, view: &RuptureView<'_>) -> Result<Verdict, FilterError> {
        let mut total = 0.0;
        for jump in view.junction_jumps() {
            let pair = jump.pair();
            total += self
                .distances
                .get_pair(pair)
                .ok_or(FilterError::MissingDistance(pair))?;
            if total > self.max_km {
                return Ok(Verdict::FailFatal);
            }
        }
        Ok(Verdict::Pass)
    }
}

/// Sum of absolute rake changes over every jump.
#[derive(Clone, Debug)]
pub struct CumulativeRakeChange {
    max_deg: f64,
}

impl CumulativeRakeChange {
    pub fn new(max_deg: f64) -> Self {
        Self { max_deg }
    }
}

impl PlausibilityFilter for CumulativeRakeChange {
    fn name(&self) -> &'static str {
        "cumulative_rake_change"
    }

    fn check_inputs(&self, model: &SectionModel, _graph: &ProximityGraph) -> Result<(), SetupError> {
        match model.iter().find(|s| !s.rake.is_finite()) {
            Some(s) => Err(SetupError::missing(
                self.name(),
                format!("section {} has non-finite rake {}", s.id, s.rake),
            )),
            None => Ok(()),
        }
    }

    fn apply(&self, view: &RuptureView<'_>) -> Result<Verdict, FilterError> {
        let total: f64 = view
            .jumps
            .iter()
            .map(|j| rake_difference(view.model[j.from].rake, view.model[j.to].rake))
            .sum();
        Ok(if total > self.max_deg {
            Verdict::FailFatal
        } else {
            Verdict::Pass
        })
    }
}

/// Sum of absolute azimuth changes between consecutive jumps.
#[derive(Clone, Debug)]
pub struct CumulativeAzimuthChange {
    max_deg: f64,
    azimuths: Arc<AzimuthMap>,
}

impl CumulativeAzimuthChange {
    pub fn new(max_deg: f64, azimuths: Arc<AzimuthMap>) -> Self {
        Self { max_deg, azimuths }
    }
}

impl PlausibilityFilter for CumulativeAzimuthChange {
    fn name(&self) -> &'static str {
        "cumulative_azimuth_change"
    }

    fn check_inputs(&self, _model: &SectionModel, graph: &ProximityGraph) -> Result<(), SetupError> {
        check_azimuth_coverage(self.name(), &self.azimuths, graph)
    }

    fn apply(&self, view: &RuptureView<'_>) -> Result<Verdict, FilterError> {
        if view.jumps.len() < 2 {
            return Ok(Verdict::Pass);
        }
        let mut total = 0.0;
        let mut prev = azimuth_of(&self.azimuths, view.jumps[0])?;
        for &jump in &view.jumps[1..] {
            let cur = azimuth_of(&self.azimuths, jump)?;
            total += azimuth_difference(prev, cur).abs();
            if total > self.max_deg {
                return Ok(Verdict::FailFatal);
            }
            prev = cur;
        }
        Ok(Verdict::Pass)
    }
}

/// Azimuth change across a junction: the jump into the section before the
/// junction versus the junction jump itself.
#[derive(Clone, Debug)]
pub struct JumpAzimuthChange {
    max_deg: f64,
    azimuths: Arc<AzimuthMap>,
}

impl JumpAzimuthChange {
    pub fn new(max_deg: f64, azimuths: Arc<AzimuthMap>) -> Self {
        Self { max_deg, azimuths }
    }
}

impl PlausibilityFilter for JumpAzimuthChange {
    fn name(&self) -> &'static str {
        "jump_azimuth_change"
    }

    fn junctions_only(&self) -> bool {
        true
    }

    fn check_inputs(&self, _model: &SectionModel, graph: &ProximityGraph) -> Result<(), SetupError> {
        check_azimuth_coverage(self.name(), &self.azimuths, graph)
    }

    fn apply(&self, view: &RuptureView<'_>) -> Result<Verdict, FilterError> {
        let n = view.jumps.len();
        if n < 2 {
            return Ok(Verdict::Pass);
        }
        let before = azimuth_of(&self.azimuths, view.jumps[n - 2])?;
        let across = azimuth_of(&self.azimuths, view.jumps[n - 1])?;
        Ok(if azimuth_difference(before, across).abs() > self.max_deg {
            Verdict::FailFatal
        } else {
            Verdict::Pass
        })
    }
}

/// Azimuth change between the first and the newest jump.
///
/// Continuable: a later jump may turn the rupture back within range.
#[derive(Clone, Debug)]
pub struct TotalAzimuthChange {
    max_deg: f64,
    azimuths: Arc<AzimuthMap>,
}

impl TotalAzimuthChange {
    pub fn new(max_deg: f64, azimuths: Arc<AzimuthMap>) -> Self {
        Self { max_deg, azimuths }
    }
}

impl PlausibilityFilter for TotalAzimuthChange {
    fn name(&self) -> &'static str {
        "total_azimuth_change"
    }

    fn check_inputs(&self, _model: &SectionModel, graph: &ProximityGraph) -> Result<(), SetupError> {
        check_azimuth_coverage(self.name(), &self.azimuths, graph)
    }

    fn apply(&self, view: &RuptureView<'_>) -> Result<Verdict, FilterError> {
        let (Some(&first), Some(&last)) = (view.jumps.first(), view.jumps.last()) else {
            return Ok(Verdict::Pass);
        };
        if view.jumps.len() < 2 {
            return Ok(Verdict::Pass);
        }
        let a0 = azimuth_of(&self.azimuths, first)?;
        let a1 = azimuth_of(&self.azimuths, last)?;
        Ok(if azimuth_difference(a0, a1).abs() > self.max_deg {
            Verdict::FailContinuable
        } else {
            Verdict::Pass
        })
    }
}
