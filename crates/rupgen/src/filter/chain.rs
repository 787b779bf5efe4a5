//! Ordered filter chain and its configuration.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::connect::ProximityGraph;
use crate::error::SetupError;
use crate::section::{FaultInputs, SectionModel};

use super::impls::{
    CumulativeAzimuthChange, CumulativeJumpDistance, CumulativeRakeChange, JumpAzimuthChange,
    MinSectsPerParent, TotalAzimuthChange,
};
use super::types::{PlausibilityFilter, RuptureView, Verdict};

/// Result of running the chain on one candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub verdict: Verdict,
    /// First filter that did not pass, if any.
    pub failed_by: Option<&'static str>,
    /// Filters that errored (each counted as fatal).
    pub errors: u32,
}

impl Evaluation {
    fn pass() -> Self {
        Self {
            verdict: Verdict::Pass,
            failed_by: None,
            errors: 0,
        }
    }
}

/// Ordered list of filters. An empty chain passes everything.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn PlausibilityFilter>>,
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|x| x.name()))
            .finish()
    }
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter (builder style).
    pub fn with(mut self, filter: impl PlausibilityFilter + 'static) -> Self {
        self.push(filter);
        self
    }

    pub fn push(&mut self, filter: impl PlausibilityFilter + 'static) {
        self.filters.push(Box::new(filter));
    }

    pub fn push_boxed(&mut self, filter: Box<dyn PlausibilityFilter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Build the configured rules in a fixed order.
    pub fn from_cfg(cfg: &FilterCfg, inputs: &FaultInputs) -> Result<Self, SetupError> {
        cfg.validate()?;
        let mut chain = Self::new();
        if let Some(min) = cfg.min_sects_per_parent {
            chain.push(MinSectsPerParent::new(min));
        }
        if let Some(max) = cfg.max_cumulative_jump_km {
            chain.push(CumulativeJumpDistance::new(max, inputs.distances.clone()));
        }
        if let Some(max) = cfg.max_cumulative_rake_change {
            chain.push(CumulativeRakeChange::new(max));
        }
        let needs_azimuths = cfg.max_cumulative_azimuth_change.is_some()
            || cfg.max_jump_azimuth_change.is_some()
            || cfg.max_total_azimuth_change.is_some();
        if needs_azimuths {
            let Some(az) = inputs.azimuths.clone() else {
                return Err(SetupError::missing(
                    "azimuth filters",
                    "azimuth limits are configured but no azimuth map was provided",
                ));
            };
            if let Some(max) = cfg.max_cumulative_azimuth_change {
                chain.push(CumulativeAzimuthChange::new(max, az.clone()));
            }
            if let Some(max) = cfg.max_jump_azimuth_change {
                chain.push(JumpAzimuthChange::new(max, az.clone()));
            }
            if let Some(max) = cfg.max_total_azimuth_change {
                chain.push(TotalAzimuthChange::new(max, az));
            }
        }
        Ok(chain)
    }

    /// Run every filter's setup check.
    pub fn check_inputs(
        &self,
        model: &SectionModel,
        graph: &ProximityGraph,
    ) -> Result<(), SetupError> {
        for f in &self.filters {
            f.check_inputs(model, graph)?;
        }
        Ok(())
    }

    /// Evaluate a candidate.
    ///
    /// `junction` tells whether the newest step crossed parents; junction-only
    /// filters are skipped otherwise.
    pub fn evaluate(&self, view: &RuptureView<'_>, junction: bool) -> Evaluation {
        let mut out = Evaluation::pass();
        for f in &self.filters {
            if !junction && f.junctions_only() {
                continue;
            }
            let verdict = match f.apply(view) {
                Ok(v) => v,
                Err(err) => {
                    warn!(filter = f.name(), path = ?view.path, %err, "filter failed; rejecting candidate");
                    out.errors += 1;
                    Verdict::FailFatal
                }
            };
            if verdict.is_pass() {
                continue;
            }
            trace!(filter = f.name(), ?verdict, path = ?view.path, "candidate rejected");
            if out.failed_by.is_none() {
                out.failed_by = Some(f.name());
            }
            out.verdict = out.verdict.and(verdict);
            if !verdict.can_continue() {
                break;
            }
        }
        out
    }
}

/// Thresholds for the built-in filters; `None` disables a filter.
///
/// Defaults follow the UCERF3 rupture-building rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCfg {
    pub min_sects_per_parent: Option<usize>,
    pub max_cumulative_jump_km: Option<f64>,
    pub max_cumulative_rake_change: Option<f64>,
    pub max_cumulative_azimuth_change: Option<f64>,
    pub max_jump_azimuth_change: Option<f64>,
    pub max_total_azimuth_change: Option<f64>,
}

impl Default for FilterCfg {
    fn default() -> Self {
        Self {
            min_sects_per_parent: Some(2),
            max_cumulative_jump_km: Some(5.0),
            max_cumulative_rake_change: Some(180.0),
            max_cumulative_azimuth_change: Some(560.0),
            max_jump_azimuth_change: Some(60.0),
            max_total_azimuth_change: Some(60.0),
        }
    }
}

impl FilterCfg {
    /// Every filter disabled.
    pub fn permissive() -> Self {
        Self {
            min_sects_per_parent: None,
            max_cumulative_jump_km: None,
            max_cumulative_rake_change: None,
            max_cumulative_azimuth_change: None,
            max_jump_azimuth_change: None,
            max_total_azimuth_change: None,
        }
    }

    /// The default rules minus those that need azimuths.
    pub fn without_azimuths() -> Self {
        Self {
            max_cumulative_azimuth_change: None,
            max_jump_azimuth_change: None,
            max_total_azimuth_change: None,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.min_sects_per_parent == Some(0) {
            return Err(SetupError::config("min_sects_per_parent must be at least 1"));
        }
        let limits = [
            ("max_cumulative_jump_km", self.max_cumulative_jump_km),
            ("max_cumulative_rake_change", self.max_cumulative_rake_change),
            ("max_cumulative_azimuth_change", self.max_cumulative_azimuth_change),
            ("max_jump_azimuth_change", self.max_jump_azimuth_change),
            ("max_total_azimuth_change", self.max_total_azimuth_change),
        ];
        for (name, value) in limits {
            if let Some(v) = value {
                if v.is_nan() || v < 0.0 {
                    return Err(SetupError::config(format!(
                        "{name} must be non-negative, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}
