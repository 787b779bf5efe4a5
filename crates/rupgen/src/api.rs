//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for the CLI,
//!   benches and demos. Breaking changes are allowed.
//! - Prefer these re-exports over reaching into submodules.

// Inputs
pub use crate::section::{
    AzimuthMap, DistanceMap, FaultInputs, Jump, ParentId, Section, SectionId, SectionModel,
    SectionPair, StressTable,
};
// Connection graph and clusters
pub use crate::cluster::{partition, Cluster, Exclusions, Partition};
pub use crate::connect::{compute_connections, ConnectCfg, ProximityGraph};
// Plausibility filters
pub use crate::filter::{
    azimuth_difference, rake_difference, CumulativeAzimuthChange, CumulativeJumpDistance,
    CumulativeRakeChange, Evaluation, FilterCfg, FilterChain, JumpAzimuthChange,
    MinSectsPerParent, PlausibilityFilter, RuptureView, TotalAzimuthChange, Verdict,
};
// Search
pub use crate::search::{
    enumerate, enumerate_observed, ClusterRuptures, FailureHandler, Rupture, SearchCfg,
    SearchStats, UniqueRupture,
};
// Whole-set builds
pub use crate::config::BuildCfg;
pub use crate::rupset::{RuptureSet, RuptureSetBuilder};
// Synthetic networks
pub use crate::synth::{generate as generate_synthetic, SynthCfg};
// Errors
pub use crate::error::{FilterError, SetupError};
