//! Multi-fault rupture enumeration over a network of fault sections.
//!
//! Pipeline: `section` (frozen model + pairwise maps) → `connect` (proximity
//! graph) → `cluster` (connected components) → `search` (plausibility-filtered
//! DFS per cluster, using `filter`) → `rupset` (aggregated rupture set).
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - Prefer the curated surface in [`api`] or the [`prelude`] from callers.

pub mod api;
pub mod cluster;
pub mod config;
pub mod connect;
pub mod error;
pub mod filter;
pub mod rupset;
pub mod search;
pub mod section;
pub mod synth;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{FilterError, SetupError};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cluster::{partition, Cluster, Exclusions, Partition};
    pub use crate::config::BuildCfg;
    pub use crate::connect::{compute_connections, ConnectCfg, ProximityGraph};
    pub use crate::error::{FilterError, SetupError};
    pub use crate::filter::{FilterCfg, FilterChain, PlausibilityFilter, RuptureView, Verdict};
    pub use crate::rupset::{RuptureSet, RuptureSetBuilder};
    pub use crate::search::{enumerate, ClusterRuptures, Rupture, SearchCfg, UniqueRupture};
    pub use crate::section::{
        AzimuthMap, DistanceMap, FaultInputs, Jump, ParentId, Section, SectionId, SectionModel,
        SectionPair, StressTable,
    };
}
