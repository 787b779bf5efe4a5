//! Proximity graph: which sections a rupture may jump between.
//!
//! Purpose
//! - Link consecutive sub-sections of each parent strand in both directions,
//!   independent of distance, so every strand forms a connected chain.
//! - Add at most one cross-parent link per pair of parent strands: the
//!   globally closest section pair, if closer than the maximum jump distance.
//!
//! Ties between equally close candidate pairs are broken deterministically:
//! a pair listed in the stress table wins, otherwise the smaller `(lo, hi)`
//! pair wins. Map iteration order never affects the result.

mod build;
mod types;

pub use build::compute_connections;
pub use types::{ConnectCfg, ProximityGraph};
