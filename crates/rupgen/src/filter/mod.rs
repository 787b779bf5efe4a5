//! Plausibility filters evaluated as a candidate rupture grows.
//!
//! Purpose
//! - A uniform predicate interface ([`PlausibilityFilter`]) over the growing
//!   path, its jumps and its junction indices.
//! - An ordered [`FilterChain`] that skips junction-only filters on
//!   same-parent steps, stops at the first fatal verdict and AND-combines the
//!   rest (worst verdict wins).
//! - The concrete rules from the UCERF3-era rupture builder, configured
//!   through [`FilterCfg`].
//!
//! A filter that cannot compute a verdict returns a [`crate::FilterError`];
//! the chain logs it with the offending path and treats it as fatal for that
//! candidate only.

mod chain;
mod impls;
mod types;

pub use chain::{Evaluation, FilterCfg, FilterChain};
pub use impls::{
    azimuth_difference, rake_difference, CumulativeAzimuthChange, CumulativeJumpDistance,
    CumulativeRakeChange, JumpAzimuthChange, MinSectsPerParent, TotalAzimuthChange,
};
pub use types::{PlausibilityFilter, RuptureView, Verdict};
