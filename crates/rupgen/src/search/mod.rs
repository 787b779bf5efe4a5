//! Rupture search: bounded depth-first enumeration per cluster.
//!
//! Purpose
//! - From every section of a cluster, grow simple paths through the
//!   proximity graph one section at a time, evaluating the filter chain on
//!   each extension.
//! - Accept a path when the chain passes and its section set has not been
//!   accepted before; keep growing from it unless the verdict was fatal.
//! - Stop the cluster when accepting would exceed the rupture cap, and flag
//!   the result as truncated.
//!
//! Design notes
//! - The traversal keeps one shared candidate (push/pop) and an explicit
//!   cursor stack instead of call-stack recursion; visiting order equals the
//!   recursive pre-order.
//! - Dedup state and results belong to one runner per cluster, so clusters
//!   can run on separate workers.

mod dfs;
mod types;

pub use dfs::{enumerate, enumerate_observed};
pub use types::{ClusterRuptures, FailureHandler, Rupture, SearchCfg, SearchStats, UniqueRupture};

#[cfg(test)]
mod tests;
