//! Fault section model and the pairwise inputs consumed by the engine.
//!
//! Purpose
//! - Hold the frozen section list (`sections[i].id == i`, checked on construction).
//! - Hold pairwise distances (unordered pairs), directed azimuths and the
//!   optional stress-interaction membership table used as a tie-break.
//!
//! Geometry here is opaque to the search; only filters and the synthetic
//! generator read rake, strike and midpoints.

mod maps;
mod types;

pub use maps::{AzimuthMap, DistanceMap, FaultInputs, StressTable};
pub use types::{Jump, ParentId, Section, SectionId, SectionModel, SectionPair};

#[cfg(test)]
mod tests;
