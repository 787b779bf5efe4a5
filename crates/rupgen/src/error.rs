//! Typed errors.
//!
//! `SetupError` covers precondition failures only; it is returned before any
//! search step runs. Runtime outcomes (truncation, rejected candidates) are
//! reported through [`crate::search::ClusterRuptures`] instead.

use thiserror::Error;

use crate::section::{SectionId, SectionPair};

/// Precondition violation detected while preparing a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    /// `sections[index].id != index`.
    #[error("section at index {index} has id {id}; ids must equal list positions")]
    SectionIdMismatch { index: usize, id: SectionId },

    /// A pairwise map or exclusion references a section outside the model.
    #[error("{context} references unknown section {id} (model has {num_sections} sections)")]
    UnknownSection {
        id: SectionId,
        num_sections: usize,
        context: &'static str,
    },

    /// A pairwise map keys a section against itself.
    #[error("{context} contains a self pair for section {id}")]
    SelfPair { id: SectionId, context: &'static str },

    #[error("distance for pair {pair} must be finite and non-negative, got {value}")]
    InvalidDistance { pair: SectionPair, value: f64 },

    #[error("azimuth {from}->{to} must be finite, got {value}")]
    InvalidAzimuth {
        from: SectionId,
        to: SectionId,
        value: f64,
    },

    /// Configuration values out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A configured filter needs data the inputs do not carry.
    #[error("filter `{filter}` is missing input data: {detail}")]
    MissingFilterData {
        filter: &'static str,
        detail: String,
    },
}

impl SetupError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(filter: &'static str, detail: impl Into<String>) -> Self {
        Self::MissingFilterData {
            filter,
            detail: detail.into(),
        }
    }
}

/// A filter could not compute a verdict for a candidate.
///
/// The search treats this as a fatal rejection of that candidate only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("no distance for pair {0}")]
    MissingDistance(SectionPair),

    #[error("no azimuth for jump {from}->{to}")]
    MissingAzimuth { from: SectionId, to: SectionId },
}
