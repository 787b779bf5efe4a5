//! Identifier and record types for fault sections.

use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// Section identifier; equals the section's position in the model.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SectionId(pub usize);

/// Parent fault (strand) identifier.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParentId(pub u32);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ParentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unordered section pair, stored normalized as `(lo, hi)`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SectionPair {
    lo: SectionId,
    hi: SectionId,
}

impl SectionPair {
    #[inline]
    pub fn new(a: SectionId, b: SectionId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }
    #[inline]
    pub fn lo(&self) -> SectionId {
        self.lo
    }
    #[inline]
    pub fn hi(&self) -> SectionId {
        self.hi
    }
    #[inline]
    pub fn contains(&self, id: SectionId) -> bool {
        self.lo == id || self.hi == id
    }
}

impl fmt::Display for SectionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lo, self.hi)
    }
}

/// Directed step between two sections of a candidate rupture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Jump {
    pub from: SectionId,
    pub to: SectionId,
}

impl Jump {
    #[inline]
    pub fn new(from: SectionId, to: SectionId) -> Self {
        Self { from, to }
    }
    #[inline]
    pub fn pair(&self) -> SectionPair {
        SectionPair::new(self.from, self.to)
    }
}

/// One fault sub-section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    /// `None` for sections without a parent strand.
    pub parent: Option<ParentId>,
    /// Rake in degrees, [-180, 180].
    pub rake: f64,
    /// Strike in degrees, [0, 360).
    pub strike: f64,
    /// Map-view midpoint in km.
    pub midpoint: Vector2<f64>,
}

impl Section {
    pub fn new(id: usize, parent: Option<u32>) -> Self {
        Self {
            id: SectionId(id),
            parent: parent.map(ParentId),
            rake: 0.0,
            strike: 0.0,
            midpoint: Vector2::zeros(),
        }
    }

    pub fn with_rake(mut self, rake: f64) -> Self {
        self.rake = rake;
        self
    }

    pub fn with_strike(mut self, strike: f64) -> Self {
        self.strike = strike;
        self
    }

    pub fn with_midpoint(mut self, x_km: f64, y_km: f64) -> Self {
        self.midpoint = Vector2::new(x_km, y_km);
        self
    }

    /// True if both sections belong to the same parent strand.
    ///
    /// Parentless sections never share a parent, not even with each other.
    #[inline]
    pub fn shares_parent(&self, other: &Section) -> bool {
        matches!((self.parent, other.parent), (Some(a), Some(b)) if a == b)
    }
}

/// Frozen, validated section list.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SectionModel {
    sections: Vec<Section>,
}

impl SectionModel {
    /// Validate `sections[i].id == i` and freeze the list.
    pub fn new(sections: Vec<Section>) -> Result<Self, SetupError> {
        if let Some((index, s)) = sections
            .iter()
            .enumerate()
            .find(|(i, s)| s.id.0 != *i)
        {
            return Err(SetupError::SectionIdMismatch { index, id: s.id });
        }
        Ok(Self { sections })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
    #[inline]
    pub fn get(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id.0)
    }
    #[inline]
    pub fn contains(&self, id: SectionId) -> bool {
        id.0 < self.sections.len()
    }
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }
    pub fn ids(&self) -> impl Iterator<Item = SectionId> {
        (0..self.sections.len()).map(SectionId)
    }

    /// Parent of `id`; `None` for parentless or unknown sections.
    #[inline]
    pub fn parent_of(&self, id: SectionId) -> Option<ParentId> {
        self.sections.get(id.0).and_then(|s| s.parent)
    }

    /// True if a step `a -> b` crosses between parent strands.
    #[inline]
    pub fn is_junction(&self, a: SectionId, b: SectionId) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(sa), Some(sb)) => !sa.shares_parent(sb),
            _ => true,
        }
    }

    pub(crate) fn check_id(&self, id: SectionId, context: &'static str) -> Result<(), SetupError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(SetupError::UnknownSection {
                id,
                num_sections: self.len(),
                context,
            })
        }
    }
}

impl std::ops::Index<SectionId> for SectionModel {
    type Output = Section;
    #[inline]
    fn index(&self, id: SectionId) -> &Section {
        &self.sections[id.0]
    }
}
