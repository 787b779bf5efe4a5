//! Pairwise inputs: distances, azimuths, stress-interaction membership.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::SetupError;

use super::types::{Jump, SectionId, SectionModel, SectionPair};

/// Minimum distance (km) between section pairs; symmetric by construction.
///
/// Absent pairs mean "not connected".
#[derive(Clone, Debug, Default)]
pub struct DistanceMap {
    map: HashMap<SectionPair, f64>,
}

impl DistanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or overwrite) the distance between `a` and `b`.
    pub fn insert(&mut self, a: SectionId, b: SectionId, km: f64) {
        self.map.insert(SectionPair::new(a, b), km);
    }

    #[inline]
    pub fn get(&self, a: SectionId, b: SectionId) -> Option<f64> {
        self.map.get(&SectionPair::new(a, b)).copied()
    }

    #[inline]
    pub fn get_pair(&self, pair: SectionPair) -> Option<f64> {
        self.map.get(&pair).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (SectionPair, f64)> + '_ {
        self.map.iter().map(|(p, d)| (*p, *d))
    }

    /// Reject unknown ids, self pairs and non-finite or negative distances.
    pub fn validate(&self, model: &SectionModel) -> Result<(), SetupError> {
        for (pair, km) in self.iter() {
            model.check_id(pair.hi(), "distance map")?;
            if pair.lo() == pair.hi() {
                return Err(SetupError::SelfPair {
                    id: pair.lo(),
                    context: "distance map",
                });
            }
            if !km.is_finite() || km < 0.0 {
                return Err(SetupError::InvalidDistance { pair, value: km });
            }
        }
        Ok(())
    }
}

impl FromIterator<(SectionId, SectionId, f64)> for DistanceMap {
    fn from_iter<I: IntoIterator<Item = (SectionId, SectionId, f64)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (a, b, km) in iter {
            out.insert(a, b, km);
        }
        out
    }
}

/// Directed azimuths in degrees, keyed `(from, to)`.
#[derive(Clone, Debug, Default)]
pub struct AzimuthMap {
    map: HashMap<(SectionId, SectionId), f64>,
}

impl AzimuthMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: SectionId, to: SectionId, deg: f64) {
        self.map.insert((from, to), deg);
    }

    #[inline]
    pub fn get(&self, from: SectionId, to: SectionId) -> Option<f64> {
        self.map.get(&(from, to)).copied()
    }

    #[inline]
    pub fn of_jump(&self, jump: Jump) -> Option<f64> {
        self.get(jump.from, jump.to)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionId, SectionId, f64)> + '_ {
        self.map.iter().map(|((a, b), d)| (*a, *b, *d))
    }

    pub fn validate(&self, model: &SectionModel) -> Result<(), SetupError> {
        for (from, to, deg) in self.iter() {
            model.check_id(from, "azimuth map")?;
            model.check_id(to, "azimuth map")?;
            if from == to {
                return Err(SetupError::SelfPair {
                    id: from,
                    context: "azimuth map",
                });
            }
            if !deg.is_finite() {
                return Err(SetupError::InvalidAzimuth {
                    from,
                    to,
                    value: deg,
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<(SectionId, SectionId, f64)> for AzimuthMap {
    fn from_iter<I: IntoIterator<Item = (SectionId, SectionId, f64)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (a, b, deg) in iter {
            out.insert(a, b, deg);
        }
        out
    }
}

/// Membership table of section pairs with a computed stress interaction.
///
/// Only consulted to break ties between equally close connection candidates.
#[derive(Clone, Debug, Default)]
pub struct StressTable {
    pairs: HashSet<SectionPair>,
}

impl StressTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, a: SectionId, b: SectionId) {
        self.pairs.insert(SectionPair::new(a, b));
    }

    #[inline]
    pub fn contains(&self, pair: SectionPair) -> bool {
        self.pairs.contains(&pair)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SectionPair> + '_ {
        self.pairs.iter().copied()
    }

    pub fn validate(&self, model: &SectionModel) -> Result<(), SetupError> {
        for pair in &self.pairs {
            model.check_id(pair.hi(), "stress table")?;
        }
        Ok(())
    }
}

impl FromIterator<(SectionId, SectionId)> for StressTable {
    fn from_iter<I: IntoIterator<Item = (SectionId, SectionId)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (a, b) in iter {
            out.insert(a, b);
        }
        out
    }
}

/// Everything a run consumes from upstream collaborators.
///
/// Maps are shared behind `Arc` so filters can hold them without copying.
#[derive(Clone, Debug)]
pub struct FaultInputs {
    pub model: SectionModel,
    pub distances: Arc<DistanceMap>,
    pub azimuths: Option<Arc<AzimuthMap>>,
    pub stress: Option<StressTable>,
}

impl FaultInputs {
    pub fn new(model: SectionModel, distances: DistanceMap) -> Self {
        Self {
            model,
            distances: Arc::new(distances),
            azimuths: None,
            stress: None,
        }
    }

    pub fn with_azimuths(mut self, azimuths: AzimuthMap) -> Self {
        self.azimuths = Some(Arc::new(azimuths));
        self
    }

    pub fn with_stress(mut self, stress: StressTable) -> Self {
        self.stress = Some(stress);
        self
    }

    /// Check every pairwise map against the model.
    pub fn validate(&self) -> Result<(), SetupError> {
        self.distances.validate(&self.model)?;
        if let Some(az) = &self.azimuths {
            az.validate(&self.model)?;
        }
        if let Some(stress) = &self.stress {
            stress.validate(&self.model)?;
        }
        Ok(())
    }
}
