//! Data types for the proximity graph and its construction parameters.

use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::section::{SectionId, SectionModel};

/// Connection parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectCfg {
    /// Cross-parent links require a distance strictly below this (km).
    pub max_jump_distance_km: f64,
    /// Relative tolerance under which two candidate distances count as tied.
    pub tie_rel_eps: f64,
}

impl Default for ConnectCfg {
    fn default() -> Self {
        Self {
            max_jump_distance_km: 5.0,
            tie_rel_eps: 1e-9,
        }
    }
}

impl ConnectCfg {
    pub fn with_max_jump(max_jump_distance_km: f64) -> Self {
        Self {
            max_jump_distance_km,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if !(self.max_jump_distance_km.is_finite() && self.max_jump_distance_km > 0.0) {
            return Err(SetupError::config(format!(
                "max_jump_distance_km must be positive and finite, got {}",
                self.max_jump_distance_km
            )));
        }
        if !(self.tie_rel_eps.is_finite() && self.tie_rel_eps >= 0.0) {
            return Err(SetupError::config(format!(
                "tie_rel_eps must be non-negative, got {}",
                self.tie_rel_eps
            )));
        }
        Ok(())
    }
}

/// Section id → ascending neighbor list ("jump candidates").
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProximityGraph {
    adj: Vec<Vec<SectionId>>,
}

impl ProximityGraph {
    /// Graph with `num_sections` isolated nodes.
    pub fn empty(num_sections: usize) -> Self {
        Self {
            adj: vec![Vec::new(); num_sections],
        }
    }

    /// Build from explicit neighbor lists.
    ///
    /// Links are made bidirectional and lists sorted and deduplicated, so a
    /// link listed in one direction only is still walked both ways. Rejects
    /// ids outside `0..adj.len()` and self links.
    pub fn from_adjacency(adj: Vec<Vec<SectionId>>) -> Result<Self, SetupError> {
        let n = adj.len();
        for (i, list) in adj.iter().enumerate() {
            for &j in list {
                if j.0 >= n {
                    return Err(SetupError::UnknownSection {
                        id: j,
                        num_sections: n,
                        context: "proximity graph",
                    });
                }
                if j.0 == i {
                    return Err(SetupError::SelfPair {
                        id: j,
                        context: "proximity graph",
                    });
                }
            }
        }
        let mut graph = Self::empty(n);
        for (i, list) in adj.into_iter().enumerate() {
            for j in list {
                graph.link_both(SectionId(i), j);
            }
        }
        graph.normalize();
        Ok(graph)
    }

    /// Number of nodes (equals the model's section count).
    #[inline]
    pub fn len(&self) -> usize {
        self.adj.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    #[inline]
    pub fn neighbors(&self, id: SectionId) -> &[SectionId] {
        self.adj.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn has_link(&self, from: SectionId, to: SectionId) -> bool {
        self.neighbors(from).contains(&to)
    }

    /// Directed links `(from, to)` in node order.
    pub fn links(&self) -> impl Iterator<Item = (SectionId, SectionId)> + '_ {
        self.adj
            .iter()
            .enumerate()
            .flat_map(|(i, list)| list.iter().map(move |&j| (SectionId(i), j)))
    }

    /// Number of directed links.
    pub fn num_links(&self) -> usize {
        self.adj.iter().map(Vec::len).sum()
    }

    /// Cross-parent links counted once per unordered pair.
    pub fn num_junction_links(&self, model: &SectionModel) -> usize {
        self.links()
            .filter(|&(a, b)| a < b && model.is_junction(a, b))
            .count()
    }

    pub(crate) fn link_both(&mut self, a: SectionId, b: SectionId) {
        self.adj[a.0].push(b);
        self.adj[b.0].push(a);
    }

    pub(crate) fn normalize(&mut self) {
        for list in self.adj.iter_mut() {
            list.sort_unstable();
            list.dedup();
        }
    }

    /// Copy with the given sections removed from every neighbor list and
    /// stripped of their own links.
    pub(crate) fn without(&self, excluded: impl Fn(SectionId) -> bool) -> Self {
        let adj = self
            .adj
            .iter()
            .enumerate()
            .map(|(i, list)| {
                if excluded(SectionId(i)) {
                    Vec::new()
                } else {
                    list.iter().copied().filter(|&j| !excluded(j)).collect()
                }
            })
            .collect();
        Self { adj }
    }
}
