//! Connected components of the proximity graph.
//!
//! Each component is an independent search space. Excluded sections are
//! dropped from availability and from every neighbor list first; the
//! returned [`Partition`] carries that restricted graph, and searches must
//! run on it so they never walk into an excluded section.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::connect::ProximityGraph;
use crate::error::SetupError;
use crate::section::{ParentId, SectionId, SectionModel};

/// One connected component, ascending ids, no duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Cluster {
    /// Position in the partition (seed order).
    pub index: usize,
    pub sections: Vec<SectionId>,
}

impl Cluster {
    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
    pub fn contains(&self, id: SectionId) -> bool {
        self.sections.binary_search(&id).is_ok()
    }
}

/// Sections the caller wants ignored.
#[derive(Clone, Debug, Default)]
pub struct Exclusions {
    ids: HashSet<SectionId>,
}

impl Exclusions {
    pub fn none() -> Self {
        Self::default()
    }

    /// Exclude explicit section ids (validated against the model).
    pub fn sections(
        model: &SectionModel,
        ids: impl IntoIterator<Item = SectionId>,
    ) -> Result<Self, SetupError> {
        let ids: HashSet<SectionId> = ids.into_iter().collect();
        for &id in &ids {
            model.check_id(id, "exclusion set")?;
        }
        Ok(Self { ids })
    }

    /// Exclude every section whose parent is listed.
    pub fn parents(model: &SectionModel, parents: &[ParentId]) -> Self {
        let wanted: HashSet<ParentId> = parents.iter().copied().collect();
        let ids = model
            .iter()
            .filter(|s| s.parent.is_some_and(|p| wanted.contains(&p)))
            .map(|s| s.id)
            .collect();
        Self { ids }
    }

    #[inline]
    pub fn contains(&self, id: SectionId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Clusters plus the graph restricted to available sections.
#[derive(Clone, Debug)]
pub struct Partition {
    pub clusters: Vec<Cluster>,
    pub graph: ProximityGraph,
}

impl Partition {
    /// Number of sections covered by all clusters.
    pub fn num_sections(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    pub fn largest(&self) -> Option<&Cluster> {
        self.clusters.iter().max_by_key(|c| c.len())
    }
}

/// Partition available sections into connected components.
///
/// Seeds at the lowest remaining id each time, so cluster order is
/// deterministic (seed-ascending).
pub fn partition(
    model: &SectionModel,
    graph: &ProximityGraph,
    exclusions: Option<&Exclusions>,
) -> Result<Partition, SetupError> {
    if graph.len() != model.len() {
        return Err(SetupError::config(format!(
            "proximity graph has {} nodes but model has {} sections",
            graph.len(),
            model.len()
        )));
    }
    let graph = match exclusions {
        Some(ex) if !ex.is_empty() => graph.without(|id| ex.contains(id)),
        _ => graph.clone(),
    };

    let mut available: Vec<bool> = model
        .ids()
        .map(|id| !exclusions.is_some_and(|ex| ex.contains(id)))
        .collect();
    let mut clusters = Vec::new();
    let mut stack = Vec::new();
    for seed in model.ids() {
        if !available[seed.0] {
            continue;
        }
        available[seed.0] = false;
        stack.push(seed);
        let mut members = Vec::new();
        while let Some(cur) = stack.pop() {
            members.push(cur);
            for &next in graph.neighbors(cur) {
                if available[next.0] {
                    available[next.0] = false;
                    stack.push(next);
                }
            }
        }
        members.sort_unstable();
        clusters.push(Cluster {
            index: clusters.len(),
            sections: members,
        });
    }

    debug!(
        clusters = clusters.len(),
        excluded = exclusions.map_or(0, Exclusions::len),
        "partitioned sections"
    );
    Ok(Partition { clusters, graph })
}
