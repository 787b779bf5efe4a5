//! Proximity graph construction.

use std::collections::HashMap;

use tracing::debug;

use crate::error::SetupError;
use crate::section::{DistanceMap, ParentId, SectionId, SectionModel, SectionPair, StressTable};

use super::types::{ConnectCfg, ProximityGraph};

/// Build the proximity graph.
///
/// Validates `cfg` and the distance map against `model` first; no partial
/// graph is returned on error.
pub fn compute_connections(
    model: &SectionModel,
    distances: &DistanceMap,
    stress: Option<&StressTable>,
    cfg: ConnectCfg,
) -> Result<ProximityGraph, SetupError> {
    cfg.validate()?;
    distances.validate(model)?;

    let groups = ParentGroups::of(model);
    let mut graph = ProximityGraph::empty(model.len());

    // Consecutive sub-sections of a strand, regardless of distance.
    for members in &groups.members {
        for w in members.windows(2) {
            graph.link_both(w[0], w[1]);
        }
    }

    // Candidates per unordered group pair; the winner is chosen once all
    // are known so map iteration order cannot matter.
    let mut candidates: HashMap<(usize, usize), Vec<LinkCandidate>> = HashMap::new();
    for (pair, km) in distances.iter() {
        let ga = groups.group_of[pair.lo().0];
        let gb = groups.group_of[pair.hi().0];
        if ga == gb {
            continue;
        }
        candidates
            .entry((ga.min(gb), ga.max(gb)))
            .or_default()
            .push(LinkCandidate {
                pair,
                km,
                in_stress: stress.is_some_and(|t| t.contains(pair)),
            });
    }

    let mut selected: Vec<SectionPair> = candidates
        .into_values()
        .filter_map(|cands| LinkCandidate::select(&cands, cfg.tie_rel_eps))
        .filter(|c| c.km < cfg.max_jump_distance_km)
        .map(|c| c.pair)
        .collect();
    selected.sort_unstable();
    for pair in &selected {
        graph.link_both(pair.lo(), pair.hi());
    }
    graph.normalize();

    debug!(
        sections = model.len(),
        parent_groups = groups.members.len(),
        cross_parent_links = selected.len(),
        max_jump_km = cfg.max_jump_distance_km,
        "proximity graph built"
    );
    Ok(graph)
}

/// Sections grouped by parent strand, list order preserved inside a group.
/// Parentless sections form singleton groups.
struct ParentGroups {
    members: Vec<Vec<SectionId>>,
    group_of: Vec<usize>,
}

impl ParentGroups {
    fn of(model: &SectionModel) -> Self {
        let mut members: Vec<Vec<SectionId>> = Vec::new();
        let mut group_of = Vec::with_capacity(model.len());
        let mut by_parent: HashMap<ParentId, usize> = HashMap::new();
        for s in model.iter() {
            let g = match s.parent {
                Some(p) => *by_parent.entry(p).or_insert_with(|| {
                    members.push(Vec::new());
                    members.len() - 1
                }),
                None => {
                    members.push(Vec::new());
                    members.len() - 1
                }
            };
            members[g].push(s.id);
            group_of.push(g);
        }
        Self { members, group_of }
    }
}

#[derive(Clone, Copy, Debug)]
struct LinkCandidate {
    pair: SectionPair,
    km: f64,
    in_stress: bool,
}

impl LinkCandidate {
    /// Closest candidate. Every candidate within `rel_eps` (relative to the
    /// minimum) of the minimum counts as tied; among those a stress-table
    /// pair wins, then the smaller pair.
    fn select(cands: &[LinkCandidate], rel_eps: f64) -> Option<LinkCandidate> {
        let min_km = cands.iter().map(|c| c.km).min_by(f64::total_cmp)?;
        let limit = min_km + rel_eps * min_km.abs().max(1.0);
        cands
            .iter()
            .filter(|c| c.km <= limit)
            .min_by_key(|c| (!c.in_stress, c.pair))
            .copied()
    }
}
