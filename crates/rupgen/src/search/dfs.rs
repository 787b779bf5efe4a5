//! Depth-first rupture enumeration with incremental filtering and dedup.

use std::collections::HashSet;
use std::ops::ControlFlow;

use tracing::{debug, warn};

use crate::cluster::Cluster;
use crate::connect::ProximityGraph;
use crate::filter::{Evaluation, FilterChain, RuptureView};
use crate::section::{Jump, SectionId, SectionModel};

use super::types::{ClusterRuptures, FailureHandler, Rupture, SearchCfg, SearchStats, UniqueRupture};

/// Enumerate every plausible rupture of `cluster`.
///
/// `graph` must be the graph the cluster was partitioned from (see
/// [`crate::cluster::Partition::graph`]). Links leaving the cluster are
/// never followed. `cfg` is assumed validated.
pub fn enumerate(
    cluster: &Cluster,
    model: &SectionModel,
    graph: &ProximityGraph,
    chain: &FilterChain,
    cfg: SearchCfg,
) -> ClusterRuptures {
    DfsRunner::new(model, graph, chain, cfg, None).run(cluster)
}

/// Like [`enumerate`], reporting every rejected candidate to `handler`.
pub fn enumerate_observed(
    cluster: &Cluster,
    model: &SectionModel,
    graph: &ProximityGraph,
    chain: &FilterChain,
    cfg: SearchCfg,
    handler: &dyn FailureHandler,
) -> ClusterRuptures {
    DfsRunner::new(model, graph, chain, cfg, Some(handler)).run(cluster)
}

/// Growing path shared by the whole traversal.
struct Candidate {
    path: Vec<SectionId>,
    jumps: Vec<Jump>,
    junctions: Vec<usize>,
    members: Vec<bool>, // indexed by section id
}

impl Candidate {
    fn new(num_sections: usize) -> Self {
        Self {
            path: Vec::new(),
            jumps: Vec::new(),
            junctions: Vec::new(),
            members: vec![false; num_sections],
        }
    }

    fn start(&mut self, seed: SectionId) {
        debug_assert!(self.path.is_empty());
        self.path.push(seed);
        self.members[seed.0] = true;
    }

    #[inline]
    fn last(&self) -> SectionId {
        self.path[self.path.len() - 1]
    }

    #[inline]
    fn len(&self) -> usize {
        self.path.len()
    }

    #[inline]
    fn contains(&self, id: SectionId) -> bool {
        self.members[id.0]
    }

    fn push(&mut self, next: SectionId, junction: bool) {
        let last = self.last();
        if junction {
            self.junctions.push(self.path.len());
        }
        self.jumps.push(Jump::new(last, next));
        self.path.push(next);
        self.members[next.0] = true;
    }

    fn pop(&mut self) {
        let Some(id) = self.path.pop() else {
            return;
        };
        self.members[id.0] = false;
        self.jumps.pop();
        if self.junctions.last() == Some(&self.path.len()) {
            self.junctions.pop();
        }
    }

    fn view<'a>(&'a self, model: &'a SectionModel) -> RuptureView<'a> {
        RuptureView::new(model, &self.path, &self.jumps, &self.junctions)
    }
}

/// Per-cluster runner carrying shared context and accumulators.
struct DfsRunner<'a> {
    model: &'a SectionModel,
    graph: &'a ProximityGraph,
    chain: &'a FilterChain,
    cfg: SearchCfg,
    handler: Option<&'a dyn FailureHandler>,
    cand: Candidate,
    in_cluster: Vec<bool>, // indexed by section id
    seen: HashSet<UniqueRupture>,
    ruptures: Vec<Rupture>,
    stats: SearchStats,
    truncated: bool,
}

impl<'a> DfsRunner<'a> {
    fn new(
        model: &'a SectionModel,
        graph: &'a ProximityGraph,
        chain: &'a FilterChain,
        cfg: SearchCfg,
        handler: Option<&'a dyn FailureHandler>,
    ) -> Self {
        Self {
            model,
            graph,
            chain,
            cfg,
            handler,
            cand: Candidate::new(model.len()),
            in_cluster: vec![false; model.len()],
            seen: HashSet::new(),
            ruptures: Vec::new(),
            stats: SearchStats::default(),
            truncated: false,
        }
    }

    fn run(mut self, cluster: &Cluster) -> ClusterRuptures {
        for &id in &cluster.sections {
            self.in_cluster[id.0] = true;
        }
        for &seed in &cluster.sections {
            if self.search_from(seed).is_break() {
                break;
            }
        }
        if self.truncated {
            warn!(
                cluster = cluster.index,
                sections = cluster.len(),
                cap = self.cfg.max_ruptures_per_cluster,
                "rupture cap reached; cluster enumeration is incomplete"
            );
        }
        debug!(
            cluster = cluster.index,
            sections = cluster.len(),
            ruptures = self.ruptures.len(),
            evaluated = self.stats.evaluated,
            duplicates = self.stats.duplicates,
            "cluster searched"
        );
        ClusterRuptures {
            cluster: cluster.index,
            sections: cluster.sections.clone(),
            ruptures: self.ruptures,
            truncated: self.truncated,
            stats: self.stats,
        }
    }

    /// All ruptures grown from `seed`, in pre-order.
    fn search_from(&mut self, seed: SectionId) -> ControlFlow<()> {
        let graph = self.graph;
        let max_len = self.cfg.max_sections_per_rupture.unwrap_or(usize::MAX);

        self.cand.start(seed);
        let root = self.evaluate(false);
        if root.verdict.is_pass() && self.accept().is_break() {
            return ControlFlow::Break(());
        }
        if !root.verdict.can_continue() {
            self.cand.pop();
            return ControlFlow::Continue(());
        }

        // cursors[d] = next neighbor index to try from path[d]
        let mut cursors: Vec<usize> = vec![0];
        while let Some(&cursor) = cursors.last() {
            let neighbors = graph.neighbors(self.cand.last());
            let next = match neighbors.get(cursor) {
                Some(&next) if self.cand.len() < max_len => next,
                _ => {
                    cursors.pop();
                    self.cand.pop();
                    continue;
                }
            };
            if let Some(c) = cursors.last_mut() {
                *c += 1;
            }
            if self.cand.contains(next) || !self.in_cluster[next.0] {
                continue;
            }
            let junction = self.model.is_junction(self.cand.last(), next);
            self.cand.push(next, junction);
            let ev = self.evaluate(junction);
            if !ev.verdict.can_continue() {
                self.cand.pop();
                continue;
            }
            if ev.verdict.is_pass() && self.accept().is_break() {
                return ControlFlow::Break(());
            }
            cursors.push(0);
        }
        debug_assert_eq!(self.cand.len(), 0);
        ControlFlow::Continue(())
    }

    fn evaluate(&mut self, junction: bool) -> Evaluation {
        let ev = self
            .chain
            .evaluate(&self.cand.view(self.model), junction);
        self.stats.evaluated += 1;
        self.stats.longest_path = self.stats.longest_path.max(self.cand.len());
        self.stats.filter_errors += u64::from(ev.errors);
        if !ev.verdict.is_pass() {
            let continuable = ev.verdict.can_continue();
            if continuable {
                self.stats.continuable_failures += 1;
            } else {
                self.stats.fatal_failures += 1;
            }
            if let Some(h) = self.handler {
                let filter = ev.failed_by.unwrap_or("unknown");
                h.rupture_failed(&self.cand.path, filter, continuable);
            }
        }
        ev
    }

    /// Record the current candidate unless its section set is known.
    /// Breaks when the cap would be exceeded.
    fn accept(&mut self) -> ControlFlow<()> {
        let id = UniqueRupture::from_path(&self.cand.path);
        if self.seen.contains(&id) {
            self.stats.duplicates += 1;
            return ControlFlow::Continue(());
        }
        if self.ruptures.len() >= self.cfg.max_ruptures_per_cluster {
            self.truncated = true;
            return ControlFlow::Break(());
        }
        self.seen.insert(id);
        self.ruptures.push(Rupture::new(self.cand.path.clone()));
        self.stats.accepted += 1;
        ControlFlow::Continue(())
    }
}
