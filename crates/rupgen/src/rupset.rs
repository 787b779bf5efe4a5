//! End-to-end rupture-set construction.
//!
//! Purpose
//! - Run the whole pipeline on one [`FaultInputs`]: validate, connect,
//!   partition, build and check the filter chain, then search every cluster.
//! - All precondition checks happen before the first search step; a build
//!   either fails with a [`SetupError`] or returns a complete set (possibly
//!   with truncated clusters, which are flagged).
//!
//! Design notes
//! - Clusters are independent; with `parallel` they are searched on the
//!   rayon pool and collected in partition order, so the result is identical
//!   to a sequential run.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cluster::{partition, Exclusions};
use crate::config::BuildCfg;
use crate::connect::compute_connections;
use crate::error::SetupError;
use crate::filter::FilterChain;
use crate::search::{enumerate, ClusterRuptures, Rupture, SearchStats};
use crate::section::{FaultInputs, ParentId};

/// Configured build over borrowed inputs.
pub struct RuptureSetBuilder<'a> {
    inputs: &'a FaultInputs,
    cfg: BuildCfg,
    chain: Option<FilterChain>,
}

impl<'a> RuptureSetBuilder<'a> {
    pub fn new(inputs: &'a FaultInputs, cfg: BuildCfg) -> Self {
        Self {
            inputs,
            cfg,
            chain: None,
        }
    }

    /// Use `chain` instead of the one derived from `cfg.filters`.
    pub fn with_chain(mut self, chain: FilterChain) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn build(self) -> Result<RuptureSet, SetupError> {
        let Self { inputs, cfg, chain } = self;
        cfg.validate()?;
        inputs.validate()?;
        let model = &inputs.model;

        let full = compute_connections(
            model,
            &inputs.distances,
            inputs.stress.as_ref(),
            cfg.connect,
        )?;
        let excluded: Vec<ParentId> = cfg.excluded_parents.iter().copied().map(ParentId).collect();
        let exclusions = Exclusions::parents(model, &excluded);
        let part = partition(model, &full, Some(&exclusions))?;

        let chain = match chain {
            Some(c) => c,
            None => FilterChain::from_cfg(&cfg.filters, inputs)?,
        };
        chain.check_inputs(model, &part.graph)?;

        info!(
            sections = model.len(),
            links = part.graph.num_links(),
            excluded = exclusions.len(),
            clusters = part.clusters.len(),
            largest = part.largest().map_or(0, |c| c.len()),
            filters = ?chain.names(),
            "searching clusters"
        );

        let search = cfg.search;
        let graph = &part.graph;
        let chain = &chain;
        let clusters: Vec<ClusterRuptures> = if cfg.parallel {
            part.clusters
                .par_iter()
                .map(|c| enumerate(c, model, graph, chain, search))
                .collect()
        } else {
            part.clusters
                .iter()
                .map(|c| enumerate(c, model, graph, chain, search))
                .collect()
        };

        let set = RuptureSet {
            num_sections: model.len(),
            num_links: part.graph.num_links(),
            clusters,
        };
        info!(
            ruptures = set.num_ruptures(),
            truncated = set.truncated_clusters().len(),
            "rupture set built"
        );
        Ok(set)
    }
}

/// All accepted ruptures, grouped per cluster in partition order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuptureSet {
    pub num_sections: usize,
    /// Directed links of the searched graph (each undirected link twice).
    pub num_links: usize,
    pub clusters: Vec<ClusterRuptures>,
}

impl RuptureSet {
    /// Every rupture, cluster by cluster, in discovery order.
    pub fn ruptures(&self) -> impl Iterator<Item = &Rupture> + '_ {
        self.clusters.iter().flat_map(|c| c.ruptures.iter())
    }

    pub fn num_ruptures(&self) -> usize {
        self.clusters.iter().map(ClusterRuptures::len).sum()
    }

    /// Indices of clusters whose enumeration hit the cap.
    pub fn truncated_clusters(&self) -> Vec<usize> {
        self.clusters
            .iter()
            .filter(|c| c.truncated)
            .map(|c| c.cluster)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.clusters.iter().all(|c| !c.truncated)
    }

    /// Number of ruptures each section takes part in, indexed by section id.
    pub fn section_rupture_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.num_sections];
        for r in self.ruptures() {
            for s in &r.sections {
                counts[s.0] += 1;
            }
        }
        counts
    }

    /// Search counters summed over clusters.
    pub fn stats(&self) -> SearchStats {
        let mut total = SearchStats::default();
        for c in &self.clusters {
            total.merge(&c.stats);
        }
        total
    }
}
