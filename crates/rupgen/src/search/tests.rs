use std::collections::HashSet;
use std::sync::Mutex;

use proptest::prelude::*;

use super::*;
use crate::cluster::{partition, Cluster};
use crate::connect::ProximityGraph;
use crate::error::FilterError;
use crate::filter::{FilterChain, PlausibilityFilter, RuptureView, Verdict};
use crate::section::{Section, SectionId, SectionModel};

/// Sections without parents; every step is a junction.
fn loose_model(n: usize) -> SectionModel {
    SectionModel::new((0..n).map(|i| Section::new(i, None)).collect()).unwrap()
}

fn graph(n: usize, edges: &[(usize, usize)]) -> ProximityGraph {
    let mut adj = vec![Vec::new(); n];
    for &(a, b) in edges {
        adj[a].push(SectionId(b));
    }
    ProximityGraph::from_adjacency(adj).unwrap()
}

fn whole(n: usize) -> Cluster {
    Cluster {
        index: 0,
        sections: (0..n).map(SectionId).collect(),
    }
}

fn ids(r: &Rupture) -> Vec<usize> {
    r.sections.iter().map(|s| s.0).collect()
}

fn all_ids(out: &ClusterRuptures) -> Vec<Vec<usize>> {
    out.ruptures.iter().map(ids).collect()
}

/// Closure-backed filter for steering the traversal.
struct Rule<F> {
    junctions_only: bool,
    f: F,
}

impl<F> PlausibilityFilter for Rule<F>
where
    F: Fn(&RuptureView<'_>) -> Verdict + Send + Sync,
{
    fn name(&self) -> &'static str {
        "rule"
    }
    fn junctions_only(&self) -> bool {
        self.junctions_only
    }
    fn apply(&self, view: &RuptureView<'_>) -> Result<Verdict, FilterError> {
        Ok((self.f)(view))
    }
}

fn rule<F>(f: F) -> Rule<F>
where
    F: Fn(&RuptureView<'_>) -> Verdict + Send + Sync,
{
    Rule {
        junctions_only: false,
        f,
    }
}

struct Broken;

impl PlausibilityFilter for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }
    fn apply(&self, view: &RuptureView<'_>) -> Result<Verdict, FilterError> {
        match view.last_jump() {
            Some(j) => Err(FilterError::MissingDistance(j.pair())),
            None => Ok(Verdict::Pass),
        }
    }
}

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<(Vec<usize>, &'static str, bool)>>,
}

impl FailureHandler for Recorder {
    fn rupture_failed(&self, path: &[SectionId], filter: &'static str, continuable: bool) {
        let ids = path.iter().map(|s| s.0).collect();
        self.calls.lock().unwrap().push((ids, filter, continuable));
    }
}

#[test]
fn three_section_chain_yields_six_ruptures_in_discovery_order() {
    let m = loose_model(3);
    let g = graph(3, &[(0, 1), (1, 2)]);
    let out = enumerate(&whole(3), &m, &g, &FilterChain::new(), SearchCfg::default());
    assert_eq!(
        all_ids(&out),
        vec![vec![0], vec![0, 1], vec![0, 1, 2], vec![1], vec![1, 2], vec![2]]
    );
    assert!(!out.truncated);
    // [1,0], [2,1], [2,1,0]
    assert_eq!(out.stats.duplicates, 3);
    assert_eq!(out.stats.accepted, 6);
    assert_eq!(out.stats.longest_path, 3);
}

#[test]
fn path_graph_yields_every_contiguous_run() {
    let m = loose_model(4);
    let g = graph(4, &[(0, 1), (1, 2), (2, 3)]);
    let out = enumerate(&whole(4), &m, &g, &FilterChain::new(), SearchCfg::default());
    assert_eq!(out.len(), 10);
    let expected: HashSet<Vec<usize>> = (0..4)
        .flat_map(|a| (a..4).map(move |b| (a..=b).collect()))
        .collect();
    let got: HashSet<Vec<usize>> = out
        .ruptures
        .iter()
        .map(|r| r.identity().sections().iter().map(|s| s.0).collect())
        .collect();
    assert_eq!(got, expected);
}

#[test]
fn duplicate_prefix_still_extends() {
    // Star around 1; {1,2,3} is only reachable through the known prefix [2,1].
    let m = loose_model(4);
    let g = graph(4, &[(0, 1), (1, 2), (1, 3)]);
    let out = enumerate(&whole(4), &m, &g, &FilterChain::new(), SearchCfg::default());
    assert_eq!(
        all_ids(&out),
        vec![
            vec![0],
            vec![0, 1],
            vec![0, 1, 2],
            vec![0, 1, 3],
            vec![1],
            vec![1, 2],
            vec![1, 3],
            vec![2],
            vec![2, 1, 3],
            vec![3],
        ]
    );
}

#[test]
fn enumeration_is_deterministic() {
    let m = loose_model(5);
    let g = graph(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (1, 3)]);
    let a = enumerate(&whole(5), &m, &g, &FilterChain::new(), SearchCfg::default());
    let b = enumerate(&whole(5), &m, &g, &FilterChain::new(), SearchCfg::default());
    assert_eq!(a, b);
}

#[test]
fn cap_truncates_and_never_exceeds_limit() {
    let m = loose_model(3);
    let g = graph(3, &[(0, 1), (1, 2)]);
    let out = enumerate(&whole(3), &m, &g, &FilterChain::new(), SearchCfg::with_cap(1));
    assert!(out.truncated);
    assert_eq!(all_ids(&out), vec![vec![0]]);

    let out = enumerate(&whole(3), &m, &g, &FilterChain::new(), SearchCfg::with_cap(6));
    assert!(!out.truncated, "exactly reaching the cap is not truncation");
    assert_eq!(out.len(), 6);
}

#[test]
fn fatal_verdict_prunes_branch_and_seed() {
    let m = loose_model(3);
    let g = graph(3, &[(0, 1), (1, 2)]);
    let chain = FilterChain::new().with(rule(|v: &RuptureView<'_>| {
        if v.path.contains(&SectionId(1)) {
            Verdict::FailFatal
        } else {
            Verdict::Pass
        }
    }));
    let out = enumerate(&whole(3), &m, &g, &chain, SearchCfg::default());
    assert_eq!(all_ids(&out), vec![vec![0], vec![2]]);
    // [0,1], [1], [2,1]
    assert_eq!(out.stats.fatal_failures, 3);
}

#[test]
fn continuable_verdict_extends_without_accepting() {
    let m = loose_model(3);
    let g = graph(3, &[(0, 1), (1, 2)]);
    let chain = FilterChain::new().with(rule(|v: &RuptureView<'_>| {
        if v.len() == 2 {
            Verdict::FailContinuable
        } else {
            Verdict::Pass
        }
    }));
    let out = enumerate(&whole(3), &m, &g, &chain, SearchCfg::default());
    assert_eq!(all_ids(&out), vec![vec![0], vec![0, 1, 2], vec![1], vec![2]]);
    assert_eq!(out.stats.continuable_failures, 4);
    assert_eq!(out.stats.duplicates, 1);
}

#[test]
fn junction_only_rules_see_parent_crossings_only() {
    // 0,1 on parent 7; 2 on parent 8.
    let m = SectionModel::new(vec![
        Section::new(0, Some(7)),
        Section::new(1, Some(7)),
        Section::new(2, Some(8)),
    ])
    .unwrap();
    let g = graph(3, &[(0, 1), (1, 2)]);
    let chain = FilterChain::new().with(Rule {
        junctions_only: true,
        f: |_: &RuptureView<'_>| Verdict::FailFatal,
    });
    let out = enumerate(&whole(3), &m, &g, &chain, SearchCfg::default());
    assert_eq!(all_ids(&out), vec![vec![0], vec![0, 1], vec![1], vec![2]]);
}

#[test]
fn failure_handler_sees_every_rejection() {
    let m = loose_model(3);
    let g = graph(3, &[(0, 1), (1, 2)]);
    let chain = FilterChain::new().with(rule(|v: &RuptureView<'_>| match v.len() {
        2 => Verdict::FailContinuable,
        3 => Verdict::FailFatal,
        _ => Verdict::Pass,
    }));
    let rec = Recorder::default();
    let out = enumerate_observed(&whole(3), &m, &g, &chain, SearchCfg::default(), &rec);
    assert_eq!(all_ids(&out), vec![vec![0], vec![1], vec![2]]);
    let calls = rec.calls.into_inner().unwrap();
    assert_eq!(
        calls,
        vec![
            (vec![0, 1], "rule", true),
            (vec![0, 1, 2], "rule", false),
            (vec![1, 0], "rule", true),
            (vec![1, 2], "rule", true),
            (vec![2, 1], "rule", true),
            (vec![2, 1, 0], "rule", false),
        ]
    );
}

#[test]
fn failure_handler_names_the_first_rejecting_filter() {
    let m = loose_model(2);
    let g = graph(2, &[(0, 1)]);
    let chain = FilterChain::new()
        .with(rule(|v: &RuptureView<'_>| match v.len() {
            2 => Verdict::FailContinuable,
            _ => Verdict::Pass,
        }))
        .with(Broken);
    let rec = Recorder::default();
    enumerate_observed(&whole(2), &m, &g, &chain, SearchCfg::default(), &rec);
    let calls = rec.calls.into_inner().unwrap();
    assert_eq!(
        calls,
        vec![(vec![0, 1], "rule", false), (vec![1, 0], "rule", false)]
    );
}

#[test]
fn search_never_leaves_its_cluster() {
    let m = loose_model(3);
    let g = graph(3, &[(0, 1), (1, 2)]);
    let cluster = Cluster {
        index: 0,
        sections: vec![SectionId(1)],
    };
    let out = enumerate(&cluster, &m, &g, &FilterChain::new(), SearchCfg::default());
    assert_eq!(all_ids(&out), vec![vec![1]]);
    assert_eq!(out.stats.evaluated, 1);

    let pair = Cluster {
        index: 0,
        sections: vec![SectionId(1), SectionId(2)],
    };
    let out = enumerate(&pair, &m, &g, &FilterChain::new(), SearchCfg::default());
    assert_eq!(all_ids(&out), vec![vec![1], vec![1, 2], vec![2]]);
}

#[test]
fn max_sections_bounds_depth() {
    let m = loose_model(4);
    let g = graph(4, &[(0, 1), (1, 2), (2, 3)]);
    let cfg = SearchCfg {
        max_sections_per_rupture: Some(2),
        ..SearchCfg::default()
    };
    let out = enumerate(&whole(4), &m, &g, &FilterChain::new(), cfg);
    assert_eq!(out.len(), 7);
    assert!(out.ruptures.iter().all(|r| r.len() <= 2));
    assert_eq!(out.stats.longest_path, 2);
}

#[test]
fn filter_errors_reject_and_are_counted() {
    let m = loose_model(3);
    let g = graph(3, &[(0, 1), (1, 2)]);
    let chain = FilterChain::new().with(Broken);
    let out = enumerate(&whole(3), &m, &g, &chain, SearchCfg::default());
    assert_eq!(all_ids(&out), vec![vec![0], vec![1], vec![2]]);
    // [0,1], [1,0], [1,2], [2,1]
    assert_eq!(out.stats.filter_errors, 4);
    assert_eq!(out.stats.fatal_failures, 4);
}

#[test]
fn singleton_cluster_yields_single_rupture() {
    let m = loose_model(2);
    let g = graph(2, &[]);
    let c = Cluster {
        index: 1,
        sections: vec![SectionId(1)],
    };
    let out = enumerate(&c, &m, &g, &FilterChain::new(), SearchCfg::default());
    assert_eq!(out.cluster, 1);
    assert_eq!(all_ids(&out), vec![vec![1]]);
}

#[test]
fn stats_merge_sums_and_keeps_longest() {
    let mut a = SearchStats {
        evaluated: 3,
        accepted: 2,
        longest_path: 4,
        ..SearchStats::default()
    };
    let b = SearchStats {
        evaluated: 5,
        duplicates: 1,
        longest_path: 2,
        ..SearchStats::default()
    };
    a.merge(&b);
    assert_eq!(a.evaluated, 8);
    assert_eq!(a.accepted, 2);
    assert_eq!(a.duplicates, 1);
    assert_eq!(a.longest_path, 4);
}

#[test]
fn search_cfg_rejects_zero_limits() {
    assert!(SearchCfg::with_cap(0).validate().is_err());
    let cfg = SearchCfg {
        max_sections_per_rupture: Some(0),
        ..SearchCfg::default()
    };
    assert!(cfg.validate().is_err());
    assert!(SearchCfg::default().validate().is_ok());
}

/// Sorted vertex sets of every simple path, by plain recursion.
fn brute_force_identities(g: &ProximityGraph, start: SectionId) -> HashSet<Vec<usize>> {
    fn walk(g: &ProximityGraph, path: &mut Vec<SectionId>, out: &mut HashSet<Vec<usize>>) {
        let mut set: Vec<usize> = path.iter().map(|s| s.0).collect();
        set.sort_unstable();
        out.insert(set);
        let last = path[path.len() - 1];
        for &n in g.neighbors(last) {
            if !path.contains(&n) {
                path.push(n);
                walk(g, path, out);
                path.pop();
            }
        }
    }
    let mut out = HashSet::new();
    walk(g, &mut vec![start], &mut out);
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_ruptures_are_unique_simple_paths(
        n in 1usize..7,
        raw in proptest::collection::vec((0usize..7, 0usize..7), 0..12),
    ) {
        let edges: Vec<(usize, usize)> = raw
            .into_iter()
            .filter(|&(a, b)| a < n && b < n && a != b)
            .collect();
        let m = loose_model(n);
        let g = graph(n, &edges);
        let part = partition(&m, &g, None).unwrap();
        let chain = FilterChain::new();
        let mut total = 0;
        for cluster in &part.clusters {
            let out = enumerate(cluster, &m, &part.graph, &chain, SearchCfg::default());
            let mut seen = HashSet::new();
            for r in &out.ruptures {
                prop_assert!(seen.insert(r.identity()), "duplicate identity {:?}", r);
                prop_assert!(r.sections.iter().all(|&s| cluster.contains(s)));
                for w in r.sections.windows(2) {
                    prop_assert!(part.graph.has_link(w[0], w[1]));
                }
            }
            let mut expected = HashSet::new();
            for &s in &cluster.sections {
                expected.extend(brute_force_identities(&part.graph, s));
            }
            let got: HashSet<Vec<usize>> = out
                .ruptures
                .iter()
                .map(|r| r.identity().sections().iter().map(|s| s.0).collect())
                .collect();
            prop_assert_eq!(got, expected);
            total += out.len();
        }
        prop_assert!(total >= n);
    }
}
