//! Build a rupture set on a small synthetic network and print a summary.
//!
//! Usage:
//!   cargo run -p rupgen --example synthetic_network -- [num_parents] [seed]

use rupgen::api::*;

fn main() {
    let mut args = std::env::args().skip(1);
    let num_parents = args.next().and_then(|s| s.parse().ok()).unwrap_or(12);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let cfg = SynthCfg {
        num_parents,
        seed,
        ..SynthCfg::default()
    };
    let inputs = match generate_synthetic(&cfg) {
        Ok(inputs) => inputs,
        Err(err) => {
            eprintln!("synthetic network: {err}");
            std::process::exit(2);
        }
    };
    let set = match RuptureSetBuilder::new(&inputs, BuildCfg::default()).build() {
        Ok(set) => set,
        Err(err) => {
            eprintln!("build: {err}");
            std::process::exit(2);
        }
    };
    println!(
        "sections={} links={} clusters={} ruptures={}",
        set.num_sections,
        set.num_links,
        set.clusters.len(),
        set.num_ruptures()
    );
    for c in set.clusters.iter().filter(|c| !c.is_empty()) {
        let longest = c.ruptures.iter().map(Rupture::len).max().unwrap_or(0);
        println!(
            "cluster {}: sections={} ruptures={} longest={} truncated={}",
            c.cluster,
            c.sections.len(),
            c.len(),
            longest,
            c.truncated
        );
    }
}
