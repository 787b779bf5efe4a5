use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rupgen::api::{generate_synthetic, BuildCfg, RuptureSet, RuptureSetBuilder, SynthCfg};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

mod io;
mod provenance;

#[derive(Parser)]
#[command(name = "rupgen")]
#[command(about = "Multi-fault rupture enumeration over fault-section networks")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Build a rupture set from CSV inputs and write it as JSON
    Build {
        #[arg(long)]
        sections: PathBuf,
        #[arg(long)]
        distances: PathBuf,
        #[arg(long)]
        azimuths: Option<PathBuf>,
        #[arg(long)]
        stress: Option<PathBuf>,
        /// JSON build configuration; missing fields take defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override `connect.max_jump_distance_km`
        #[arg(long)]
        max_jump_km: Option<f64>,
        /// Parent ids to leave out (repeatable)
        #[arg(long = "exclude-parent")]
        exclude_parents: Vec<u32>,
        /// Search clusters on one thread
        #[arg(long)]
        sequential: bool,
        #[arg(long)]
        out: PathBuf,
    },
    /// Write a synthetic network as CSV inputs
    Synth {
        #[arg(long, default_value_t = 8)]
        parents: usize,
        #[arg(long, default_value_t = 4)]
        sects_per_parent: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Print a summary of a rupture-set JSON file
    Report {
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Build {
            sections,
            distances,
            azimuths,
            stress,
            config,
            max_jump_km,
            exclude_parents,
            sequential,
            out,
        } => {
            let mut cfg = load_cfg(config.as_deref())?;
            if let Some(km) = max_jump_km {
                cfg.connect.max_jump_distance_km = km;
            }
            cfg.excluded_parents.extend(exclude_parents);
            if sequential {
                cfg.parallel = false;
            }
            let files = InputFiles {
                sections,
                distances,
                azimuths,
                stress,
            };
            build(&files, cfg, &out)
        }
        Action::Synth {
            parents,
            sects_per_parent,
            seed,
            out_dir,
        } => synth(
            SynthCfg {
                num_parents: parents,
                sects_per_parent,
                seed,
                ..SynthCfg::default()
            },
            &out_dir,
        ),
        Action::Report { input } => report(&input),
    }
}

struct InputFiles {
    sections: PathBuf,
    distances: PathBuf,
    azimuths: Option<PathBuf>,
    stress: Option<PathBuf>,
}

fn load_cfg(path: Option<&Path>) -> Result<BuildCfg> {
    let Some(path) = path else {
        return Ok(BuildCfg::default());
    };
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn build(files: &InputFiles, cfg: BuildCfg, out: &Path) -> Result<()> {
    tracing::info!(sections = %files.sections.display(), out = %out.display(), "build");
    let inputs = io::read_inputs(
        &files.sections,
        &files.distances,
        files.azimuths.as_deref(),
        files.stress.as_deref(),
    )?;
    let set = RuptureSetBuilder::new(&inputs, cfg.clone()).build()?;
    for idx in set.truncated_clusters() {
        tracing::warn!(cluster = idx, "cluster truncated at rupture cap");
    }

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out, serde_json::to_vec(&set)?)
        .with_context(|| format!("writing {}", out.display()))?;

    let mut payload = provenance::Payload::new(serde_json::to_value(&cfg)?)
        .with_input(&files.sections)
        .with_input(&files.distances);
    for p in [&files.azimuths, &files.stress].into_iter().flatten() {
        payload = payload.with_input(p);
    }
    let prov = provenance::write_sidecar(out, payload)?;
    tracing::info!(
        ruptures = set.num_ruptures(),
        clusters = set.clusters.len(),
        provenance = %prov.display(),
        "wrote rupture set"
    );
    Ok(())
}

fn synth(cfg: SynthCfg, out_dir: &Path) -> Result<()> {
    tracing::info!(parents = cfg.num_parents, seed = cfg.seed, "synth");
    let inputs = generate_synthetic(&cfg)?;
    let written = io::write_inputs(&inputs, out_dir)?;
    let params = serde_json::to_value(cfg)?;
    for path in &written {
        provenance::write_sidecar(path, provenance::Payload::new(params.clone()))?;
    }
    tracing::info!(
        sections = inputs.model.len(),
        distances = inputs.distances.len(),
        files = written.len(),
        "wrote synthetic network"
    );
    Ok(())
}

fn summarize(set: &RuptureSet) -> serde_json::Value {
    let mut by_len: BTreeMap<usize, usize> = BTreeMap::new();
    for r in set.ruptures() {
        *by_len.entry(r.len()).or_default() += 1;
    }
    let counts = set.section_rupture_counts();
    serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "num_sections": set.num_sections,
        "num_links": set.num_links,
        "clusters": set.clusters.len(),
        "ruptures": set.num_ruptures(),
        "truncated_clusters": set.truncated_clusters(),
        "ruptures_by_length": by_len,
        "sections_without_ruptures": counts.iter().filter(|&&c| c == 0).count(),
        "stats": set.stats(),
    })
}

fn report(input: &Path) -> Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let set: RuptureSet =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", input.display()))?;
    println!("{}", serde_json::to_string_pretty(&summarize(&set))?);
    Ok(())
}
