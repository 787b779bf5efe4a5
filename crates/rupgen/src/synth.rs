//! Synthetic fault networks for tests, benchmarks and demos.
//!
//! Model
//! - Each parent is a straight strand of equal-length sections, starting at a
//!   uniform point in `[0, extent_km]^2` with a uniform strike.
//! - Cross-parent distances are exact minimum segment-to-segment distances;
//!   only pairs closer than `distance_cutoff_km` are stored.
//! - Azimuths run midpoint to midpoint (degrees clockwise from north, in
//!   (-180, 180]) and cover every stored pair and every same-parent neighbor
//!   pair, in both directions.
//! - Rakes pick a mechanism (strike-slip, reverse, normal) and add jitter.
//!
//! Determinism: one `StdRng` seeded from `seed`; same config, same network.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::section::{AzimuthMap, DistanceMap, FaultInputs, Section, SectionId, SectionModel};

const MECHANISM_RAKES: [f64; 4] = [0.0, 180.0, 90.0, -90.0];

/// Generator parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthCfg {
    pub num_parents: usize,
    pub sects_per_parent: usize,
    pub sect_len_km: f64,
    pub extent_km: f64,
    pub distance_cutoff_km: f64,
    /// Uniform rake jitter half-width (degrees).
    pub rake_jitter_deg: f64,
    pub seed: u64,
}

impl Default for SynthCfg {
    fn default() -> Self {
        Self {
            num_parents: 8,
            sects_per_parent: 4,
            sect_len_km: 7.0,
            extent_km: 60.0,
            distance_cutoff_km: 10.0,
            rake_jitter_deg: 10.0,
            seed: 42,
        }
    }
}

impl SynthCfg {
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.sects_per_parent == 0 {
            return Err(SetupError::config("sects_per_parent must be positive"));
        }
        let positive = [
            ("sect_len_km", self.sect_len_km),
            ("extent_km", self.extent_km),
            ("distance_cutoff_km", self.distance_cutoff_km),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(SetupError::config(format!(
                    "{name} must be positive and finite, got {v}"
                )));
            }
        }
        if !(self.rake_jitter_deg.is_finite() && (0.0..=90.0).contains(&self.rake_jitter_deg)) {
            return Err(SetupError::config("rake_jitter_deg must lie in [0, 90]"));
        }
        Ok(())
    }
}

/// Map-view trace of one section.
#[derive(Clone, Copy, Debug)]
struct Segment {
    a: Vector2<f64>,
    b: Vector2<f64>,
}

impl Segment {
    fn midpoint(&self) -> Vector2<f64> {
        (self.a + self.b) * 0.5
    }

    fn point_distance(&self, p: Vector2<f64>) -> f64 {
        let ab = self.b - self.a;
        let len2 = ab.norm_squared();
        if len2 == 0.0 {
            return (p - self.a).norm();
        }
        let t = ((p - self.a).dot(&ab) / len2).clamp(0.0, 1.0);
        (p - (self.a + ab * t)).norm()
    }

    fn distance(&self, other: &Segment) -> f64 {
        if self.intersects(other) {
            return 0.0;
        }
        self.point_distance(other.a)
            .min(self.point_distance(other.b))
            .min(other.point_distance(self.a))
            .min(other.point_distance(self.b))
    }

    /// Proper crossing only; touching cases fall out of the endpoint distances.
    fn intersects(&self, other: &Segment) -> bool {
        let d1 = cross(other.b - other.a, self.a - other.a);
        let d2 = cross(other.b - other.a, self.b - other.a);
        let d3 = cross(self.b - self.a, other.a - self.a);
        let d4 = cross(self.b - self.a, other.b - self.a);
        d1 * d2 < 0.0 && d3 * d4 < 0.0
    }
}

#[inline]
fn cross(u: Vector2<f64>, v: Vector2<f64>) -> f64 {
    u.x * v.y - u.y * v.x
}

/// Azimuth from `p` to `q`, degrees clockwise from north (+y).
#[inline]
pub fn azimuth_deg(p: Vector2<f64>, q: Vector2<f64>) -> f64 {
    let d = q - p;
    d.x.atan2(d.y).to_degrees()
}

fn wrap_rake(r: f64) -> f64 {
    if r > 180.0 {
        r - 360.0
    } else if r <= -180.0 {
        r + 360.0
    } else {
        r
    }
}

/// Generate a network and its pairwise inputs.
pub fn generate(cfg: &SynthCfg) -> Result<FaultInputs, SetupError> {
    cfg.validate()?;
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut sections = Vec::with_capacity(cfg.num_parents * cfg.sects_per_parent);
    let mut segments = Vec::with_capacity(sections.capacity());

    for parent in 0..cfg.num_parents {
        let start = Vector2::new(
            rng.gen_range(0.0..cfg.extent_km),
            rng.gen_range(0.0..cfg.extent_km),
        );
        let strike: f64 = rng.gen_range(0.0..360.0);
        let dir = Vector2::new(strike.to_radians().sin(), strike.to_radians().cos());
        let mechanism = MECHANISM_RAKES[rng.gen_range(0..MECHANISM_RAKES.len())];
        for k in 0..cfg.sects_per_parent {
            let seg = Segment {
                a: start + dir * (k as f64 * cfg.sect_len_km),
                b: start + dir * ((k + 1) as f64 * cfg.sect_len_km),
            };
            let jitter = if cfg.rake_jitter_deg > 0.0 {
                rng.gen_range(-cfg.rake_jitter_deg..=cfg.rake_jitter_deg)
            } else {
                0.0
            };
            let mid = seg.midpoint();
            sections.push(
                Section::new(sections.len(), Some(parent as u32))
                    .with_rake(wrap_rake(mechanism + jitter))
                    .with_strike(strike)
                    .with_midpoint(mid.x, mid.y),
            );
            segments.push(seg);
        }
    }

    let model = SectionModel::new(sections)?;
    let mut distances = DistanceMap::new();
    let mut azimuths = AzimuthMap::new();
    let n = model.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = (SectionId(i), SectionId(j));
            let same_parent = model[a].shares_parent(&model[b]);
            let adjacent = same_parent && j == i + 1;
            if same_parent && !adjacent {
                continue;
            }
            let km = segments[i].distance(&segments[j]);
            if !adjacent && km >= cfg.distance_cutoff_km {
                continue;
            }
            distances.insert(a, b, km);
            let (pa, pb) = (model[a].midpoint, model[b].midpoint);
            azimuths.insert(a, b, azimuth_deg(pa, pb));
            azimuths.insert(b, a, azimuth_deg(pb, pa));
        }
    }
    Ok(FaultInputs::new(model, distances).with_azimuths(azimuths))
}
