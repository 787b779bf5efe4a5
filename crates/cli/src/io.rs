//! CSV exchange of fault inputs via polars.
//!
//! Columns
//! - sections:  id, parent_id (-1 or empty for none), rake, strike, x_km, y_km
//! - distances: id1, id2, distance_km
//! - azimuths:  from_id, to_id, azimuth_deg
//! - stress:    id1, id2
//!
//! Only `id` and `parent_id` are required in the sections file; missing
//! geometry columns default to zero.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use rupgen::api::{
    AzimuthMap, DistanceMap, FaultInputs, Section, SectionId, SectionModel, StressTable,
};
use std::fs::File;
use std::path::{Path, PathBuf};

pub fn read_csv(path: &Path) -> Result<DataFrame> {
    LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .finish()
        .and_then(|lf| lf.collect())
        .with_context(|| format!("reading {}", path.display()))
}

fn i64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let col = df
        .column(name)
        .with_context(|| format!("missing column `{name}`"))?
        .cast(&DataType::Int64)?;
    Ok(col.i64()?.into_iter().collect())
}

fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let col = df
        .column(name)
        .with_context(|| format!("missing column `{name}`"))?
        .cast(&DataType::Float64)?;
    Ok(col.f64()?.into_iter().collect())
}

fn f64_column_or_zero(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    if df.column(name).is_ok() {
        Ok(f64_column(df, name)?
            .into_iter()
            .map(|v| v.unwrap_or(0.0))
            .collect())
    } else {
        Ok(vec![0.0; df.height()])
    }
}

fn section_id(v: Option<i64>, column: &str, row: usize) -> Result<SectionId> {
    match v {
        Some(x) if x >= 0 => Ok(SectionId(x as usize)),
        Some(x) => bail!("row {row}: `{column}` must be non-negative, got {x}"),
        None => bail!("row {row}: `{column}` is empty"),
    }
}

fn required_f64(v: Option<f64>, column: &str, row: usize) -> Result<f64> {
    v.with_context(|| format!("row {row}: `{column}` is empty"))
}

pub fn read_sections(path: &Path) -> Result<SectionModel> {
    let df = read_csv(path)?;
    let ids = i64_column(&df, "id")?;
    let parents = i64_column(&df, "parent_id")?;
    let rakes = f64_column_or_zero(&df, "rake")?;
    let strikes = f64_column_or_zero(&df, "strike")?;
    let xs = f64_column_or_zero(&df, "x_km")?;
    let ys = f64_column_or_zero(&df, "y_km")?;
    let mut sections = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let id = section_id(ids[row], "id", row)?;
        let parent = match parents[row] {
            Some(p) if p >= 0 => {
                Some(u32::try_from(p).with_context(|| format!("row {row}: parent_id {p}"))?)
            }
            _ => None,
        };
        sections.push(
            Section::new(id.0, parent)
                .with_rake(rakes[row])
                .with_strike(strikes[row])
                .with_midpoint(xs[row], ys[row]),
        );
    }
    Ok(SectionModel::new(sections)?)
}

pub fn read_distances(path: &Path) -> Result<DistanceMap> {
    let df = read_csv(path)?;
    let a = i64_column(&df, "id1")?;
    let b = i64_column(&df, "id2")?;
    let km = f64_column(&df, "distance_km")?;
    let mut out = DistanceMap::new();
    for row in 0..df.height() {
        out.insert(
            section_id(a[row], "id1", row)?,
            section_id(b[row], "id2", row)?,
            required_f64(km[row], "distance_km", row)?,
        );
    }
    Ok(out)
}

pub fn read_azimuths(path: &Path) -> Result<AzimuthMap> {
    let df = read_csv(path)?;
    let from = i64_column(&df, "from_id")?;
    let to = i64_column(&df, "to_id")?;
    let deg = f64_column(&df, "azimuth_deg")?;
    let mut out = AzimuthMap::new();
    for row in 0..df.height() {
        out.insert(
            section_id(from[row], "from_id", row)?,
            section_id(to[row], "to_id", row)?,
            required_f64(deg[row], "azimuth_deg", row)?,
        );
    }
    Ok(out)
}

pub fn read_stress(path: &Path) -> Result<StressTable> {
    let df = read_csv(path)?;
    let a = i64_column(&df, "id1")?;
    let b = i64_column(&df, "id2")?;
    let mut out = StressTable::new();
    for row in 0..df.height() {
        out.insert(section_id(a[row], "id1", row)?, section_id(b[row], "id2", row)?);
    }
    Ok(out)
}

/// Load a full input set; optional files may be omitted.
pub fn read_inputs(
    sections: &Path,
    distances: &Path,
    azimuths: Option<&Path>,
    stress: Option<&Path>,
) -> Result<FaultInputs> {
    let mut inputs = FaultInputs::new(read_sections(sections)?, read_distances(distances)?);
    if let Some(p) = azimuths {
        inputs = inputs.with_azimuths(read_azimuths(p)?);
    }
    if let Some(p) = stress {
        inputs = inputs.with_stress(read_stress(p)?);
    }
    Ok(inputs)
}

fn write_csv(path: &Path, df: &mut DataFrame) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Write `sections.csv`, `distances.csv` and, when present, `azimuths.csv`
/// and `stress.csv` under `dir`. Rows are sorted for stable output.
pub fn write_inputs(inputs: &FaultInputs, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut written = Vec::new();

    let m = &inputs.model;
    let mut df = df!(
        "id" => m.iter().map(|s| s.id.0 as i64).collect::<Vec<_>>(),
        "parent_id" => m.iter().map(|s| s.parent.map_or(-1, |p| p.0 as i64)).collect::<Vec<_>>(),
        "rake" => m.iter().map(|s| s.rake).collect::<Vec<_>>(),
        "strike" => m.iter().map(|s| s.strike).collect::<Vec<_>>(),
        "x_km" => m.iter().map(|s| s.midpoint.x).collect::<Vec<_>>(),
        "y_km" => m.iter().map(|s| s.midpoint.y).collect::<Vec<_>>()
    )?;
    let path = dir.join("sections.csv");
    write_csv(&path, &mut df)?;
    written.push(path);

    let mut rows: Vec<_> = inputs.distances.iter().collect();
    rows.sort_by_key(|(pair, _)| *pair);
    let mut df = df!(
        "id1" => rows.iter().map(|(p, _)| p.lo().0 as i64).collect::<Vec<_>>(),
        "id2" => rows.iter().map(|(p, _)| p.hi().0 as i64).collect::<Vec<_>>(),
        "distance_km" => rows.iter().map(|(_, km)| *km).collect::<Vec<_>>()
    )?;
    let path = dir.join("distances.csv");
    write_csv(&path, &mut df)?;
    written.push(path);

    if let Some(az) = &inputs.azimuths {
        let mut rows: Vec<_> = az.iter().collect();
        rows.sort_by_key(|&(from, to, _)| (from, to));
        let mut df = df!(
            "from_id" => rows.iter().map(|r| r.0 .0 as i64).collect::<Vec<_>>(),
            "to_id" => rows.iter().map(|r| r.1 .0 as i64).collect::<Vec<_>>(),
            "azimuth_deg" => rows.iter().map(|r| r.2).collect::<Vec<_>>()
        )?;
        let path = dir.join("azimuths.csv");
        write_csv(&path, &mut df)?;
        written.push(path);
    }

    if let Some(stress) = &inputs.stress {
        let mut rows: Vec<_> = stress.iter().collect();
        rows.sort();
        let mut df = df!(
            "id1" => rows.iter().map(|p| p.lo().0 as i64).collect::<Vec<_>>(),
            "id2" => rows.iter().map(|p| p.hi().0 as i64).collect::<Vec<_>>()
        )?;
        let path = dir.join("stress.csv");
        write_csv(&path, &mut df)?;
        written.push(path);
    }
    Ok(written)
}
