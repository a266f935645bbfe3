//! Tabular export of paths, clouds and channel walls.
//!
//! Tables are written as Parquet when the output ends in `.parquet`, CSV otherwise.

use anyhow::{Context, Result};
use billiard::cloud::Cloud;
use billiard::Vec2;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

pub fn path_frame(x: &[f64], y: &[f64]) -> Result<DataFrame> {
    let vertex: Vec<u32> = (0..x.len() as u32).collect();
    Ok(df!("vertex" => vertex, "x" => x, "y" => y)?)
}

/// Long format: one row per (frame, particle).
pub fn cloud_frame(cloud: &Cloud) -> Result<DataFrame> {
    let (frames, particles) = (cloud.n_frames(), cloud.n_particles());
    let rows = frames * particles;
    let mut frame = Vec::with_capacity(rows);
    let mut particle = Vec::with_capacity(rows);
    let mut x = Vec::with_capacity(rows);
    let mut y = Vec::with_capacity(rows);
    let mut label = Vec::with_capacity(rows);
    let mut end = Vec::with_capacity(rows);
    for f in 0..frames {
        for j in 0..particles {
            frame.push(f as u32);
            particle.push(j as u32);
            x.push(cloud.x[(f, j)]);
            y.push(cloud.y[(f, j)]);
            label.push(cloud.labels[(f, j)]);
            end.push(cloud.ends[(f, j)]);
        }
    }
    Ok(df!(
        "frame" => frame,
        "particle" => particle,
        "x" => x,
        "y" => y,
        "label" => label,
        "end" => end
    )?)
}

pub fn walls_frame(lower: &[Vec2], upper: &[Vec2]) -> Result<DataFrame> {
    let wall: Vec<&str> = std::iter::repeat("lower")
        .take(lower.len())
        .chain(std::iter::repeat("upper").take(upper.len()))
        .collect();
    let (x, y): (Vec<f64>, Vec<f64>) = lower.iter().chain(upper).map(|p| (p.x, p.y)).unzip();
    Ok(df!("wall" => wall, "x" => x, "y" => y)?)
}

pub fn write_table(df: &mut DataFrame, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    let parquet = out
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
    if parquet {
        ParquetWriter::new(file).finish(df)?;
    } else {
        CsvWriter::new(file).include_header(true).finish(df)?;
    }
    tracing::info!(rows = df.height(), cols = df.width(), out = %out.display(), "table written");
    Ok(())
}
