use anyhow::{Context, Result};
use billiard::cloud::build_cloud;
use billiard::trajectory::reconstruct_lifted_trajectory;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod export;
mod load;
mod provenance;
mod study;

use load::RowRange;
use provenance::Payload;
use study::{Study, StudyConfig, STUDY_PREFIX};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Lifted billiard trajectories from recorded scattering data")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Args)]
struct StudyArgs {
    /// Study config JSON; data paths inside are relative to its directory
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
    #[arg(long, default_value_t = format!("{STUDY_PREFIX}0"))]
    study: String,
}

impl StudyArgs {
    fn resolve(&self) -> Result<Study> {
        StudyConfig::from_path(&self.config)?.study(&self.study)
    }
}

#[derive(Subcommand)]
enum Action {
    /// Reconstruct one particle's lifted path and write its vertices
    Reconstruct {
        #[command(flatten)]
        study: StudyArgs,
        #[arg(long)]
        particle: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Resample a block of particles onto a common frame grid
    Cloud {
        #[command(flatten)]
        study: StudyArgs,
        /// Arc length between frames
        #[arg(long, default_value_t = 0.01)]
        step: f64,
        /// Frame count; defaults to the shortest total dwell divided by the step
        #[arg(long)]
        frames: Option<usize>,
        #[arg(long, default_value_t = 0)]
        start_row: usize,
        /// Particles to load from `start_row`; all remaining when omitted
        #[arg(long)]
        chunk_size: Option<usize>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Write the channel walls tiled over a range of cells
    Walls {
        #[command(flatten)]
        study: StudyArgs,
        /// Number of cells, centred on cell 0 (rounded up to odd)
        #[arg(long, default_value_t = 5)]
        cells: u32,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a provenance JSON block, with study parameters when a config is given
    Report {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Reconstruct {
            study,
            particle,
            out,
        } => reconstruct(study, particle, out),
        Action::Cloud {
            study,
            step,
            frames,
            start_row,
            chunk_size,
            out,
        } => cloud(study, step, frames, RowRange { start: start_row, count: chunk_size }, out),
        Action::Walls { study, cells, out } => walls(study, cells, out),
        Action::Report { config } => report(config),
    }
}

fn reconstruct(args: StudyArgs, particle: usize, out: PathBuf) -> Result<()> {
    let study = args.resolve()?;
    tracing::info!(study = %study.id, particle, out = %out.display(), "reconstruct");
    let channel = study.channel()?;
    let ensemble = load::load_ensemble(&study.files, RowRange::chunk(particle, 1))?;
    let traj = ensemble
        .trajectory(0)
        .with_context(|| format!("particle {particle} is past the end of the data"))?;
    let (x, y) = reconstruct_lifted_trajectory(&channel, &traj)
        .with_context(|| format!("reconstructing particle {particle}"))?;
    tracing::info!(vertices = x.len(), "lifted path");

    export::write_table(&mut export::path_frame(&x, &y)?, &out)?;
    let payload = Payload::new("reconstruct", json!({ "particle": particle, "vertices": x.len() }))
        .with_study(&study.id);
    provenance::write_sidecar(&out, &payload)?;
    Ok(())
}

fn cloud(
    args: StudyArgs,
    step: f64,
    frames: Option<usize>,
    rows: RowRange,
    out: PathBuf,
) -> Result<()> {
    let study = args.resolve()?;
    tracing::info!(study = %study.id, step, frames = ?frames, start_row = rows.start, "cloud");
    let channel = study.channel()?;
    let ensemble = load::load_ensemble(&study.files, rows)?;
    let cloud = build_cloud(&channel, &ensemble, step, frames).context("building cloud")?;
    tracing::info!(
        frames = cloud.n_frames(),
        particles = cloud.n_particles(),
        "cloud built"
    );

    export::write_table(&mut export::cloud_frame(&cloud)?, &out)?;
    let payload = Payload::new(
        "cloud",
        json!({
            "step": step,
            "frames": cloud.n_frames(),
            "start_row": rows.start,
            "particles": cloud.n_particles()
        }),
    )
    .with_study(&study.id);
    provenance::write_sidecar(&out, &payload)?;
    Ok(())
}

fn walls(args: StudyArgs, cells: u32, out: PathBuf) -> Result<()> {
    let study = args.resolve()?;
    let half = i64::from(cells / 2);
    tracing::info!(study = %study.id, from = -half, to = half, "walls");
    let channel = study.channel()?;
    let (lower, upper) = channel.tiled_walls(-half..=half);

    export::write_table(&mut export::walls_frame(&lower, &upper)?, &out)?;
    let payload = Payload::new(
        "walls",
        json!({
            "width": channel.width(),
            "alpha": channel.alpha(),
            "cells": [-half, half]
        }),
    )
    .with_study(&study.id);
    provenance::write_sidecar(&out, &payload)?;
    Ok(())
}

fn report(config: Option<PathBuf>) -> Result<()> {
    let params = match &config {
        Some(path) => {
            let cfg = StudyConfig::from_path(path)?;
            let mut studies = serde_json::Map::new();
            for id in cfg.ids() {
                let s = cfg.study(id)?;
                studies.insert(
                    id.to_string(),
                    json!({ "width": s.params.width, "alpha": s.params.alpha }),
                );
            }
            json!({ "config": path, "studies": studies })
        }
        None => json!({}),
    };
    let doc = provenance::document(&Payload::new("report", params), &[]);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
