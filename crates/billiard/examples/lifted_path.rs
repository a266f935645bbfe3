//! Print the lifted path and its resampled frames for one hand-written particle.
//!
//! Usage:
//!   cargo run -p billiard --example lifted_path -- [step]
//!
//! The particle enters at height 0.1, bounces off the lower and upper wedges
//! of cell 0, crosses into cell 1, and is mirrored on its second segment.

use billiard::prelude::*;

fn main() -> Result<(), ReconError> {
    let step: f64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.1);
    let channel = build_channel(0.5, std::f64::consts::FRAC_PI_2)?;

    let h = [0.1, 0.2, 0.35];
    let theta = [0.3, std::f64::consts::PI - 0.2, 0.0];
    let tau = [1.2, 1.1, 0.0];
    let positions = [0i64, 1, 0];
    let itineraries = ["L03R", "R0L", "LR"].map(String::from);
    let labels = [4, 7, 4];
    let traj = TrajectoryView::new(&h, &theta, &tau, &positions, &itineraries, &labels)?;

    let (xs, ys) = reconstruct_lifted_trajectory(&channel, &traj)?;
    println!("lifted path ({} points):", xs.len());
    for (x, y) in xs.iter().zip(ys.iter()) {
        println!("  {x:>9.5} {y:>9.5}");
    }

    let frames = interpolate(&xs, &ys, traj.labels, usize::MAX, step)?;
    println!("{} frames at step {step}; regions entered at {:?}", frames.len(), frames.ends);
    for k in 0..frames.len() {
        println!(
            "  {k:>4} {:>9.5} {:>9.5} label={}",
            frames.x[k], frames.y[k], frames.labels[k]
        );
    }
    Ok(())
}
