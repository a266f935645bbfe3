//! Whitespace-delimited text matrices: one particle per line, one step per column.
//!
//! Blank lines and lines starting with `#` are skipped and do not count as rows.
//! Integer columns also accept integral floats (`3.0`), since upstream tools
//! often write every array as float text.

use anyhow::{bail, Context, Result};
use billiard::trajectory::Ensemble;
use std::fs;
use std::path::Path;

use crate::study::StudyFiles;

/// Rows `start..start + count` of a file (`count = None` reads to the end).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub count: Option<usize>,
}

impl RowRange {
    pub fn chunk(start: usize, count: usize) -> Self {
        Self {
            start,
            count: Some(count),
        }
    }
}

/// A single matrix entry.
pub trait Token: Sized {
    fn parse_token(s: &str) -> Option<Self>;
}

impl Token for f64 {
    fn parse_token(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl Token for String {
    fn parse_token(s: &str) -> Option<Self> {
        Some(s.to_string())
    }
}

fn integral(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().or_else(|| {
        let v: f64 = s.parse().ok()?;
        (v.is_finite() && v.fract() == 0.0 && v.abs() <= i64::MAX as f64).then_some(v as i64)
    })
}

impl Token for i64 {
    fn parse_token(s: &str) -> Option<Self> {
        integral(s)
    }
}

impl Token for i32 {
    fn parse_token(s: &str) -> Option<Self> {
        integral(s).and_then(|v| i32::try_from(v).ok())
    }
}

/// Parse matrix text; `origin` names the source in error messages.
pub fn parse_table<T: Token>(text: &str, origin: &str, rows: RowRange) -> Result<Vec<Vec<T>>> {
    let data_lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
        .skip(rows.start)
        .take(rows.count.unwrap_or(usize::MAX));

    let mut out: Vec<Vec<T>> = Vec::new();
    for (line_no, line) in data_lines {
        let row = line
            .split_whitespace()
            .enumerate()
            .map(|(col, tok)| {
                T::parse_token(tok).with_context(|| {
                    format!("{origin}:{line_no}: cannot parse column {} ({tok:?})", col + 1)
                })
            })
            .collect::<Result<Vec<T>>>()?;
        if let Some(first) = out.first() {
            if first.len() != row.len() {
                bail!(
                    "{origin}:{line_no}: ragged row with {} columns, expected {}",
                    row.len(),
                    first.len()
                );
            }
        }
        out.push(row);
    }
    Ok(out)
}

pub fn read_table<T: Token>(path: &Path, rows: RowRange) -> Result<Vec<Vec<T>>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_table(&text, &path.display().to_string(), rows)
}

/// Load the six per-particle arrays of a study into an [`Ensemble`].
pub fn load_ensemble(files: &StudyFiles, rows: RowRange) -> Result<Ensemble> {
    let h = read_table(&files.h, rows)?;
    let theta = read_table(&files.theta, rows)?;
    let tau = read_table(&files.tau, rows)?;
    let positions = read_table(&files.positions, rows)?;
    let itineraries = read_table(&files.itineraries, rows)?;
    let labels = read_table(&files.labels, rows)?;
    tracing::info!(
        particles = h.len(),
        steps = h.first().map_or(0, Vec::len),
        start_row = rows.start,
        "loaded ensemble"
    );
    Ensemble::from_rows(h, theta, tau, positions, itineraries, labels)
        .context("study arrays disagree in shape")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# header\n0.1 0.2\n\n0.3 0.4\n0.5 0.6\n";
        let all: Vec<Vec<f64>> = parse_table(text, "t", RowRange::default()).unwrap();
        assert_eq!(all, vec![vec![0.1, 0.2], vec![0.3, 0.4], vec![0.5, 0.6]]);
        let chunk: Vec<Vec<f64>> = parse_table(text, "t", RowRange::chunk(1, 1)).unwrap();
        assert_eq!(chunk, vec![vec![0.3, 0.4]]);
        let past_end: Vec<Vec<f64>> = parse_table(text, "t", RowRange::chunk(5, 2)).unwrap();
        assert!(past_end.is_empty());
    }

    #[test]
    fn integer_columns_accept_integral_floats() {
        let rows: Vec<Vec<i64>> = parse_table("0 -1.0 2e0", "t", RowRange::default()).unwrap();
        assert_eq!(rows, vec![vec![0, -1, 2]]);
        let err = parse_table::<i32>("0 1.5", "pos.txt", RowRange::default()).unwrap_err();
        assert!(err.to_string().contains("pos.txt:1"), "{err}");
    }

    #[test]
    fn ragged_rows_name_the_file_and_line() {
        let err = parse_table::<f64>("1 2\n3\n", "H.txt", RowRange::default()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("H.txt:2") && msg.contains("ragged"), "{msg}");
    }

    #[test]
    fn loads_a_study_from_disk() {
        let dir = tempdir().unwrap();
        let write = |name: &str, body: &str| -> PathBuf {
            let p = dir.path().join(name);
            fs::write(&p, body).unwrap();
            p
        };
        let files = StudyFiles {
            h: write("H.txt", "0.1 0.2\n0.3 0.4\n0.2 0.2\n"),
            theta: write("Theta.txt", "0 0\n0 0\n0 0\n"),
            tau: write("Tau.txt", "1 1\n1 1\n2 2\n"),
            positions: write("Positions.txt", "0 1\n0.0 -1.0\n3 4\n"),
            itineraries: write("Itineraries.txt", "LR LR\nRL RL\nL0R LR\n"),
            labels: write("Labels.txt", "0 1\n0 1\n5 6\n"),
        };
        let ens = load_ensemble(&files, RowRange::default()).unwrap();
        assert_eq!((ens.n_particles(), ens.n_steps()), (3, 2));
        let last = ens.trajectory(2).unwrap();
        assert_eq!(last.itineraries[0], "L0R");
        assert_eq!(last.positions, &[3, 4]);

        let tail = load_ensemble(&files, RowRange::chunk(1, 5)).unwrap();
        assert_eq!(tail.n_particles(), 2);
        assert_eq!(tail.trajectory(0).unwrap().positions, &[0, -1]);
    }

    #[test]
    fn mismatched_files_are_an_error() {
        let dir = tempdir().unwrap();
        let p = |name: &str, body: &str| {
            let p = dir.path().join(name);
            fs::write(&p, body).unwrap();
            p
        };
        let files = StudyFiles {
            h: p("H.txt", "0.1 0.2\n"),
            theta: p("Theta.txt", "0 0\n"),
            tau: p("Tau.txt", "1\n"),
            positions: p("Positions.txt", "0 1\n"),
            itineraries: p("Itineraries.txt", "LR LR\n"),
            labels: p("Labels.txt", "0 1\n"),
        };
        assert!(load_ensemble(&files, RowRange::default()).is_err());
    }
}
