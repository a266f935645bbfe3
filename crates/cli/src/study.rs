//! Study configuration: channel parameters and data files per study id.
//!
//! The config is a JSON object keyed by study id:
//!
//! ```json
//! { "study_0": {
//!     "parameters": { "width": 0.5, "alpha": 1.5707963 },
//!     "files": { "H": "data/study_0/H.txt", "Theta": "...", "Tau": "...",
//!                "Positions": "...", "Itineraries": "...", "Labels": "..." } } }
//! ```
//!
//! Relative file paths are resolved against the config file's directory.
//! Unknown keys (extra files, plotting metadata) are ignored.

use anyhow::{Context, Result};
use billiard::PolygonalChannel;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const STUDY_PREFIX: &str = "study_";

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct StudyParams {
    pub width: f64,
    pub alpha: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StudyFiles {
    #[serde(rename = "H")]
    pub h: PathBuf,
    #[serde(rename = "Theta")]
    pub theta: PathBuf,
    #[serde(rename = "Tau")]
    pub tau: PathBuf,
    #[serde(rename = "Positions")]
    pub positions: PathBuf,
    #[serde(rename = "Itineraries")]
    pub itineraries: PathBuf,
    #[serde(rename = "Labels")]
    pub labels: PathBuf,
}

impl StudyFiles {
    fn named(&self) -> [(&'static str, &Path); 6] {
        [
            ("H", &self.h),
            ("Theta", &self.theta),
            ("Tau", &self.tau),
            ("Positions", &self.positions),
            ("Itineraries", &self.itineraries),
            ("Labels", &self.labels),
        ]
    }

    fn resolved(&self, root: &Path) -> Self {
        let abs = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        };
        Self {
            h: abs(&self.h),
            theta: abs(&self.theta),
            tau: abs(&self.tau),
            positions: abs(&self.positions),
            itineraries: abs(&self.itineraries),
            labels: abs(&self.labels),
        }
    }

    /// Fields whose file does not exist.
    pub fn missing(&self) -> Vec<(&'static str, &Path)> {
        self.named()
            .into_iter()
            .filter(|(_, p)| !p.exists())
            .collect()
    }
}

#[derive(Clone, Debug, Deserialize)]
struct StudyEntry {
    parameters: StudyParams,
    files: StudyFiles,
}

/// Parsed config file.
#[derive(Clone, Debug)]
pub struct StudyConfig {
    root: PathBuf,
    studies: BTreeMap<String, StudyEntry>,
}

/// One study with absolute file paths.
#[derive(Clone, Debug)]
pub struct Study {
    pub id: String,
    pub params: StudyParams,
    pub files: StudyFiles,
}

impl Study {
    pub fn channel(&self) -> Result<PolygonalChannel> {
        PolygonalChannel::new(self.params.width, self.params.alpha)
            .with_context(|| format!("channel parameters of {}", self.id))
    }
}

impl StudyConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading study config {}", path.display()))?;
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_json_str(&text, root)
            .with_context(|| format!("parsing study config {}", path.display()))
    }

    pub fn from_json_str(text: &str, root: PathBuf) -> Result<Self> {
        let studies: BTreeMap<String, StudyEntry> = serde_json::from_str(text)?;
        Ok(Self { root, studies })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.studies.keys().map(String::as_str)
    }

    /// Resolve `id`; missing data files are logged, not fatal, until loaded.
    pub fn study(&self, id: &str) -> Result<Study> {
        let entry = self.studies.get(id).with_context(|| {
            let known: Vec<&str> = self.ids().collect();
            format!("unknown study {id:?} (known: {known:?})")
        })?;
        let files = entry.files.resolved(&self.root);
        for (name, path) in files.missing() {
            tracing::warn!(study = id, field = name, path = %path.display(), "data file not found");
        }
        Ok(Study {
            id: id.to_string(),
            params: entry.parameters,
            files,
        })
    }
}
