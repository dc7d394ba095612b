use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const FLOW_P1_CSV: &str = "flow_p1.csv";
pub const FLOW_P2_CSV: &str = "flow_p2.csv";
pub const FLOW_P5_CSV: &str = "flow_p5.csv";
pub const SETCOVER_CSV: &str = "setcover_runtime.csv";
pub const VISUALIZATION_CSV: &str = "visualization.csv";

pub const FLOW_RUNTIME_PNG: &str = "flow_runtime.png";
pub const FLOW_MATCHING_PNG: &str = "flow_matching_quality.png";
pub const SETCOVER_RUNTIME_PNG: &str = "setcover_runtime.png";
pub const SETCOVER_STOPS_PNG: &str = "setcover_stops.png";
pub const SETCOVER_VISUALIZATION_PNG: &str = "setcover_visualization.png";

/// Where the reporters read inputs from and write figures to.
///
/// The binaries always use [`ReportPaths::default`], i.e. `data/` and
/// `figures/` relative to the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub data_dir: PathBuf,
    pub figures_dir: PathBuf,
}

impl Default for ReportPaths {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            figures_dir: PathBuf::from("figures"),
        }
    }
}

impl ReportPaths {
    /// `data/` and `figures/` under `root`.
    pub fn under(root: &Path) -> Self {
        Self {
            data_dir: root.join("data"),
            figures_dir: root.join("figures"),
        }
    }

    pub fn input(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    pub fn figure(&self, file_name: &str) -> PathBuf {
        self.figures_dir.join(file_name)
    }

    /// Create the figures directory if it does not exist yet.
    pub fn ensure_figures_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.figures_dir).with_context(|| {
            format!("failed to create directory {}", self.figures_dir.display())
        })
    }
}
