use std::fmt;
use std::io::Write;

use anyhow::{Context, Result};

use crate::chart;
use crate::config::{
    ReportPaths, SETCOVER_CSV, SETCOVER_RUNTIME_PNG, SETCOVER_STOPS_PNG,
    SETCOVER_VISUALIZATION_PNG, VISUALIZATION_CSV,
};
use crate::data::aggregate::{aggregate_by_size, mean, sample_std_dev};
use crate::data::loader::{load_setcover_samples, load_visualization};
use crate::data::model::{AggregatedPoint, SetCoverSample, SpatialLayout};
use crate::fit::{best_fit, PolyFit};

/// Candidate degrees for the runtime fit, in selection order.
pub const FIT_DEGREES: [usize; 2] = [2, 3];

/// Heuristic optimum for grid coverage: `1.5 · √n` stops.
pub const OPTIMAL_STOPS_FACTOR: f64 = 1.5;

/// Radius of the coverage circle drawn around each selected stop.
pub const COVERAGE_RADIUS: f64 = 150.0;

pub const VISUALIZATION_SKIPPED: &str = "Visualization data not found, skipping visualization plot";

/// Horizontal reference on the ratio axis: the greedy bound `ln(100)`.
pub fn reference_bound() -> f64 {
    100f64.ln()
}

pub fn optimal_estimate(size: u32) -> f64 {
    OPTIMAL_STOPS_FACTOR * (size as f64).sqrt()
}

// ---------------------------------------------------------------------------
// Aggregated table
// ---------------------------------------------------------------------------

/// One row of the per-size summary table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetCoverRow {
    pub size: u32,
    pub runtime: AggregatedPoint,
    pub stops: AggregatedPoint,
}

impl SetCoverRow {
    pub fn optimal_estimate(&self) -> f64 {
        optimal_estimate(self.size)
    }

    /// Observed mean stops over the heuristic optimum.
    pub fn approximation_ratio(&self) -> f64 {
        self.stops.mean / self.optimal_estimate()
    }
}

/// Group samples by size into runtime and stop-count summaries.
pub fn summarize(samples: &[SetCoverSample]) -> Vec<SetCoverRow> {
    let runtime = aggregate_by_size(samples, |s| s.size, |s| s.runtime_ms);
    let stops = aggregate_by_size(samples, |s| s.size, |s| s.num_stops);

    runtime
        .into_iter()
        .zip(stops)
        .map(|(runtime, stops)| SetCoverRow {
            size: runtime.size,
            runtime,
            stops,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// SetCoverReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SetCoverReport {
    /// Ascending by size.
    pub rows: Vec<SetCoverRow>,
    pub fit: PolyFit,
}

impl SetCoverReport {
    pub fn load(paths: &ReportPaths) -> Result<Self> {
        let path = paths.input(SETCOVER_CSV);
        let samples = load_setcover_samples(&path).context("loading set-cover results")?;
        log::info!("loaded {} samples from {}", samples.len(), path.display());
        Self::from_samples(&samples)
    }

    pub fn from_samples(samples: &[SetCoverSample]) -> Result<Self> {
        let rows = summarize(samples);
        if rows.is_empty() {
            anyhow::bail!("set-cover results contain no samples");
        }

        let x: Vec<f64> = rows.iter().map(|r| r.runtime.x()).collect();
        let y: Vec<f64> = rows.iter().map(|r| r.runtime.mean).collect();
        let fit = best_fit(&x, &y, &FIT_DEGREES).context("fitting set-cover runtime")?;
        log::info!(
            "best runtime fit: degree {} (residual {:e})",
            fit.degree,
            fit.residual
        );

        Ok(Self { rows, fit })
    }

    pub fn approximation_ratios(&self) -> Vec<f64> {
        self.rows.iter().map(SetCoverRow::approximation_ratio).collect()
    }

    /// Mean and sample standard deviation of the per-size ratios.
    pub fn ratio_summary(&self) -> (f64, Option<f64>) {
        let ratios = self.approximation_ratios();
        (mean(&ratios), sample_std_dev(&ratios))
    }
}

impl fmt::Display for SetCoverReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (ratio_mean, ratio_std) = self.ratio_summary();
        let ratio_std = match ratio_std {
            Some(sd) => format!("{sd:.2}"),
            None => "n/a".to_string(),
        };

        writeln!(f, "Approximation Analysis:")?;
        writeln!(f, "  Theoretical bound: ln(n) approximation")?;
        writeln!(f, "  For n=100: ln(100) ≈ {:.1}", 100f64.ln())?;
        writeln!(f, "  For n=1000: ln(1000) ≈ {:.1}", 1000f64.ln())?;
        writeln!(f, "  Observed approximation ratio: {ratio_mean:.2} ± {ratio_std}")?;
        writeln!(f, "  This shows greedy performs much better than worst-case bound!")
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Load `visualization.csv` and draw the coverage map.
///
/// When the file is absent the skip notice goes to `out` and `Ok(None)` is
/// returned; a file that exists but does not parse is an error.
pub fn render_visualization<W: Write>(
    paths: &ReportPaths,
    out: &mut W,
) -> Result<Option<SpatialLayout>> {
    let vis_path = paths.input(VISUALIZATION_CSV);
    let layout = match load_visualization(&vis_path)
        .with_context(|| format!("parsing {}", vis_path.display()))?
    {
        Some(layout) => layout,
        None => {
            log::warn!("{} not found", vis_path.display());
            writeln!(out, "{VISUALIZATION_SKIPPED}")?;
            return Ok(None);
        }
    };
    log::info!(
        "visualization: {} students, {} selected stops, {} unselected stops",
        layout.students.len(),
        layout.selected_stops.len(),
        layout.unselected_stops.len()
    );

    paths.ensure_figures_dir()?;
    let vis_png = paths.figure(SETCOVER_VISUALIZATION_PNG);
    chart::setcover::draw_visualization(&layout, &vis_png)
        .with_context(|| format!("rendering {}", vis_png.display()))?;
    writeln!(out, "Saved {SETCOVER_VISUALIZATION_PNG}")?;
    Ok(Some(layout))
}

/// Load, fit, render every available figure and write the console report.
///
/// Figures are written in order, so a bad visualization file still leaves
/// the runtime and stops figures on disk.
pub fn run<W: Write>(paths: &ReportPaths, out: &mut W) -> Result<SetCoverReport> {
    let report = SetCoverReport::load(paths)?;
    paths.ensure_figures_dir()?;

    let runtime_png = paths.figure(SETCOVER_RUNTIME_PNG);
    chart::setcover::draw_runtime(&report, &runtime_png)
        .with_context(|| format!("rendering {}", runtime_png.display()))?;
    writeln!(
        out,
        "Saved {SETCOVER_RUNTIME_PNG} with polynomial fit (degree {})",
        report.fit.degree
    )?;

    let stops_png = paths.figure(SETCOVER_STOPS_PNG);
    chart::setcover::draw_stops(&report, &stops_png)
        .with_context(|| format!("rendering {}", stops_png.display()))?;
    writeln!(out, "Saved {SETCOVER_STOPS_PNG} with approximation analysis")?;

    render_visualization(paths, out)?;

    writeln!(out, "\nSet-cover plots generated successfully!\n")?;
    write!(out, "{report}")?;
    Ok(report)
}
