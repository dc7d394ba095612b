use std::fmt;
use std::io::Write;

use anyhow::{Context, Result};

use crate::chart;
use crate::config::{
    ReportPaths, FLOW_MATCHING_PNG, FLOW_P1_CSV, FLOW_P2_CSV, FLOW_P5_CSV, FLOW_RUNTIME_PNG,
};
use crate::data::aggregate::aggregate_by_size;
use crate::data::loader::load_flow_samples;
use crate::data::model::{AggregatedPoint, FlowSample};
use crate::fit::{best_fit, PolyFit};

/// Candidate degrees for the runtime fit, in selection order.
pub const FIT_DEGREES: [usize; 3] = [2, 3, 4];

/// One edge-density experiment and the file holding its results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowVariant {
    pub edge_probability: f64,
    pub file_name: &'static str,
}

pub const VARIANTS: [FlowVariant; 3] = [
    FlowVariant { edge_probability: 0.1, file_name: FLOW_P1_CSV },
    FlowVariant { edge_probability: 0.3, file_name: FLOW_P2_CSV },
    FlowVariant { edge_probability: 0.5, file_name: FLOW_P5_CSV },
];

// ---------------------------------------------------------------------------
// Per-variant aggregates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct VariantSeries {
    pub edge_probability: f64,
    /// Mean runtime per size, ascending.
    pub runtime: Vec<AggregatedPoint>,
    /// Mean flow value per size, ascending.
    pub flow: Vec<AggregatedPoint>,
}

impl VariantSeries {
    pub fn from_samples(edge_probability: f64, samples: &[FlowSample]) -> Self {
        Self {
            edge_probability,
            runtime: aggregate_by_size(samples, |s| s.size, |s| s.runtime_ms),
            flow: aggregate_by_size(samples, |s| s.size, |s| s.flow_value),
        }
    }

    /// Short legend label, e.g. `p=0.3`.
    pub fn label(&self) -> String {
        format!("p={}", self.edge_probability)
    }

    /// `(size, mean runtime)` pairs.
    pub fn runtime_points(&self) -> Vec<(f64, f64)> {
        self.runtime.iter().map(|p| (p.x(), p.mean)).collect()
    }

    /// Percentage of requests matched per size: `mean flow / size * 100`.
    ///
    /// Not clamped; values above 100 mean the input reports more flow than
    /// requests and are passed through unchanged.
    pub fn matching_percentage(&self) -> Vec<(f64, f64)> {
        self.flow
            .iter()
            .map(|p| (p.x(), p.mean / p.x() * 100.0))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// FlowReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FlowReport {
    /// One series per variant, in [`VARIANTS`] order.
    pub series: Vec<VariantSeries>,
    /// Runtime fit over the densest variant.
    pub fit: PolyFit,
    densest: usize,
}

impl FlowReport {
    /// Read all three variant files and build the report.
    pub fn load(paths: &ReportPaths) -> Result<Self> {
        let mut series = Vec::with_capacity(VARIANTS.len());
        for variant in &VARIANTS {
            let path = paths.input(variant.file_name);
            let samples = load_flow_samples(&path)
                .with_context(|| format!("loading p={} flow results", variant.edge_probability))?;
            log::info!("loaded {} samples from {}", samples.len(), path.display());
            series.push(VariantSeries::from_samples(variant.edge_probability, &samples));
        }
        Self::from_series(series)
    }

    /// Fit the runtime of the densest series and keep every series for plotting.
    pub fn from_series(series: Vec<VariantSeries>) -> Result<Self> {
        let densest_idx = series
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.edge_probability.total_cmp(&b.edge_probability))
            .map(|(i, _)| i)
            .context("no flow datasets to report on")?;
        let densest = &series[densest_idx];
        if densest.runtime.is_empty() {
            anyhow::bail!("p={} dataset has no samples to fit", densest.edge_probability);
        }

        let (x, y): (Vec<f64>, Vec<f64>) = densest.runtime_points().into_iter().unzip();
        let fit = best_fit(&x, &y, &FIT_DEGREES)
            .with_context(|| format!("fitting runtime of {}", densest.label()))?;
        log::info!(
            "best runtime fit for {}: degree {} (residual {:e})",
            densest.label(),
            fit.degree,
            fit.residual
        );

        Ok(Self {
            series,
            fit,
            densest: densest_idx,
        })
    }

    /// The series the runtime polynomial was fitted to.
    pub fn densest(&self) -> &VariantSeries {
        &self.series[self.densest]
    }
}

impl fmt::Display for FlowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Polynomial Analysis:")?;
        writeln!(f, "  Best fit degree: {}", self.fit.degree)?;
        writeln!(f, "  Observed complexity: {}", self.fit.complexity_label())?;
        writeln!(f, "  Theoretical: O(V^2 * E) where V = 2n+2, E ≈ n^2 * p")?;
        writeln!(f, "  For dense graphs (p=0.5): O(n^2 * n^2) = O(n^4)")?;
        writeln!(f, "  But Dinic's algorithm performs better in practice")
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Load, fit, render both figures and write the console report to `out`.
pub fn run<W: Write>(paths: &ReportPaths, out: &mut W) -> Result<FlowReport> {
    let report = FlowReport::load(paths)?;
    paths.ensure_figures_dir()?;

    let runtime_png = paths.figure(FLOW_RUNTIME_PNG);
    chart::flow::draw_runtime(&report, &runtime_png)
        .with_context(|| format!("rendering {}", runtime_png.display()))?;
    writeln!(
        out,
        "Saved {FLOW_RUNTIME_PNG} with polynomial fit (degree {})",
        report.fit.degree
    )?;

    let matching_png = paths.figure(FLOW_MATCHING_PNG);
    chart::flow::draw_matching_quality(&report, &matching_png)
        .with_context(|| format!("rendering {}", matching_png.display()))?;
    writeln!(out, "Saved {FLOW_MATCHING_PNG}")?;

    writeln!(out, "\nFlow plots generated successfully!\n")?;
    write!(out, "{report}")?;
    Ok(report)
}
