use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use super::{
    draw_annotation, draw_dashed_curve, draw_markers, draw_mesh, padded_range, Marker,
    CAPTION_SIZE, CURVE_SAMPLES, FIGURE_SIZE, FONT,
};
use crate::color::{generate_palette, FIT_COLOR};
use crate::report::flow::FlowReport;

const MATCHING_MARKERS: [Marker; 3] = [Marker::Circle, Marker::Square, Marker::Triangle];

/// Mean runtime per size for every variant, with the fitted curve.
pub fn draw_runtime(report: &FlowReport, path: &Path) -> Result<()> {
    let densest = report.densest();
    let (lo, hi) = densest
        .runtime
        .iter()
        .map(|p| p.x())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
    let curve = report.fit.curve(lo, hi, CURVE_SAMPLES);

    let series: Vec<Vec<(f64, f64)>> = report.series.iter().map(|s| s.runtime_points()).collect();
    let x_range = padded_range(series.iter().flatten().map(|p| p.0));
    let y_range = padded_range(
        series
            .iter()
            .flatten()
            .map(|p| p.1)
            .chain(curve.iter().map(|p| p.1)),
    );

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Runtime vs Problem Size for Max Flow Algorithm",
            (FONT, CAPTION_SIZE).into_font().style(FontStyle::Bold),
        )
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(100)
        .build_cartesian_2d(x_range, y_range)?;
    draw_mesh(
        &mut chart,
        "Problem Size (n = drivers = requests)",
        "Runtime (milliseconds)",
    )?;

    let palette = generate_palette(report.series.len());
    for ((s, points), color) in report.series.iter().zip(&series).zip(palette) {
        draw_markers(
            &mut chart,
            points,
            Marker::Circle,
            color.mix(0.6).filled(),
            9,
            &s.label(),
        )?;
    }

    draw_dashed_curve(
        &mut chart,
        curve,
        FIT_COLOR,
        &format!(
            "Polynomial fit (degree {}, {})",
            report.fit.degree,
            densest.label()
        ),
    )?;
    draw_annotation(
        &chart,
        &format!("Observed complexity: {}", report.fit.complexity_label()),
    )?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font((FONT, 20))
        .draw()?;

    root.present()?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Matching percentage per size for every variant. The y-axis is fixed to
/// 0–105 regardless of the values.
pub fn draw_matching_quality(report: &FlowReport, path: &Path) -> Result<()> {
    let series: Vec<Vec<(f64, f64)>> = report
        .series
        .iter()
        .map(|s| s.matching_percentage())
        .collect();
    let x_range = padded_range(series.iter().flatten().map(|p| p.0));

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Matching Quality for Different Edge Densities",
            (FONT, CAPTION_SIZE).into_font().style(FontStyle::Bold),
        )
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(100)
        .build_cartesian_2d(x_range, 0.0..105.0)?;
    draw_mesh(
        &mut chart,
        "Problem Size (n)",
        "Percentage of Requests Matched (%)",
    )?;

    let palette = generate_palette(report.series.len());
    for (i, ((s, points), color)) in report.series.iter().zip(&series).zip(palette).enumerate() {
        chart.draw_series(LineSeries::new(points.clone(), color.stroke_width(3)))?;
        draw_markers(
            &mut chart,
            points,
            MATCHING_MARKERS[i % MATCHING_MARKERS.len()],
            color.filled(),
            8,
            &format!("Edge probability {}", s.label()),
        )?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerLeft)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font((FONT, 20))
        .draw()?;

    root.present()?;
    log::info!("wrote {}", path.display());
    Ok(())
}
