use std::path::Path;

use anyhow::Result;
use plotters::element::ErrorBar;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::{
    circle_outline, draw_annotation, draw_dashed_curve, draw_markers, draw_mesh, padded_range,
    Marker, CAPTION_SIZE, CURVE_SAMPLES, FIGURE_SIZE, FONT, LABEL_SIZE, SQUARE_FIGURE_SIZE,
};
use crate::color::{generate_palette, FIT_COLOR};
use crate::data::model::{AggregatedPoint, SpatialLayout};
use crate::report::setcover::{reference_bound, SetCoverReport, COVERAGE_RADIUS};

const STUDENT_COLOR: RGBColor = RGBColor(31, 119, 180);
const ESTIMATE_COLOR: RGBColor = RGBColor(44, 160, 44);

/// `(x, mean - sd, mean, mean + sd)` for groups with a defined spread.
fn error_bars(points: &[AggregatedPoint]) -> Vec<(f64, f64, f64, f64)> {
    points
        .iter()
        .filter_map(|p| p.std_dev.map(|sd| (p.x(), p.mean - sd, p.mean, p.mean + sd)))
        .collect()
}

fn bar_extent(points: &[AggregatedPoint]) -> impl Iterator<Item = f64> + '_ {
    points.iter().flat_map(|p| {
        let sd = p.std_dev.unwrap_or(0.0);
        [p.mean - sd, p.mean + sd]
    })
}

/// Runtime means with ±1 sd error bars and the fitted curve.
pub fn draw_runtime(report: &SetCoverReport, path: &Path) -> Result<()> {
    let runtime: Vec<AggregatedPoint> = report.rows.iter().map(|r| r.runtime).collect();
    let lo = runtime.first().map_or(0.0, |p| p.x());
    let hi = runtime.last().map_or(0.0, |p| p.x());
    let curve = report.fit.curve(lo, hi, CURVE_SAMPLES);

    let x_range = padded_range(runtime.iter().map(|p| p.x()));
    let y_range = padded_range(bar_extent(&runtime).chain(curve.iter().map(|p| p.1)));

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Runtime vs Problem Size for Greedy Set Cover",
            (FONT, CAPTION_SIZE).into_font().style(FontStyle::Bold),
        )
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(100)
        .build_cartesian_2d(x_range, y_range)?;
    draw_mesh(&mut chart, "Number of Students (n)", "Runtime (milliseconds)")?;

    let color = generate_palette(1)[0];
    let points: Vec<(f64, f64)> = runtime.iter().map(|p| (p.x(), p.mean)).collect();
    chart.draw_series(
        error_bars(&runtime)
            .into_iter()
            .map(|(x, lo, mid, hi)| {
                ErrorBar::new_vertical(x, lo, mid, hi, color.stroke_width(2), 12)
            }),
    )?;
    chart.draw_series(LineSeries::new(points.clone(), color.stroke_width(3)))?;
    draw_markers(
        &mut chart,
        &points,
        Marker::Circle,
        color.filled(),
        8,
        "Observed runtime",
    )?;

    draw_dashed_curve(
        &mut chart,
        curve,
        FIT_COLOR,
        &format!("Polynomial fit (degree {})", report.fit.degree),
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

/// Stops selected vs the `1.5·√n` estimate, with the approximation ratio on
/// a secondary axis against the `ln(100)` reference.
pub fn draw_stops(report: &SetCoverReport, path: &Path) -> Result<()> {
    let stops: Vec<AggregatedPoint> = report.rows.iter().map(|r| r.stops).collect();
    let estimate: Vec<(f64, f64)> = report
        .rows
        .iter()
        .map(|r| (r.stops.x(), r.optimal_estimate()))
        .collect();
    let ratios: Vec<(f64, f64)> = report
        .rows
        .iter()
        .map(|r| (r.stops.x(), r.approximation_ratio()))
        .collect();
    let bound = reference_bound();

    let x_range = padded_range(stops.iter().map(|p| p.x()));
    let y_range = padded_range(bar_extent(&stops).chain(estimate.iter().map(|p| p.1)));
    let ratio_range = padded_range(ratios.iter().map(|p| p.1).chain([0.0, bound]));

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Greedy Set Cover: Solution Quality Analysis",
            (FONT, CAPTION_SIZE).into_font().style(FontStyle::Bold),
        )
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(100)
        .right_y_label_area_size(100)
        .build_cartesian_2d(x_range.clone(), y_range)?
        .set_secondary_coord(x_range.clone(), ratio_range);
    draw_mesh(&mut chart, "Number of Students (n)", "Number of Stops Selected")?;
    chart
        .configure_secondary_axes()
        .y_desc("Approximation Ratio (greedy/optimal)")
        .axis_desc_style((FONT, LABEL_SIZE, &RED))
        .label_style((FONT, 18, &RED))
        .draw()?;

    let points: Vec<(f64, f64)> = stops.iter().map(|p| (p.x(), p.mean)).collect();
    chart.draw_series(
        error_bars(&stops)
            .into_iter()
            .map(|(x, lo, mid, hi)| {
                ErrorBar::new_vertical(x, lo, mid, hi, BLUE.stroke_width(2), 12)
            }),
    )?;
    chart.draw_series(LineSeries::new(points.clone(), BLUE.stroke_width(3)))?;
    draw_markers(
        &mut chart,
        &points,
        Marker::Circle,
        BLUE.filled(),
        8,
        "Greedy solution",
    )?;
    draw_dashed_curve(
        &mut chart,
        estimate,
        ESTIMATE_COLOR,
        "Estimated optimal (≈1.5√n)",
    )?;

    // Secondary-axis entries land in the primary legend; the ratio entry
    // carries both the line and its square marker.
    let ratio_style = RED.mix(0.7).stroke_width(3);
    let ratio_marker = RED.mix(0.7).filled();
    chart
        .draw_secondary_series(LineSeries::new(ratios.clone(), ratio_style))?
        .label("Approximation ratio")
        .legend(move |(x, y)| {
            EmptyElement::at((x, y))
                + PathElement::new(vec![(0, 0), (24, 0)], ratio_style)
                + Rectangle::new([(6, -6), (18, 6)], ratio_marker)
        });
    chart.draw_secondary_series(
        ratios
            .iter()
            .map(|&p| EmptyElement::at(p) + Rectangle::new([(-6, -6), (6, 6)], ratio_marker)),
    )?;

    let bound_style = RED.mix(0.3).stroke_width(2);
    chart
        .draw_secondary_series(DashedLineSeries::new(
            vec![(x_range.start, bound), (x_range.end, bound)],
            3,
            6,
            bound_style,
        ))?
        .label(format!("ln(100) ≈ {bound:.1} bound"))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], bound_style));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font((FONT, 20))
        .draw()?;

    root.present()?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Square window covering every point and every coverage circle.
fn square_bounds(layout: &SpatialLayout) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let reach = |p: &(f64, f64), r: f64| [(p.0 - r, p.1 - r), (p.0 + r, p.1 + r)];
    let corners: Vec<(f64, f64)> = layout
        .students
        .iter()
        .chain(&layout.unselected_stops)
        .flat_map(|p| reach(p, 0.0))
        .chain(layout.selected_stops.iter().flat_map(|p| reach(p, COVERAGE_RADIUS)))
        .collect();

    let x = padded_range(corners.iter().map(|c| c.0));
    let y = padded_range(corners.iter().map(|c| c.1));
    let half = (x.end - x.start).max(y.end - y.start) / 2.0;
    let (cx, cy) = ((x.start + x.end) / 2.0, (y.start + y.end) / 2.0);
    ((cx - half)..(cx + half), (cy - half)..(cy + half))
}

/// Students, candidate stops and chosen stops with their coverage circles,
/// drawn with equal x/y scale.
pub fn draw_visualization(layout: &SpatialLayout, path: &Path) -> Result<()> {
    let (x_range, y_range) = square_bounds(layout);

    let root = BitMapBackend::new(path, SQUARE_FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled(
        "Bus Stop Placement Visualization",
        (FONT, CAPTION_SIZE).into_font().style(FontStyle::Bold),
    )?;

    // Pad the right margin so the plotting area comes out square.
    let (w, h) = area.dim_in_pixel();
    let margin = 20;
    let extra = w.saturating_sub(h) as i32;
    let mut chart = ChartBuilder::on(&area)
        .margin(margin)
        .margin_right(margin + extra)
        .x_label_area_size(80)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, y_range)?;
    draw_mesh(&mut chart, "X Coordinate", "Y Coordinate")?;

    if !layout.students.is_empty() {
        draw_markers(
            &mut chart,
            &layout.students,
            Marker::Circle,
            STUDENT_COLOR.mix(0.6).filled(),
            5,
            "Students",
        )?;
    }
    if !layout.unselected_stops.is_empty() {
        draw_markers(
            &mut chart,
            &layout.unselected_stops,
            Marker::Square,
            RGBColor(128, 128, 128).mix(0.3).filled(),
            7,
            "Unselected stops",
        )?;
    }
    if !layout.selected_stops.is_empty() {
        let circle_style = RED.mix(0.3).stroke_width(2);
        for &stop in &layout.selected_stops {
            chart.draw_series(DashedLineSeries::new(
                circle_outline(stop, COVERAGE_RADIUS, 96),
                10,
                6,
                circle_style,
            ))?;
        }
        chart
            .draw_series(layout.selected_stops.iter().map(|&p| {
                EmptyElement::at(p)
                    + Circle::new((0, 0), 11, RED.mix(0.8).filled())
                    + Circle::new((0, 0), 11, BLACK.stroke_width(2))
            }))?
            .label("Selected stops")
            .legend(|(x, y)| Circle::new((x + 10, y), 8, RED.mix(0.8).filled()));
    }

    if !layout.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .label_font((FONT, 20))
            .draw()?;
    }

    root.present()?;
    log::info!("wrote {}", path.display());
    Ok(())
}
