//! Rendering layer: every figure is a PNG drawn with plotters.
//!
//! Report modules compute what to draw; the functions here only draw it.
pub mod flow;
pub mod setcover;

use std::ops::Range;

use anyhow::Result;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::color::ANNOTATION_FILL;

pub const FIGURE_SIZE: (u32, u32) = (1500, 900);
pub const SQUARE_FIGURE_SIZE: (u32, u32) = (1500, 1500);

/// Points along a fitted curve overlay.
pub const CURVE_SAMPLES: usize = 200;

pub const FONT: &str = "sans-serif";
pub const CAPTION_SIZE: i32 = 36;
pub const LABEL_SIZE: i32 = 24;

pub type Chart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Point marker shapes, sized in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
}

// ---------------------------------------------------------------------------
// Axis ranges
// ---------------------------------------------------------------------------

/// Range covering every finite value, padded by 5% on each side.
pub fn padded_range<I>(values: I) -> Range<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if lo > hi {
        return 0.0..1.0;
    }
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        lo.abs().max(1.0) * 0.1
    };
    (lo - pad)..(hi + pad)
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

/// Light grid and axis descriptions shared by the line charts.
pub fn draw_mesh(chart: &mut Chart<'_, '_>, x_desc: &str, y_desc: &str) -> Result<()> {
    chart
        .configure_mesh()
        .bold_line_style(BLACK.mix(0.12))
        .light_line_style(BLACK.mix(0.04))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .axis_desc_style((FONT, LABEL_SIZE))
        .label_style((FONT, 18))
        .draw()?;
    Ok(())
}

/// Boxed text in the top-left corner of the plotting area.
pub fn draw_annotation(chart: &Chart<'_, '_>, text: &str) -> Result<()> {
    let area = chart.plotting_area().strip_coord_spec();
    let style: TextStyle = (FONT, 22).into_font().into();
    let (w, h) = area.estimate_text_size(text, &style)?;

    let (x0, y0) = (16, 16);
    let pad = 10;
    area.draw(&Rectangle::new(
        [
            (x0, y0),
            (x0 + w as i32 + 2 * pad, y0 + h as i32 + 2 * pad),
        ],
        ANNOTATION_FILL.mix(0.6).filled(),
    ))?;
    area.draw(&Text::new(text.to_string(), (x0 + pad, y0 + pad), style))?;
    Ok(())
}

/// Dashed overlay for a fitted curve, with a legend entry.
pub fn draw_dashed_curve(
    chart: &mut Chart<'_, '_>,
    points: Vec<(f64, f64)>,
    color: RGBColor,
    label: &str,
) -> Result<()> {
    let style = color.stroke_width(3);
    chart
        .draw_series(DashedLineSeries::new(points, 12, 8, style))?
        .label(label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], style));
    Ok(())
}

/// Scatter `points` with one marker shape and a legend entry.
pub fn draw_markers(
    chart: &mut Chart<'_, '_>,
    points: &[(f64, f64)],
    marker: Marker,
    style: ShapeStyle,
    size: i32,
    label: &str,
) -> Result<()> {
    let legend_size = size.min(8);
    match marker {
        Marker::Circle => {
            chart
                .draw_series(points.iter().map(|&p| Circle::new(p, size, style)))?
                .label(label)
                .legend(move |(x, y)| Circle::new((x + 10, y), legend_size, style));
        }
        Marker::Square => {
            chart
                .draw_series(points.iter().map(|&p| {
                    EmptyElement::at(p) + Rectangle::new([(-size, -size), (size, size)], style)
                }))?
                .label(label)
                .legend(move |(x, y)| {
                    Rectangle::new(
                        [
                            (x + 10 - legend_size, y - legend_size),
                            (x + 10 + legend_size, y + legend_size),
                        ],
                        style,
                    )
                });
        }
        Marker::Triangle => {
            chart
                .draw_series(points.iter().map(|&p| TriangleMarker::new(p, size, style)))?
                .label(label)
                .legend(move |(x, y)| TriangleMarker::new((x + 10, y), legend_size, style));
        }
    }
    Ok(())
}

/// Closed polyline approximating a circle of `radius` data units.
pub fn circle_outline(center: (f64, f64), radius: f64, segments: usize) -> Vec<(f64, f64)> {
    (0..=segments)
        .map(|i| {
            let theta = i as f64 / segments as f64 * std::f64::consts::TAU;
            (center.0 + radius * theta.cos(), center.1 + radius * theta.sin())
        })
        .collect()
}
