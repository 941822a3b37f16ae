use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use super::{inches, padded_range, pt, render_png, FONT};
use crate::data::model::MergedTable;

/// Added before `log10` so zero abundances stay plottable.
pub const LOG_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
pub struct ScatterLabels<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
}

/// `(log10(b + ε), log10(a + ε))` for each merged row: source B on x,
/// source A on y.
pub fn log_points(merged: &MergedTable) -> Vec<(f64, f64)> {
    merged
        .rows
        .iter()
        .map(|r| {
            (
                (r.value_b + LOG_EPSILON).log10(),
                (r.value_a + LOG_EPSILON).log10(),
            )
        })
        .collect()
}

/// Log-log scatter of the two value columns, 6x5 in at 300 DPI.
pub fn render_scatter(merged: &MergedTable, path: &Path, labels: ScatterLabels<'_>) -> Result<()> {
    let points = log_points(merged);
    let x_range = padded_range(points.iter().map(|p| p.0));
    let y_range = padded_range(points.iter().map(|p| p.1));

    render_png(path, inches(6.0, 5.0), |root| {
        let mut chart = ChartBuilder::on(root)
            .margin(pt(8.0))
            .caption(labels.title, (FONT, pt(12.0)))
            .x_label_area_size(pt(36.0))
            .y_label_area_size(pt(44.0))
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(labels.x_desc)
            .y_desc(labels.y_desc)
            .label_style((FONT, pt(9.0)))
            .axis_desc_style((FONT, pt(10.0)))
            .draw()?;

        let radius = pt(2.4) as i32;
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), radius, BLUE.mix(0.7).filled())),
        )?;
        Ok(())
    })
}
