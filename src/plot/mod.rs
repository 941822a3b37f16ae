//! Static PNG figures.
//!
//! Every chart is drawn with plotters into an in-memory RGB buffer sized in
//! inches at [`DPI`], then encoded to PNG with the `image` crate.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::data::writer::ensure_parent;

pub mod bars;
pub mod heatmap;
pub mod scatter;

pub const DPI: f64 = 300.0;

pub(crate) const FONT: &str = "sans-serif";

/// Pixel size of a `width` x `height` inch figure.
pub(crate) fn inches(width: f64, height: f64) -> (u32, u32) {
    ((width * DPI).round() as u32, (height * DPI).round() as u32)
}

/// Typographic points to pixels.
pub(crate) fn pt(points: f64) -> u32 {
    (points * DPI / 72.0).round() as u32
}

/// Draw into a white canvas of `size` pixels and save it as PNG at `path`.
pub(crate) fn render_png<F>(path: &Path, size: (u32, u32), draw: F) -> Result<()>
where
    F: for<'a> FnOnce(&DrawingArea<BitMapBackend<'a>, Shift>) -> Result<()>,
{
    ensure_parent(path)?;
    let (width, height) = size;
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root).with_context(|| format!("drawing {}", path.display()))?;
        root.present()?;
    }
    image::save_buffer_with_format(
        path,
        &buffer,
        width,
        height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("writing {}", path.display()))?;

    info!("Saved {}", path.display());
    Ok(())
}

/// Axis range covering `values`, padded by 5 %. Degenerate or empty input
/// still yields a drawable range.
pub(crate) fn padded_range(values: impl IntoIterator<Item = f64>) -> std::ops::Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return -1.0..1.0;
    }
    let span = max - min;
    if span < 1e-12 {
        return (min - 0.5)..(max + 0.5);
    }
    (min - 0.05 * span)..(max + 0.05 * span)
}
