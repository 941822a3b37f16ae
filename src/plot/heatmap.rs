use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use super::{inches, padded_range, pt, render_png, FONT};
use crate::color::scaled_ramp_color;
use crate::data::model::AbundanceTable;
use crate::stats::{top_n, zscore};

/// Added before `log10` to compress the dynamic range without -inf.
pub const HEATMAP_EPSILON: f64 = 1e-12;

const COLORBAR_STEPS: usize = 100;

/// Top `n` identifiers with the z-score of their `log10(value + ε)`,
/// most abundant first.
pub fn heatmap_scores(table: &AbundanceTable, n: usize) -> Vec<(String, f64)> {
    let top = top_n(table, n);
    let logs: Vec<f64> = top
        .iter()
        .map(|r| (r.value + HEATMAP_EPSILON).log10())
        .collect();
    top.iter()
        .map(|r| r.identifier.clone())
        .zip(zscore(&logs))
        .collect()
}

/// Single-column heatmap of [`heatmap_scores`] with a colour bar.
/// 6 in wide, `max(4, 0.35 n)` in tall.
pub fn render_heatmap(table: &AbundanceTable, n: usize, title: &str, path: &Path) -> Result<()> {
    let scores = heatmap_scores(table, n);
    let count = scores.len();
    let (lo, hi) = scores
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, z)| {
            (lo.min(*z), hi.max(*z))
        });
    let bar_range = if hi - lo > 1e-12 {
        lo..hi
    } else {
        padded_range(scores.iter().map(|(_, z)| *z))
    };

    let longest = scores.iter().map(|(id, _)| id.chars().count()).max().unwrap_or(1);
    let label_font = pt(8.0);
    let label_area = (longest as f64 * label_font as f64 * 0.6) as u32 + pt(8.0);

    // row 0 (most abundant) is drawn at the top
    let label_for = |slot: i32| -> String {
        usize::try_from(slot)
            .ok()
            .and_then(|s| count.checked_sub(s + 1))
            .and_then(|k| scores.get(k))
            .map(|(id, _)| id.clone())
            .unwrap_or_default()
    };

    let (width, height) = inches(6.0, (0.35 * count as f64).max(4.0));
    render_png(path, (width, height), |root| {
        let (cells_area, bar_area) = root.split_horizontally(width * 4 / 5);
        let slots = count.max(1) as i32;

        let mut chart = ChartBuilder::on(&cells_area)
            .margin(pt(8.0))
            .caption(title, (FONT, pt(12.0)))
            .x_label_area_size(pt(24.0))
            .y_label_area_size(label_area)
            .build_cartesian_2d((0..1).into_segmented(), (0..slots).into_segmented())?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(1)
            .y_labels(slots as usize)
            .x_label_formatter(&|v: &SegmentValue<i32>| match v {
                SegmentValue::CenterOf(_) => "Sample".to_string(),
                _ => String::new(),
            })
            .y_label_formatter(&|v: &SegmentValue<i32>| match v {
                SegmentValue::CenterOf(slot) => label_for(*slot),
                _ => String::new(),
            })
            .label_style((FONT, label_font))
            .draw()?;

        chart.draw_series(scores.iter().enumerate().map(|(rank, (_, z))| {
            let slot = (count - 1 - rank) as i32;
            Rectangle::new(
                [
                    (SegmentValue::Exact(0), SegmentValue::Exact(slot)),
                    (SegmentValue::Exact(1), SegmentValue::Exact(slot + 1)),
                ],
                scaled_ramp_color(*z, lo, hi).filled(),
            )
        }))?;

        // colour bar
        let mut bar = ChartBuilder::on(&bar_area)
            .margin_top(pt(36.0))
            .margin_bottom(pt(30.0))
            .margin_right(pt(8.0))
            .y_label_area_size(pt(40.0))
            .build_cartesian_2d(0.0..1.0, bar_range.clone())?;

        bar.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_desc("Row z-score (log10 CPM)")
            .label_style((FONT, pt(8.0)))
            .axis_desc_style((FONT, pt(8.0)))
            .draw()?;

        let step = (bar_range.end - bar_range.start) / COLORBAR_STEPS as f64;
        bar.draw_series((0..COLORBAR_STEPS).map(|i| {
            let y0 = bar_range.start + i as f64 * step;
            Rectangle::new(
                [(0.0, y0), (1.0, y0 + step)],
                scaled_ramp_color(y0 + step / 2.0, lo, hi).filled(),
            )
        }))?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::AbundanceRecord;

    fn table(rows: &[(&str, f64)]) -> AbundanceTable {
        rows.iter().map(|&(id, v)| AbundanceRecord::new(id, v)).collect()
    }

    #[test]
    fn scores_follow_abundance_order() {
        let t = table(&[("b", 10.0), ("a", 1000.0), ("c", 0.1)]);
        let scores = heatmap_scores(&t, 2);
        let ids: Vec<_> = scores.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        // log10 values 3 and 1 → z-scores +1 and -1
        assert!((scores[0].1 - 1.0).abs() < 1e-9);
        assert!((scores[1].1 + 1.0).abs() < 1e-9);
    }

    #[test]
    fn single_row_scores_zero() {
        let scores = heatmap_scores(&table(&[("x", 42.0)]), 20);
        assert_eq!(scores, vec![("x".to_string(), 0.0)]);
    }

    #[test]
    fn renders_heatmap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("EC_heatmap.png");
        let t = table(&[("1.1.1.1", 5.0), ("2.7.7.7", 3.0), ("3.1.1.1", 3.0)]);
        render_heatmap(&t, 20, "Top ECs", &path).unwrap();
        assert!(path.exists());

        let flat = dir.path().join("flat.png");
        render_heatmap(&table(&[("a", 1.0)]), 20, "flat", &flat).unwrap();
        assert!(flat.exists());
    }
}
