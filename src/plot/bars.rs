use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use super::{inches, pt, render_png, FONT};
use crate::color::generate_palette;
use crate::data::filter::{ec_class, EC_CLASS_ORDER};
use crate::data::model::AbundanceTable;
use crate::stats::top_n;

const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Rough advance width of one label character, as a fraction of font size.
const CHAR_WIDTH: f64 = 0.6;

// ---------------------------------------------------------------------------
// Top-N horizontal bar chart
// ---------------------------------------------------------------------------

/// Horizontal bars of the `n` most abundant features, largest on top.
/// 8 in wide, `max(4, 0.35 n)` in tall.
pub fn render_top_bar(table: &AbundanceTable, n: usize, title: &str, path: &Path) -> Result<()> {
    let top = top_n(table, n);
    let count = top.len();
    let height = (0.35 * count as f64).max(4.0);
    let x_max = top.first().map(|r| r.value * 1.05).unwrap_or(1.0);

    let labels: Vec<String> = top.iter().map(|r| r.identifier.clone()).collect();
    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(1);
    let label_font = pt(8.0);
    let label_area = (longest as f64 * label_font as f64 * CHAR_WIDTH) as u32 + pt(8.0);

    // bar for rank `k` sits at slot `count - 1 - k`
    let label_for = |slot: i32| -> String {
        usize::try_from(slot)
            .ok()
            .and_then(|s| count.checked_sub(s + 1))
            .and_then(|k| labels.get(k))
            .cloned()
            .unwrap_or_default()
    };

    render_png(path, inches(8.0, height), |root| {
        let slots = count.max(1) as i32;
        let mut chart = ChartBuilder::on(root)
            .margin(pt(8.0))
            .caption(title, (FONT, pt(12.0)))
            .x_label_area_size(pt(28.0))
            .y_label_area_size(label_area)
            .build_cartesian_2d(0.0..x_max, (0..slots).into_segmented())?;

        chart
            .configure_mesh()
            .disable_mesh()
            .y_labels(slots as usize)
            .y_label_formatter(&|v: &SegmentValue<i32>| match v {
                SegmentValue::CenterOf(slot) => label_for(*slot),
                _ => String::new(),
            })
            .label_style((FONT, label_font))
            .draw()?;

        let gap = pt(2.0);
        chart.draw_series(top.iter().enumerate().map(|(rank, record)| {
            let slot = (count - 1 - rank) as i32;
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(slot)),
                    (record.value, SegmentValue::Exact(slot + 1)),
                ],
                BAR_COLOR.filled(),
            );
            bar.set_margin(gap, gap, 0, 0);
            bar
        }))?;
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// EC class composition
// ---------------------------------------------------------------------------

/// Summed abundance per top-level EC class, in `1..6, other` order.
/// Classes with no rows are omitted.
pub fn class_totals(table: &AbundanceTable) -> Vec<(&'static str, f64)> {
    let mut totals = [0.0_f64; EC_CLASS_ORDER.len()];
    let mut present = [false; EC_CLASS_ORDER.len()];
    for record in table.iter() {
        let class = ec_class(&record.identifier);
        if let Some(idx) = EC_CLASS_ORDER.iter().position(|c| *c == class) {
            totals[idx] += record.value;
            present[idx] = true;
        }
    }
    EC_CLASS_ORDER
        .iter()
        .zip(totals)
        .zip(present)
        .filter(|(_, seen)| *seen)
        .map(|((class, total), _)| (*class, total))
        .collect()
}

/// Single stacked bar of EC class totals with an "EC class" legend on the
/// right. 6x4 in.
pub fn render_class_stacked(table: &AbundanceTable, title: &str, path: &Path) -> Result<()> {
    let classes = class_totals(table);
    let total: f64 = classes.iter().map(|(_, v)| v).sum();
    let y_max = if total > 0.0 { total * 1.05 } else { 1.0 };
    let palette = generate_palette(EC_CLASS_ORDER.len());
    let color_of = |class: &str| {
        let idx = EC_CLASS_ORDER.iter().position(|c| *c == class).unwrap_or(0);
        palette[idx]
    };

    let (width, height) = inches(6.0, 4.0);
    render_png(path, (width, height), |root| {
        let (plot_area, legend_area) = root.split_horizontally(width * 3 / 4);

        let mut chart = ChartBuilder::on(&plot_area)
            .margin(pt(8.0))
            .caption(title, (FONT, pt(12.0)))
            .x_label_area_size(pt(24.0))
            .y_label_area_size(pt(44.0))
            .build_cartesian_2d((0..1).into_segmented(), 0.0..y_max)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(1)
            .x_label_formatter(&|v: &SegmentValue<i32>| match v {
                SegmentValue::CenterOf(_) => "Sample".to_string(),
                _ => String::new(),
            })
            .y_desc("CPM")
            .label_style((FONT, pt(9.0)))
            .axis_desc_style((FONT, pt(10.0)))
            .draw()?;

        let mut bottom = 0.0;
        for &(class, value) in &classes {
            let mut segment = Rectangle::new(
                [
                    (SegmentValue::Exact(0), bottom),
                    (SegmentValue::Exact(1), bottom + value),
                ],
                color_of(class).filled(),
            );
            segment.set_margin(0, 0, pt(20.0), pt(20.0));
            chart.draw_series(std::iter::once(segment))?;
            bottom += value;
        }

        // legend
        let font = (FONT, f64::from(pt(9.0))).into_font();
        let line = pt(14.0) as i32;
        let swatch = pt(8.0) as i32;
        let x0 = pt(6.0) as i32;
        let mut y = pt(40.0) as i32;
        legend_area.draw(&Text::new("EC class", (x0, y), font.clone()))?;
        for &(class, _) in &classes {
            y += line;
            legend_area.draw(&Rectangle::new(
                [(x0, y), (x0 + swatch, y + swatch)],
                color_of(class).filled(),
            ))?;
            legend_area.draw(&Text::new(class, (x0 + swatch + swatch / 2, y), font.clone()))?;
        }
        Ok(())
    })
}
