//! HUMAnN vs PICRUSt2 comparison: load both tables, join them on KO,
//! summarize and render.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::data::filter::retain_prefixed;
use crate::data::loader::{load_table, load_table_by_name};
use crate::data::merge::{merge, DuplicatePolicy};
use crate::data::writer::{write_merged, write_summary};
use crate::plot::scatter::{render_scatter, ScatterLabels};
use crate::stats::{correlate, top_n_overlap, Correlations};

/// Everything a comparison run needs; no path is implied.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    /// HUMAnN unstratified KO table (identifier in column 0, value in 1).
    pub humann: PathBuf,
    /// PICRUSt2 KO prediction table, headered, one column per sample.
    pub picrust: PathBuf,
    pub picrust_sample: String,
    /// HUMAnN rows whose identifier does not start with this are dropped.
    pub id_prefix: String,
    pub duplicates: DuplicatePolicy,
    pub top_n: usize,
    pub out_table: PathBuf,
    pub out_png: PathBuf,
    pub summary_json: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareSummary {
    pub humann_rows: usize,
    pub picrust_rows: usize,
    pub merged_rows: usize,
    pub duplicates: DuplicatePolicy,
    pub correlations: Option<Correlations>,
    pub top_n: usize,
    pub top_n_overlap: usize,
}

pub fn run_compare(config: &CompareConfig) -> Result<CompareSummary> {
    let humann = load_table(&config.humann, 0, 1)
        .with_context(|| format!("loading HUMAnN table {}", config.humann.display()))?;
    let humann = retain_prefixed(humann, &config.id_prefix);

    let picrust = load_table_by_name(&config.picrust, 0, &config.picrust_sample)
        .with_context(|| format!("loading PICRUSt2 table {}", config.picrust.display()))?;

    let merged = merge(&humann, &picrust, config.duplicates)?;
    println!(
        "Merged {} shared KOs (HUMAnN:{}, PICRUSt2:{})",
        merged.len(),
        humann.len(),
        picrust.len()
    );

    let correlations = correlate(&merged);
    if let Some(c) = &correlations {
        println!(
            "Spearman r={:.3} (p={:.2e}); Pearson r={:.3} (p={:.2e})",
            c.spearman.coefficient, c.spearman.p_value, c.pearson.coefficient, c.pearson.p_value
        );
    }

    let overlap = top_n_overlap(&humann, &picrust, config.top_n);
    println!("Top-{} overlap: {overlap}", config.top_n);

    let x_desc = format!("log10 PICRUSt2 ({})", config.picrust_sample);
    render_scatter(
        &merged,
        &config.out_png,
        ScatterLabels {
            title: "KO correlation: HUMAnN vs PICRUSt2",
            x_desc: &x_desc,
            y_desc: "log10 HUMAnN",
        },
    )?;

    write_merged(&merged, &config.out_table, ["KO", "HUMANN", "PICRUSt2"])?;
    info!("Wrote {}", config.out_table.display());

    let summary = CompareSummary {
        humann_rows: humann.len(),
        picrust_rows: picrust.len(),
        merged_rows: merged.len(),
        duplicates: config.duplicates,
        correlations,
        top_n: config.top_n,
        top_n_overlap: overlap,
    };

    if let Some(path) = &config.summary_json {
        write_summary(&summary, path)?;
        info!("Wrote {}", path.display());
    }

    Ok(summary)
}
