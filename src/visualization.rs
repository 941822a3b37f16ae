//! Figures for HUMAnN EC and MetaCyc reaction CPM tables.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::loader::load_table;
use crate::data::model::AbundanceTable;
use crate::plot::bars::{render_class_stacked, render_top_bar};
use crate::plot::heatmap::render_heatmap;

#[derive(Debug, Clone)]
pub struct VisualizeConfig {
    /// EC CPM table: `EC_ID, CPM [, Name]`.
    pub ec: PathBuf,
    /// MetaCyc reaction CPM table: `RXN_ID, CPM [, Name]`.
    pub rxn: PathBuf,
    pub top_n: usize,
    pub outdir: PathBuf,
}

/// Render all figures; returns the paths written.
pub fn run_visualize(config: &VisualizeConfig) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&config.outdir)
        .with_context(|| format!("creating {}", config.outdir.display()))?;

    let ec = load_table(&config.ec, 0, 1)
        .with_context(|| format!("loading EC table {}", config.ec.display()))?;
    let rxn = load_table(&config.rxn, 0, 1)
        .with_context(|| format!("loading RXN table {}", config.rxn.display()))?;

    let n = config.top_n;
    let mut written = Vec::new();

    let ec_title = format!("Top {n} EC numbers (CPM)");
    written.push(top_bar(&ec, n, &ec_title, &config.outdir, "EC")?);
    let rxn_title = format!("Top {n} MetaCyc reactions (CPM)");
    written.push(top_bar(&rxn, n, &rxn_title, &config.outdir, "RXN")?);

    let ec_heat = config.outdir.join("EC_heatmap.png");
    render_heatmap(&ec, n, &format!("Top {n} ECs (z-score of log10 CPM)"), &ec_heat)?;
    written.push(ec_heat);

    let rxn_heat = config.outdir.join("RXN_heatmap.png");
    render_heatmap(&rxn, n, &format!("Top {n} MetaCyc RXNs (z-score of log10 CPM)"), &rxn_heat)?;
    written.push(rxn_heat);

    // EC numbers only: reaction IDs carry no class prefix
    let stacked = config.outdir.join("EC_class_stacked.png");
    render_class_stacked(&ec, "EC top-level class composition", &stacked)?;
    written.push(stacked);

    Ok(written)
}

fn top_bar(
    table: &AbundanceTable,
    n: usize,
    title: &str,
    outdir: &Path,
    scheme: &str,
) -> Result<PathBuf> {
    let path = outdir.join(format!("{scheme}_top{n}.png"));
    render_top_bar(table, n, title, &path)?;
    Ok(path)
}
