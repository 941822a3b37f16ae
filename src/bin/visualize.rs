use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use funcbench::visualization::{run_visualize, VisualizeConfig};

/// Generate HUMAnN visualization figures from EC and RXN CPM tables.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to EC CPM table (EC_ID, CPM [, Name])
    #[arg(long, default_value = "humann_out/EC_cpm_named.tsv")]
    ec: PathBuf,

    /// Path to RXN CPM table (RXN_ID, CPM [, Name])
    #[arg(long, default_value = "humann_out/RXN_cpm_named.tsv")]
    rxn: PathBuf,

    /// Top N features for bar charts and heatmaps
    #[arg(long, default_value_t = 20)]
    topn: usize,

    /// Output directory for PNGs
    #[arg(long, default_value = ".")]
    outdir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = VisualizeConfig {
        ec: cli.ec,
        rxn: cli.rxn,
        top_n: cli.topn,
        outdir: cli.outdir,
    };
    let written = run_visualize(&config)?;
    info!("{} figures in {}", written.len(), config.outdir.display());
    Ok(())
}
