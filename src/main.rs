use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use funcbench::data::merge::DuplicatePolicy;
use funcbench::reconcile::{run_compare, CompareConfig};

/// Compare HUMAnN and PICRUSt2 KO abundances: merged table, rank/linear
/// correlation, top-N overlap and a log-log scatter plot.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// HUMAnN KO unstratified table (e.g. *_KO_cpm_unstratified.tsv)
    #[arg(long, default_value = "humann_out/KO_cpm_unstratified.tsv")]
    humann: PathBuf,

    /// PICRUSt2 KO table (columns: function, description, <samples>...)
    #[arg(long, default_value = "picrust2_experiment/KO_unstrat_annot.tsv.gz")]
    picrust: PathBuf,

    /// Which PICRUSt2 sample column to compare
    #[arg(long, default_value = "soil_rice")]
    picrust_sample: String,

    /// Output merged table
    #[arg(long, default_value = "results/tables/KO_compare.tsv")]
    out: PathBuf,

    /// Output scatter plot
    #[arg(long, default_value = "results/figures/KO_scatter.png")]
    png: PathBuf,

    /// Size of the top-N sets compared for overlap
    #[arg(long, default_value_t = 20)]
    top_n: usize,

    /// How repeated identifiers within one table are handled
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::First)]
    duplicates: DuplicatePolicy,

    /// Keep only HUMAnN identifiers with this prefix (empty keeps all)
    #[arg(long, default_value = "K")]
    id_prefix: String,

    /// Also write a JSON summary of the comparison
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

impl From<Cli> for CompareConfig {
    fn from(cli: Cli) -> Self {
        CompareConfig {
            humann: cli.humann,
            picrust: cli.picrust,
            picrust_sample: cli.picrust_sample,
            id_prefix: cli.id_prefix,
            duplicates: cli.duplicates,
            top_n: cli.top_n,
            out_table: cli.out,
            out_png: cli.png,
            summary_json: cli.summary_json,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = CompareConfig::from(Cli::parse());
    run_compare(&config)?;
    Ok(())
}
