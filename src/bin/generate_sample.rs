use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;

/// Write synthetic HUMAnN / PICRUSt2 tables for trying out the pipeline.
#[derive(Parser, Debug)]
#[command(about)]
struct Cli {
    /// Directory that receives the sample tables
    #[arg(long, default_value = "sample_data")]
    outdir: PathBuf,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Log-normal abundance, zero with probability `p_zero`.
    fn abundance(&mut self, log_mean: f64, p_zero: f64) -> f64 {
        if self.next_f64() < p_zero {
            0.0
        } else {
            self.gauss(log_mean, 1.2).exp()
        }
    }
}

const N_KO: usize = 400;
const N_EC: usize = 120;
const N_RXN: usize = 150;

const EC_NAMES: [&str; 6] = [
    "oxidoreductase",
    "transferase",
    "hydrolase",
    "lyase",
    "isomerase",
    "ligase",
];

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    fs::create_dir_all(&cli.outdir).with_context(|| format!("creating {}", cli.outdir.display()))?;

    let mut rng = SimpleRng::new(42);

    // Shared "true" KO profile; both tools observe it with their own noise.
    let truth: Vec<f64> = (0..N_KO).map(|_| rng.gauss(2.0, 1.5)).collect();

    // HUMAnN: commented header, bookkeeping rows, a subset of KOs
    let humann_path = cli.outdir.join("KO_cpm_unstratified.tsv");
    let mut humann = create(&humann_path)?;
    writeln!(humann, "# Gene Family\tsample_Abundance-CPM")?;
    writeln!(humann, "UNMAPPED\t{:.4}", 250_000.0 + rng.gauss(0.0, 5_000.0))?;
    writeln!(humann, "UNGROUPED\t{:.4}", 180_000.0 + rng.gauss(0.0, 5_000.0))?;
    for (i, &mu) in truth.iter().enumerate() {
        if rng.next_f64() < 0.15 {
            continue;
        }
        writeln!(humann, "K{:05}\t{:.4}", i + 1, rng.abundance(mu + 0.3, 0.05))?;
    }
    humann.flush()?;

    // PICRUSt2: gzip, ko: prefix, description column, two samples
    let picrust_path = cli.outdir.join("KO_unstrat_annot.tsv.gz");
    let file = create(&picrust_path)?;
    let mut picrust = GzEncoder::new(file, Compression::default());
    writeln!(picrust, "function\tdescription\tsoil_rice\tsoil_shrimp")?;
    for (i, &mu) in truth.iter().enumerate() {
        if rng.next_f64() < 0.10 {
            continue;
        }
        let rice = rng.abundance(mu, 0.08);
        let shrimp = rng.abundance(mu - 0.5, 0.12);
        writeln!(
            picrust,
            "ko:K{:05}\tputative protein {}\t{rice:.3}\t{shrimp:.3}",
            i + 1,
            i + 1
        )?;
    }
    picrust.finish()?.flush()?;

    // EC and RXN CPM tables with a plain header and a name column
    let ec_path = cli.outdir.join("EC_cpm_named.tsv");
    let mut ec = create(&ec_path)?;
    writeln!(ec, "EC_ID\tCPM\tName")?;
    for i in 0..N_EC {
        let class = i % 7;
        let id = if class == 6 {
            format!("UNCLASSIFIED_{i}")
        } else {
            format!("{}.{}.{}.{}", class + 1, i % 5 + 1, i % 11 + 1, i + 1)
        };
        let name = EC_NAMES.get(class).copied().unwrap_or("unclassified");
        writeln!(ec, "{id}\t{:.4}\t{name}", rng.abundance(3.0, 0.05))?;
    }
    ec.flush()?;

    let rxn_path = cli.outdir.join("RXN_cpm_named.tsv");
    let mut rxn = create(&rxn_path)?;
    writeln!(rxn, "RXN_ID\tCPM\tName")?;
    for i in 0..N_RXN {
        let cpm = rng.abundance(2.5, 0.05);
        writeln!(rxn, "RXN-{:05}\t{cpm:.4}\treaction {}", 10_000 + i, i + 1)?;
    }
    rxn.flush()?;

    for path in [&humann_path, &picrust_path, &ec_path, &rxn_path] {
        info!("Wrote {}", path.display());
    }
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}
