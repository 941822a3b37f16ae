use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;

use super::model::MergedTable;

/// Write a merged table as TSV with a single header row,
/// e.g. `["KO", "HUMANN", "PICRUSt2"]`. Parent directories are created.
pub fn write_merged(merged: &MergedTable, path: &Path, headers: [&str; 3]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(headers).context("writing header")?;
    for row in &merged.rows {
        writer
            .write_record([
                row.identifier.clone(),
                row.value_a.to_string(),
                row.value_b.to_string(),
            ])
            .with_context(|| format!("writing row {}", row.identifier))?;
    }
    writer.flush().with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

/// Write any serializable summary as pretty-printed JSON.
pub fn write_summary<T: Serialize>(summary: &T, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(summary).context("serializing summary")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

/// Create the directory that will hold `path`, if it has one.
pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).with_context(|| format!("creating directory {}", dir.display()))
        }
        _ => Ok(()),
    }
}
