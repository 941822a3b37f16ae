use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use flate2::read::MultiGzDecoder;
use log::debug;

use super::model::{AbundanceRecord, AbundanceTable, LoadReport};
use crate::error::{Result, TableError};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const COMMENT_MARKER: u8 = b'#';

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load an identifier → abundance table from a tab-separated file.
///
/// The file may be gzip-compressed (detected from its magic bytes, not the
/// extension), may carry `#` comment lines and may or may not start with a
/// header row. The header is detected by probing the value cell of the first
/// non-comment row: if it is non-empty and does not parse as a number the
/// row is a header.
///
/// Rows that are not valid UTF-8, have an empty identifier, a value that is
/// not a finite number, or a value `<= 0` are dropped. The survivors keep
/// their source order.
pub fn load_table(path: &Path, id_column: usize, value_column: usize) -> Result<AbundanceTable> {
    load_table_with_report(path, id_column, value_column).map(|(table, _)| table)
}

/// Same as [`load_table`], also returning the per-row accounting.
pub fn load_table_with_report(
    path: &Path,
    id_column: usize,
    value_column: usize,
) -> Result<(AbundanceTable, LoadReport)> {
    let (records, undecodable) = read_records(path)?;
    check_width(path, &records, id_column.max(value_column) + 1)?;

    let has_header = records
        .first()
        .and_then(|first| first.get(value_column))
        .map(looks_like_header)
        .unwrap_or(false);

    Ok(collect(path, &records, undecodable, id_column, value_column, has_header))
}

/// Load a headered table, selecting the value column by its header name.
///
/// Used for multi-sample tables such as PICRUSt2 predictions where the
/// caller names the sample to compare. Header names are trimmed before
/// matching; an absent name fails with [`TableError::MissingColumn`].
pub fn load_table_by_name(
    path: &Path,
    id_column: usize,
    value_column: &str,
) -> Result<AbundanceTable> {
    let (records, undecodable) = read_records(path)?;
    let header: Vec<String> = records
        .first()
        .map(|r| r.iter().map(|h| h.trim().to_string()).collect())
        .unwrap_or_default();

    let value_idx = header
        .iter()
        .position(|h| h == value_column)
        .ok_or_else(|| TableError::MissingColumn {
            column: value_column.to_string(),
            available: header.clone(),
        })?;
    check_width(path, &records, id_column.max(value_idx) + 1)?;

    let (table, _) = collect(path, &records, undecodable, id_column, value_idx, true);
    Ok(table)
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Open a file, transparently decompressing gzip input.
fn open_table(path: &Path) -> Result<Box<dyn Read>> {
    if !path.exists() {
        return Err(TableError::MissingFile(path.to_path_buf()));
    }
    let io_err = |source: std::io::Error| TableError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let mut reader = BufReader::new(file);
    let is_gzip = reader.fill_buf().map_err(io_err)?.starts_with(&GZIP_MAGIC);

    if is_gzip {
        Ok(Box::new(MultiGzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Read every non-comment row. Rows that are not valid UTF-8 are skipped and
/// counted; only I/O and framing failures are errors.
fn read_records(path: &Path) -> Result<(Vec<StringRecord>, usize)> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(COMMENT_MARKER))
        .from_reader(open_table(path)?);

    let mut records = Vec::new();
    let mut undecodable = 0;
    for raw in reader.byte_records() {
        let raw = raw.map_err(|source| TableError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        match StringRecord::from_byte_record(raw) {
            Ok(record) => records.push(record),
            Err(_) => undecodable += 1,
        }
    }
    Ok((records, undecodable))
}

fn check_width(path: &Path, records: &[StringRecord], required: usize) -> Result<()> {
    let found = records.first().map(|r| r.len()).unwrap_or(0);
    if found < required {
        return Err(TableError::TooFewColumns {
            path: path.to_path_buf(),
            required,
            found,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

fn collect(
    path: &Path,
    records: &[StringRecord],
    undecodable: usize,
    id_column: usize,
    value_column: usize,
    has_header: bool,
) -> (AbundanceTable, LoadReport) {
    let value_label = if has_header {
        records
            .first()
            .and_then(|r| r.get(value_column))
            .map(|h| h.trim().to_string())
    } else {
        None
    };

    let skip = usize::from(has_header);
    let mut report = LoadReport {
        rows_read: undecodable,
        undecodable,
        ..LoadReport::default()
    };
    let mut kept = Vec::with_capacity(records.len().saturating_sub(skip));

    for record in records.iter().skip(skip) {
        report.rows_read += 1;

        let identifier = record.get(id_column).map(str::trim).unwrap_or("");
        if identifier.is_empty() {
            report.missing_identifier += 1;
            continue;
        }
        let Some(value) = record.get(value_column).and_then(parse_value) else {
            report.non_numeric += 1;
            continue;
        };
        if value <= 0.0 {
            report.non_positive += 1;
            continue;
        }
        kept.push(AbundanceRecord::new(identifier, value));
    }

    debug!("{}: {report}", path.display());

    let table = AbundanceTable {
        records: kept,
        value_label,
    };
    (table, report)
}

fn parse_value(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn looks_like_header(cell: &str) -> bool {
    let cell = cell.trim();
    !cell.is_empty() && cell.parse::<f64>().is_err()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::NamedTempFile;

    use super::*;

    fn write_tsv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    fn ids(table: &AbundanceTable) -> Vec<&str> {
        table.iter().map(|r| r.identifier.as_str()).collect()
    }

    #[test]
    fn headerless_table_filters_zero_and_junk() {
        let f = write_tsv("K00001\t10.0\nK00002\t0.0\nK00003\tabc\nK00004\t-1\nK00005\t2.5\n");
        let (table, report) = load_table_with_report(f.path(), 0, 1).unwrap();

        assert_eq!(ids(&table), ["K00001", "K00005"]);
        assert_eq!(table.values(), [10.0, 2.5]);
        assert_eq!(table.value_label, None);
        assert_eq!(report.rows_read, 5);
        assert_eq!(report.non_numeric, 1);
        assert_eq!(report.non_positive, 2);
        assert_eq!(report.kept(), 2);
    }

    #[test]
    fn commented_humann_header_is_skipped() {
        let f = write_tsv("# Gene Family\tsample_Abundance-CPM\nUNMAPPED\t120.0\nK00001\t10.0\n");
        let table = load_table(f.path(), 0, 1).unwrap();
        assert_eq!(ids(&table), ["UNMAPPED", "K00001"]);
    }

    #[test]
    fn plain_header_row_is_detected() {
        let f = write_tsv(
            "EC_ID\tCPM\tName\n1.1.1.1\t5\talcohol dehydrogenase\n2.7.7.7\t3\tDNA polymerase\n",
        );
        let table = load_table(f.path(), 0, 1).unwrap();
        assert_eq!(ids(&table), ["1.1.1.1", "2.7.7.7"]);
        assert_eq!(table.value_label.as_deref(), Some("CPM"));
    }

    #[test]
    fn missing_identifier_and_ragged_rows_are_dropped() {
        let f = write_tsv("K1\t1\n\t4\nK2\nK3\t  7 \n");
        let (table, report) = load_table_with_report(f.path(), 0, 1).unwrap();
        assert_eq!(ids(&table), ["K1", "K3"]);
        assert_eq!(table.values(), [1.0, 7.0]);
        assert_eq!(report.missing_identifier, 1);
        assert_eq!(report.non_numeric, 1);
    }

    #[test]
    fn non_finite_values_are_dropped() {
        let f = write_tsv("K1\tinf\nK2\tNaN\nK3\t1e3\n");
        let table = load_table(f.path(), 0, 1).unwrap();
        assert_eq!(ids(&table), ["K3"]);
        assert!(table.iter().all(|r| r.value.is_finite() && r.value > 0.0));
    }

    #[test]
    fn gzip_input_is_detected_by_magic_bytes() {
        let mut f = NamedTempFile::new().unwrap();
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b"K00001\t3.0\nK00002\t4.0\n").unwrap();
        f.write_all(&enc.finish().unwrap()).unwrap();
        f.flush().unwrap();

        let table = load_table(f.path(), 0, 1).unwrap();
        assert_eq!(ids(&table), ["K00001", "K00002"]);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_table(Path::new("/definitely/not/here.tsv"), 0, 1).unwrap_err();
        assert!(matches!(err, TableError::MissingFile(_)));
    }

    #[test]
    fn too_few_columns_is_a_schema_error() {
        let f = write_tsv("K00001\nK00002\n");
        let err = load_table(f.path(), 0, 1).unwrap_err();
        assert!(matches!(
            err,
            TableError::TooFewColumns {
                required: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn named_column_selects_sample() {
        let f = write_tsv(
            "function\tdescription\tsoil_rice\tsoil_shrimp\n\
             ko:K00001\tfoo\t5.0\t1.0\n\
             ko:K00003\tbar\t2.0\t0\n",
        );
        let rice = load_table_by_name(f.path(), 0, "soil_rice").unwrap();
        assert_eq!(ids(&rice), ["ko:K00001", "ko:K00003"]);
        assert_eq!(rice.value_label.as_deref(), Some("soil_rice"));

        let shrimp = load_table_by_name(f.path(), 0, "soil_shrimp").unwrap();
        assert_eq!(shrimp.values(), [1.0]);
    }

    #[test]
    fn blank_first_value_is_a_dropped_row_not_a_header() {
        let f = write_tsv("K1\t\nK2\t5\nK3\t7\n");
        let (table, report) = load_table_with_report(f.path(), 0, 1).unwrap();
        assert_eq!(ids(&table), ["K2", "K3"]);
        assert_eq!(table.value_label, None);
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.non_numeric, 1);
    }

    #[test]
    fn invalid_utf8_row_is_dropped() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"K1\t1\nK\xff\xfe2\t2\nK3\t3\n").unwrap();
        f.flush().unwrap();

        let (table, report) = load_table_with_report(f.path(), 0, 1).unwrap();
        assert_eq!(ids(&table), ["K1", "K3"]);
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.undecodable, 1);
        assert_eq!(report.kept(), 2);
    }

    #[test]
    fn named_column_matches_padded_header() {
        let f = write_tsv("function\t soil_rice \tsoil_shrimp\nko:K00001\t4.0\t1.0\n");
        let rice = load_table_by_name(f.path(), 0, "soil_rice").unwrap();
        assert_eq!(rice.values(), [4.0]);
        assert_eq!(rice.value_label.as_deref(), Some("soil_rice"));
    }

    #[test]
    fn absent_named_column_lists_available() {
        let f = write_tsv("function\tsoil_rice\nK1\t1\n");
        let err = load_table_by_name(f.path(), 0, "soil_wheat").unwrap_err();
        match err {
            TableError::MissingColumn { column, available } => {
                assert_eq!(column, "soil_wheat");
                assert_eq!(available, ["function", "soil_rice"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
