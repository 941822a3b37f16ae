use std::fmt;

// ---------------------------------------------------------------------------
// AbundanceRecord – one identifier → abundance row
// ---------------------------------------------------------------------------

/// A single row of a functional-abundance table.
#[derive(Debug, Clone, PartialEq)]
pub struct AbundanceRecord {
    /// Feature identifier (KO, EC number, MetaCyc reaction, ...).
    pub identifier: String,
    /// Abundance value – finite and strictly positive once loaded.
    pub value: f64,
}

impl AbundanceRecord {
    pub fn new(identifier: impl Into<String>, value: f64) -> Self {
        Self {
            identifier: identifier.into(),
            value,
        }
    }
}

// ---------------------------------------------------------------------------
// AbundanceTable – the records of one input file, in source order
// ---------------------------------------------------------------------------

/// An ordered abundance table loaded from a single file.
///
/// Duplicated identifiers are kept as they appear in the source; the merge
/// step decides what to do with them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbundanceTable {
    pub records: Vec<AbundanceRecord>,
    /// Header name of the value column, when the file had a header row.
    pub value_label: Option<String>,
}

impl AbundanceTable {
    pub fn from_records(records: Vec<AbundanceRecord>) -> Self {
        Self {
            records,
            value_label: None,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AbundanceRecord> {
        self.records.iter()
    }

    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }
}

impl FromIterator<AbundanceRecord> for AbundanceTable {
    fn from_iter<I: IntoIterator<Item = AbundanceRecord>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// LoadReport – what the loader kept and what it dropped
// ---------------------------------------------------------------------------

/// Row accounting for one `load_table` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows seen (comments and the header excluded).
    pub rows_read: usize,
    /// Rows that were not valid UTF-8.
    pub undecodable: usize,
    pub missing_identifier: usize,
    /// Value cell absent, unparsable or non-finite.
    pub non_numeric: usize,
    pub non_positive: usize,
}

impl LoadReport {
    pub fn kept(&self) -> usize {
        self.rows_read - self.dropped()
    }

    pub fn dropped(&self) -> usize {
        self.undecodable + self.missing_identifier + self.non_numeric + self.non_positive
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows read, {} kept ({} bad utf-8, {} missing id, {} non-numeric, {} non-positive)",
            self.rows_read,
            self.kept(),
            self.undecodable,
            self.missing_identifier,
            self.non_numeric,
            self.non_positive
        )
    }
}

// ---------------------------------------------------------------------------
// MergedTable – inner join of two abundance tables
// ---------------------------------------------------------------------------

/// One identifier present in both source tables.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub identifier: String,
    pub value_a: f64,
    pub value_b: f64,
}

/// Result of joining two tables; every identifier occurs in both inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedTable {
    pub rows: Vec<MergedRow>,
}

impl MergedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn values_a(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.value_a).collect()
    }

    pub fn values_b(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.value_b).collect()
    }
}
