use std::collections::HashMap;

use clap::ValueEnum;
use serde::Serialize;

use super::filter::normalize_identifier;
use super::model::{AbundanceTable, MergedRow, MergedTable};
use crate::error::{Result, TableError};

/// How repeated identifiers within one input table are collapsed before
/// the join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the first occurrence in source order.
    #[default]
    First,
    /// Add the values of all occurrences.
    Sum,
    /// Refuse the table.
    Error,
}

/// Inner-join two tables on their normalized identifiers.
///
/// Each table is first collapsed to one value per identifier according to
/// `policy`. Output rows follow the first-occurrence order of `a`.
pub fn merge(
    a: &AbundanceTable,
    b: &AbundanceTable,
    policy: DuplicatePolicy,
) -> Result<MergedTable> {
    let left = collapse(a, policy)?;
    let right = collapse(b, policy)?;

    let right_index: HashMap<&str, f64> = right.iter().map(|(id, v)| (id.as_str(), *v)).collect();

    let rows = left
        .into_iter()
        .filter_map(|(identifier, value_a)| {
            right_index.get(identifier.as_str()).map(|&value_b| MergedRow {
                identifier,
                value_a,
                value_b,
            })
        })
        .collect();

    Ok(MergedTable { rows })
}

/// One `(normalized id, value)` per identifier, in first-occurrence order.
fn collapse(table: &AbundanceTable, policy: DuplicatePolicy) -> Result<Vec<(String, f64)>> {
    let mut order: Vec<(String, f64)> = Vec::with_capacity(table.len());
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(table.len());

    for record in table.iter() {
        let id = normalize_identifier(&record.identifier);
        match seen.get(&id) {
            None => {
                seen.insert(id.clone(), order.len());
                order.push((id, record.value));
            }
            Some(&slot) => match policy {
                DuplicatePolicy::First => {}
                DuplicatePolicy::Sum => order[slot].1 += record.value,
                DuplicatePolicy::Error => return Err(TableError::DuplicateIdentifier(id)),
            },
        }
    }
    Ok(order)
}
