use super::model::AbundanceTable;

/// Namespace prefixes stripped from identifiers (matched case-insensitively).
/// PICRUSt2 writes `ko:K00001`; KEGG REST output uses `ec:`, `rn:` and `map:`.
const KNOWN_NAMESPACES: &[&str] = &["ko:", "ec:", "rn:", "map:"];

/// Canonical form of a feature identifier: trimmed, one known namespace
/// prefix removed. Anything else passes through unchanged.
pub fn normalize_identifier(raw: &str) -> String {
    let trimmed = raw.trim();
    for ns in KNOWN_NAMESPACES {
        if let Some(head) = trimmed.get(..ns.len()) {
            if head.eq_ignore_ascii_case(ns) {
                return trimmed[ns.len()..].trim_start().to_string();
            }
        }
    }
    trimmed.to_string()
}

/// Keep records whose normalized identifier starts with `prefix`.
///
/// HUMAnN tables mix real features with bookkeeping rows (`UNMAPPED`,
/// `UNGROUPED`, ...); a `K` prefix keeps only KEGG orthologs. An empty
/// prefix keeps everything.
pub fn retain_prefixed(table: AbundanceTable, prefix: &str) -> AbundanceTable {
    if prefix.is_empty() {
        return table;
    }
    let AbundanceTable {
        records,
        value_label,
    } = table;
    AbundanceTable {
        records: records
            .into_iter()
            .filter(|r| normalize_identifier(&r.identifier).starts_with(prefix))
            .collect(),
        value_label,
    }
}

/// Top-level EC class of an identifier: `"1"`..`"6"` for `N.x.x.x`,
/// `"other"` for everything else (unclassified rows, MetaCyc IDs, ...).
pub fn ec_class(identifier: &str) -> &'static str {
    const CLASSES: [&str; 6] = ["1", "2", "3", "4", "5", "6"];
    let bytes = normalize_identifier(identifier).into_bytes();
    match bytes.as_slice() {
        [d @ b'1'..=b'6', b'.', ..] => CLASSES[usize::from(d - b'1')],
        _ => "other",
    }
}

/// Display order of EC classes.
pub const EC_CLASS_ORDER: [&str; 7] = ["1", "2", "3", "4", "5", "6", "other"];
