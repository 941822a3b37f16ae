/// Data layer: core types, loading, identifier handling, merging, output.
///
/// Architecture:
/// ```text
///  .tsv / .tsv.gz            .tsv / .tsv.gz
///        │                         │
///        ▼                         ▼
///   ┌──────────┐              ┌──────────┐
///   │  loader   │             │  loader   │  parse + clean → AbundanceTable
///   └──────────┘              └──────────┘
///        │                         │
///        ▼                         │
///   ┌──────────┐                   │
///   │  filter   │  id prefix       │
///   └──────────┘                   │
///        │                         │
///        └──────────┬──────────────┘
///                   ▼
///             ┌──────────┐
///             │  merge    │  normalize ids, collapse duplicates, inner join
///             └──────────┘
///                   │
///                   ▼
///             ┌──────────┐
///             │  writer   │  MergedTable → .tsv
///             └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
pub mod merge;
pub mod writer;
