/// Data layer: core types, loading, derivation, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + clean → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  derive   │  state code, type label, colour → DerivedDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterCriteria → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  top-N, grouped means, counts, summaries
///   └───────────┘
/// ```

pub mod aggregate;
pub mod derive;
pub mod filter;
pub mod loader;
pub mod model;
