/// Data layer: core types, loading, and queries.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → LaunchDataset (once, at startup)
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaunchDataset  │  Vec<LaunchRecord>, sites, payload extent
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  query    │  (site, payload range) → outcome summary / scatter
///   └──────────┘
///   ┌──────────┐
///   │ insights  │  success rates by site / booster / payload bucket
///   └──────────┘
/// ```

pub mod insights;
pub mod loader;
pub mod model;
pub mod query;
