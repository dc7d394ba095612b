/// Data layer: sample types, loading, and aggregation.
///
/// Architecture:
/// ```text
///  flow_p*.csv / setcover_runtime.csv      visualization.csv
///        │                                        │
///        ▼                                        ▼
///   ┌──────────┐                           ┌──────────────┐
///   │  loader   │  rows → Vec<Sample>      │    loader     │  sections → SpatialLayout
///   └──────────┘                           └──────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  group by size → Vec<AggregatedPoint>
///   └───────────┘
/// ```

pub mod aggregate;
pub mod loader;
pub mod model;
