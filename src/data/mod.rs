/// Data layer: typed records, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  tainan_smart_enforcement.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → Dataset (typed Records)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  district + jurisdiction + keywords → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  Summary, frequency tables, field notices
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
