/// Data layer: source-table model and loading.
///
/// Architecture:
/// ```text
///  .fits / .parquet / .csv / .txt
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  dispatch on extension → SourceTable
///   └──────────┘
///        │  (.fits → fits::read_bintable)
///        ▼
///   ┌─────────────┐
///   │ SourceTable  │  ordered columns of CellValue
///   └─────────────┘
/// ```

pub mod fits;
pub mod loader;
pub mod model;
