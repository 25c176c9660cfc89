//! Region-file export.
//!
//! ```text
//!   SourceTable ──schema──▶ coordinate columns ──sexagesimal──▶ RegionMarker
//!        │                                                          │
//!        └──color::ColorRule──▶ MarkerColor ────────────────────────┤
//!                                                                   ▼
//!                                             writer: temp file → rename
//! ```

pub mod export;
pub mod schema;
pub mod sexagesimal;
pub mod writer;

pub use export::{export_from_catalog, export_from_text_list, region_path_for};
pub use writer::{ExportSummary, Frame, RegionMarker};
