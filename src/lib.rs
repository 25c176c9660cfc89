//! Survey-preparation utilities.
//!
//! * [`region`] turns source catalogs and artificial-star pixel lists into
//!   viewer region files, optionally colour-coding sources on a threshold.
//! * [`params`] checks the model inputs of a simulation run against their
//!   declared shapes, physical limits and file existence.

pub mod color;
pub mod data;
pub mod error;
pub mod params;
pub mod region;

pub use color::{ColorRule, MarkerColor};
pub use data::model::{CellValue, Column, SourceTable};
pub use error::{ExportError, RangeViolation, ValidationError, ValidationWarning};
pub use params::{ParamValue, ParameterBundle, ValidationReport, verify_all, verify_one};
pub use region::{ExportSummary, export_from_catalog, export_from_text_list};
