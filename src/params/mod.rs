//! Pre-run checks of the astrophysical model inputs.

pub mod format;
pub mod table;
pub mod validator;
pub mod value;

pub use format::FormatSpec;
pub use table::{Limits, PARAMETER_TABLE, ParameterSpec, parameter_spec};
pub use validator::{ValidationReport, verify_all, verify_one, verify_with_table};
pub use value::{ParamValue, ParameterBundle};
