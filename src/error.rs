//! Classified failures for the region exporter and the parameter validator.
//!
//! Fatal conditions are `Err` values and abort the operation that raised
//! them. Soft conditions are [`ValidationWarning`]s: they are logged and
//! returned alongside a successful result.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Exporter errors
// ---------------------------------------------------------------------------

/// Errors raised while turning a source table into a region file.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No column satisfies a required coordinate lookup.
    #[error("no column {lookup} (available columns: {available})")]
    MissingColumn { lookup: String, available: String },

    /// The requested color column is not in the table.
    #[error("color column '{0}' not found")]
    MissingColorColumn(String),

    /// A cell that must be numeric is not.
    #[error("column '{column}' row {row}: '{value}' is not a number")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    /// A coordinate is NaN or infinite.
    #[error("column '{column}' row {row}: coordinate {value} is not finite")]
    InvalidCoordinate { column: String, row: usize, value: f64 },

    /// The input could not be read as a table.
    #[error("cannot read table {}: {reason}", path.display())]
    Table { path: PathBuf, reason: String },

    /// The region file could not be written.
    #[error("cannot write region file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub(crate) fn missing_substring(needle: &str, available: &[&str]) -> Self {
        ExportError::MissingColumn {
            lookup: format!("name contains '{needle}'"),
            available: available.join(", "),
        }
    }

    pub(crate) fn missing_exact(name: &str, available: &[&str]) -> Self {
        ExportError::MissingColumn {
            lookup: format!("named '{name}'"),
            available: available.join(", "),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Validator errors and warnings
// ---------------------------------------------------------------------------

/// Which physical-range rule a parameter broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeViolation {
    BelowMinimum,
    AboveMaximum,
    MinAboveMax,
    StepTooCoarse,
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeViolation::BelowMinimum => write!(f, "min value not physical"),
            RangeViolation::AboveMaximum => write!(f, "max value not physical"),
            RangeViolation::MinAboveMax => write!(f, "min value greater than max"),
            RangeViolation::StepTooCoarse => write!(f, "step value greater than (max-min)"),
        }
    }
}

/// A fatal parameter problem. The first one found stops validation.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{name} is not in the right format - {expected}")]
    Format { name: String, expected: String },

    #[error("{name} {violation}")]
    Range {
        name: String,
        violation: RangeViolation,
    },

    #[error("{name} does not exist ({}); please provide the file path", path.display())]
    NotFound { name: String, path: PathBuf },
}

impl ValidationError {
    pub(crate) fn format(name: &str, expected: impl Into<String>) -> Self {
        ValidationError::Format {
            name: name.to_string(),
            expected: expected.into(),
        }
    }

    pub(crate) fn range(name: &str, violation: RangeViolation) -> Self {
        ValidationError::Range {
            name: name.to_string(),
            violation,
        }
    }

    /// Name of the parameter that failed.
    pub fn parameter(&self) -> &str {
        match self {
            ValidationError::Format { name, .. }
            | ValidationError::Range { name, .. }
            | ValidationError::NotFound { name, .. } => name,
        }
    }
}

/// A non-fatal parameter finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// An optional list parameter was left unset.
    Undefined { name: String },
    /// A grid whose min equals its max.
    DegenerateGrid { name: String },
}

impl ValidationWarning {
    pub fn parameter(&self) -> &str {
        match self {
            ValidationWarning::Undefined { name } | ValidationWarning::DegenerateGrid { name } => {
                name
            }
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::Undefined { name } => write!(f, "{name} is not defined."),
            ValidationWarning::DegenerateGrid { name } => {
                write!(f, "Note: {name} grid is single-valued.")
            }
        }
    }
}
