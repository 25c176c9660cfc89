use crate::data::model::SourceTable;
use crate::error::ExportError;

// ---------------------------------------------------------------------------
// Marker colours
// ---------------------------------------------------------------------------

/// Display colour of one region marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    /// Whatever the file's `global` line sets.
    Default,
    Magenta,
}

impl MarkerColor {
    /// Suffix appended after the shape directive.
    pub fn suffix(self) -> &'static str {
        match self {
            MarkerColor::Default => "",
            MarkerColor::Magenta => " # color=magenta",
        }
    }
}

// ---------------------------------------------------------------------------
// Threshold rule: column value → MarkerColor
// ---------------------------------------------------------------------------

/// Two-colour classification on a numeric column.
///
/// Values `<= threshold` keep the default colour, values above it (and NaN,
/// which compares false) are drawn magenta.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRule {
    pub column: String,
    pub threshold: f64,
}

impl ColorRule {
    pub fn new(column: impl Into<String>, threshold: f64) -> Self {
        ColorRule {
            column: column.into(),
            threshold,
        }
    }

    /// A rule exists only when both the column and the threshold are given.
    pub fn from_options(column: Option<&str>, threshold: Option<f64>) -> Option<Self> {
        match (column, threshold) {
            (Some(column), Some(threshold)) => Some(ColorRule::new(column, threshold)),
            (Some(column), None) => {
                log::warn!("color column '{column}' given without a threshold; using default color");
                None
            }
            (None, Some(_)) => {
                log::warn!("color threshold given without a column; using default color");
                None
            }
            (None, None) => None,
        }
    }

    pub fn classify(&self, value: f64) -> MarkerColor {
        if value <= self.threshold {
            MarkerColor::Default
        } else {
            MarkerColor::Magenta
        }
    }

    /// Classify every row of `table`.
    pub fn classify_table(&self, table: &SourceTable) -> Result<Vec<MarkerColor>, ExportError> {
        let column = table
            .column(&self.column)
            .ok_or_else(|| ExportError::MissingColorColumn(self.column.clone()))?;

        column
            .values
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.as_f64()
                    .map(|v| self.classify(v))
                    .ok_or_else(|| ExportError::NonNumeric {
                        column: self.column.clone(),
                        row,
                        value: cell.to_string(),
                    })
            })
            .collect()
    }
}

/// Per-row colours for an optional rule; all default when there is none.
pub fn marker_colors(
    rule: Option<&ColorRule>,
    table: &SourceTable,
) -> Result<Vec<MarkerColor>, ExportError> {
    match rule {
        Some(rule) => rule.classify_table(table),
        None => Ok(vec![MarkerColor::Default; table.len()]),
    }
}
