use std::path::{Path, PathBuf};

use crate::color::{ColorRule, marker_colors};
use crate::data::loader;
use crate::data::model::{CellValue, Column, SourceTable};
use crate::error::ExportError;

use super::schema::{infer_sky_columns, pixel_columns};
use super::sexagesimal::{degrees_to_dms, degrees_to_hms};
use super::writer::{ExportSummary, Frame, RegionMarker, write_region_file};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Write `<input>.reg` with one sky-coordinate circle per catalog row.
///
/// RA/DEC columns are inferred by substring (see [`super::schema`]). When
/// `color_column` and `color_threshold` are both given, rows above the
/// threshold are drawn magenta.
pub fn export_from_catalog(
    input: &Path,
    color_column: Option<&str>,
    color_threshold: Option<f64>,
) -> Result<ExportSummary, ExportError> {
    let table = loader::load_table(input).map_err(|e| table_error(input, e))?;
    let rule = ColorRule::from_options(color_column, color_threshold);
    let output = region_path_for(input, ".fits");

    let summary = write_sky_regions(&table, rule.as_ref(), &output)?;
    log::info!(
        "wrote {} regions ({} highlighted) to {}",
        summary.markers,
        summary.highlighted,
        output.display()
    );
    Ok(summary)
}

/// Write `<input>.reg` with one pixel-coordinate circle per row of a
/// whitespace-delimited list with `X` and `Y` columns.
pub fn export_from_text_list(
    input: &Path,
    color_column: Option<&str>,
    color_threshold: Option<f64>,
) -> Result<ExportSummary, ExportError> {
    let table = loader::load_ascii(input).map_err(|e| table_error(input, e))?;
    let rule = ColorRule::from_options(color_column, color_threshold);
    let output = region_path_for(input, ".txt");

    let summary = write_pixel_regions(&table, rule.as_ref(), &output)?;
    log::info!(
        "wrote {} regions ({} highlighted) to {}",
        summary.markers,
        summary.highlighted,
        output.display()
    );
    Ok(summary)
}

/// Region-file path for `input`: a trailing `suffix` becomes `.reg`, any
/// other extension is swapped for `reg`.
pub fn region_path_for(input: &Path, suffix: &str) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(suffix) {
        Some(stem) if !stem.is_empty() => input.with_file_name(format!("{stem}.reg")),
        _ => input.with_extension("reg"),
    }
}

// ---------------------------------------------------------------------------
// Table → markers
// ---------------------------------------------------------------------------

/// Sky-frame export of an already loaded table.
pub fn write_sky_regions(
    table: &SourceTable,
    rule: Option<&ColorRule>,
    output: &Path,
) -> Result<ExportSummary, ExportError> {
    let sky = infer_sky_columns(table)?;
    let colors = marker_colors(rule, table)?;

    let markers = colors
        .into_iter()
        .enumerate()
        .map(|(row, color)| -> Result<RegionMarker, ExportError> {
            Ok(RegionMarker {
                first: degrees_to_hms(coordinate(sky.ra, row)?),
                second: degrees_to_dms(coordinate(sky.dec, row)?),
                color,
            })
        });
    write_region_file(output, Frame::Fk5, markers)
}

/// Image-frame export of an already loaded table.
pub fn write_pixel_regions(
    table: &SourceTable,
    rule: Option<&ColorRule>,
    output: &Path,
) -> Result<ExportSummary, ExportError> {
    let pixels = pixel_columns(table)?;
    let colors = marker_colors(rule, table)?;

    let markers = colors
        .into_iter()
        .enumerate()
        .map(|(row, color)| -> Result<RegionMarker, ExportError> {
            Ok(RegionMarker {
                first: format_pixel(pixels.x, row)?,
                second: format_pixel(pixels.y, row)?,
                color,
            })
        });
    write_region_file(output, Frame::Image, markers)
}

fn coordinate(column: &Column, row: usize) -> Result<f64, ExportError> {
    let cell = &column.values[row];
    let value = cell.as_f64().ok_or_else(|| ExportError::NonNumeric {
        column: column.name.clone(),
        row,
        value: cell.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ExportError::InvalidCoordinate {
            column: column.name.clone(),
            row,
            value,
        });
    }
    Ok(value)
}

/// Pixel positions print as read: integers bare, floats in shortest
/// round-trip form with a `.0` kept on whole numbers. Magnitudes below
/// `1e-4` or from `1e16` up switch to exponent form (`1e-07`, `2.5e+16`).
fn format_pixel(column: &Column, row: usize) -> Result<String, ExportError> {
    match &column.values[row] {
        CellValue::Integer(i) => Ok(i.to_string()),
        CellValue::Float(_) => coordinate(column, row).map(float_repr),
        other => Err(ExportError::NonNumeric {
            column: column.name.clone(),
            row,
            value: other.to_string(),
        }),
    }
}

fn float_repr(v: f64) -> String {
    let magnitude = v.abs();
    if v != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        // Rust's `{:e}` gives "1e-7"; pad the exponent to two digits and sign it.
        let text = format!("{v:e}");
        return match text.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exp),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => text,
        };
    }
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

fn table_error(path: &Path, err: anyhow::Error) -> ExportError {
    ExportError::Table {
        path: path.to_path_buf(),
        reason: format!("{err:#}"),
    }
}
