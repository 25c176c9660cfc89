//! Best-effort schema inference for coordinate columns.
//!
//! Sky columns are found by case-insensitive substring: the first column
//! whose upper-cased name contains `RA` is right ascension, the first
//! containing `DEC` is declination. This is a heuristic, not a schema
//! lookup: a catalog with `GRADE` ahead of `RA` resolves to `GRADE`. When
//! several columns match, the first wins and a warning is logged.
//!
//! Pixel columns are the literal, case-sensitive names `X` and `Y`.

use crate::data::model::{Column, SourceTable};
use crate::error::ExportError;

/// The right-ascension and declination columns of a catalog.
#[derive(Debug, Clone, Copy)]
pub struct SkyColumns<'a> {
    pub ra: &'a Column,
    pub dec: &'a Column,
}

/// The pixel-position columns of a text list.
#[derive(Debug, Clone, Copy)]
pub struct PixelColumns<'a> {
    pub x: &'a Column,
    pub y: &'a Column,
}

/// First column whose upper-cased name contains `needle`.
pub fn first_column_containing<'a>(
    table: &'a SourceTable,
    needle: &str,
) -> Result<&'a Column, ExportError> {
    let mut matches = table
        .columns()
        .iter()
        .filter(|c| c.name.to_uppercase().contains(needle));

    let first = matches
        .next()
        .ok_or_else(|| ExportError::missing_substring(needle, &table.column_names()))?;

    let others: Vec<&str> = matches.map(|c| c.name.as_str()).collect();
    if !others.is_empty() {
        log::warn!(
            "several columns contain '{needle}'; using '{}' and ignoring {}",
            first.name,
            others.join(", ")
        );
    }
    Ok(first)
}

pub fn infer_sky_columns(table: &SourceTable) -> Result<SkyColumns<'_>, ExportError> {
    let ra = first_column_containing(table, "RA")?;
    let dec = first_column_containing(table, "DEC")?;
    log::debug!("sky columns: RA = '{}', DEC = '{}'", ra.name, dec.name);
    Ok(SkyColumns { ra, dec })
}

pub fn pixel_columns(table: &SourceTable) -> Result<PixelColumns<'_>, ExportError> {
    let lookup = |name: &str| {
        table
            .column(name)
            .ok_or_else(|| ExportError::missing_exact(name, &table.column_names()))
    };
    Ok(PixelColumns {
        x: lookup("X")?,
        y: lookup("Y")?,
    })
}
