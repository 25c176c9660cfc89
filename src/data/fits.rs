//! FITS binary-table I/O on top of `fitsio`.
//!
//! Reads the first `BINTABLE` extension of a FITS file into a
//! [`SourceTable`] and writes a table back out as a single-extension file.
//! Scalar columns of type `L B I J K E D` and character columns (`nA`) are
//! supported; vector columns load as null cells.

use std::path::Path;

use anyhow::{Context, Result, bail};
use fitsio::FitsFile;
use fitsio::hdu::{FitsHdu, HduInfo};
use fitsio::tables::{ColumnDataType, ColumnDescription, ConcreteColumnDescription};

use super::model::{CellValue, Column, SourceTable};

/// Largest `TZERO` that still reads back as integers: the unsigned 32-bit
/// convention. Wider offsets (unsigned 64-bit IDs) read as floats.
const INTEGER_OFFSET_LIMIT: f64 = 4_294_967_296.0;

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// How one column is pulled out of the file.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ReadAs {
    Integer,
    Float,
    Logical,
    Text,
    Unsupported,
}

impl ReadAs {
    /// Decide from the `TFORMn` code and the column's `TSCALn`/`TZEROn`.
    fn from_tform(tform: &str, scale: f64, zero: f64) -> ReadAs {
        let tform = tform.trim();
        let code_at = tform
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(tform.len());
        let repeat = match &tform[..code_at] {
            "" => 1,
            digits => digits.parse::<usize>().unwrap_or(0),
        };

        match tform[code_at..].chars().next() {
            Some('A') => ReadAs::Text,
            _ if repeat != 1 => ReadAs::Unsupported,
            Some('L') => ReadAs::Logical,
            Some('B' | 'I' | 'J' | 'K') if keeps_integers(scale, zero) => ReadAs::Integer,
            Some('B' | 'I' | 'J' | 'K' | 'E' | 'D') => ReadAs::Float,
            _ => ReadAs::Unsupported,
        }
    }
}

/// Unit scale and a whole offset no wider than the unsigned 32-bit
/// convention keep integer cells integer.
fn keeps_integers(scale: f64, zero: f64) -> bool {
    scale == 1.0 && zero.fract() == 0.0 && zero.abs() <= INTEGER_OFFSET_LIMIT
}

/// Read the first binary-table extension of `path`.
pub fn read_bintable(path: &Path) -> Result<SourceTable> {
    let mut fptr = FitsFile::open(path)
        .with_context(|| format!("opening FITS file {}", path.display()))?;

    let hdu = first_bintable(&mut fptr)
        .with_context(|| format!("no BINTABLE extension in {}", path.display()))?;
    let HduInfo::TableInfo {
        column_descriptions,
        num_rows,
    } = &hdu.info
    else {
        bail!("BINTABLE extension without column descriptions");
    };
    log::debug!(
        "{}: {} columns, {} rows",
        path.display(),
        column_descriptions.len(),
        num_rows
    );

    let mut columns = Vec::with_capacity(column_descriptions.len());
    for (i, description) in column_descriptions.iter().enumerate() {
        let name = description.name.clone();
        let values = if *num_rows == 0 {
            Vec::new()
        } else {
            read_column(&mut fptr, &hdu, i + 1, &name, *num_rows)
                .with_context(|| format!("reading column '{name}'"))?
        };
        columns.push(Column::new(name, values));
    }

    SourceTable::new(columns)
}

/// The HDU after the primary whose `XTENSION` is `BINTABLE`, if any.
fn first_bintable(fptr: &mut FitsFile) -> Option<FitsHdu> {
    let mut index = 1;
    while let Ok(hdu) = fptr.hdu(index) {
        let xtension = hdu.read_key::<String>(fptr, "XTENSION").unwrap_or_default();
        if xtension.trim() == "BINTABLE" {
            return Some(hdu);
        }
        index += 1;
    }
    None
}

fn read_column(
    fptr: &mut FitsFile,
    hdu: &FitsHdu,
    number: usize,
    name: &str,
    rows: usize,
) -> Result<Vec<CellValue>> {
    let tform: String = hdu.read_key(fptr, &format!("TFORM{number}"))?;
    let scale = hdu.read_key::<f64>(fptr, &format!("TSCAL{number}")).unwrap_or(1.0);
    let zero = hdu.read_key::<f64>(fptr, &format!("TZERO{number}")).unwrap_or(0.0);

    let values = match ReadAs::from_tform(&tform, scale, zero) {
        ReadAs::Integer => hdu
            .read_col::<i64>(fptr, name)?
            .into_iter()
            .map(CellValue::Integer)
            .collect(),
        ReadAs::Float => hdu
            .read_col::<f64>(fptr, name)?
            .into_iter()
            .map(CellValue::Float)
            .collect(),
        ReadAs::Text => hdu
            .read_col::<String>(fptr, name)?
            .into_iter()
            .map(|s| CellValue::String(s.trim_end().to_string()))
            .collect(),
        ReadAs::Logical => hdu
            .read_col::<String>(fptr, name)?
            .into_iter()
            .map(|s| match s.trim() {
                "T" => CellValue::Bool(true),
                "F" => CellValue::Bool(false),
                _ => CellValue::Null,
            })
            .collect(),
        ReadAs::Unsupported => {
            log::warn!("column '{name}' has unsupported form '{tform}'; loading as nulls");
            vec![CellValue::Null; rows]
        }
    };
    Ok(values)
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum WriteKind {
    Double,
    Long,
    Text(usize),
}

impl WriteKind {
    fn infer(column: &Column) -> Result<WriteKind> {
        match column.values.iter().find(|v| **v != CellValue::Null) {
            Some(CellValue::Integer(_)) => Ok(WriteKind::Long),
            Some(CellValue::String(_)) => {
                let width = column
                    .values
                    .iter()
                    .map(|v| match v {
                        CellValue::String(s) => s.len(),
                        _ => 0,
                    })
                    .max()
                    .unwrap_or(1);
                Ok(WriteKind::Text(width.max(1)))
            }
            Some(CellValue::Bool(_)) => {
                bail!("column '{}': logical columns are not written", column.name)
            }
            _ => Ok(WriteKind::Double),
        }
    }

    fn description(self, name: &str) -> Result<ConcreteColumnDescription> {
        let description = match self {
            WriteKind::Double => ColumnDescription::new(name)
                .with_type(ColumnDataType::Double)
                .create()?,
            WriteKind::Long => ColumnDescription::new(name)
                .with_type(ColumnDataType::Long)
                .create()?,
            WriteKind::Text(width) => ColumnDescription::new(name)
                .with_type(ColumnDataType::String)
                .that_repeats(width)
                .create()?,
        };
        Ok(description)
    }

    fn write(self, fptr: &mut FitsFile, hdu: &FitsHdu, column: &Column) -> Result<()> {
        let name = column.name.as_str();
        match self {
            WriteKind::Double => {
                let values = column
                    .values
                    .iter()
                    .map(|v| match v {
                        CellValue::Null => Ok(f64::NAN),
                        v => v
                            .as_f64()
                            .with_context(|| format!("column '{name}': '{v}' is not numeric")),
                    })
                    .collect::<Result<Vec<f64>>>()?;
                hdu.write_col(fptr, name, &values)?;
            }
            WriteKind::Long => {
                let values = column
                    .values
                    .iter()
                    .map(|v| match v {
                        CellValue::Integer(i) => Ok(*i),
                        CellValue::Null => Ok(0),
                        other => bail!("column '{name}': mixed value types ('{other}')"),
                    })
                    .collect::<Result<Vec<i64>>>()?;
                hdu.write_col(fptr, name, &values)?;
            }
            WriteKind::Text(_) => {
                let values = column
                    .values
                    .iter()
                    .map(|v| match v {
                        CellValue::String(s) => Ok(s.clone()),
                        CellValue::Null => Ok(String::new()),
                        other => bail!("column '{name}': '{other}' is not text"),
                    })
                    .collect::<Result<Vec<String>>>()?;
                hdu.write_col(fptr, name, &values)?;
            }
        }
        Ok(())
    }
}

/// Write `table` as an empty primary HDU followed by one binary table,
/// replacing any file at `path`.
pub fn write_bintable(path: &Path, table: &SourceTable) -> Result<()> {
    let kinds = table
        .columns()
        .iter()
        .map(WriteKind::infer)
        .collect::<Result<Vec<_>>>()?;
    let descriptions = table
        .columns()
        .iter()
        .zip(&kinds)
        .map(|(column, kind)| kind.description(&column.name))
        .collect::<Result<Vec<_>>>()?;

    let mut fptr = FitsFile::create(path)
        .overwrite()
        .open()
        .with_context(|| format!("creating {}", path.display()))?;
    let hdu = fptr
        .create_table("CATALOG".to_string(), &descriptions)
        .context("creating binary table")?;
    for (column, kind) in table.columns().iter().zip(&kinds) {
        kind.write(&mut fptr, &hdu, column)
            .with_context(|| format!("writing column '{}'", column.name))?;
    }
    Ok(())
}
