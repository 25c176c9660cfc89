use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int16Array, Int32Array,
    Int64Array, Int8Array, UInt8Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::fits;
use super::model::{CellValue, Column, SourceTable};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a source table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.fits` / `.fit` / `.fts` – first binary-table extension
/// * `.parquet` / `.pq`        – scalar columns
/// * `.csv`                    – header row, comma separated
/// * anything else             – whitespace-delimited ASCII with a header line
pub fn load_table(path: &Path) -> Result<SourceTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "fits" | "fit" | "fts" => fits::read_bintable(path),
        "parquet" | "pq" => load_parquet(path),
        "csv" => load_csv(path),
        _ => load_ascii(path),
    }
}

/// Load a whitespace-delimited ASCII table regardless of extension.
pub fn load_ascii(path: &Path) -> Result<SourceTable> {
    let text = std::fs::read_to_string(path).context("reading ASCII table")?;
    parse_ascii(&text)
}

// ---------------------------------------------------------------------------
// ASCII loader
// ---------------------------------------------------------------------------

/// Layout: first non-comment line names the columns, every following line is
/// one row.  Fields are split on runs of whitespace; `#` lines and blank
/// lines are skipped.
fn parse_ascii(text: &str) -> Result<SourceTable> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty() && !l.trim_start().starts_with('#'));

    let (_, header) = lines.next().context("ASCII table has no header line")?;
    let names: Vec<String> = header.split_whitespace().map(str::to_string).collect();

    let mut rows = Vec::new();
    for (line_no, line) in lines {
        let row: Vec<CellValue> = line.split_whitespace().map(CellValue::guess).collect();
        if row.len() != names.len() {
            bail!(
                "line {}: {} fields but the header names {}",
                line_no + 1,
                row.len(),
                names.len()
            );
        }
        rows.push(row);
    }

    SourceTable::from_rows(names, rows)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names, one source per record.
fn load_csv(path: &Path) -> Result<SourceTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(|v| CellValue::guess(v.trim())).collect());
    }

    SourceTable::from_rows(headers, rows)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet catalog.  Every top-level scalar column becomes a table
/// column; nested columns are carried as their type name.
fn load_parquet(path: &Path) -> Result<SourceTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let mut columns: Vec<Column> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| Column::new(f.name().clone(), Vec::new()))
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, column) in columns.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                column.values.push(extract_cell(array, row));
            }
        }
    }

    SourceTable::new(columns)
}

// -- Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => any
            .downcast_ref::<Int8Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int16 => any
            .downcast_ref::<Int16Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row))),
        DataType::UInt8 => any
            .downcast_ref::<UInt8Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row) as i64)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map_or(CellValue::Null, |a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map_or(CellValue::Null, |a| CellValue::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map_or(CellValue::Null, |a| CellValue::Bool(a.value(row))),
        other => CellValue::String(format!("{other:?}")),
    }
}
