use std::fs;
use std::path::Path;

use fitsio::FitsFile;
use survey_tools::data::fits::write_bintable;
use survey_tools::region::writer::GLOBAL_STYLE;
use survey_tools::{CellValue, Column, ExportError, SourceTable, export_from_catalog, export_from_text_list};
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_catalog(dir: &Path, name: &str, table: &SourceTable) -> std::path::PathBuf {
    let path = dir.join(name);
    write_bintable(&path, table).unwrap();
    path
}

/// Set `TZEROn` on an already written table so stored integers read shifted.
fn set_offset(path: &Path, column_number: usize, zero: f64) {
    let mut fptr = FitsFile::edit(path).unwrap();
    let hdu = fptr.hdu(1).unwrap();
    hdu.write_key(&mut fptr, &format!("TZERO{column_number}"), zero)
        .unwrap();
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn catalog_export_writes_header_and_one_circle_per_row() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let table = SourceTable::new(vec![
        Column::new("ID", vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(3)]),
        Column::floats("RA_J2000", [150.0, 10.684708, 0.0]),
        Column::floats("DEC_J2000", [-30.0, 41.26875, 0.0]),
    ])
    .unwrap();
    let input = write_catalog(dir.path(), "field.gst.fits", &table);

    let summary = export_from_catalog(&input, None, None).unwrap();

    let out = dir.path().join("field.gst.reg");
    assert_eq!(summary.output_path, out);
    assert_eq!(summary.markers, 3);
    assert_eq!(summary.highlighted, 0);

    let lines = lines(&out);
    assert_eq!(lines.len(), 3 + 2);
    assert_eq!(lines[0], GLOBAL_STYLE);
    assert_eq!(lines[1], "fk5");
    assert_eq!(lines[2], "circle(10:00:00.000,-30:00:00.000,0.1\")");
    assert_eq!(lines[3], "circle(0:42:44.330,41:16:07.500,0.1\")");
    assert_eq!(lines[4], "circle(0:00:00.000,0:00:00.000,0.1\")");
    assert_eq!(lines.iter().filter(|l| l.starts_with("circle(")).count(), 3);
}

#[test]
fn catalog_export_colors_rows_above_threshold() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let table = SourceTable::new(vec![
        Column::floats("RA", [150.0, 150.0]),
        Column::floats("DEC", [-30.0, -30.0]),
        Column::floats("MAG", [1.0, 5.0]),
    ])
    .unwrap();
    let input = write_catalog(dir.path(), "cat.fits", &table);

    let summary = export_from_catalog(&input, Some("MAG"), Some(3.0)).unwrap();
    assert_eq!(summary.highlighted, 1);

    let lines = lines(&summary.output_path);
    assert!(!lines[2].contains("color="));
    assert!(lines[3].ends_with("# color=magenta"));
}

#[test]
fn color_column_without_threshold_uses_default_color() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let table = SourceTable::new(vec![
        Column::floats("RA", [1.0]),
        Column::floats("DEC", [2.0]),
        Column::floats("MAG", [99.0]),
    ])
    .unwrap();
    let input = write_catalog(dir.path(), "cat.fits", &table);

    let summary = export_from_catalog(&input, Some("MAG"), None).unwrap();
    assert_eq!(summary.highlighted, 0);
}

#[test]
fn catalog_without_dec_column_is_a_schema_error() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let table = SourceTable::new(vec![Column::floats("RA", [1.0]), Column::floats("MAG", [2.0])])
        .unwrap();
    let input = write_catalog(dir.path(), "cat.fits", &table);

    let err = export_from_catalog(&input, None, None).unwrap_err();
    assert!(matches!(err, ExportError::MissingColumn { .. }), "{err}");
    assert!(!dir.path().join("cat.reg").exists());
}

#[test]
fn unreadable_catalog_is_a_table_error() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.fits");
    fs::write(&input, "this is not FITS").unwrap();

    let err = export_from_catalog(&input, None, None).unwrap_err();
    assert!(matches!(err, ExportError::Table { .. }), "{err}");
}

#[test]
fn csv_catalog_is_accepted() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cat.csv");
    fs::write(&input, "ra,dec\n150.0,-30.0\n").unwrap();

    let summary = export_from_catalog(&input, None, None).unwrap();
    assert_eq!(summary.output_path, dir.path().join("cat.reg"));
    assert_eq!(lines(&summary.output_path)[2], "circle(10:00:00.000,-30:00:00.000,0.1\")");
}

#[test]
fn text_list_export_uses_image_frame() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ast_input.txt");
    fs::write(&input, "X Y F475W\n100.5 200.25 24.0\n512.0 7 29.5\n").unwrap();

    let summary = export_from_text_list(&input, Some("F475W"), Some(25.0)).unwrap();

    assert_eq!(summary.output_path, dir.path().join("ast_input.reg"));
    let lines = lines(&summary.output_path);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], GLOBAL_STYLE);
    assert_eq!(lines[1], "image");
    assert_eq!(lines[2], "circle(100.5,200.25,0.1\")");
    assert_eq!(lines[3], "circle(512.0,7,0.1\") # color=magenta");
}

#[test]
fn text_list_needs_exact_x_and_y() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ast.txt");
    fs::write(&input, "x y\n1 2\n").unwrap();

    let err = export_from_text_list(&input, None, None).unwrap_err();
    assert!(matches!(err, ExportError::MissingColumn { .. }));
}

#[test]
fn failed_export_keeps_existing_region_file() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ast.txt");
    fs::write(&input, "X Y\n1 2\nn/a 3\n").unwrap();
    let out = dir.path().join("ast.reg");
    fs::write(&out, "old\n").unwrap();

    let err = export_from_text_list(&input, None, None).unwrap_err();
    assert!(matches!(err, ExportError::NonNumeric { row: 1, .. }), "{err}");
    assert_eq!(fs::read_to_string(&out).unwrap(), "old\n");
}

#[test]
fn catalog_with_unsigned_integer_columns() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let table = SourceTable::new(vec![
        Column::new(
            "SOURCE_ID",
            vec![CellValue::Integer(0), CellValue::Integer(12345)],
        ),
        Column::floats("RA", [150.0, 10.684708]),
        Column::floats("DEC", [-30.0, 41.26875]),
        // Stored counts 5 and 40000 under the unsigned 16-bit offset.
        Column::new(
            "COUNTS",
            vec![CellValue::Integer(5 - 32768), CellValue::Integer(40000 - 32768)],
        ),
    ])
    .unwrap();
    let input = write_catalog(dir.path(), "ids.fits", &table);
    set_offset(&input, 1, 9223372036854775808.0);
    set_offset(&input, 4, 32768.0);

    let summary = export_from_catalog(&input, Some("COUNTS"), Some(100.0)).unwrap();
    assert_eq!((summary.markers, summary.highlighted), (2, 1));

    let lines = lines(&summary.output_path);
    assert_eq!(lines[2], "circle(10:00:00.000,-30:00:00.000,0.1\")");
    assert_eq!(lines[3], "circle(0:42:44.330,41:16:07.500,0.1\") # color=magenta");
}

#[test]
fn null_color_cell_is_rejected_before_writing() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cat.csv");
    fs::write(&input, "ra,dec,mag\n150.0,-30.0,21.0\n150.0,-30.0,\n").unwrap();

    let err = export_from_catalog(&input, Some("mag"), Some(22.0)).unwrap_err();
    assert!(matches!(err, ExportError::NonNumeric { ref column, row: 1, .. } if column == "mag"), "{err}");
    assert!(!dir.path().join("cat.reg").exists());
}

#[test]
fn text_color_cell_is_rejected_on_fits_catalog() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let table = SourceTable::new(vec![
        Column::floats("RA", [150.0, 150.0]),
        Column::floats("DEC", [-30.0, -30.0]),
        Column::new(
            "QUALITY",
            vec![CellValue::String("good".into()), CellValue::String("poor".into())],
        ),
    ])
    .unwrap();
    let input = write_catalog(dir.path(), "cat.fits", &table);

    let err = export_from_catalog(&input, Some("QUALITY"), Some(1.0)).unwrap_err();
    assert!(matches!(err, ExportError::NonNumeric { row: 0, .. }), "{err}");
    assert!(!dir.path().join("cat.reg").exists());
}
