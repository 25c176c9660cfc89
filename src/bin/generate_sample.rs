use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use survey_tools::data::fits;
use survey_tools::{Column, SourceTable};

/// Minimal deterministic PRNG (splitmix64)
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        low + (high - low) * unit
    }
}

/// Sources scattered over a small field around M31.
fn sky_catalog(rng: &mut SimpleRng, n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut ra = Vec::with_capacity(n);
    let mut dec = Vec::with_capacity(n);
    let mut mag = Vec::with_capacity(n);
    for _ in 0..n {
        ra.push(rng.uniform(10.60, 10.75));
        dec.push(rng.uniform(41.20, 41.32));
        mag.push(rng.uniform(20.0, 28.0));
    }
    (ra, dec, mag)
}

fn write_parquet(path: &Path, ra: &[f64], dec: &[f64], mag: &[f64]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("RA", DataType::Float64, false),
        Field::new("DEC", DataType::Float64, false),
        Field::new("F475W_VEGA", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(ra.to_vec())),
            Arc::new(Float64Array::from(dec.to_vec())),
            Arc::new(Float64Array::from(mag.to_vec())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Artificial-star list in detector pixels, the layout of an AST input file.
fn write_ast_list(path: &Path, rng: &mut SimpleRng, n: usize) -> Result<()> {
    let mut text = String::from("X Y F475W\n");
    for _ in 0..n {
        let x = rng.uniform(0.0, 4096.0);
        let y = rng.uniform(0.0, 4096.0);
        let mag = rng.uniform(20.0, 30.0);
        text.push_str(&format!("{x:.2} {y:.2} {mag:.3}\n"));
    }
    std::fs::write(path, text).context("writing AST list")
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    std::fs::create_dir_all(&out_dir).context("creating output directory")?;

    let mut rng = SimpleRng::new(42);
    let (ra, dec, mag) = sky_catalog(&mut rng, 500);

    let table = SourceTable::new(vec![
        Column::floats("RA", ra.iter().copied()),
        Column::floats("DEC", dec.iter().copied()),
        Column::floats("F475W_VEGA", mag.iter().copied()),
    ])?;
    let fits_path = out_dir.join("sample_catalog.fits");
    fits::write_bintable(&fits_path, &table)?;

    let parquet_path = out_dir.join("sample_catalog.parquet");
    write_parquet(&parquet_path, &ra, &dec, &mag)?;

    let ast_path = out_dir.join("sample_ast.txt");
    write_ast_list(&ast_path, &mut rng, 200)?;

    println!(
        "Wrote {} catalog sources to {} and {}, 200 artificial stars to {}",
        table.len(),
        fits_path.display(),
        parquet_path.display(),
        ast_path.display()
    );
    Ok(())
}
