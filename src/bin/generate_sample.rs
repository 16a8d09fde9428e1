use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Number of US counties in the 2017 ACS 5-year release.
const COUNTIES: usize = 3142;

/// One synthetic county. The CSV header uses the display names so the
/// loader's aliases get exercised; the Parquet file uses the table names.
#[derive(Debug, Serialize)]
struct County {
    #[serde(rename = "County")]
    name: String,
    #[serde(rename = "Gini Index")]
    gini_index: f64,
    #[serde(rename = "Vacant Housing")]
    vacant_housing: f64,
    #[serde(rename = "Percent Unemployed")]
    percent_unemployed: f64,
    #[serde(rename = "Median Family Income")]
    median_family_income: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Income is log-normal; unemployment falls and inequality rises slightly
/// as income drops, so the per-quartile fits have visible slopes.
fn generate_county(index: usize, rng: &mut SimpleRng) -> County {
    let income = rng.gauss(11.0, 0.24).exp().clamp(20_000.0, 200_000.0);
    let relative = (income / 60_000.0).ln();

    let unemployment = rng.gauss(6.0 - 4.0 * relative, 1.6).max(0.3);
    let gini = rng.gauss(0.445 - 0.02 * relative, 0.035).clamp(0.2, 0.7);
    let vacant = rng.gauss(7.2, 1.1).exp().round().max(0.0);

    County {
        name: format!("County {:04}", index + 1),
        gini_index: round_to(gini, 4),
        vacant_housing: vacant,
        percent_unemployed: round_to(unemployment, 1),
        median_family_income: income.round(),
    }
}

fn write_csv(path: &Path, counties: &[County]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for county in counties {
        writer.serialize(county)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, counties: &[County]) -> Result<()> {
    let column = |f: fn(&County) -> f64| -> Float64Array {
        counties.iter().map(|c| Some(f(c))).collect()
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("county", DataType::Utf8, false),
        Field::new("gini_index", DataType::Float64, false),
        Field::new("vacant_housing", DataType::Float64, false),
        Field::new("percent_unemployed", DataType::Float64, false),
        Field::new("median_family_income", DataType::Float64, false),
    ]));

    let names = StringArray::from(counties.iter().map(|c| c.name.as_str()).collect::<Vec<_>>());
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(names),
            Arc::new(column(|c| c.gini_index)),
            Arc::new(column(|c| c.vacant_housing)),
            Arc::new(column(|c| c.percent_unemployed)),
            Arc::new(column(|c| c.median_family_income)),
        ],
    )
    .context("Failed to create RecordBatch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut rng = SimpleRng::new(2017);
    let counties: Vec<County> = (0..COUNTIES).map(|i| generate_county(i, &mut rng)).collect();

    let csv_path = out_dir.join("census_sample.csv");
    write_csv(&csv_path, &counties)?;

    let parquet_path = out_dir.join("census_sample.parquet");
    write_parquet(&parquet_path, &counties)?;

    println!(
        "Wrote {} counties to {} and {}",
        counties.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
