use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Column, Entity};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load census rows from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – numeric columns named like the `census` table
/// * `.json`    – `[{ "gini_index": 0.45, ... }, ...]`
/// * `.csv`     – header row with the four column names
///
/// Display names ("Median Family Income") work everywhere the database
/// names do. Extra columns are ignored.
pub fn load_file(path: &Path) -> Result<Vec<Entity>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<Entity>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let entities: Vec<Entity> = serde_json::from_str(&text).context("parsing JSON records")?;
    Ok(entities)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<Entity>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let entities = reader
        .deserialize::<Entity>()
        .enumerate()
        .map(|(row_no, record)| record.with_context(|| format!("CSV row {row_no}")))
        .collect::<Result<Vec<_>>>()?;
    Ok(entities)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by **Pandas** (`df.to_parquet()`), **Polars**
/// and the `generate_sample` binary. Integer columns are widened to `f64`.
fn load_parquet(path: &Path) -> Result<Vec<Entity>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut entities = Vec::new();
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        // Column::ALL order: gini, vacant, unemployed, income
        let mut cols = Vec::with_capacity(Column::ALL.len());
        for column in Column::ALL {
            let idx = schema
                .fields()
                .iter()
                .position(|f| Column::from_name(f.name()) == Some(column))
                .with_context(|| format!("Parquet file missing '{}' column", column.db_name()))?;
            cols.push(batch.column(idx));
        }

        for row in 0..batch.num_rows() {
            let row_no = offset + row;
            let mut values = [0.0; 4];
            for (slot, (col, column)) in values.iter_mut().zip(cols.iter().zip(Column::ALL)) {
                *slot = extract_f64(col, row).with_context(|| {
                    format!("Row {row_no}: failed to read '{}'", column.db_name())
                })?;
            }
            let [gini_index, vacant_housing, percent_unemployed, median_family_income] = values;
            entities.push(Entity {
                gini_index,
                vacant_housing,
                percent_unemployed,
                median_family_income,
            });
        }
        offset += batch.num_rows();
    }

    Ok(entities)
}

// -- Parquet / Arrow helpers --

/// Read a numeric cell as `f64`.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    value.context("column type does not match its declared data type")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::array::StringArray;
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_with_database_names() {
        let file = write_temp(
            ".csv",
            "county,gini_index,vacant_housing,percent_unemployed,median_family_income\n\
             Adams,0.41,812,4.2,58000\n\
             Brown,0.47,300,6.1,45250.5\n",
        );
        let rows = load_file(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].median_family_income, 45250.5);
        assert_eq!(rows[0].vacant_housing, 812.0);
    }

    #[test]
    fn csv_with_display_names() {
        let file = write_temp(
            ".csv",
            "Gini Index,Vacant Housing,Percent Unemployed,Median Family Income\n0.4,10,3.5,70000\n",
        );
        let rows = load_file(file.path()).unwrap();
        assert_eq!(rows[0].percent_unemployed, 3.5);
    }

    #[test]
    fn csv_with_blank_cell_reports_the_row() {
        let file = write_temp(
            ".csv",
            "gini_index,vacant_housing,percent_unemployed,median_family_income\n0.4,10,3.5,70000\n0.5,,2.0,1\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 1"));
    }

    #[test]
    fn json_records() {
        let file = write_temp(
            ".json",
            r#"[{"gini_index": 0.39, "vacant_housing": 55, "percent_unemployed": 7.0, "median_family_income": 39999}]"#,
        );
        let rows = load_file(file.path()).unwrap();
        assert_eq!(rows[0].gini_index, 0.39);
    }

    #[test]
    fn parquet_with_mixed_numeric_types() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("county", DataType::Utf8, false),
            Field::new("gini_index", DataType::Float64, false),
            Field::new("vacant_housing", DataType::Int64, false),
            Field::new("percent_unemployed", DataType::Float32, false),
            Field::new("Median Family Income", DataType::Int32, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Adams", "Brown"])),
                Arc::new(Float64Array::from(vec![0.41, 0.47])),
                Arc::new(Int64Array::from(vec![812, 300])),
                Arc::new(Float32Array::from(vec![4.5, 6.0])),
                Arc::new(Int32Array::from(vec![58000, 45250])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let rows = load_file(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].vacant_housing, 812.0);
        assert_eq!(rows[0].percent_unemployed, 4.5);
        assert_eq!(rows[1].median_family_income, 45250.0);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp(".xlsx", "");
        assert!(load_file(file.path()).is_err());
    }
}
