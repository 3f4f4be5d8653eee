use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use arrow::array::{Array, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::Dataset;
use crate::error::{Result, TrellisError};

/// Columns as parsed from a file, before the objective is checked.
type Columns = Vec<(String, Vec<f64>)>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tuning-result table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `{ "col": { "0": v, "1": v, ... }, ... }` (pandas
///   `orient='columns'`), `{ "col": [v, ...] }`, or `[{ "col": v }, ...]`
/// * `.csv`     – header row, one numeric column per parameter
/// * `.parquet` – flat numeric columns
///
/// The objective column must be present; it is checked before the dataset
/// is handed out.
pub fn load_file(path: &Path, objective: &str) -> Result<Dataset> {
    let columns = read_columns(path).map_err(|source| TrellisError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = Dataset::from_columns(columns, objective)?;
    log::info!(
        "Loaded {} records with columns {:?} from \"{}\"",
        dataset.len(),
        dataset.column_names(),
        path.display()
    );
    Ok(dataset)
}

fn read_columns(path: &Path) -> anyhow::Result<Columns> {
    if !path.is_file() {
        bail!("file does not exist or is not a regular file");
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let columns = match ext.as_str() {
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    if let Some(((first, n_rows), (name, len))) = columns.split_first().and_then(|(first, rest)| {
        let n_rows = first.1.len();
        rest.iter()
            .find(|(_, v)| v.len() != n_rows)
            .map(|(name, v)| ((&first.0, n_rows), (name, v.len())))
    }) {
        bail!("column '{name}' has {len} rows but '{first}' has {n_rows}");
    }
    Ok(columns)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> anyhow::Result<Columns> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    match root {
        JsonValue::Object(obj) => json_columns(&obj),
        JsonValue::Array(records) => json_records(&records),
        _ => bail!("Expected a top-level JSON object or array"),
    }
}

/// Column-oriented JSON: every column is either an index-keyed object
/// (the pandas default) or a plain array.
fn json_columns(obj: &Map<String, JsonValue>) -> anyhow::Result<Columns> {
    let mut row_keys: Option<Vec<String>> = None;
    let mut columns = Vec::with_capacity(obj.len());

    for (name, col) in obj {
        let values = match col {
            JsonValue::Array(arr) => arr
                .iter()
                .enumerate()
                .map(|(row, v)| json_to_f64(v, row, name))
                .collect::<anyhow::Result<Vec<_>>>()?,
            JsonValue::Object(cells) => {
                let keys = row_keys.get_or_insert_with(|| sorted_row_keys(cells));
                keys.iter()
                    .enumerate()
                    .map(|(row, key)| {
                        let cell = cells
                            .get(key)
                            .with_context(|| format!("Column '{name}' has no row '{key}'"))?;
                        json_to_f64(cell, row, name)
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?
            }
            _ => bail!("Column '{name}' is neither an array nor an object"),
        };
        columns.push((name.clone(), values));
    }

    Ok(columns)
}

/// Row keys sorted as integers when they all are, lexically otherwise.
fn sorted_row_keys(cells: &Map<String, JsonValue>) -> Vec<String> {
    let mut keys: Vec<String> = cells.keys().cloned().collect();
    if keys.iter().all(|k| k.parse::<i64>().is_ok()) {
        keys.sort_by_key(|k| k.parse::<i64>().unwrap_or_default());
    } else {
        keys.sort();
    }
    keys
}

/// Records-oriented JSON: `[{ "col": v, ... }, ...]`.  A key absent from a
/// record reads as NaN.
fn json_records(records: &[JsonValue]) -> anyhow::Result<Columns> {
    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let mut columns: Columns = names
        .into_iter()
        .map(|n| (n, Vec::with_capacity(records.len())))
        .collect();

    for (row, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {row} is not a JSON object"))?;
        for (name, values) in &mut columns {
            let v = match obj.get(name.as_str()) {
                Some(cell) => json_to_f64(cell, row, name)?,
                None => f64::NAN,
            };
            values.push(v);
        }
    }

    Ok(columns)
}

fn json_to_f64(val: &JsonValue, row: usize, col: &str) -> anyhow::Result<f64> {
    match val {
        JsonValue::Number(n) => n
            .as_f64()
            .with_context(|| format!("Row {row}, '{col}': {n} is not representable as f64")),
        JsonValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        JsonValue::Null => Ok(f64::NAN),
        other => bail!("Row {row}, '{col}': {other} is not a number"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every cell numeric.
/// Empty cells read as NaN.
fn load_csv(path: &Path) -> anyhow::Result<Columns> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let mut columns: Columns = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| (h.trim().to_string(), Vec::new()))
        .collect();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != columns.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, found {}",
                columns.len(),
                record.len()
            );
        }

        for ((name, values), cell) in columns.iter_mut().zip(record.iter()) {
            let cell = cell.trim();
            let v = if cell.is_empty() {
                f64::NAN
            } else {
                cell.parse::<f64>()
                    .with_context(|| format!("Row {row_no}, '{name}': '{cell}' is not a number"))?
            };
            values.push(v);
        }
    }

    Ok(columns)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file whose columns are all flat numerics
/// (Float64, Float32, Int64, Int32 or Boolean).
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> anyhow::Result<Columns> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let mut columns: Columns = builder
        .schema()
        .fields()
        .iter()
        .map(|f| (f.name().clone(), Vec::new()))
        .collect();

    let reader = builder.build().context("building parquet reader")?;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (idx, (name, values)) in columns.iter_mut().enumerate() {
            append_numeric(batch.column(idx), values)
                .with_context(|| format!("Column '{name}'"))?;
        }
    }

    Ok(columns)
}

// -- Parquet / Arrow helpers --

/// Append every row of a flat numeric Arrow column; nulls become NaN.
fn append_numeric(col: &Arc<dyn Array>, out: &mut Vec<f64>) -> anyhow::Result<()> {
    macro_rules! extend {
        ($ty:ty, $conv:expr) => {{
            let arr = col
                .as_any()
                .downcast_ref::<$ty>()
                .with_context(|| format!("expected {}", stringify!($ty)))?;
            out.extend(arr.iter().map(|v| v.map_or(f64::NAN, $conv)));
        }};
    }

    match col.data_type() {
        DataType::Float64 => extend!(Float64Array, |v| v),
        DataType::Float32 => extend!(Float32Array, |v| v as f64),
        DataType::Int64 => extend!(Int64Array, |v| v as f64),
        DataType::Int32 => extend!(Int32Array, |v| v as f64),
        DataType::Boolean => extend!(BooleanArray, |v| if v { 1.0 } else { 0.0 }),
        other => bail!("unsupported column type {other:?}, expected a flat numeric type"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_pandas_columns_json_in_numeric_row_order() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "results.json",
            r#"{
                "block_size_x": {"0": 16, "1": 32, "10": 64, "2": 128},
                "time": {"2": 4.0, "0": 1.5, "10": 3.0, "1": 2.5}
            }"#,
        );

        let ds = load_file(&path, "time").unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.column("block_size_x").unwrap(), &[16.0, 32.0, 128.0, 64.0]);
        assert_eq!(ds.objective_values(), &[1.5, 2.5, 4.0, 3.0]);
    }

    #[test]
    fn loads_array_columns_and_records_json() {
        let dir = TempDir::new().unwrap();
        let arrays = write(&dir, "a.json", r#"{"a": [1, 2], "time": [0.5, null]}"#);
        let ds = load_file(&arrays, "time").unwrap();
        assert_eq!(ds.column("a").unwrap(), &[1.0, 2.0]);
        assert!(ds.objective_values()[1].is_nan());

        let records = write(
            &dir,
            "r.json",
            r#"[{"a": 1, "time": 2.0}, {"a": 3, "time": 4.0, "flag": true}]"#,
        );
        let ds = load_file(&records, "time").unwrap();
        assert_eq!(ds.len(), 2);
        assert!(ds.column("flag").unwrap()[0].is_nan());
        assert_eq!(ds.column("flag").unwrap()[1], 1.0);
    }

    #[test]
    fn non_numeric_json_cell_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.json", r#"{"a": ["x"], "time": [1.0]}"#);
        let err = load_file(&path, "time").unwrap_err();
        assert!(matches!(err, TrellisError::Load { .. }));
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn loads_csv() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "results.csv", "a,b,time\n1,10,5\n1,20,\n2,10,8\n");
        let ds = load_file(&path, "time").unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column("b").unwrap(), &[10.0, 20.0, 10.0]);
        assert!(ds.objective_values()[1].is_nan());
    }

    #[test]
    fn loads_parquet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("a", DataType::Int64, false),
            Field::new("time", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3])),
                Arc::new(Float64Array::from(vec![Some(0.5), None, Some(1.5)])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path, "time").unwrap();
        assert_eq!(ds.column("a").unwrap(), &[1.0, 2.0, 3.0]);
        assert!(ds.objective_values()[1].is_nan());
    }

    #[test]
    fn ragged_columns_are_a_load_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "ragged.json", r#"{"a": [1, 2, 3], "time": [0.5, 0.25]}"#);
        match load_file(&path, "time").unwrap_err() {
            TrellisError::Load { source, .. } => {
                assert_eq!(source.to_string(), "column 'time' has 2 rows but 'a' has 3");
            }
            other => panic!("expected a load error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let err = load_file(&dir.path().join("nope.json"), "time").unwrap_err();
        assert!(matches!(err, TrellisError::Load { .. }));
    }

    #[test]
    fn missing_objective_is_reported_after_parsing() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "results.csv", "a,b\n1,2\n");
        let err = load_file(&path, "time").unwrap_err();
        assert!(matches!(err, TrellisError::MissingObjective(_)));
    }

    #[test]
    fn unsupported_extension_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "results.txt", "a");
        assert!(matches!(
            load_file(&path, "time"),
            Err(TrellisError::Load { .. })
        ));
    }
}
