use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{ColumnMapping, Dataset, Record};

// ---------------------------------------------------------------------------
// Typed loader failures
// ---------------------------------------------------------------------------

/// Why a row or column could not be turned into a [`Record`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("missing column '{0}'")]
    MissingColumn(String),
    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    #[error("row {row}: column '{column}' is null")]
    NullValue { row: usize, column: String },
    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, the mapped columns must be present
/// * `.json`    – `[{ "genre": "Action", "year": 2000, "gross": 1.5e8 }, ...]`
/// * `.parquet` – flat columns, as written by `df.to_parquet()`
///
/// Any malformed row fails the whole load.
pub fn load_file(path: &Path, columns: &ColumnMapping) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path, columns),
        "json" => load_json(path, columns),
        "parquet" | "pq" => load_parquet(path, columns),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path, columns: &ColumnMapping) -> Result<Vec<Record>> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader, columns)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>, columns: &ColumnMapping) -> Result<Vec<Record>> {
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };
    let cat_idx = position(&columns.category)?;
    let year_idx = position(&columns.year)?;
    let value_idx = position(&columns.value)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let field = |idx: usize| row.get(idx).unwrap_or("").trim();

        let category = field(cat_idx);
        if category.is_empty() {
            return Err(LoadError::NullValue {
                row: row_no,
                column: columns.category.clone(),
            }
            .into());
        }
        let year = parse_year(field(year_idx), row_no, &columns.year)?;
        let value = parse_value(field(value_idx), row_no, &columns.value)?;

        records.push(Record::new(category, year, value));
    }
    Ok(records)
}

/// Years may come through as `2000` or `2000.0` depending on the writer.
fn parse_year(s: &str, row: usize, column: &str) -> Result<i64, LoadError> {
    if let Ok(y) = s.parse::<i64>() {
        return Ok(y);
    }
    match s.parse::<f64>() {
        Ok(f) => whole_to_i64(f).ok_or_else(|| LoadError::InvalidValue {
            row,
            column: column.to_string(),
            value: s.to_string(),
        }),
        Err(_) => Err(LoadError::InvalidValue {
            row,
            column: column.to_string(),
            value: s.to_string(),
        }),
    }
}

/// A float that is a whole number inside the `i64` range.
fn whole_to_i64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn parse_value(s: &str, row: usize, column: &str) -> Result<f64, LoadError> {
    s.parse::<f64>().map_err(|_| LoadError::InvalidValue {
        row,
        column: column.to_string(),
        value: s.to_string(),
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`).
fn load_json(path: &Path, columns: &ColumnMapping) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text, columns)
}

fn parse_json(text: &str, columns: &ColumnMapping) -> Result<Vec<Record>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| -> Result<Record> {
            let obj = row
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            let invalid = |name: &str, v: &JsonValue| LoadError::InvalidValue {
                row: i,
                column: name.to_string(),
                value: v.to_string(),
            };

            let cat = json_field(obj, i, &columns.category)?;
            let category = cat.as_str().ok_or_else(|| invalid(&columns.category, cat))?;

            let year_v = json_field(obj, i, &columns.year)?;
            let year = year_v
                .as_i64()
                .or_else(|| year_v.as_f64().and_then(whole_to_i64))
                .ok_or_else(|| invalid(&columns.year, year_v))?;

            let value_v = json_field(obj, i, &columns.value)?;
            let value = value_v.as_f64().ok_or_else(|| invalid(&columns.value, value_v))?;

            Ok(Record::new(category, year, value))
        })
        .collect()
}

fn json_field<'a>(
    obj: &'a serde_json::Map<String, JsonValue>,
    row: usize,
    name: &str,
) -> Result<&'a JsonValue, LoadError> {
    match obj.get(name) {
        None => Err(LoadError::MissingColumn(name.to_string())),
        Some(JsonValue::Null) => Err(LoadError::NullValue {
            row,
            column: name.to_string(),
        }),
        Some(v) => Ok(v),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat category / year / value columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path, columns: &ColumnMapping) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut row_offset = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let column = |name: &str| {
            schema
                .index_of(name)
                .map(|i| batch.column(i))
                .map_err(|_| LoadError::MissingColumn(name.to_string()))
        };
        let cat_col = column(&columns.category)?;
        let year_col = column(&columns.year)?;
        let value_col = column(&columns.value)?;

        for row in 0..batch.num_rows() {
            let abs = row_offset + row;
            let category = extract_string(cat_col, row, abs, &columns.category)?;
            let year = extract_year(year_col, row, abs, &columns.year)?;
            let value = extract_value(value_col, row, abs, &columns.value)?;
            records.push(Record::new(category, year, value));
        }
        row_offset += batch.num_rows();
    }

    Ok(records)
}

// -- Arrow helpers --

fn null_check(col: &Arc<dyn Array>, row: usize, abs: usize, name: &str) -> Result<(), LoadError> {
    if col.is_null(row) {
        return Err(LoadError::NullValue {
            row: abs,
            column: name.to_string(),
        });
    }
    Ok(())
}

fn unsupported(col: &Arc<dyn Array>, name: &str) -> LoadError {
    LoadError::UnsupportedColumnType {
        column: name.to_string(),
        data_type: format!("{:?}", col.data_type()),
    }
}

fn extract_string(col: &Arc<dyn Array>, row: usize, abs: usize, name: &str) -> Result<String, LoadError> {
    null_check(col, row, abs, name)?;
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        _ => Err(unsupported(col, name)),
    }
}

fn extract_year(col: &Arc<dyn Array>, row: usize, abs: usize, name: &str) -> Result<i64, LoadError> {
    null_check(col, row, abs, name)?;
    match col.data_type() {
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| i64::from(a.value(row)))
            .ok_or_else(|| unsupported(col, name)),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row))
            .ok_or_else(|| unsupported(col, name)),
        _ => Err(unsupported(col, name)),
    }
}

fn extract_value(col: &Arc<dyn Array>, row: usize, abs: usize, name: &str) -> Result<f64, LoadError> {
    null_check(col, row, abs, name)?;
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| f64::from(a.value(row))),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| f64::from(a.value(row))),
        _ => None,
    };
    value.ok_or_else(|| unsupported(col, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::array::StringArray;
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    fn write_temp(ext: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_csv() {
        let file = write_temp(
            "csv",
            "genre,year,gross,note\nAction,2000,100,a\nAction,2000,50.5,b\nDrama,2001,30,\n",
        );
        let ds = load_file(file.path(), &ColumnMapping::default()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[1], Record::new("Action", 2000, 50.5));
        assert_eq!(ds.year_bounds, Some((2000, 2001)));
    }

    #[test]
    fn test_load_csv_with_custom_mapping() {
        let file = write_temp("csv", "segment,yr,speed\nA,2024,55.0\n");
        let mapping = ColumnMapping {
            category: "segment".to_string(),
            year: "yr".to_string(),
            value: "speed".to_string(),
        };
        let ds = load_file(file.path(), &mapping).unwrap();
        assert_eq!(ds.records, vec![Record::new("A", 2024, 55.0)]);
    }

    #[test]
    fn test_csv_missing_column_is_fatal() {
        let file = write_temp("csv", "genre,year\nAction,2000\n");
        let err = load_file(file.path(), &ColumnMapping::default()).unwrap_err();
        let typed = err.downcast_ref::<LoadError>().unwrap();
        assert!(matches!(typed, LoadError::MissingColumn(c) if c == "gross"));
    }

    #[test]
    fn test_csv_bad_number_is_fatal() {
        let file = write_temp("csv", "genre,year,gross\nAction,2000,100\nDrama,2001,lots\n");
        let err = load_file(file.path(), &ColumnMapping::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::InvalidValue { row: 1, .. })
        ));
    }

    #[test]
    fn test_year_accepts_integral_float() {
        assert_eq!(parse_year("2000.0", 0, "year").unwrap(), 2000);
        assert!(parse_year("2000.5", 0, "year").is_err());
    }

    #[test]
    fn test_year_out_of_i64_range_is_invalid() {
        assert!(matches!(
            parse_year("1e20", 3, "year"),
            Err(LoadError::InvalidValue { row: 3, .. })
        ));
        let err = parse_json(r#"[{"genre":"Action","year":1e20,"gross":1}]"#, &ColumnMapping::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::InvalidValue { row: 0, .. })
        ));
    }

    #[test]
    fn test_load_json() {
        let file = write_temp(
            "json",
            r#"[{"genre":"Action","year":2000,"gross":100},{"genre":"Drama","year":2001.0,"gross":30.5}]"#,
        );
        let ds = load_file(file.path(), &ColumnMapping::default()).unwrap();
        assert_eq!(
            ds.records,
            vec![Record::new("Action", 2000, 100.0), Record::new("Drama", 2001, 30.5)]
        );
    }

    #[test]
    fn test_json_null_is_fatal() {
        let err = parse_json(r#"[{"genre":"Action","year":null,"gross":1}]"#, &ColumnMapping::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::NullValue { row: 0, .. })
        ));
    }

    #[test]
    fn test_load_parquet() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("genre", DataType::Utf8, false),
            Field::new("year", DataType::Int32, false),
            Field::new("gross", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Action", "Drama"])),
                Arc::new(Int32Array::from(vec![2000, 2001])),
                Arc::new(Float64Array::from(vec![150.0, 30.0])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path(), &ColumnMapping::default()).unwrap();
        assert_eq!(
            ds.records,
            vec![Record::new("Action", 2000, 150.0), Record::new("Drama", 2001, 30.0)]
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp("xlsx", "");
        assert!(load_file(file.path(), &ColumnMapping::default()).is_err());
    }
}
