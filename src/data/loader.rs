use std::fs::File;
use std::path::Path;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Schema};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{
    LaunchDataset, LaunchRecord, COL_BOOSTER_CATEGORY, COL_LAUNCH_SITE, COL_OUTCOME,
    COL_PAYLOAD_MASS,
};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; the four required columns in any order
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – string site/category columns, numeric payload and class
///
/// Extra columns are ignored in every format.
pub fn load_file(path: &Path) -> Result<LaunchDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} launches from {} (sites: {:?}, payload {:?}..{:?} kg)",
        dataset.len(),
        path.display(),
        dataset.sites(),
        dataset.min_payload(),
        dataset.max_payload(),
    );
    if dataset.is_empty() {
        log::warn!("{} contains no launches; every chart will be empty", path.display());
    }
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// `class` must be exactly 0 or 1.
fn outcome_from_int(value: i64, row: usize) -> Result<u8, LoadError> {
    match value {
        0 => Ok(0),
        1 => Ok(1),
        other => Err(LoadError::invalid(row, COL_OUTCOME, other)),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<LaunchDataset, LoadError> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers = reader.headers()?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| LoadError::missing(name))
    };
    let site_idx = column(COL_LAUNCH_SITE)?;
    let payload_idx = column(COL_PAYLOAD_MASS)?;
    let booster_idx = column(COL_BOOSTER_CATEGORY)?;
    let outcome_idx = column(COL_OUTCOME)?;

    let mut records = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row_no = i + 1;
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let payload_raw = cell(payload_idx);
        let payload_mass_kg = if payload_raw.is_empty() {
            None
        } else {
            Some(
                payload_raw
                    .parse::<f64>()
                    .map_err(|_| LoadError::invalid(row_no, COL_PAYLOAD_MASS, payload_raw))?,
            )
        };

        let outcome_raw = cell(outcome_idx);
        let outcome = parse_csv_outcome(outcome_raw)
            .ok_or_else(|| LoadError::invalid(row_no, COL_OUTCOME, outcome_raw))
            .and_then(|v| outcome_from_int(v, row_no))?;

        records.push(LaunchRecord {
            launch_site: cell(site_idx).to_string(),
            payload_mass_kg,
            booster_version_category: cell(booster_idx).to_string(),
            outcome,
        });
    }

    Ok(LaunchDataset::from_records(records))
}

/// Accept `1`, `1.0` and the like; anything fractional is rejected.
fn parse_csv_outcome(s: &str) -> Option<i64> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    let f = s.parse::<f64>().ok()?;
    (f.fract() == 0.0).then_some(f as i64)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 525.0,
///     "Booster Version Category": "v1.0",
///     "class": 0
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<LaunchDataset, LoadError> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;

    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Layout("expected a top-level JSON array".to_string()))?;

    let mut records = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let i = idx + 1;
        let obj = row
            .as_object()
            .ok_or_else(|| LoadError::invalid(i, "<row>", row))?;

        let field = |name: &str| obj.get(name).ok_or_else(|| LoadError::missing(name));

        let launch_site = json_string(field(COL_LAUNCH_SITE)?, i, COL_LAUNCH_SITE)?;
        let booster_version_category =
            json_string(field(COL_BOOSTER_CATEGORY)?, i, COL_BOOSTER_CATEGORY)?;

        let payload_mass_kg = match field(COL_PAYLOAD_MASS)? {
            JsonValue::Null => None,
            v => Some(
                v.as_f64()
                    .ok_or_else(|| LoadError::invalid(i, COL_PAYLOAD_MASS, v))?,
            ),
        };

        let class = field(COL_OUTCOME)?;
        let outcome_int = class
            .as_i64()
            .or_else(|| class.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| LoadError::invalid(i, COL_OUTCOME, class))?;
        let outcome = outcome_from_int(outcome_int, i)?;

        records.push(LaunchRecord {
            launch_site,
            payload_mass_kg,
            booster_version_category,
            outcome,
        });
    }

    Ok(LaunchDataset::from_records(records))
}

fn json_string(val: &JsonValue, row: usize, col: &str) -> Result<String, LoadError> {
    match val {
        JsonValue::String(s) => Ok(s.clone()),
        other => Err(LoadError::invalid(row, col, other)),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the launch table.
///
/// Expected column types:
/// - `Launch Site`, `Booster Version Category`: Utf8 or LargeUtf8, plain or
///   dictionary-encoded (pandas `category` columns)
/// - `Payload Mass (kg)`: Float64/Float32/Int64/Int32, nullable
/// - `class`: Int64/Int32 or Boolean
fn load_parquet(path: &Path) -> Result<LaunchDataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;

    let schema = builder.schema().clone();
    let site_idx = column_index(&schema, COL_LAUNCH_SITE)?;
    let payload_idx = column_index(&schema, COL_PAYLOAD_MASS)?;
    let booster_idx = column_index(&schema, COL_BOOSTER_CATEGORY)?;
    let outcome_idx = column_index(&schema, COL_OUTCOME)?;

    let reader = builder.build()?;

    let mut records = Vec::new();
    let mut row_no = 1usize;

    for batch_result in reader {
        let batch = batch_result?;
        let site_col = &decode_dictionary(batch.column(site_idx))?;
        let payload_col = batch.column(payload_idx);
        let booster_col = &decode_dictionary(batch.column(booster_idx))?;
        let outcome_col = batch.column(outcome_idx);

        for row in 0..batch.num_rows() {
            let launch_site = string_at(site_col, row)
                .ok_or_else(|| LoadError::invalid(row_no, COL_LAUNCH_SITE, site_col.data_type()))?;
            let booster_version_category = string_at(booster_col, row).ok_or_else(|| {
                LoadError::invalid(row_no, COL_BOOSTER_CATEGORY, booster_col.data_type())
            })?;
            let payload_mass_kg = f64_at(payload_col, row).ok_or_else(|| {
                LoadError::invalid(row_no, COL_PAYLOAD_MASS, payload_col.data_type())
            })?;
            let outcome_int = int_at(outcome_col, row)
                .ok_or_else(|| LoadError::invalid(row_no, COL_OUTCOME, outcome_col.data_type()))?;

            records.push(LaunchRecord {
                launch_site,
                payload_mass_kg,
                booster_version_category,
                outcome: outcome_from_int(outcome_int, row_no)?,
            });
            row_no += 1;
        }
    }

    Ok(LaunchDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn column_index(schema: &Schema, name: &str) -> Result<usize, LoadError> {
    schema
        .index_of(name)
        .map_err(|_| LoadError::missing(name))
}

/// Expand a dictionary-encoded string column to plain Utf8; other
/// columns pass through untouched.
fn decode_dictionary(col: &ArrayRef) -> Result<ArrayRef, LoadError> {
    match col.data_type() {
        DataType::Dictionary(_, value)
            if matches!(value.as_ref(), DataType::Utf8 | DataType::LargeUtf8) =>
        {
            Ok(cast(col, &DataType::Utf8)?)
        }
        _ => Ok(col.clone()),
    }
}

/// Non-null string cell; `None` for nulls or non-string columns.
fn string_at(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => Some(col.as_string_opt::<i32>()?.value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string_opt::<i64>()?.value(row).to_string()),
        _ => None,
    }
}

/// Numeric cell widened to `f64`.  Outer `None`: unsupported column type;
/// inner `None`: null cell.
fn f64_at(col: &ArrayRef, row: usize) -> Option<Option<f64>> {
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row))?,
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64)?,
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64)?,
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64)?,
        _ => return None,
    };
    if col.is_null(row) || value.is_nan() {
        Some(None)
    } else {
        Some(Some(value))
    }
}

/// Non-null integer-like cell (booleans map to 0/1).
fn int_at(col: &ArrayRef, row: usize) -> Option<i64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row)),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as i64),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| i64::from(a.value(row))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{DictionaryArray, StringArray};
    use arrow::datatypes::{Field, Int32Type};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::NamedTempFile;

    use super::*;

    fn temp_with(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file.flush().expect("flush temp file");
        file
    }

    const CSV: &str = "\
Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
2,CCAFS LC-40,0,525.0,F9 v1.0  B0005,v1.0
3,VAFB SLC-4E,0,500.0,F9 v1.1  B1003,v1.1
4,KSC LC-39A,1,2490.0,F9 FT B1031.1,FT
5,KSC LC-39A,1,,F9 FT B1032.1,FT
";

    #[test]
    fn csv_with_extra_columns_and_any_order() {
        let file = temp_with(".csv", CSV);
        let ds = load_file(file.path()).expect("load csv");

        assert_eq!(ds.len(), 5);
        assert_eq!(ds.sites(), ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A"].map(String::from));
        assert_eq!(
            ds.records()[3],
            LaunchRecord {
                launch_site: "KSC LC-39A".into(),
                payload_mass_kg: Some(2490.0),
                booster_version_category: "FT".into(),
                outcome: 1,
            }
        );
        assert_eq!(ds.records()[4].payload_mass_kg, None);
        assert_eq!(ds.min_payload(), Some(0.0));
        assert_eq!(ds.max_payload(), Some(2490.0));
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let file = temp_with(".csv", "Launch Site,class,Payload Mass (kg)\nA,1,100\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(
            matches!(&err, LoadError::MissingColumn { column } if column == COL_BOOSTER_CATEGORY),
            "{err}"
        );
    }

    #[test]
    fn csv_rejects_non_binary_outcome() {
        let file = temp_with(
            ".csv",
            "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,2,100,FT\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(
            matches!(&err, LoadError::InvalidValue { row: 1, column, .. } if column == COL_OUTCOME),
            "{err}"
        );
    }

    #[test]
    fn csv_rejects_non_numeric_payload() {
        let file = temp_with(
            ".csv",
            "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,1,100,FT\nA,1,heavy,FT\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(
            matches!(&err, LoadError::InvalidValue { row: 2, column, .. } if column == COL_PAYLOAD_MASS),
            "{err}"
        );
        assert!(err.to_string().starts_with("data row 2,"));
    }

    #[test]
    fn missing_file_is_open_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }), "{err}");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = temp_with(".xlsx", "");
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn json_records() {
        let file = temp_with(
            ".json",
            r#"[
                {"Launch Site": "A", "Payload Mass (kg)": 500.0, "Booster Version Category": "v1.0", "class": 1, "Flight Number": 1},
                {"Launch Site": "B", "Payload Mass (kg)": null, "Booster Version Category": "FT", "class": 0}
            ]"#,
        );
        let ds = load_file(file.path()).expect("load json");

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].payload_mass_kg, Some(500.0));
        assert_eq!(ds.records()[1].payload_mass_kg, None);
        assert_eq!(ds.records()[1].outcome, 0);
    }

    #[test]
    fn json_object_root_is_a_layout_error() {
        let file = temp_with(".json", r#"{"Launch Site": ["A"]}"#);
        assert!(matches!(load_file(file.path()), Err(LoadError::Layout(_))));
    }

    #[test]
    fn json_missing_field_is_missing_column() {
        let file = temp_with(".json", r#"[{"Launch Site": "A", "class": 1}]"#);
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::MissingColumn { .. })
        ));
    }

    fn parquet_with(batch: &RecordBatch) -> NamedTempFile {
        let file = tempfile::Builder::new()
            .suffix(".parquet")
            .tempfile()
            .expect("create temp file");
        let mut writer = ArrowWriter::try_new(file.reopen().expect("reopen"), batch.schema(), None)
            .expect("writer");
        writer.write(batch).expect("write batch");
        writer.close().expect("close writer");
        file
    }

    #[test]
    fn parquet_table() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
            Field::new(COL_PAYLOAD_MASS, DataType::Float64, true),
            Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
            Field::new(COL_OUTCOME, DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "A", "B"])),
                Arc::new(Float64Array::from(vec![Some(500.0), None, Some(3000.0)])),
                Arc::new(StringArray::from(vec!["v1.0", "v1.0", "FT"])),
                Arc::new(Int64Array::from(vec![1, 0, 1])),
            ],
        )
        .expect("record batch");

        let file = parquet_with(&batch);
        let ds = load_file(file.path()).expect("load parquet");
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.sites(), ["A", "B"].map(String::from));
        assert_eq!(ds.records()[1].payload_mass_kg, None);
        assert_eq!(ds.max_payload(), Some(3000.0));
        assert_eq!(ds.booster_categories().len(), 2);
    }

    #[test]
    fn parquet_dictionary_encoded_categories() {
        let dict_type = DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8));
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_LAUNCH_SITE, dict_type.clone(), false),
            Field::new(COL_PAYLOAD_MASS, DataType::Float64, true),
            Field::new(COL_BOOSTER_CATEGORY, dict_type, false),
            Field::new(COL_OUTCOME, DataType::Int64, false),
        ]));
        let sites: DictionaryArray<Int32Type> = vec!["KSC LC-39A", "VAFB SLC-4E", "KSC LC-39A"]
            .into_iter()
            .collect();
        let boosters: DictionaryArray<Int32Type> = vec!["FT", "B4", "FT"].into_iter().collect();
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(sites),
                Arc::new(Float64Array::from(vec![2490.0, 9600.0, 5300.0])),
                Arc::new(boosters),
                Arc::new(Int64Array::from(vec![1, 1, 0])),
            ],
        )
        .expect("record batch");

        let file = parquet_with(&batch);
        let ds = load_file(file.path()).expect("load parquet");
        assert_eq!(ds.sites(), ["KSC LC-39A", "VAFB SLC-4E"].map(String::from));
        assert_eq!(ds.records()[1].booster_version_category, "B4");
        assert_eq!(ds.booster_categories().len(), 2);
    }
}
