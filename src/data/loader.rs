use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use arrow::array::{Array, AsArray, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{AirportRecord, Dataset, FacilityType};
use crate::error::DataSourceError;

/// The six New England subdivisions kept by default.
pub const NEW_ENGLAND_REGIONS: [&str; 6] = ["US-MA", "US-CT", "US-RI", "US-NH", "US-VT", "US-ME"];

const NAME: &str = "name";
const LATITUDE: &str = "latitude_deg";
const LONGITUDE: &str = "longitude_deg";
const REGION: &str = "iso_region";
const TYPE: &str = "type";
const ELEVATION: &str = "elevation_ft";
const MUNICIPALITY: &str = "municipality";
const SCHEDULED_SERVICE: &str = "scheduled_service";

/// Columns that must exist in every source; a row missing any of their
/// values is dropped.
pub const REQUIRED_COLUMNS: [&str; 6] = [NAME, LATITUDE, LONGITUDE, REGION, TYPE, ELEVATION];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and clean an airports table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the OurAirports column names
/// * `.json`    – `[{ "name": ..., "latitude_deg": ..., ... }, ...]`
/// * `.parquet` – flat columns with the same names (strings or numbers)
///
/// Rows with a missing or unparsable required value, or whose region is not
/// in `allowed_regions`, are dropped silently. Output keeps source order.
pub fn load_file(path: &Path, allowed_regions: &[String]) -> Result<Dataset, DataSourceError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv_reader(open(path)?, allowed_regions)?,
        "json" => load_json_reader(BufReader::new(open(path)?), allowed_regions)?,
        "parquet" | "pq" => load_parquet(path, allowed_regions)?,
        other => return Err(DataSourceError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} airports from {} (scheduled_service column: {})",
        dataset.len(),
        path.display(),
        dataset.has_scheduled_service
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, DataSourceError> {
    File::open(path).map_err(|source| DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Row cleaning shared by all formats
// ---------------------------------------------------------------------------

/// One source row before validation. `None` marks a missing or unparsable
/// value.
#[derive(Debug, Default)]
struct RawRow {
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    iso_region: Option<String>,
    facility_type: Option<String>,
    elevation_ft: Option<f64>,
    municipality: Option<String>,
    scheduled_service: Option<String>,
}

impl RawRow {
    fn into_record(self, allowed_regions: &[String]) -> Option<AirportRecord> {
        let iso_region = self.iso_region?;
        if !allowed_regions.iter().any(|r| *r == iso_region) {
            return None;
        }
        Some(AirportRecord {
            name: self.name?,
            latitude: self.latitude?,
            longitude: self.longitude?,
            iso_region,
            facility_type: FacilityType::parse(&self.facility_type?),
            elevation_ft: self.elevation_ft?,
            municipality: self.municipality,
            scheduled_service: self.scheduled_service,
        })
    }
}

/// Accumulates cleaned rows and counts the dropped ones for logging.
struct Cleaner<'a> {
    allowed_regions: &'a [String],
    records: Vec<AirportRecord>,
    dropped: usize,
}

impl<'a> Cleaner<'a> {
    fn new(allowed_regions: &'a [String]) -> Self {
        Self {
            allowed_regions,
            records: Vec::new(),
            dropped: 0,
        }
    }

    fn push(&mut self, raw: RawRow) {
        match raw.into_record(self.allowed_regions) {
            Some(record) => self.records.push(record),
            None => self.dropped += 1,
        }
    }

    fn skip(&mut self) {
        self.dropped += 1;
    }

    fn finish(self, has_scheduled_service: bool) -> Dataset {
        log::debug!(
            "kept {} rows, dropped {} incomplete or out-of-region rows",
            self.records.len(),
            self.dropped
        );
        Dataset {
            records: self.records,
            has_scheduled_service,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Column positions resolved from the CSV header row.
struct CsvColumns {
    name: usize,
    latitude: usize,
    longitude: usize,
    region: usize,
    facility_type: usize,
    elevation: usize,
    municipality: Option<usize>,
    scheduled_service: Option<usize>,
}

impl CsvColumns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, DataSourceError> {
        let position = |col: &str| headers.iter().position(|h| h.trim() == col);
        let required = |col: &str| {
            position(col).ok_or_else(|| DataSourceError::MissingColumn(col.to_string()))
        };

        Ok(CsvColumns {
            name: required(NAME)?,
            latitude: required(LATITUDE)?,
            longitude: required(LONGITUDE)?,
            region: required(REGION)?,
            facility_type: required(TYPE)?,
            elevation: required(ELEVATION)?,
            municipality: position(MUNICIPALITY),
            scheduled_service: position(SCHEDULED_SERVICE),
        })
    }

    fn raw_row(&self, record: &csv::StringRecord) -> RawRow {
        let text = |idx: usize| record.get(idx).and_then(non_empty);
        let number = |idx: usize| record.get(idx).and_then(parse_number);

        RawRow {
            name: text(self.name),
            latitude: number(self.latitude),
            longitude: number(self.longitude),
            iso_region: text(self.region),
            facility_type: text(self.facility_type),
            elevation_ft: number(self.elevation),
            municipality: self.municipality.and_then(|idx| text(idx)),
            scheduled_service: self.scheduled_service.and_then(|idx| text(idx)),
        }
    }
}

/// Load and clean CSV from any reader (file, socket, in-memory buffer).
///
/// Short rows and rows with invalid UTF-8 are treated as malformed and
/// dropped; I/O failures abort the load.
pub fn load_csv_reader<R: Read>(
    reader: R,
    allowed_regions: &[String],
) -> Result<Dataset, DataSourceError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();
    let columns = CsvColumns::locate(&headers)?;

    let mut cleaner = Cleaner::new(allowed_regions);
    for result in reader.records() {
        match result {
            Ok(record) => cleaner.push(columns.raw_row(&record)),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::trace!("skipping unreadable CSV row: {e}");
                cleaner.skip();
            }
        }
    }

    Ok(cleaner.finish(columns.scheduled_service.is_some()))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "name": "Logan", "latitude_deg": 42.36, "longitude_deg": -71.0,
///     "iso_region": "US-MA", "type": "large_airport", "elevation_ft": 20 },
///   ...
/// ]
/// ```
///
/// A column exists when at least one record carries the key. Numbers may be
/// given as JSON numbers or numeric strings.
pub fn load_json_reader<R: Read>(
    reader: R,
    allowed_regions: &[String],
) -> Result<Dataset, DataSourceError> {
    let root: JsonValue = serde_json::from_reader(reader)?;
    let rows = root.as_array().ok_or(DataSourceError::NotAnArray)?;

    let columns: BTreeSet<&str> = rows
        .iter()
        .filter_map(JsonValue::as_object)
        .flat_map(|obj| obj.keys().map(String::as_str))
        .collect();
    if !rows.is_empty() {
        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !columns.contains(*c)) {
            return Err(DataSourceError::MissingColumn(missing.to_string()));
        }
    }

    let mut cleaner = Cleaner::new(allowed_regions);
    for row in rows {
        match row.as_object() {
            Some(obj) => cleaner.push(json_raw_row(obj)),
            None => cleaner.skip(),
        }
    }

    Ok(cleaner.finish(columns.contains(SCHEDULED_SERVICE)))
}

fn json_raw_row(obj: &Map<String, JsonValue>) -> RawRow {
    let text = |key: &str| match obj.get(key)? {
        JsonValue::String(s) => non_empty(s),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    };
    let number = |key: &str| match obj.get(key)? {
        JsonValue::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        JsonValue::String(s) => parse_number(s),
        _ => None,
    };

    RawRow {
        name: text(NAME),
        latitude: number(LATITUDE),
        longitude: number(LONGITUDE),
        iso_region: text(REGION),
        facility_type: text(TYPE),
        elevation_ft: number(ELEVATION),
        municipality: text(MUNICIPALITY),
        scheduled_service: text(SCHEDULED_SERVICE),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat airport columns.
///
/// Text columns may be Utf8 or LargeUtf8; numeric columns any integer or
/// float type (or strings holding numbers). Works with files written by
/// both **Pandas** and **Polars**.
fn load_parquet(path: &Path, allowed_regions: &[String]) -> Result<Dataset, DataSourceError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;

    let schema = builder.schema().clone();
    for col in REQUIRED_COLUMNS {
        if schema.index_of(col).is_err() {
            return Err(DataSourceError::MissingColumn(col.to_string()));
        }
    }
    let has_scheduled_service = schema.index_of(SCHEDULED_SERVICE).is_ok();

    let reader = builder.build()?;
    let mut cleaner = Cleaner::new(allowed_regions);

    for batch_result in reader {
        let batch = batch_result?;

        let name = text_column(&batch, NAME)?;
        let latitude = number_column(&batch, LATITUDE)?;
        let longitude = number_column(&batch, LONGITUDE)?;
        let region = text_column(&batch, REGION)?;
        let facility_type = text_column(&batch, TYPE)?;
        let elevation = number_column(&batch, ELEVATION)?;
        let municipality = text_column(&batch, MUNICIPALITY)?;
        let scheduled_service = text_column(&batch, SCHEDULED_SERVICE)?;

        for row in 0..batch.num_rows() {
            cleaner.push(RawRow {
                name: text_at(&name, row),
                latitude: number_at(&latitude, row),
                longitude: number_at(&longitude, row),
                iso_region: text_at(&region, row),
                facility_type: text_at(&facility_type, row),
                elevation_ft: number_at(&elevation, row),
                municipality: text_at(&municipality, row),
                scheduled_service: text_at(&scheduled_service, row),
            });
        }
    }

    Ok(cleaner.finish(has_scheduled_service))
}

// -- Parquet / Arrow helpers --

/// Cast a column to Utf8; `None` when the batch lacks the column.
fn text_column(batch: &RecordBatch, column: &str) -> Result<Option<StringArray>, DataSourceError> {
    let Some(array) = batch.column_by_name(column) else {
        return Ok(None);
    };
    let casted = cast(array, &DataType::Utf8).map_err(|_| DataSourceError::InvalidColumnType {
        column: column.to_string(),
        found: array.data_type().to_string(),
    })?;
    Ok(Some(casted.as_string::<i32>().clone()))
}

/// Cast a column to Float64; unparsable strings become nulls.
fn number_column(
    batch: &RecordBatch,
    column: &str,
) -> Result<Option<Float64Array>, DataSourceError> {
    let Some(array) = batch.column_by_name(column) else {
        return Ok(None);
    };
    let casted =
        cast(array, &DataType::Float64).map_err(|_| DataSourceError::InvalidColumnType {
            column: column.to_string(),
            found: array.data_type().to_string(),
        })?;
    Ok(Some(casted.as_primitive::<Float64Type>().clone()))
}

fn text_at(col: &Option<StringArray>, row: usize) -> Option<String> {
    let col = col.as_ref()?;
    if col.is_null(row) {
        return None;
    }
    non_empty(col.value(row))
}

fn number_at(col: &Option<Float64Array>, row: usize) -> Option<f64> {
    let col = col.as_ref()?;
    if col.is_null(row) {
        return None;
    }
    Some(col.value(row)).filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::Int64Array;
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn new_england() -> Vec<String> {
        NEW_ENGLAND_REGIONS.iter().map(|r| r.to_string()).collect()
    }

    const HEADER: &str =
        "name,latitude_deg,longitude_deg,iso_region,type,elevation_ft,municipality,scheduled_service";

    #[test]
    fn csv_drops_incomplete_and_foreign_rows() {
        let csv = format!(
            "{HEADER}\n\
             Logan,42.36,-71.01,US-MA,large_airport,20,Boston,yes\n\
             No Elevation,42.0,-71.0,US-MA,small_airport,,Town,no\n\
             JFK,40.64,-73.78,US-NY,large_airport,13,New York,yes\n\
             ,41.0,-72.0,US-CT,heliport,100,,no\n\
             Bradley,41.94,-72.68,US-CT,medium_airport,173,,yes\n"
        );
        let ds = load_csv_reader(csv.as_bytes(), &new_england()).unwrap();

        assert!(ds.has_scheduled_service);
        let names: Vec<&str> = ds.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Logan", "Bradley"]);
        assert_eq!(ds.records[1].municipality, None);
        assert_eq!(ds.records[0].scheduled_service.as_deref(), Some("yes"));
    }

    #[test]
    fn csv_unparsable_numbers_and_short_rows_are_dropped() {
        let csv = format!(
            "{HEADER}\n\
             Bad Lat,north,-71.0,US-MA,small_airport,10,X,no\n\
             Short,42.0,-71.0\n\
             Sea Base,43.0,-70.5,US-ME,seaplane_base,-3,Portland,no\n"
        );
        let ds = load_csv_reader(csv.as_bytes(), &new_england()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].elevation_ft, -3.0);
        assert_eq!(ds.records[0].facility_type, FacilityType::SeaplaneBase);
    }

    #[test]
    fn csv_missing_required_column_fails() {
        let csv = "name,latitude_deg,longitude_deg,iso_region,type\nA,1,2,US-MA,heliport\n";
        let err = load_csv_reader(csv.as_bytes(), &new_england()).unwrap_err();
        assert!(matches!(err, DataSourceError::MissingColumn(ref c) if c == "elevation_ft"));
    }

    #[test]
    fn csv_without_service_column_is_flagged() {
        let csv = "name,latitude_deg,longitude_deg,iso_region,type,elevation_ft\n\
                   A,42,-71,US-NH,heliport,900\n";
        let ds = load_csv_reader(csv.as_bytes(), &new_england()).unwrap();
        assert!(!ds.has_scheduled_service);
        assert_eq!(ds.records[0].scheduled_service, None);
        assert_eq!(ds.records[0].municipality, None);
    }

    #[test]
    fn json_records_accept_numeric_strings_and_nulls() {
        let json = r#"[
            {"name": "A", "latitude_deg": 42.1, "longitude_deg": "-71.2",
             "iso_region": "US-RI", "type": "closed", "elevation_ft": 55},
            {"name": "B", "latitude_deg": null, "longitude_deg": -71.0,
             "iso_region": "US-RI", "type": "closed", "elevation_ft": 10},
            "not an object"
        ]"#;
        let ds = load_json_reader(json.as_bytes(), &new_england()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].longitude, -71.2);
        assert!(!ds.has_scheduled_service);
    }

    #[test]
    fn json_requires_array_and_columns() {
        let err = load_json_reader(r#"{"name": "A"}"#.as_bytes(), &new_england()).unwrap_err();
        assert!(matches!(err, DataSourceError::NotAnArray));

        let err = load_json_reader(r#"[{"name": "A"}]"#.as_bytes(), &new_england()).unwrap_err();
        assert!(matches!(err, DataSourceError::MissingColumn(_)));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("airports.xlsx"), &new_england()).unwrap_err();
        assert!(matches!(err, DataSourceError::UnsupportedFormat(ref e) if e == "xlsx"));
    }

    #[test]
    fn unreadable_file_is_an_io_error() {
        let err = load_file(Path::new("/nonexistent/airports.csv"), &new_england()).unwrap_err();
        assert!(matches!(err, DataSourceError::Io { .. }));
    }

    #[test]
    fn parquet_casts_integer_elevation() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("name", DataType::Utf8, true),
            Field::new("latitude_deg", DataType::Float64, true),
            Field::new("longitude_deg", DataType::Float64, true),
            Field::new("iso_region", DataType::Utf8, true),
            Field::new("type", DataType::Utf8, true),
            Field::new("elevation_ft", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("Mount Snow"), Some("Gone")])),
                Arc::new(Float64Array::from(vec![Some(42.9), Some(44.0)])),
                Arc::new(Float64Array::from(vec![Some(-72.8), Some(-72.0)])),
                Arc::new(StringArray::from(vec![Some("US-VT"), Some("US-VT")])),
                Arc::new(StringArray::from(vec![Some("small_airport"), Some("closed")])),
                Arc::new(Int64Array::from(vec![Some(1953), None])),
            ],
        )
        .unwrap();

        let mut file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        {
            let mut writer = ArrowWriter::try_new(file.as_file_mut(), schema, None).unwrap();
            writer.write(&batch).unwrap();
            writer.close().unwrap();
        }
        file.flush().unwrap();

        let ds = load_file(file.path(), &new_england()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].name, "Mount Snow");
        assert_eq!(ds.records[0].elevation_ft, 1953.0);
        assert!(!ds.has_scheduled_service);
    }
}
