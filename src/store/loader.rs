use crate::store::error::LoadError;
use crate::store::record_store::RecordStore;
use crate::types::daily_record::DailyRecord;
use crate::types::location::LatLon;
use crate::types::series::RecordSeries;
use chrono::NaiveDate;
use log::{debug, info};
use polars::prelude::*;
use std::io::Cursor;
use std::path::PathBuf;
use tokio::task;

const DATE_COLUMN: &str = "date";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Where a series' daily records come from.
///
/// CSV input needs a header row with a `date` column (`YYYY-MM-DD`) and any of
/// `tmin`, `tmax`, `prcp`, `wspd`, `rhum`, `dwpt`. Missing columns and empty
/// cells become absent measurements.
#[derive(Debug, Clone)]
pub enum RecordSource {
    CsvPath(PathBuf),
    CsvBytes { name: String, bytes: Vec<u8> },
    Records(Vec<DailyRecord>),
}

impl RecordSource {
    fn name(&self) -> String {
        match self {
            RecordSource::CsvPath(path) => path.display().to_string(),
            RecordSource::CsvBytes { name, .. } => name.clone(),
            RecordSource::Records(_) => "<records>".to_string(),
        }
    }
}

/// One series to load into a store.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub id: String,
    pub location: LatLon,
    pub source: RecordSource,
}

pub struct SeriesLoader;

impl SeriesLoader {
    /// Reads and validates one series. Blocks on file IO and CSV parsing.
    pub fn load(source: RecordSource) -> Result<RecordSeries, LoadError> {
        let name = source.name();
        let series = match source {
            RecordSource::CsvPath(path) => {
                let bytes = std::fs::read(&path).map_err(|e| LoadError::FileRead(path.clone(), e))?;
                Self::from_csv_bytes(bytes, &name)?
            }
            RecordSource::CsvBytes { name, bytes } => Self::from_csv_bytes(bytes, &name)?,
            RecordSource::Records(records) => RecordSeries::from_records(records)?,
        };
        match (series.first_date(), series.last_date()) {
            (Some(first), Some(last)) => info!(
                "Loaded {} records from {} spanning {} to {}",
                series.len(),
                name,
                first,
                last
            ),
            _ => info!("Loaded an empty series from {}", name),
        }
        Ok(series)
    }

    /// [`SeriesLoader::load`] on the blocking thread pool.
    pub async fn load_async(source: RecordSource) -> Result<RecordSeries, LoadError> {
        task::spawn_blocking(move || Self::load(source)).await?
    }

    /// Loads every spec concurrently and indexes the results.
    ///
    /// # Errors
    ///
    /// The first failing series aborts the whole store.
    pub async fn load_store(specs: Vec<SeriesSpec>) -> Result<RecordStore, LoadError> {
        let handles: Vec<_> = specs
            .into_iter()
            .map(|spec| {
                let handle = task::spawn_blocking(move || Self::load(spec.source));
                (spec.id, spec.location, handle)
            })
            .collect();

        let mut builder = RecordStore::builder();
        for (id, location, handle) in handles {
            let series = handle.await??;
            builder.insert(id, location, series)?;
        }
        let store = builder.build();
        info!("Record store ready with {} series", store.len());
        Ok(store)
    }

    fn from_csv_bytes(bytes: Vec<u8>, name: &str) -> Result<RecordSeries, LoadError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
            .map_err(|e| LoadError::CsvReadPolars {
                series: name.to_string(),
                source: e,
            })?;
        debug!("Parsed {} rows of CSV for {}", df.height(), name);
        Self::from_frame(&df)
    }

    /// Converts a frame with the CSV column names into a validated series.
    pub fn from_frame(df: &DataFrame) -> Result<RecordSeries, LoadError> {
        let dates = df
            .column(DATE_COLUMN)
            .map_err(|e| LoadError::ColumnNotFound(DATE_COLUMN.to_string(), e))?
            .cast(&DataType::String)
            .map_err(|e| LoadError::ColumnType {
                column: DATE_COLUMN.to_string(),
                source: e,
            })?;
        let dates = dates.str().map_err(|e| LoadError::ColumnType {
            column: DATE_COLUMN.to_string(),
            source: e,
        })?;

        let height = df.height();
        let tmin = float_column(df, "tmin", height)?;
        let tmax = float_column(df, "tmax", height)?;
        let prcp = float_column(df, "prcp", height)?;
        let wspd = float_column(df, "wspd", height)?;
        let rhum = float_column(df, "rhum", height)?;
        let dwpt = float_column(df, "dwpt", height)?;

        let mut records = Vec::with_capacity(height);
        for (row, raw) in dates.into_iter().enumerate() {
            let raw = raw.ok_or(LoadError::MissingDate(row))?;
            let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
                LoadError::InvalidDate {
                    row,
                    value: raw.to_string(),
                }
            })?;
            records.push(
                DailyRecord::builder()
                    .date(date)
                    .maybe_temp_min(tmin[row])
                    .maybe_temp_max(tmax[row])
                    .maybe_precipitation(prcp[row])
                    .maybe_wind_speed(wspd[row])
                    .maybe_relative_humidity(rhum[row])
                    .maybe_dew_point(dwpt[row])
                    .build(),
            );
        }
        RecordSeries::from_records(records)
    }
}

// Absent columns read as all-null; non-finite values are dropped.
fn float_column(df: &DataFrame, name: &str, height: usize) -> Result<Vec<Option<f64>>, LoadError> {
    let Ok(column) = df.column(name) else {
        return Ok(vec![None; height]);
    };
    let type_error = |e| LoadError::ColumnType {
        column: name.to_string(),
        source: e,
    };
    let cast = column.cast(&DataType::Float64).map_err(type_error)?;
    let values = cast
        .f64()
        .map_err(type_error)?
        .into_iter()
        .map(|v| v.filter(|v| v.is_finite()))
        .collect();
    Ok(values)
}
