use crate::types::{CleanedSeries, Series};
use chrono::{DateTime, NaiveDateTime};
use csv::{ReaderBuilder, WriterBuilder};
use std::{
    fs::File,
    io::{self, Read, Write},
    path::Path,
};
use thiserror::Error;

const TIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

const OUTPUT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column {0:?}")]
    MissingColumn(String),

    #[error("row {row}: invalid timestamp {value:?}")]
    InvalidTimestamp { row: usize, value: String },

    #[error("row {row}: invalid value {value:?}")]
    InvalidValue { row: usize, value: String },
}

/// Names of the columns read from and written to delimited files.
#[derive(Debug, Clone)]
pub struct Columns {
    pub time: String,
    pub value: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            time: "Time".to_string(),
            value: "feed_pressure".to_string(),
        }
    }
}

/// Load a [`Series`] from a CSV file.
pub fn load_series<P: AsRef<Path>>(file: P, columns: &Columns) -> Result<Series, LoadError> {
    let file = File::open(file)?;
    read_series(file, columns)
}

/// Read a [`Series`] from CSV data with a header row.
///
/// Columns other than the time and value columns are ignored.
/// Row numbers in errors count data rows from 1.
pub fn read_series<R: Read>(reader: R, columns: &Columns) -> Result<Series, LoadError> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = reader.headers()?.clone();
    let find_column = |name: &str| {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };
    let i_time = find_column(&columns.time)?;
    let i_value = find_column(&columns.value)?;

    let mut series = Series::default();
    for (i_row, result) in reader.records().enumerate() {
        let record = result?;
        let row = i_row + 1;

        let time_str = record.get(i_time).unwrap_or_default();
        let time = parse_time(time_str).ok_or_else(|| LoadError::InvalidTimestamp {
            row,
            value: time_str.to_string(),
        })?;

        let value_str = record.get(i_value).unwrap_or_default();
        let value = value_str
            .parse::<f64>()
            .ok()
            .filter(|val| val.is_finite())
            .ok_or_else(|| LoadError::InvalidValue {
                row,
                value: value_str.to_string(),
            })?;

        series.push(time, value);
    }

    Ok(series)
}

fn parse_time(time_str: &str) -> Option<NaiveDateTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(time_str, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(time_str)
                .ok()
                .map(|time| time.naive_utc())
        })
}

/// Save a [`CleanedSeries`] to a CSV file.
pub fn save_cleaned<P: AsRef<Path>>(file: P, cleaned: &CleanedSeries, columns: &Columns) -> csv::Result<()> {
    let file = File::create(file)?;
    write_cleaned(file, cleaned, columns)
}

/// Write a [`CleanedSeries`] as CSV.
///
/// The header is `time, original_<value>, <value>, smoothed_<value>`.
pub fn write_cleaned<W: Write>(writer: W, cleaned: &CleanedSeries, columns: &Columns) -> csv::Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);

    let value = &columns.value;
    writer.write_record([
        columns.time.clone(),
        format!("original_{value}"),
        value.clone(),
        format!("smoothed_{value}"),
    ])?;

    for (i, time) in cleaned.times.iter().enumerate() {
        writer.write_record([
            time.format(OUTPUT_TIME_FORMAT).to_string(),
            cleaned.original[i].to_string(),
            cleaned.corrected[i].to_string(),
            cleaned.smoothed[i].to_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Time,conductivity,feed_pressure
2024-03-01 00:00:00,410.2,3.5
2024-03-01 00:10:00,411.0,3.25
2024-03-01 00:20,409.8,3.75
";

    #[test]
    fn reads_time_and_value_columns() {
        let series = read_series(SAMPLE.as_bytes(), &Columns::default()).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.values, vec![3.5, 3.25, 3.75]);
        assert_eq!(
            series.times[2].format(OUTPUT_TIME_FORMAT).to_string(),
            "2024-03-01 00:20:00"
        );
    }

    #[test]
    fn accepts_rfc3339_and_iso_timestamps() {
        let data = "Time,feed_pressure\n2024-03-01T00:00:00,1\n2024-03-01T09:10:00+09:00,2\n";
        let series = read_series(data.as_bytes(), &Columns::default()).unwrap();
        assert_eq!(series.times[0], series.times[1] - chrono::Duration::minutes(10));
    }

    #[test]
    fn missing_column_is_reported() {
        let data = "Time,pressure\n2024-03-01 00:00:00,1\n";
        let err = read_series(data.as_bytes(), &Columns::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(name) if name == "feed_pressure"));
    }

    #[test]
    fn invalid_timestamp_is_reported() {
        let data = "Time,feed_pressure\n2024-03-01 00:00:00,1\nyesterday,2\n";
        let err = read_series(data.as_bytes(), &Columns::default()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidTimestamp { row: 2, .. }));
    }

    #[test]
    fn invalid_value_is_reported() {
        let data = "Time,feed_pressure\n2024-03-01 00:00:00,\n";
        let err = read_series(data.as_bytes(), &Columns::default()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { row: 1, .. }));

        let data = "Time,feed_pressure\n2024-03-01 00:00:00,NaN\n";
        let err = read_series(data.as_bytes(), &Columns::default()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { row: 1, .. }));
    }

    #[test]
    fn custom_column_names() {
        let columns = Columns {
            time: "timestamp".to_string(),
            value: "conductivity".to_string(),
        };
        let data = "timestamp,conductivity\n2024-03-01 00:00:00,410.5\n";
        let series = read_series(data.as_bytes(), &columns).unwrap();
        assert_eq!(series.values, vec![410.5]);
    }

    #[test]
    fn writes_cleaned_columns() {
        let series = read_series(SAMPLE.as_bytes(), &Columns::default()).unwrap();
        let cleaned = CleanedSeries {
            times: series.times,
            original: series.values.clone(),
            corrected: vec![3.5, 3.5, 3.75],
            smoothed: vec![3.5, 3.5, 3.5833333333333335],
        };

        let mut buf = Vec::new();
        write_cleaned(&mut buf, &cleaned, &Columns::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Time,original_feed_pressure,feed_pressure,smoothed_feed_pressure"
        );
        assert_eq!(lines[1], "2024-03-01 00:00:00,3.5,3.5,3.5");
        assert_eq!(lines[2], "2024-03-01 00:10:00,3.25,3.5,3.5");
        assert_eq!(lines.len(), 4);
    }
}
