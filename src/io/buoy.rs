//! NDBC standard meteorological buoy data.
//!
//! Wave forcing for the coupled run is usually taken from a nearby National
//! Data Buoy Center station. This reader extracts significant wave height
//! (`WVHT`), dominant period (`DPD`) and mean wave direction (`MWD`) from the
//! standard meteorological text format.
//!
//! # File Format
//!
//! ```text
//! #YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS  TIDE
//! #yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC   mi    ft
//! 2023 01 01 00 00 210  6.1  7.4  1.41  9.09  5.62 101 1017.3  12.4  16.1   8.9 99.0 99.00
//! 2023 01 01 00 10 200  6.3  7.9 99.00 99.00 99.00 999 1017.4  12.4  16.1   8.8 99.0 99.00
//! ```
//!
//! Columns are located by header name, so older files without the minute
//! column (`YYYY MM DD hh`) are accepted too. Two-digit years are taken as
//! 19xx. `MM`, `99`, `99.0`, `99.00`, `999` and `9999` mark missing values.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::config::ModelParameters;

/// Error type for buoy file parsing.
#[derive(Debug, Error)]
pub enum BuoyFileError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error with line number
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Header row missing or lacking a required column
    #[error("Missing column '{0}' in buoy header")]
    MissingColumn(&'static str),

    /// No data records
    #[error("Buoy file contains no data")]
    Empty,
}

/// One observation. Missing quantities are `None`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuoyRecord {
    pub time: DateTime<Utc>,
    /// Significant wave height (m)
    pub wave_height: Option<f64>,
    /// Dominant wave period (s)
    pub dominant_period: Option<f64>,
    /// Direction waves come from (degrees true)
    pub mean_wave_direction: Option<f64>,
}

/// Time-ordered buoy observations.
#[derive(Clone, Debug, Default)]
pub struct BuoySeries {
    pub station: Option<String>,
    records: Vec<BuoyRecord>,
}

impl BuoySeries {
    /// Build from records, sorting them by time.
    pub fn new(mut records: Vec<BuoyRecord>) -> Self {
        records.sort_by_key(|r| r.time);
        Self {
            station: None,
            records,
        }
    }

    pub fn with_station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub fn records(&self) -> &[BuoyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Valid wave heights.
    pub fn wave_heights(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().filter_map(|r| r.wave_height)
    }

    /// Valid dominant periods.
    pub fn dominant_periods(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().filter_map(|r| r.dominant_period)
    }

    pub fn statistics(&self) -> BuoyStatistics {
        let heights: Vec<f64> = self.wave_heights().collect();
        let periods: Vec<f64> = self.dominant_periods().collect();

        let mean = |v: &[f64]| (!v.is_empty()).then(|| v.iter().sum::<f64>() / v.len() as f64);

        BuoyStatistics {
            n_records: self.records.len(),
            n_wave_heights: heights.len(),
            mean_wave_height: mean(&heights),
            max_wave_height: heights.iter().copied().reduce(f64::max),
            mean_dominant_period: mean(&periods),
            start: self.records.first().map(|r| r.time),
            end: self.records.last().map(|r| r.time),
        }
    }

    /// Use mean wave height and mean dominant period as the wave forcing.
    ///
    /// Parameters without valid observations are left unchanged. Returns the
    /// statistics that were applied.
    pub fn apply_to(&self, params: &mut ModelParameters) -> BuoyStatistics {
        let stats = self.statistics();
        if let Some(h) = stats.mean_wave_height {
            params.wave_height = h;
        }
        if let Some(t) = stats.mean_dominant_period {
            params.wave_period = t;
        }
        stats
    }
}

/// Summary of a buoy series.
#[derive(Clone, Debug, PartialEq)]
pub struct BuoyStatistics {
    pub n_records: usize,
    /// Records with a valid wave height
    pub n_wave_heights: usize,
    pub mean_wave_height: Option<f64>,
    pub max_wave_height: Option<f64>,
    pub mean_dominant_period: Option<f64>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl BuoyStatistics {
    /// Length of the record in days.
    pub fn span_days(&self) -> Option<f64> {
        match (self.start, self.end) {
            (Some(s), Some(e)) => Some((e - s).num_seconds() as f64 / 86_400.0),
            _ => None,
        }
    }
}

impl fmt::Display for BuoyStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v));

        writeln!(f, "Buoy Statistics:")?;
        writeln!(
            f,
            "  Records: {} ({} with wave height)",
            self.n_records, self.n_wave_heights
        )?;
        if let (Some(s), Some(e)) = (self.start, self.end) {
            writeln!(
                f,
                "  Period: {} to {}",
                s.format("%Y-%m-%d %H:%M"),
                e.format("%Y-%m-%d %H:%M")
            )?;
        }
        writeln!(f, "  Mean WVHT: {} m", opt(self.mean_wave_height))?;
        writeln!(f, "  Max WVHT: {} m", opt(self.max_wave_height))?;
        write!(f, "  Mean DPD: {} s", opt(self.mean_dominant_period))
    }
}

/// Column positions located from the header row.
struct Columns {
    year: usize,
    month: usize,
    day: usize,
    hour: usize,
    minute: Option<usize>,
    wave_height: usize,
    dominant_period: usize,
    mean_wave_direction: Option<usize>,
}

impl Columns {
    fn from_header(line: &str) -> Result<Self, BuoyFileError> {
        let names: Vec<&str> = line.trim_start_matches('#').split_whitespace().collect();
        let find = |candidates: &[&str]| names.iter().position(|n| candidates.contains(n));
        let require = |candidates: &[&str], label: &'static str| {
            find(candidates).ok_or(BuoyFileError::MissingColumn(label))
        };

        Ok(Self {
            year: require(&["YY", "YYYY"], "YY")?,
            month: require(&["MM"], "MM")?,
            day: require(&["DD"], "DD")?,
            hour: require(&["hh"], "hh")?,
            minute: find(&["mm"]),
            wave_height: require(&["WVHT"], "WVHT")?,
            dominant_period: require(&["DPD"], "DPD")?,
            mean_wave_direction: find(&["MWD"]),
        })
    }

    fn min_fields(&self) -> usize {
        [
            Some(self.year),
            Some(self.month),
            Some(self.day),
            Some(self.hour),
            self.minute,
            Some(self.wave_height),
            Some(self.dominant_period),
        ]
        .into_iter()
        .flatten()
        .max()
        .map_or(0, |m| m + 1)
    }
}

fn is_missing(token: &str) -> bool {
    matches!(token, "MM" | "99" | "99.0" | "99.00" | "999" | "999.0" | "9999" | "9999.0")
}

fn parse_value(token: &str, line: usize, name: &str) -> Result<Option<f64>, BuoyFileError> {
    if is_missing(token) {
        return Ok(None);
    }
    token.parse().map(Some).map_err(|_| BuoyFileError::Parse {
        line,
        message: format!("Invalid {} value '{}'", name, token),
    })
}

fn parse_int(token: &str, line: usize, name: &str) -> Result<u32, BuoyFileError> {
    token.parse().map_err(|_| BuoyFileError::Parse {
        line,
        message: format!("Invalid {} '{}'", name, token),
    })
}

/// Read an NDBC standard meteorological file.
pub fn read_buoy_file<P: AsRef<Path>>(path: P) -> Result<BuoySeries, BuoyFileError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line?);
    }

    let mut series = parse_buoy_lines(lines.iter().map(String::as_str))?;
    if let Some(station) = path
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(station_from_stem)
    {
        series.station = Some(station);
    }
    Ok(series)
}

/// Station ID from an NDBC file stem such as `44014h2023` or `chlv2h2019`.
fn station_from_stem(stem: &str) -> Option<String> {
    let name: String = stem.chars().take_while(|c| c.is_ascii_alphanumeric()).collect();
    let id = match name.rsplit_once('h') {
        Some((id, year))
            if !id.is_empty() && !year.is_empty() && year.chars().all(|c| c.is_ascii_digit()) =>
        {
            id
        }
        _ => name.as_str(),
    };
    (!id.is_empty()).then(|| id.to_string())
}

/// Parse NDBC standard meteorological text from a string.
pub fn parse_buoy(content: &str) -> Result<BuoySeries, BuoyFileError> {
    parse_buoy_lines(content.lines())
}

fn parse_buoy_lines<'a, I>(lines: I) -> Result<BuoySeries, BuoyFileError>
where
    I: Iterator<Item = &'a str>,
{
    let mut columns: Option<Columns> = None;
    let mut records = Vec::new();

    for (line_num, line) in lines.enumerate() {
        let line_no = line_num + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with('#') || trimmed.starts_with(|c: char| c.is_alphabetic()) {
            // First comment/name row is the header, the second holds units
            if columns.is_none() {
                columns = Some(Columns::from_header(trimmed)?);
            }
            continue;
        }

        let cols = columns
            .as_ref()
            .ok_or(BuoyFileError::MissingColumn("YY"))?;
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() < cols.min_fields() {
            return Err(BuoyFileError::Parse {
                line: line_no,
                message: format!(
                    "Expected at least {} columns, found {}",
                    cols.min_fields(),
                    fields.len()
                ),
            });
        }

        let mut year = parse_int(fields[cols.year], line_no, "year")? as i32;
        if year < 100 {
            year += 1900;
        }
        let month = parse_int(fields[cols.month], line_no, "month")?;
        let day = parse_int(fields[cols.day], line_no, "day")?;
        let hour = parse_int(fields[cols.hour], line_no, "hour")?;
        let minute = match cols.minute {
            Some(i) => parse_int(fields[i], line_no, "minute")?,
            None => 0,
        };

        let time = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .ok_or_else(|| BuoyFileError::Parse {
                line: line_no,
                message: format!(
                    "Invalid timestamp {:04}-{:02}-{:02} {:02}:{:02}",
                    year, month, day, hour, minute
                ),
            })?
            .and_utc();

        let mean_wave_direction = match cols.mean_wave_direction.and_then(|i| fields.get(i)) {
            Some(token) => parse_value(token, line_no, "MWD")?,
            None => None,
        };

        records.push(BuoyRecord {
            time,
            wave_height: parse_value(fields[cols.wave_height], line_no, "WVHT")?,
            dominant_period: parse_value(fields[cols.dominant_period], line_no, "DPD")?,
            mean_wave_direction,
        });
    }

    if records.is_empty() {
        return Err(BuoyFileError::Empty);
    }

    Ok(BuoySeries::new(records))
}
