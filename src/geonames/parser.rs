//! GeoNames dump line parsing.
//!
//! Column layout (tab separated):
//!
//! ```text
//! 0 geonameid  1 name  2 asciiname  3 alternatenames  4 latitude  5 longitude
//! 6 feature class  7 feature code  8 country code  9 cc2  10 admin1 code
//! 11..=13 admin2..admin4  14 population  15 elevation  16 dem  17 timezone
//! 18 modification date
//! ```

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use std::io::Read;

use crate::error::{GeocodeError, Result};
use crate::models::place::is_valid_coordinate;
use crate::models::{GeoName, GeoPoint};

const COL_ID: usize = 0;
const COL_NAME: usize = 1;
const COL_ASCII_NAME: usize = 2;
const COL_LATITUDE: usize = 4;
const COL_LONGITUDE: usize = 5;
const COL_FEATURE_CLASS: usize = 6;
const COL_FEATURE_CODE: usize = 7;
const COL_COUNTRY: usize = 8;
const COL_ADMIN1: usize = 10;
const COL_POPULATION: usize = 14;
const COL_TIMEZONE: usize = 17;

/// Columns up to and including longitude must be present.
const MIN_COLUMNS: usize = COL_LONGITUDE + 1;

/// Parse one dump row into a place. `line` is only used for error reporting.
pub fn parse_record(record: &StringRecord, line: u64) -> Result<GeoName> {
    if record.len() < MIN_COLUMNS {
        return Err(GeocodeError::malformed(
            line,
            format!("expected at least {} columns, found {}", MIN_COLUMNS, record.len()),
        ));
    }

    let field = |idx: usize| record.get(idx).unwrap_or("").trim();

    let geoname_id = field(COL_ID)
        .parse::<u64>()
        .map_err(|e| GeocodeError::malformed(line, format!("invalid id {:?}: {}", field(COL_ID), e)))?;

    let name = field(COL_NAME);
    if name.is_empty() {
        return Err(GeocodeError::malformed(line, "missing name"));
    }

    let lat = parse_float(field(COL_LATITUDE), "latitude", line)?;
    let lon = parse_float(field(COL_LONGITUDE), "longitude", line)?;
    if !is_valid_coordinate(lat, lon) {
        return Err(GeocodeError::malformed(
            line,
            format!("coordinate ({}, {}) out of range", lat, lon),
        ));
    }

    let population = match field(COL_POPULATION) {
        "" => 0,
        raw => raw
            .parse::<u64>()
            .map_err(|e| GeocodeError::malformed(line, format!("invalid population {:?}: {}", raw, e)))?,
    };

    let ascii_name = match field(COL_ASCII_NAME) {
        "" => name,
        ascii => ascii,
    };

    let timezone = Some(field(COL_TIMEZONE))
        .filter(|tz| !tz.is_empty())
        .map(String::from);

    Ok(GeoName {
        geoname_id,
        name: name.to_string(),
        ascii_name: ascii_name.to_string(),
        point: GeoPoint { lat, lon },
        feature_class: field(COL_FEATURE_CLASS).to_string(),
        feature_code: field(COL_FEATURE_CODE).to_string(),
        country_code: field(COL_COUNTRY).to_string(),
        admin1_code: field(COL_ADMIN1).to_string(),
        population,
        timezone,
    })
}

fn parse_float(raw: &str, what: &str, line: u64) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|e| GeocodeError::malformed(line, format!("invalid {} {:?}: {}", what, raw, e)))
}

/// Iterator over the places of a GeoNames dump.
pub struct GeoNameRecords<R> {
    inner: StringRecordsIntoIter<R>,
}

/// Read places from a tab separated GeoNames dump. Blank lines are skipped.
pub fn records<R: Read>(reader: R) -> GeoNameRecords<R> {
    let inner = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_reader(reader)
        .into_records();
    GeoNameRecords { inner }
}

impl<R: Read> Iterator for GeoNameRecords<R> {
    type Item = Result<GeoName>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.inner.next()? {
            Ok(record) => record,
            Err(err) => return Some(Err(from_csv_error(err))),
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        Some(parse_record(&record, line))
    }
}

/// Invalid UTF-8 is bad data on one line; anything else is a reader failure.
fn from_csv_error(err: csv::Error) -> GeocodeError {
    if let csv::ErrorKind::Utf8 { pos, err: utf8 } = err.kind() {
        let line = pos.as_ref().map(|p| p.line()).unwrap_or(0);
        return GeocodeError::malformed(line, utf8.to_string());
    }
    GeocodeError::Csv(err)
}
