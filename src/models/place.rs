//! Place record read from a GeoNames dump.

use serde::{Deserialize, Serialize};

use crate::error::{GeocodeError, Result};
use crate::kdtree::{Axis, Coordinates};

/// Feature codes of populated places that always count as major
/// (capitals and administrative seats).
const MAJOR_FEATURE_CODES: &[&str] = &["PPLC", "PPLA", "PPLA2", "PPLA3", "PPLA4", "PPLG"];

/// Default population at which a populated place counts as major.
pub const DEFAULT_MAJOR_POPULATION: u64 = 100_000;

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point, rejecting non-finite or out of range coordinates.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if is_valid_coordinate(lat, lon) {
            Ok(Self { lat, lon })
        } else {
            Err(GeocodeError::InvalidCoordinate { lat, lon })
        }
    }
}

impl Coordinates for GeoPoint {
    fn coordinate(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Latitude => self.lat,
            Axis::Longitude => self.lon,
        }
    }
}

pub(crate) fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}

/// A named place. Only `point` is indexed; everything else is payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoName {
    /// GeoNames identifier
    pub geoname_id: u64,

    pub name: String,

    /// Plain ASCII spelling of the name
    pub ascii_name: String,

    pub point: GeoPoint,

    /// Single letter class, `P` for populated places
    pub feature_class: String,

    /// e.g. "PPLC" for a capital
    pub feature_code: String,

    /// ISO 3166 two letter country code
    pub country_code: String,

    /// First level administrative code (state / province)
    pub admin1_code: String,

    pub population: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl GeoName {
    /// Create a place with minimal required fields
    pub fn new(geoname_id: u64, name: &str, point: GeoPoint) -> Self {
        Self {
            geoname_id,
            name: name.to_string(),
            ascii_name: name.to_string(),
            point,
            feature_class: String::new(),
            feature_code: String::new(),
            country_code: String::new(),
            admin1_code: String::new(),
            population: 0,
            timezone: None,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.point.lat
    }

    pub fn longitude(&self) -> f64 {
        self.point.lon
    }

    /// Whether this is a populated place worth keeping in "major only" mode.
    pub fn is_major(&self, min_population: u64) -> bool {
        self.feature_class == "P"
            && (MAJOR_FEATURE_CODES.contains(&self.feature_code.as_str())
                || self.population >= min_population)
    }
}

impl Coordinates for GeoName {
    fn coordinate(&self, axis: Axis) -> f64 {
        self.point.coordinate(axis)
    }
}

impl std::fmt::Display for GeoName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.admin1_code.is_empty() {
            write!(f, ", {}", self.admin1_code)?;
        }
        if !self.country_code.is_empty() {
            write!(f, ", {}", self.country_code)?;
        }
        Ok(())
    }
}
