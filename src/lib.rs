//! revgeo - offline reverse geocoding over GeoNames dumps
//!
//! Places are loaded once into a static 2-d tree; lookups return the closest
//! known place to a latitude/longitude. Shared by the `query` and `lookup`
//! binaries.

pub mod config;
pub mod error;
pub mod geocoder;
pub mod geonames;
pub mod kdtree;
pub mod models;

pub use error::{GeocodeError, Result};
pub use geocoder::ReverseGeocoder;
pub use kdtree::{Axis, Coordinates, KdTree};
pub use models::{GeoName, GeoPoint};
