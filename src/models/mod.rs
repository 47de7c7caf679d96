//! Core data models for the reverse geocoder.

pub mod place;
pub mod regions;

pub use place::{GeoName, GeoPoint, DEFAULT_MAJOR_POPULATION};
pub use regions::region_name;
