//! GeoNames dataset ingest.
//!
//! Reads the tab separated dumps from <http://download.geonames.org/export/dump/>,
//! either as plain text, gzip, or the zip archives GeoNames publishes, and
//! applies the loading policy (malformed lines, major places only) before the
//! places reach the index.

mod parser;
mod source;

pub use parser::{parse_record, records, GeoNameRecords};
pub use source::DatasetSource;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::{GeoName, DEFAULT_MAJOR_POPULATION};

/// What to do with a line that does not parse into a valid place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Log and continue with the next line
    #[default]
    Skip,
    /// Fail the whole load
    Abort,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadOptions {
    /// Keep only places classified as major
    #[serde(default)]
    pub major_only: bool,

    /// Population at which a populated place counts as major
    #[serde(default = "default_major_population")]
    pub major_population: u64,

    #[serde(default)]
    pub on_malformed: MalformedPolicy,
}

fn default_major_population() -> u64 {
    DEFAULT_MAJOR_POPULATION
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            major_only: false,
            major_population: DEFAULT_MAJOR_POPULATION,
            on_malformed: MalformedPolicy::default(),
        }
    }
}

impl LoadOptions {
    pub fn major_only() -> Self {
        Self {
            major_only: true,
            ..Self::default()
        }
    }

    fn keep(&self, place: &GeoName) -> bool {
        !self.major_only || place.is_major(self.major_population)
    }
}

/// Drain parsed records into the batch the index is built from.
pub fn collect_places<I>(records: I, options: &LoadOptions) -> Result<Vec<GeoName>>
where
    I: IntoIterator<Item = Result<GeoName>>,
{
    let mut places = Vec::new();
    let mut skipped_malformed = 0usize;
    let mut filtered = 0usize;

    for result in records {
        let place = match result {
            Ok(place) => place,
            Err(err) if err.is_malformed_record() && options.on_malformed == MalformedPolicy::Skip => {
                warn!("Skipping {}", err);
                skipped_malformed += 1;
                continue;
            }
            Err(err) => return Err(err),
        };

        if options.keep(&place) {
            places.push(place);
        } else {
            filtered += 1;
        }
    }

    info!(
        "Loaded {} places ({} filtered as minor, {} malformed lines skipped)",
        places.len(),
        filtered,
        skipped_malformed
    );
    Ok(places)
}
