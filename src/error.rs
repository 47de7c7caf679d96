//! Error types shared by the index, the dataset reader and the geocoder.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeocodeError>;

#[derive(Error, Debug)]
pub enum GeocodeError {
    /// Build was called with zero records.
    #[error("cannot build a spatial index from an empty dataset")]
    EmptyDataset,

    /// Query against an index that holds no records.
    #[error("spatial index is empty")]
    EmptyIndex,

    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// A dataset line that does not describe a valid place.
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    /// The dataset container itself is unusable (e.g. an archive with no data entry).
    #[error("malformed dataset: {0}")]
    MalformedDataset(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

impl GeocodeError {
    pub fn malformed(line: u64, reason: impl Into<String>) -> Self {
        GeocodeError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// True for errors caused by bad input data rather than a failing reader.
    pub fn is_malformed_record(&self) -> bool {
        matches!(self, GeocodeError::MalformedRecord { .. })
    }
}
