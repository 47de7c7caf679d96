//! Reverse geocoder: nearest known place for a coordinate.

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::error::Result;
use crate::geonames::{collect_places, records, DatasetSource, LoadOptions};
use crate::kdtree::{KdTree, Neighbor};
use crate::models::{region_name, GeoName};

/// Nearest place lookups over a GeoNames dataset.
///
/// ```no_run
/// use revgeo::{geonames::LoadOptions, ReverseGeocoder};
///
/// let geocoder = ReverseGeocoder::open("cities1000.zip", &LoadOptions::major_only())?;
/// let place = geocoder.nearest_place(39.5, -98.3)?;
/// println!("Nearest to 39.5, -98.3 is {}", place);
/// # Ok::<(), revgeo::GeocodeError>(())
/// ```
pub struct ReverseGeocoder {
    index: KdTree<GeoName>,
}

impl ReverseGeocoder {
    /// Build from an already loaded batch of places.
    pub fn from_places(places: Vec<GeoName>) -> Result<Self> {
        let start = Instant::now();
        let count = places.len();
        let index = KdTree::par_build(places)?;
        info!(
            "Spatial index built with {} places in {:?}",
            count,
            start.elapsed()
        );
        Ok(Self { index })
    }

    /// Build from an uncompressed dump.
    pub fn from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Self> {
        let places = collect_places(records(reader), options)?;
        Self::from_places(places)
    }

    /// Build from a dump on disk (`.txt`, `.gz` or `.zip`).
    pub fn open<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        Self::open_with(path, options, |_| {})
    }

    /// Like [`ReverseGeocoder::open`], calling `on_record` for every dump line
    /// read (e.g. to drive a progress display).
    pub fn open_with<P, F>(path: P, options: &LoadOptions, mut on_record: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: FnMut(&Result<GeoName>),
    {
        let mut source = DatasetSource::open(path)?;
        let lines = records(source.reader()?).inspect(|record| on_record(record));
        let places = collect_places(lines, options)?;
        Self::from_places(places)
    }

    pub fn nearest_place(&self, latitude: f64, longitude: f64) -> Result<&GeoName> {
        self.index.nearest(latitude, longitude)
    }

    pub fn nearest(&self, latitude: f64, longitude: f64) -> Result<Neighbor<'_, GeoName>> {
        self.index.nearest_neighbor(latitude, longitude)
    }

    /// Full state / province name of a US or Canadian place.
    pub fn region_name(place: &GeoName) -> Option<&'static str> {
        region_name(&place.country_code, &place.admin1_code)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &KdTree<GeoName> {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeocodeError;

    const KANSAS: &str = "\
4280539\tTopeka\tTopeka\t\t39.04833\t-95.67804\tP\tPPLA\tUS\t\tKS\t177\t\t\t126587\t290\t289\tAmerica/Chicago\t2019-09-05
4276614\tSalina\tSalina\t\t38.84028\t-97.61142\tP\tPPL\tUS\t\tKS\t169\t\t\t46994\t372\t371\tAmerica/Chicago\t2017-03-09
4273837\tKansas City\tKansas City\t\t39.11417\t-94.62746\tP\tPPL\tUS\t\tKS\t209\t\t\t152960\t\t277\tAmerica/Chicago\t2017-05-23
4281730\tWichita\tWichita\t\t37.69224\t-97.33754\tP\tPPLA2\tUS\t\tKS\t173\t\t\t397532\t402\t399\tAmerica/Chicago\t2019-09-19
";

    #[test]
    fn test_nearest_place() {
        let geocoder = ReverseGeocoder::from_reader(KANSAS.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(geocoder.len(), 4);

        let place = geocoder.nearest_place(39.5, -98.3).unwrap();
        assert_eq!(place.name, "Salina");
        assert_eq!(ReverseGeocoder::region_name(place), Some("Kansas"));
    }

    #[test]
    fn test_major_only_changes_answer() {
        let geocoder = ReverseGeocoder::from_reader(KANSAS.as_bytes(), &LoadOptions::major_only()).unwrap();
        assert_eq!(geocoder.len(), 3);
        assert_eq!(geocoder.nearest_place(39.5, -98.3).unwrap().name, "Wichita");
    }

    #[test]
    fn test_empty_dataset() {
        let result = ReverseGeocoder::from_reader("".as_bytes(), &LoadOptions::default());
        assert!(matches!(result, Err(GeocodeError::EmptyDataset)));
    }

    #[test]
    fn test_everything_filtered_is_empty_dataset() {
        let lake = "5119222\tCross Lake\tCross Lake\t\t42.0\t-75.0\tH\tLK\tUS\t\tNY\t\t\t\t0\t\t300\t\t\n";
        let result = ReverseGeocoder::from_reader(lake.as_bytes(), &LoadOptions::major_only());
        assert!(matches!(result, Err(GeocodeError::EmptyDataset)));
    }

    #[test]
    fn test_unknown_region() {
        let mut place = GeoName::new(1, "Paris", crate::models::GeoPoint::new(48.85, 2.35).unwrap());
        place.country_code = "FR".to_string();
        place.admin1_code = "11".to_string();
        assert_eq!(ReverseGeocoder::region_name(&place), None);
    }

    #[test]
    fn test_region_code_collision_outside_us() {
        let line = "2659496\tNeuchatel\tNeuchatel\t\t46.99179\t6.931\tP\tPPLA\tCH\t\tNE\t246\t\t\t33475\t\t440\tEurope/Zurich\t2019-06-19\n";
        let geocoder = ReverseGeocoder::from_reader(line.as_bytes(), &LoadOptions::default()).unwrap();

        let place = geocoder.nearest_place(47.0, 6.9).unwrap();
        assert_eq!(place.name, "Neuchatel");
        assert_eq!(ReverseGeocoder::region_name(place), None);
    }

    #[test]
    fn test_canadian_region() {
        let line = "6094817\tOttawa\tOttawa\t\t45.41117\t-75.69812\tP\tPPLC\tCA\t\t08\t\t\t\t1017449\t\t71\tAmerica/Toronto\t2019-08-28\n";
        let geocoder = ReverseGeocoder::from_reader(line.as_bytes(), &LoadOptions::default()).unwrap();

        let place = geocoder.nearest_place(45.0, -75.0).unwrap();
        assert_eq!(ReverseGeocoder::region_name(place), Some("Ontario"));
    }

    #[test]
    fn test_open_with_sees_every_line() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("KS.txt");
        let data = format!("{}1\tBroken\t\t\tabc\t0.0\n", KANSAS);
        std::fs::write(&path, data).unwrap();

        let mut seen = 0;
        let mut malformed = 0;
        let geocoder = ReverseGeocoder::open_with(&path, &LoadOptions::default(), |record| {
            seen += 1;
            if record.is_err() {
                malformed += 1;
            }
        })
        .unwrap();

        assert_eq!((seen, malformed), (5, 1));
        assert_eq!(geocoder.len(), 4);
        assert_eq!(
            geocoder.nearest_place(39.5, -98.3).unwrap().name,
            ReverseGeocoder::open(&path, &LoadOptions::default())
                .unwrap()
                .nearest_place(39.5, -98.3)
                .unwrap()
                .name
        );
    }
}
