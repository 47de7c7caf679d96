//! Opening a dataset file: plain text, gzip, or zip archive.

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::{GeocodeError, Result};

/// An opened dataset, ready to hand out a reader over its data entry.
pub enum DatasetSource {
    Plain(File),
    Gzip(File),
    Zip {
        archive: ZipArchive<BufReader<File>>,
        /// Index of the data entry within the archive
        entry: usize,
    },
}

impl DatasetSource {
    /// Open `path`, picking the container format from its extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening dataset {}", path.display());
        let file = File::open(path)?;

        match extension(path).as_deref() {
            Some("zip") => {
                let archive = ZipArchive::new(BufReader::new(file))?;
                Self::from_archive(archive)
            }
            Some("gz") => Ok(DatasetSource::Gzip(file)),
            _ => Ok(DatasetSource::Plain(file)),
        }
    }

    /// Pick the data entry of an archive.
    ///
    /// Country archives ship a `readme.txt` next to the dump; directories and
    /// readme files are skipped and the first remaining entry is used.
    pub fn from_archive(mut archive: ZipArchive<BufReader<File>>) -> Result<Self> {
        for index in 0..archive.len() {
            let entry = archive.by_index_raw(index)?;
            let name = PathBuf::from(entry.name());
            if entry.is_dir() || is_readme(&name) {
                debug!("Skipping archive entry {}", name.display());
                continue;
            }
            info!("Using archive entry {}", name.display());
            drop(entry);
            return Ok(DatasetSource::Zip {
                archive,
                entry: index,
            });
        }

        Err(GeocodeError::MalformedDataset(format!(
            "archive with {} entries has no data entry",
            archive.len()
        )))
    }

    /// Reader over the raw dump text.
    pub fn reader(&mut self) -> Result<Box<dyn Read + '_>> {
        match self {
            DatasetSource::Plain(file) => Ok(Box::new(BufReader::new(file))),
            DatasetSource::Gzip(file) => Ok(Box::new(BufReader::new(MultiGzDecoder::new(file)))),
            DatasetSource::Zip { archive, entry } => Ok(Box::new(archive.by_index(*entry)?)),
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn is_readme(name: &Path) -> bool {
    name.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_ascii_lowercase().starts_with("readme"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geonames::{collect_places, records, LoadOptions};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const LINE: &str = "5391959\tSan Francisco\tSan Francisco\t\t37.77493\t-122.41942\tP\tPPLA2\tUS\t\tCA\t075\t\t\t864816\t16\t28\tAmerica/Los_Angeles\t2022-09-22\n";

    fn write_zip(dir: &TempDir, entries: &[(&str, &str)]) -> PathBuf {
        let path = dir.path().join("US.zip");
        let mut writer = ZipWriter::new(File::create(&path).unwrap());
        for (name, body) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    fn load(path: &Path) -> Result<Vec<String>> {
        let mut source = DatasetSource::open(path)?;
        let places = collect_places(records(source.reader()?), &LoadOptions::default())?;
        Ok(places.into_iter().map(|p| p.name).collect())
    }

    #[test]
    fn test_plain_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("US.txt");
        std::fs::write(&path, LINE).unwrap();
        assert_eq!(load(&path).unwrap(), vec!["San Francisco"]);
    }

    #[test]
    fn test_gzip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("US.txt.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(LINE.as_bytes()).unwrap();
        encoder.finish().unwrap();
        assert_eq!(load(&path).unwrap(), vec!["San Francisco"]);
    }

    #[test]
    fn test_gzip_multiple_members() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("US.txt.gz");
        let second = LINE.replace("San Francisco", "Oakland").replace("37.77493", "37.80437");

        let mut file = File::create(&path).unwrap();
        for body in [LINE, second.as_str()] {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(body.as_bytes()).unwrap();
            file.write_all(&encoder.finish().unwrap()).unwrap();
        }
        drop(file);

        assert_eq!(load(&path).unwrap(), vec!["San Francisco", "Oakland"]);
    }

    #[test]
    fn test_zip_skips_readme() {
        let dir = TempDir::new().unwrap();
        let path = write_zip(&dir, &[("readme.txt", "not data\tat all"), ("US.txt", LINE)]);
        assert_eq!(load(&path).unwrap(), vec!["San Francisco"]);
    }

    #[test]
    fn test_zip_data_first() {
        let dir = TempDir::new().unwrap();
        let path = write_zip(&dir, &[("cities1000.txt", LINE), ("README.TXT", "docs")]);
        assert_eq!(load(&path).unwrap(), vec!["San Francisco"]);
    }

    #[test]
    fn test_zip_without_data_entry() {
        let dir = TempDir::new().unwrap();
        let path = write_zip(&dir, &[("readme.txt", "docs")]);
        let err = DatasetSource::open(&path).err().unwrap();
        assert!(matches!(err, GeocodeError::MalformedDataset(_)));
    }

    #[test]
    fn test_empty_zip() {
        let dir = TempDir::new().unwrap();
        let path = write_zip(&dir, &[]);
        let err = DatasetSource::open(&path).err().unwrap();
        assert!(matches!(err, GeocodeError::MalformedDataset(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = DatasetSource::open(dir.path().join("nope.txt")).err().unwrap();
        assert!(matches!(err, GeocodeError::Io(_)));
    }
}
