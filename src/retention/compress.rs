//! Gzip for freshly rotated archives.

use crate::Error;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Writes `<path>.gz`, removes `path`, and returns the new path.
///
/// # Errors
/// Any I/O failure; the original file is only removed once the `.gz` is complete.
pub fn compress_file(path: &Path) -> Result<PathBuf, Error> {
    let mut reader = BufReader::new(File::open(path)?);

    let mut gz_name = path.as_os_str().to_owned();
    gz_name.push(".gz");
    let gz_path = PathBuf::from(gz_name);

    let writer = BufWriter::new(File::create(&gz_path)?);
    let mut encoder = GzEncoder::new(writer, Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;
    Ok(gz_path)
}
