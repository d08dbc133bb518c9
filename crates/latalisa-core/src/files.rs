//! File and stream helpers.

use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::crypto::{checksum_hex, DigestAlgorithm};
use crate::error::Result;

/// Reads a whole file.
pub fn read(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    Ok(fs::read(path)?)
}

/// Reads a stream to the end.
pub fn read_stream<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    reader.read_to_end(&mut out)?;
    Ok(out)
}

/// Creates or truncates `path` and writes `bytes` to it.
pub fn write(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, bytes)?;
    tracing::debug!(path = %path.display(), len = bytes.len(), "wrote file");
    Ok(())
}

/// Appends `bytes` to `path`, creating the file if needed.
pub fn append(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?
        .write_all(bytes)?;
    tracing::debug!(path = %path.display(), len = bytes.len(), "appended to file");
    Ok(())
}

/// Creates `root/more[0]/more[1]/...` and all missing parents.
pub fn create_dirs(root: impl AsRef<Path>, more: &[&str]) -> Result<PathBuf> {
    let path = more
        .iter()
        .fold(root.as_ref().to_path_buf(), |path, part| path.join(part));
    fs::create_dir_all(&path)?;
    Ok(path)
}

/// Creates `path` unless it already exists.
pub fn create_dirs_if_needed(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path)?;
        tracing::debug!(path = %path.display(), "created directories");
    }
    Ok(path.to_path_buf())
}

/// Modification time of `path`, or `None` when the platform does not report one.
pub fn last_modified(path: impl AsRef<Path>) -> Result<Option<DateTime<Utc>>> {
    let metadata = fs::metadata(path)?;
    Ok(metadata.modified().ok().map(DateTime::<Utc>::from))
}

/// SHA-256 checksum of `bytes` as lower-case hex.
pub fn checksum(bytes: &[u8]) -> String {
    checksum_hex(DigestAlgorithm::Sha256, bytes)
}

/// Checksum of a whole file.
pub fn checksum_path(path: impl AsRef<Path>) -> Result<String> {
    Ok(checksum(&read(path)?))
}

/// Checksum of a stream read to the end.
pub fn checksum_stream<R: Read>(reader: R) -> Result<String> {
    Ok(checksum(&read_stream(reader)?))
}
