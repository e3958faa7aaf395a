//! IndexWriter: build a flash data-partition image.
//!
//! Only compiled with the `std` feature (used by the `pack-content` xtask and
//! by tests). Records are laid out in the order they are added.

#[cfg(not(feature = "std"))]
compile_error!("library::writer requires the `std` feature");

use std::fs;
use std::path::Path;

use platform::config::{MAX_INDEX_RECORDS, MAX_PATH_LEN};

use crate::binary::padding_for;

/// Error type for `IndexWriter` operations.
#[derive(Debug)]
pub enum WriterError {
    /// Path is empty or longer than `MAX_PATH_LEN` bytes.
    PathLength(usize),
    /// The same path was added twice.
    DuplicatePath(String),
    /// More than `MAX_INDEX_RECORDS` records.
    TooManyRecords,
    /// The image would exceed the 32-bit region address space.
    TooLarge,
    /// An I/O error from std::io.
    Io(std::io::Error),
}

impl core::fmt::Display for WriterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PathLength(n) => write!(f, "path length {n} outside 1..={MAX_PATH_LEN}"),
            Self::DuplicatePath(p) => write!(f, "duplicate path: {p}"),
            Self::TooManyRecords => write!(f, "more than {MAX_INDEX_RECORDS} records"),
            Self::TooLarge => write!(f, "image exceeds 4 GiB"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for WriterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WriterError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Builds the index image in memory.
///
/// The image starts with the record count, so it must be placed at
/// `INDEX_START` of a 512-aligned partition for record alignment to hold on
/// the device.
#[derive(Debug, Default)]
pub struct IndexWriter {
    body: Vec<u8>,
    paths: Vec<String>,
}

impl IndexWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record.
    ///
    /// # Errors
    ///
    /// Returns `WriterError::PathLength` for an empty or over-long path,
    /// `WriterError::DuplicatePath` if `path` was already added,
    /// `WriterError::TooManyRecords` past `MAX_INDEX_RECORDS`, and
    /// `WriterError::TooLarge` if the image would not fit a 32-bit region.
    pub fn add(&mut self, path: &str, payload: &[u8]) -> Result<(), WriterError> {
        let path_len = u16::try_from(path.len())
            .ok()
            .filter(|n| (1..=MAX_PATH_LEN).contains(n))
            .ok_or(WriterError::PathLength(path.len()))?;
        if self.paths.iter().any(|p| p == path) {
            return Err(WriterError::DuplicatePath(path.to_owned()));
        }
        if self.paths.len() >= usize::try_from(MAX_INDEX_RECORDS).unwrap_or(usize::MAX) {
            return Err(WriterError::TooManyRecords);
        }
        let payload_len = u32::try_from(payload.len()).map_err(|_| WriterError::TooLarge)?;

        self.body.extend_from_slice(&path_len.to_le_bytes());
        self.body.extend_from_slice(path.as_bytes());
        self.body.extend_from_slice(&payload_len.to_le_bytes());
        self.body.extend_from_slice(payload);

        // Header (4 bytes) precedes the body in the final image.
        let cursor = u32::try_from(self.body.len())
            .ok()
            .and_then(|n| n.checked_add(4))
            .ok_or(WriterError::TooLarge)?;
        let pad = usize::try_from(padding_for(cursor)).map_err(|_| WriterError::TooLarge)?;
        self.body.resize(self.body.len().saturating_add(pad), 0);

        self.paths.push(path.to_owned());
        Ok(())
    }

    /// Number of records added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// `true` when no record has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The complete image: count header followed by every record.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        // len() <= MAX_INDEX_RECORDS, checked in add().
        let count = u32::try_from(self.paths.len()).unwrap_or(u32::MAX);
        let mut image = Vec::with_capacity(self.body.len().saturating_add(4));
        image.extend_from_slice(&count.to_le_bytes());
        image.extend_from_slice(&self.body);
        image
    }

    /// Write the image to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `WriterError::Io` if the file cannot be written.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<usize, WriterError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let image = self.to_bytes();
        fs::write(path, &image)?;
        Ok(image.len())
    }
}
