//! File-backed flash region for the desktop host.
//!
//! `FileFlash` implements [`FlashRegion`] over a data-partition image written
//! by `cargo xtask pack-content`. Offsets are relative to the start of the
//! image file, matching region offsets on the device.

use std::cell::RefCell;
use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::flash::{range_fits, FlashRegion};

/// Error type for image-backed flash reads.
#[derive(Debug)]
pub enum FlashImageError {
    /// The requested range extends past the end of the image.
    OutOfBounds,
    /// The image is larger than a 32-bit region can address.
    TooLarge(u64),
    /// Underlying filesystem error.
    Io(std::io::Error),
}

impl core::fmt::Display for FlashImageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "flash image read out of bounds"),
            Self::TooLarge(len) => write!(f, "flash image too large: {len} bytes"),
            Self::Io(e) => write!(f, "flash image error: {e}"),
        }
    }
}

impl std::error::Error for FlashImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// A [`FlashRegion`] backed by an image file on disk.
///
/// # Example
/// ```ignore
/// use platform::flash_image::FileFlash;
/// use platform::FlashRegion;
/// let flash = FileFlash::open("target/content.bin").unwrap();
/// let mut count = [0u8; 4];
/// flash.read(0, &mut count).unwrap();
/// ```
pub struct FileFlash {
    file: RefCell<fs::File>,
    len: u32,
}

impl FileFlash {
    /// Open an existing image read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FlashImageError> {
        let file = fs::File::open(path).map_err(FlashImageError::Io)?;
        let len = file.metadata().map_err(FlashImageError::Io)?.len();
        let len = u32::try_from(len).map_err(|_| FlashImageError::TooLarge(len))?;
        Ok(Self {
            file: RefCell::new(file),
            len,
        })
    }
}

impl FlashRegion for FileFlash {
    type Error = FlashImageError;

    fn read(&self, offset: u32, buf: &mut [u8]) -> Result<(), Self::Error> {
        if !range_fits(offset, buf.len(), self.len) {
            return Err(FlashImageError::OutOfBounds);
        }
        let mut file = self.file.borrow_mut();
        file.seek(SeekFrom::Start(u64::from(offset)))
            .map_err(FlashImageError::Io)?;
        file.read_exact(buf).map_err(FlashImageError::Io)
    }

    fn capacity(&self) -> u32 {
        self.len
    }
}
