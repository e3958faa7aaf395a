//! SPI NOR flash data-partition abstraction
//!
//! Read-only access to the content partition written at provisioning time.
//!
//! # Flash Partition Layout
//!
//! ```text
//! 0x0029_0000  ┌──────────────────────┐  DATA_PARTITION_OFFSET (region offset 0)
//!              │  record count (u32)  │
//!              ├──────────────────────┤
//!              │  record 0            │  path len, path, payload len, payload
//!              │  zero padding        │  up to the next 512-byte boundary
//!              ├──────────────────────┤
//!              │  record 1 …          │
//!              └──────────────────────┘
//! ```
//!
//! The partition is written once by `cargo xtask pack-content`; nothing at
//! runtime writes to it.

/// Read-only flash region holding the content index and its payloads.
///
/// On hardware, reads go through the SPI flash driver. In tests, a mock
/// implementation returns pre-loaded bytes.
pub trait FlashRegion {
    /// Error type
    type Error: core::fmt::Debug;

    /// Fill `buf` with the bytes starting at region `offset`.
    ///
    /// A read that would run past [`FlashRegion::capacity`] fails; partial
    /// reads are never reported as success.
    fn read(&self, offset: u32, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Size of the region in bytes.
    fn capacity(&self) -> u32;
}

impl<T: FlashRegion + ?Sized> FlashRegion for &T {
    type Error = T::Error;

    fn read(&self, offset: u32, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(offset, buf)
    }

    fn capacity(&self) -> u32 {
        (**self).capacity()
    }
}

/// Flash errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Requested range extends past the end of the region
    OutOfBounds,
    /// The flash device reported a failure
    Device,
}

#[cfg(feature = "std")]
impl std::error::Error for FlashError {}

impl core::fmt::Display for FlashError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "flash read out of bounds"),
            Self::Device => write!(f, "flash device error"),
        }
    }
}

/// Return `true` when `len` bytes starting at `offset` fit inside `capacity`.
pub fn range_fits(offset: u32, len: usize, capacity: u32) -> bool {
    let Ok(len) = u32::try_from(len) else {
        return false;
    };
    offset.checked_add(len).is_some_and(|end| end <= capacity)
}
