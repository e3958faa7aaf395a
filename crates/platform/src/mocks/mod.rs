//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests.

#![cfg(any(test, feature = "std"))]

use core::cell::Cell;
use core::ops::Range;

use crate::config::{MATRIX_COUNT, MATRIX_HEIGHT, MATRIX_WIDTH};
use crate::flash::range_fits;
use crate::*;
use embedded_graphics::pixelcolor::RgbColor;

/// Mock LED surface that records every call for verification.
pub struct MockSurface {
    pixels: Vec<Color>,
    clear_count: usize,
    show_count: usize,
    set_pixel_count: usize,
}

impl MockSurface {
    /// Create a black two-matrix surface.
    pub fn new() -> Self {
        let len = usize::from(MATRIX_COUNT)
            .saturating_mul(usize::from(MATRIX_WIDTH))
            .saturating_mul(usize::from(MATRIX_HEIGHT));
        Self {
            pixels: vec![Color::BLACK; len],
            clear_count: 0,
            show_count: 0,
            set_pixel_count: 0,
        }
    }

    fn slot(matrix: MatrixId, x: u16, y: u16) -> Option<usize> {
        if matrix >= MATRIX_COUNT || x >= MATRIX_WIDTH || y >= MATRIX_HEIGHT {
            return None;
        }
        let per_matrix = usize::from(MATRIX_WIDTH).checked_mul(usize::from(MATRIX_HEIGHT))?;
        usize::from(matrix)
            .checked_mul(per_matrix)?
            .checked_add(usize::from(y).checked_mul(usize::from(MATRIX_WIDTH))?)?
            .checked_add(usize::from(x))
    }

    /// Buffered colour of one pixel, `None` when out of range.
    pub fn pixel(&self, matrix: MatrixId, x: u16, y: u16) -> Option<Color> {
        Self::slot(matrix, x, y).and_then(|i| self.pixels.get(i).copied())
    }

    /// `true` if every pixel of `matrix` has `color`.
    pub fn matrix_is(&self, matrix: MatrixId, color: Color) -> bool {
        (0..MATRIX_HEIGHT)
            .all(|y| (0..MATRIX_WIDTH).all(|x| self.pixel(matrix, x, y) == Some(color)))
    }

    /// Number of non-black pixels across all matrices.
    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|c| **c != Color::BLACK).count()
    }

    /// Calls to [`DisplaySurface::clear`] so far.
    pub fn clear_count(&self) -> usize {
        self.clear_count
    }

    /// Calls to [`DisplaySurface::show`] so far.
    pub fn show_count(&self) -> usize {
        self.show_count
    }

    /// Calls to [`DisplaySurface::set_pixel`] so far.
    pub fn set_pixel_count(&self) -> usize {
        self.set_pixel_count
    }

    /// `true` if any surface method has been called since the last reset.
    pub fn touched(&self) -> bool {
        self.clear_count > 0 || self.show_count > 0 || self.set_pixel_count > 0
    }

    /// Zero every call counter; pixel contents are kept.
    pub fn reset_counters(&mut self) {
        self.clear_count = 0;
        self.show_count = 0;
        self.set_pixel_count = 0;
    }
}

impl Default for MockSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for MockSurface {
    fn clear(&mut self) {
        self.clear_count = self.clear_count.saturating_add(1);
        self.pixels.fill(Color::BLACK);
    }

    fn set_pixel(&mut self, matrix: MatrixId, x: u16, y: u16, color: Color) {
        self.set_pixel_count = self.set_pixel_count.saturating_add(1);
        if let Some(px) = Self::slot(matrix, x, y).and_then(|i| self.pixels.get_mut(i)) {
            *px = color;
        }
    }

    fn show(&mut self) {
        self.show_count = self.show_count.saturating_add(1);
    }
}

/// In-memory flash region with optional injected faults.
pub struct RamFlash {
    data: Vec<u8>,
    fault: Option<Range<u32>>,
    reads: Cell<usize>,
}

impl RamFlash {
    /// Wrap `data` as a flash region.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            fault: None,
            reads: Cell::new(0),
        }
    }

    /// A region of `len` erased bytes (`0xFF`).
    pub fn erased(len: usize) -> Self {
        Self::new(vec![0xFF; len])
    }

    /// Make every read overlapping `range` fail with [`FlashError::Device`].
    #[must_use]
    pub fn with_fault(mut self, range: Range<u32>) -> Self {
        self.fault = Some(range);
        self
    }

    /// Number of `read` calls made so far.
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    /// Raw contents.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

impl FlashRegion for RamFlash {
    type Error = FlashError;

    fn read(&self, offset: u32, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.reads.set(self.reads.get().saturating_add(1));
        if !range_fits(offset, buf.len(), self.capacity()) {
            return Err(FlashError::OutOfBounds);
        }
        let end = offset.saturating_add(u32::try_from(buf.len()).unwrap_or(u32::MAX));
        if let Some(fault) = &self.fault {
            if offset < fault.end && fault.start < end {
                return Err(FlashError::Device);
            }
        }
        let start = usize::try_from(offset).map_err(|_| FlashError::OutOfBounds)?;
        let src = self
            .data
            .get(start..start.saturating_add(buf.len()))
            .ok_or(FlashError::OutOfBounds)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn capacity(&self) -> u32 {
        u32::try_from(self.data.len()).unwrap_or(u32::MAX)
    }
}

/// Manually driven clock.
#[derive(Default)]
pub struct MockClock {
    now: Cell<u64>,
}

impl MockClock {
    /// Start at `now_ms`.
    pub fn new(now_ms: u64) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    /// Jump to an absolute reading.
    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    /// Move forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
