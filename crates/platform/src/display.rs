//! Display abstraction layer

use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::Rgb888;

use crate::config::{MATRIX_COUNT, MATRIX_HEIGHT, MATRIX_WIDTH};

/// Pixel colour written to the LED matrices.
pub type Color = Rgb888;

/// Index of a physical matrix (0 = right window, 1 = left window).
pub type MatrixId = u8;

/// Framebuffer over every physical LED matrix.
///
/// Coordinate mapping (serpentine wiring, rotation) is the implementor's
/// concern. Writes are buffered until [`DisplaySurface::show`]; out-of-range
/// coordinates are ignored.
pub trait DisplaySurface {
    /// Set every pixel on every matrix to black (buffered).
    fn clear(&mut self);

    /// Set one pixel on one matrix (buffered).
    fn set_pixel(&mut self, matrix: MatrixId, x: u16, y: u16, color: Color);

    /// Push the buffered frame to the LEDs.
    fn show(&mut self);

    /// Number of addressable matrices.
    fn matrix_count(&self) -> u8 {
        MATRIX_COUNT
    }

    /// Dimensions of one matrix (width = columns, height = rows).
    fn size(&self) -> Size {
        Size::new(u32::from(MATRIX_WIDTH), u32::from(MATRIX_HEIGHT))
    }

    /// Fill every pixel of `matrix` with `color` (buffered).
    fn fill_matrix(&mut self, matrix: MatrixId, color: Color) {
        let size = self.size();
        let width = u16::try_from(size.width).unwrap_or(MATRIX_WIDTH);
        let height = u16::try_from(size.height).unwrap_or(MATRIX_HEIGHT);
        for y in 0..height {
            for x in 0..width {
                self.set_pixel(matrix, x, y, color);
            }
        }
    }
}
