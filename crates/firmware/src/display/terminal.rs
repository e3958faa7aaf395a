//! Terminal display surface
//!
//! Buffers every matrix and, on `show()`, redraws the whole frame with
//! half-block characters: each character cell carries two pixel rows
//! (foreground = upper, background = lower). Matrices are laid out left to
//! right in window order, left window first.

use std::io::Write;

use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use platform::config::{MATRIX_COUNT, MATRIX_HEIGHT, MATRIX_WIDTH};
use platform::{Color, DisplaySurface, MatrixId};

const UPPER_HALF: char = '\u{2580}';
const HOME: &str = "\x1b[H";
const RESET: &str = "\x1b[0m";

/// Host framebuffer that renders into a terminal.
pub struct TerminalSurface<W: Write> {
    out: W,
    pixels: Vec<Color>,
    frames: u64,
    write_failed: bool,
}

impl<W: Write> TerminalSurface<W> {
    /// Draw into `out` (usually a locked stdout).
    pub fn new(out: W) -> Self {
        let len = usize::from(MATRIX_COUNT)
            .saturating_mul(usize::from(MATRIX_WIDTH))
            .saturating_mul(usize::from(MATRIX_HEIGHT));
        Self {
            out,
            pixels: vec![Rgb888::BLACK; len],
            frames: 0,
            write_failed: false,
        }
    }

    /// Frames pushed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Buffered colour of one pixel.
    pub fn pixel(&self, matrix: MatrixId, x: u16, y: u16) -> Option<Color> {
        slot(matrix, x, y).and_then(|i| self.pixels.get(i).copied())
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn pixel_or_black(&self, matrix: MatrixId, x: u16, y: u16) -> Color {
        self.pixel(matrix, x, y).unwrap_or(Rgb888::BLACK)
    }

    fn render(&mut self) -> std::io::Result<()> {
        let mut frame = String::from(HOME);
        for row in (0..MATRIX_HEIGHT).step_by(2) {
            // Left window (matrix 1) first, as seen from outside.
            for matrix in (0..MATRIX_COUNT).rev() {
                for x in 0..MATRIX_WIDTH {
                    let top = self.pixel_or_black(matrix, x, row);
                    let bottom = self.pixel_or_black(matrix, x, row.saturating_add(1));
                    frame.push_str(&format!(
                        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{UPPER_HALF}",
                        top.r(),
                        top.g(),
                        top.b(),
                        bottom.r(),
                        bottom.g(),
                        bottom.b(),
                    ));
                }
                frame.push_str(RESET);
                frame.push(' ');
            }
            frame.push('\n');
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()
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

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn clear(&mut self) {
        self.pixels.fill(Rgb888::BLACK);
    }

    fn set_pixel(&mut self, matrix: MatrixId, x: u16, y: u16, color: Color) {
        if let Some(px) = slot(matrix, x, y).and_then(|i| self.pixels.get_mut(i)) {
            *px = color;
        }
    }

    fn show(&mut self) {
        self.frames = self.frames.saturating_add(1);
        if let Err(e) = self.render() {
            // Report once; a closed terminal would otherwise flood the log.
            if !self.write_failed {
                tracing::warn!(error = %e, "terminal write failed");
                self.write_failed = true;
            }
        }
    }

    fn size(&self) -> Size {
        Size::new(u32::from(MATRIX_WIDTH), u32::from(MATRIX_HEIGHT))
    }
}
