//! Display surfaces for the show
//!
//! On the device the LED driver implements [`platform::DisplaySurface`]
//! directly. On the desktop host, [`TerminalSurface`] draws each shown frame
//! into a terminal with 24-bit colour escapes.

#[cfg(feature = "std")]
pub mod terminal;

#[cfg(feature = "std")]
pub use terminal::TerminalSurface;
