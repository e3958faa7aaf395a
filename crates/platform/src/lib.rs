//! Hardware abstraction seams for the LED matrix show.
//!
//! This crate provides the trait-based capabilities every other crate is
//! written against, so the show logic runs unchanged on the device and on a
//! desktop host.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: Show facade, host driver)
//!         ↓
//! Feature Layers (library: index + catalog, playback: scheduler + dispatch)
//!         ↓
//! Platform seams (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (LED driver, SPI flash, timer)
//! ```
//!
//! # Capabilities
//!
//! - [`DisplaySurface`] - two addressable LED matrices (`clear`, `set_pixel`, `show`)
//! - [`FlashRegion`] - read-only provisioned data partition
//! - [`Clock`] - monotonic millisecond clock
//! - [`LogSink`] / [`EventLog`] - explicitly constructed bounded log
//!
//! # Features
//!
//! - `std`: host support (mocks, [`flash_image::FileFlash`], [`clock::SystemClock`])
//! - `defmt`: `defmt::Format` derives for hardware builds

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing over println! in lib code
#![allow(clippy::must_use_candidate)] // hardware accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod clock;
pub mod config;
pub mod display;
pub mod flash;
pub mod log;

#[cfg(feature = "std")]
pub mod flash_image;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

pub use clock::Clock;
pub use display::{Color, DisplaySurface, MatrixId};
pub use flash::{FlashError, FlashRegion};
pub use log::{EventLog, LogLevel, LogRecord, LogSink};
