//! Matrix Show application layer
//!
//! Wires the content catalog, playback scheduler and render dispatch to the
//! platform seams and exposes the whole show as one [`Show`] value.
//!
//! # Architecture
//!
//! ```text
//! Application Layer (Show facade, host driver)
//!         ↓
//! Feature Layers (library: index + catalog, playback: scheduler + dispatch)
//!         ↓
//! Platform seams (DisplaySurface, FlashRegion, Clock, LogSink)
//!         ↓
//! Hardware (LED matrices, SPI flash) or host (terminal, image file)
//! ```
//!
//! # Features
//!
//! - `std` - host display surface and file-backed flash
//! - `emulator` - the `matrix-show` desktop binary (tokio, clap, tracing-subscriber)
//! - `defmt` - `defmt::Format` derives for hardware builds
//!
//! # Emulator Target
//!
//! ```bash
//! cargo xtask pack-content content/ content.bin
//! RUST_LOG=info cargo run -p firmware --features emulator -- content.bin --random
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline
#![warn(clippy::print_stdout)] // prefer tracing over println! in lib code
#![warn(clippy::dbg_macro)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

extern crate alloc;

pub mod display;
pub mod show;

pub use show::Show;

#[cfg(feature = "std")]
pub use display::TerminalSurface;
