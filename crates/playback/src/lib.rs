//! Playback engine: scheduler, render dispatch and the built-in animations.
//!
//! - [`scheduler`] decides *when* the next entry starts and *which* one
//! - [`dispatch`] maps an entry to its renderer and keeps its hold running
//! - [`procedural`] draws the animations and test patterns that need no flash
//! - [`renderer`] is the seam for flash-backed content
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

extern crate alloc;

pub mod dispatch;
pub mod procedural;
pub mod renderer;
pub mod scheduler;

pub use dispatch::{ActiveRender, RenderContext, RenderDispatch, RenderError, RenderOrigin};
pub use procedural::{draw_test_pattern, frame_interval_ms, Animation};
pub use renderer::{ContentRenderer, PlaceholderRenderer, RenderInput, RendererError};
pub use scheduler::{PlaybackScheduler, ScheduleState, TickOutcome};
