//! Content renderers for flash-backed entries.
//!
//! RenderDispatch reads the payload and hands it to a [`ContentRenderer`];
//! pixel-level drawing of scenes, timelines, scrolling text and countdowns
//! lives behind this trait. [`PlaceholderRenderer`] is the default: it
//! clears the surface and validates each payload's settings.

use alloc::format;

use library::{CountdownError, CountdownTarget, MatrixAssignment, MetadataError, ScrollSettings};
use platform::{DisplaySurface, LogSink};

/// Failure reported by a renderer after drawing has begun.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RendererError {
    /// Payload is not a usable metadata object
    Metadata(MetadataError),
    /// Countdown payload has no usable target
    Countdown(CountdownError),
}

#[cfg(feature = "std")]
impl std::error::Error for RendererError {}

impl core::fmt::Display for RendererError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Metadata(e) => write!(f, "{e}"),
            Self::Countdown(e) => write!(f, "countdown: {e}"),
        }
    }
}

impl From<MetadataError> for RendererError {
    fn from(e: MetadataError) -> Self {
        Self::Metadata(e)
    }
}

impl From<CountdownError> for RendererError {
    fn from(e: CountdownError) -> Self {
        Self::Countdown(e)
    }
}

/// Everything a renderer gets about the entry being started.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    /// Entry display name
    pub name: &'a str,
    /// Index path the payload was read from
    pub path: &'a str,
    /// Full payload
    pub bytes: &'a [u8],
    /// Per-matrix scene references
    pub matrix: &'a MatrixAssignment,
    /// Clock reading when the render started
    pub now_ms: u64,
}

/// Draws flash-backed content onto the surface.
///
/// Each start method draws the first frame into the surface buffer but does
/// not call `show()`; the dispatcher does that whether or not the method
/// succeeded.
pub trait ContentRenderer {
    /// Static per-matrix scene.
    fn scene<S, L>(&mut self, input: &RenderInput<'_>, surface: &mut S, log: &mut L) -> Result<(), RendererError>
    where
        S: DisplaySurface + ?Sized,
        L: LogSink + ?Sized;

    /// Frame timeline animation.
    fn timeline<S, L>(&mut self, input: &RenderInput<'_>, surface: &mut S, log: &mut L) -> Result<(), RendererError>
    where
        S: DisplaySurface + ?Sized,
        L: LogSink + ?Sized;

    /// Scrolling text.
    fn scroll<S, L>(&mut self, input: &RenderInput<'_>, surface: &mut S, log: &mut L) -> Result<(), RendererError>
    where
        S: DisplaySurface + ?Sized,
        L: LogSink + ?Sized;

    /// Countdown to a target date.
    fn countdown<S, L>(&mut self, input: &RenderInput<'_>, surface: &mut S, log: &mut L) -> Result<(), RendererError>
    where
        S: DisplaySurface + ?Sized,
        L: LogSink + ?Sized;

    /// Advance the content started last; called on every step while it holds.
    fn update<S, L>(&mut self, now_ms: u64, surface: &mut S, log: &mut L)
    where
        S: DisplaySurface + ?Sized,
        L: LogSink + ?Sized,
    {
        let _ = (now_ms, surface, log);
    }
}

/// Default renderer: clears the display and checks each payload's settings.
#[derive(Debug, Default)]
pub struct PlaceholderRenderer {
    scroll: Option<ScrollSettings>,
    countdown: Option<CountdownTarget>,
}

impl PlaceholderRenderer {
    /// A renderer with nothing parsed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings of the last scroll payload that parsed.
    pub fn last_scroll(&self) -> Option<&ScrollSettings> {
        self.scroll.as_ref()
    }

    /// Target of the last countdown payload that parsed.
    pub fn last_countdown(&self) -> Option<CountdownTarget> {
        self.countdown
    }
}

impl ContentRenderer for PlaceholderRenderer {
    fn scene<S, L>(&mut self, input: &RenderInput<'_>, surface: &mut S, log: &mut L) -> Result<(), RendererError>
    where
        S: DisplaySurface + ?Sized,
        L: LogSink + ?Sized,
    {
        surface.clear();
        log.info(&format!("Rendered from flash: {}", input.name));
        Ok(())
    }

    fn timeline<S, L>(&mut self, input: &RenderInput<'_>, surface: &mut S, log: &mut L) -> Result<(), RendererError>
    where
        S: DisplaySurface + ?Sized,
        L: LogSink + ?Sized,
    {
        surface.clear();
        log.info(&format!("Rendered from flash: {}", input.name));
        Ok(())
    }

    fn scroll<S, L>(&mut self, input: &RenderInput<'_>, surface: &mut S, log: &mut L) -> Result<(), RendererError>
    where
        S: DisplaySurface + ?Sized,
        L: LogSink + ?Sized,
    {
        surface.clear();
        let settings = ScrollSettings::decode(input.bytes)?;
        log.info(&format!(
            "Scroll rendered: {} (\"{}\", {} ms)",
            input.name, settings.text, settings.speed_ms
        ));
        self.scroll = Some(settings);
        Ok(())
    }

    fn countdown<S, L>(&mut self, input: &RenderInput<'_>, surface: &mut S, log: &mut L) -> Result<(), RendererError>
    where
        S: DisplaySurface + ?Sized,
        L: LogSink + ?Sized,
    {
        surface.clear();
        let target = CountdownTarget::decode(input.bytes)?;
        log.info(&format!(
            "Countdown rendered: {} (target {})",
            input.name, target.epoch_secs
        ));
        self.countdown = Some(target);
        Ok(())
    }
}
