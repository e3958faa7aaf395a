//! RenderDispatch: start one catalog entry on the display and keep it running.
//!
//! `render` makes exactly one attempt per call and reports success as a
//! `bool`. It is the only writer to the display surface: once it has started
//! drawing it always finishes with `show()`, and a failure before drawing
//! (missing record, unreadable payload) leaves the surface untouched.
//!
//! Holds are advanced by [`RenderDispatch::step`]; nothing here blocks.

use alloc::format;

use library::{read_payload, ContentEntry, ContentKind, FileTable};
use platform::config::{DIRECT_PROCEDURAL_HOLD_MS, TEST_PATTERN_HOLD_MS};
use platform::{DisplaySurface, FlashRegion, LogSink};

use crate::procedural::{draw_test_pattern, Animation};
use crate::renderer::{ContentRenderer, RenderInput, RendererError};

/// Who asked for the render; decides the procedural hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderOrigin {
    /// Chosen by the scheduler; procedurals hold for the entry's `duration_ms`
    Scheduled,
    /// Requested by id from outside; procedurals hold for a flat 5 s
    Direct,
}

/// Why a render attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// No index record matches the entry's `source_path`
    MissingSource,
    /// The payload could not be read from flash
    Read,
    /// The renderer rejected the payload (after drawing began)
    Renderer(RendererError),
}

#[cfg(feature = "std")]
impl std::error::Error for RenderError {}

impl core::fmt::Display for RenderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingSource => write!(f, "entry not found in flash"),
            Self::Read => write!(f, "flash read failed"),
            Self::Renderer(e) => write!(f, "renderer failed: {e}"),
        }
    }
}

/// Borrowed collaborators for one render call.
pub struct RenderContext<'a, F, S, L>
where
    F: FlashRegion,
    S: DisplaySurface + ?Sized,
    L: LogSink + ?Sized,
{
    /// Region holding the payloads
    pub flash: &'a F,
    /// Index records (from the catalog)
    pub files: &'a FileTable,
    /// Display to draw on
    pub surface: &'a mut S,
    /// Event log
    pub log: &'a mut L,
}

/// The render currently holding the display.
#[derive(Debug)]
pub enum ActiveRender {
    /// Flash-backed content forwarded to `ContentRenderer::update`
    Content {
        /// Catalog id
        id: u16,
        /// Scene, Animation, Scroll or Countdown
        kind: ContentKind,
        /// Hold deadline
        until_ms: u64,
    },
    /// Procedural animation advanced on its own frame interval
    Procedural {
        /// Catalog id
        id: u16,
        /// Animation state
        animation: Animation,
        /// Hold deadline
        until_ms: u64,
        /// Next frame due
        next_frame_ms: u64,
    },
    /// Static diagnostic fill
    Test {
        /// Catalog id
        id: u16,
        /// Hold deadline
        until_ms: u64,
    },
}

impl ActiveRender {
    /// Catalog id of the entry being shown.
    pub fn entry_id(&self) -> u16 {
        match self {
            Self::Content { id, .. } | Self::Procedural { id, .. } | Self::Test { id, .. } => *id,
        }
    }

    /// Clock reading at which the hold ends.
    pub fn until_ms(&self) -> u64 {
        match self {
            Self::Content { until_ms, .. }
            | Self::Procedural { until_ms, .. }
            | Self::Test { until_ms, .. } => *until_ms,
        }
    }
}

/// Maps each entry kind to its renderer and runs it.
#[derive(Debug)]
pub struct RenderDispatch<R: ContentRenderer> {
    renderer: R,
    active: Option<ActiveRender>,
    last_error: Option<RenderError>,
}

impl<R: ContentRenderer + Default> Default for RenderDispatch<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R: ContentRenderer> RenderDispatch<R> {
    /// Dispatch flash-backed content to `renderer`.
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            active: None,
            last_error: None,
        }
    }

    /// The content renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render currently holding the display, if any.
    pub fn active(&self) -> Option<&ActiveRender> {
        self.active.as_ref()
    }

    /// Why the most recent `render` returned `false`; cleared on success.
    pub fn last_error(&self) -> Option<RenderError> {
        self.last_error
    }

    /// Start `entry`, replacing whatever is active. Returns `true` on success.
    pub fn render<F, S, L>(
        &mut self,
        entry: &ContentEntry,
        origin: RenderOrigin,
        ctx: &mut RenderContext<'_, F, S, L>,
        now_ms: u64,
    ) -> bool
    where
        F: FlashRegion,
        S: DisplaySurface + ?Sized,
        L: LogSink + ?Sized,
    {
        self.active = None;
        ctx.log.info(&format!("Rendering: {}", entry.name));
        match self.start(entry, origin, ctx, now_ms) {
            Ok(active) => {
                self.active = Some(active);
                self.last_error = None;
                true
            }
            Err(e) => {
                let target = if entry.source_path.is_empty() {
                    entry.name.as_str()
                } else {
                    entry.source_path.as_str()
                };
                ctx.log.warn(&format!("{e}: {target}"));
                self.last_error = Some(e);
                false
            }
        }
    }

    fn start<F, S, L>(
        &mut self,
        entry: &ContentEntry,
        origin: RenderOrigin,
        ctx: &mut RenderContext<'_, F, S, L>,
        now_ms: u64,
    ) -> Result<ActiveRender, RenderError>
    where
        F: FlashRegion,
        S: DisplaySurface + ?Sized,
        L: LogSink + ?Sized,
    {
        match entry.kind {
            ContentKind::Scene | ContentKind::Animation | ContentKind::Scroll | ContentKind::Countdown => {
                let record = ctx
                    .files
                    .find(&entry.source_path)
                    .ok_or(RenderError::MissingSource)?;
                let bytes = read_payload(ctx.flash, record).map_err(|_| RenderError::Read)?;
                let input = RenderInput {
                    name: &entry.name,
                    path: &entry.source_path,
                    bytes: &bytes,
                    matrix: &entry.matrix,
                    now_ms,
                };
                let surface = &mut *ctx.surface;
                let log = &mut *ctx.log;
                let result = match entry.kind {
                    ContentKind::Scene => self.renderer.scene(&input, surface, log),
                    ContentKind::Animation => self.renderer.timeline(&input, surface, log),
                    ContentKind::Scroll => self.renderer.scroll(&input, surface, log),
                    _ => self.renderer.countdown(&input, surface, log),
                };
                surface.show();
                result.map_err(RenderError::Renderer)?;
                Ok(ActiveRender::Content {
                    id: entry.id,
                    kind: entry.kind,
                    until_ms: now_ms.saturating_add(u64::from(entry.duration_ms)),
                })
            }
            ContentKind::Procedural(kind) => {
                let hold_ms = match origin {
                    RenderOrigin::Scheduled => entry.duration_ms,
                    RenderOrigin::Direct => DIRECT_PROCEDURAL_HOLD_MS,
                };
                let mut animation = Animation::new(kind, now_ms ^ u64::from(entry.id));
                animation.draw_frame(&mut *ctx.surface);
                Ok(ActiveRender::Procedural {
                    id: entry.id,
                    until_ms: now_ms.saturating_add(u64::from(hold_ms)),
                    next_frame_ms: now_ms.saturating_add(u64::from(animation.frame_interval_ms())),
                    animation,
                })
            }
            ContentKind::Test(pattern) => {
                draw_test_pattern(pattern, &mut *ctx.surface);
                Ok(ActiveRender::Test {
                    id: entry.id,
                    until_ms: now_ms.saturating_add(u64::from(TEST_PATTERN_HOLD_MS)),
                })
            }
        }
    }

    /// Advance the active render to `now_ms`; ends it once its hold has elapsed.
    pub fn step<S, L>(&mut self, surface: &mut S, log: &mut L, now_ms: u64)
    where
        S: DisplaySurface + ?Sized,
        L: LogSink + ?Sized,
    {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if now_ms >= active.until_ms() {
            tracing::debug!(id = active.entry_id(), "hold elapsed");
            self.active = None;
            return;
        }
        match active {
            ActiveRender::Content { .. } => self.renderer.update(now_ms, surface, log),
            ActiveRender::Procedural {
                animation,
                next_frame_ms,
                ..
            } => {
                if now_ms >= *next_frame_ms {
                    animation.draw_frame(surface);
                    *next_frame_ms = now_ms.saturating_add(u64::from(animation.frame_interval_ms()));
                }
            }
            ActiveRender::Test { .. } => {}
        }
    }

    /// `true` while a render is active and its hold has not elapsed.
    pub fn is_holding(&self, now_ms: u64) -> bool {
        self.active.as_ref().is_some_and(|a| now_ms < a.until_ms())
    }
}
