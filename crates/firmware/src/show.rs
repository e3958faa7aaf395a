//! The show facade.
//!
//! [`Show`] owns every piece of runtime state: the catalog, the scheduler,
//! the render dispatcher, the event log and the RNG. Callers drive it with
//! [`Show::tick`] from an outer loop (a hardware timer or the host's tokio
//! interval) and control it through the setters below. Nothing here blocks.

use alloc::format;
use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use library::{ContentCatalog, ContentEntry, ThemeSet};
use platform::config::{INDEX_START, LOG_CAPACITY};
use platform::{Clock, DisplaySurface, EventLog, FlashRegion, LogRecord, LogSink};
use playback::{
    PlaceholderRenderer, PlaybackScheduler, RenderContext, RenderDispatch, RenderOrigin, ScheduleState,
    TickOutcome,
};

/// Everything the show needs, in one place.
pub struct Show<F, S, C>
where
    F: FlashRegion,
    S: DisplaySurface,
    C: Clock,
{
    flash: F,
    surface: S,
    clock: C,
    catalog: ContentCatalog,
    scheduler: PlaybackScheduler,
    dispatch: RenderDispatch<PlaceholderRenderer>,
    log: EventLog<LOG_CAPACITY>,
    rng: SmallRng,
}

impl<F, S, C> Show<F, S, C>
where
    F: FlashRegion,
    S: DisplaySurface,
    C: Clock,
{
    /// Assemble a show. The catalog stays empty until [`build_catalog`](Self::build_catalog).
    ///
    /// `seed` drives random selection. Hardware builds should take it from
    /// the TRNG: the boot clock reads the same on every power-up.
    pub fn new(flash: F, surface: S, clock: C, seed: u64) -> Self {
        Self {
            flash,
            surface,
            clock,
            catalog: ContentCatalog::new(),
            scheduler: PlaybackScheduler::new(),
            dispatch: RenderDispatch::new(PlaceholderRenderer::new()),
            log: EventLog::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    // ── Catalog ──────────────────────────────────────────────────────────

    /// Walk the flash index and rebuild the catalog from scratch.
    pub fn build_catalog(&mut self) {
        self.catalog.discover(&self.flash, INDEX_START, &mut self.log);
    }

    /// Every entry in id order.
    pub fn entries(&self) -> &[ContentEntry] {
        self.catalog.entries()
    }

    /// Entry with `id`.
    pub fn entry(&self, id: u16) -> Option<&ContentEntry> {
        self.catalog.get(id)
    }

    /// Entries tagged `theme`.
    pub fn entries_by_theme<'a>(&'a self, theme: &'a str) -> impl Iterator<Item = &'a ContentEntry> + 'a {
        self.catalog.by_theme(theme)
    }

    /// Themes in first-seen order.
    pub fn themes(&self) -> &ThemeSet {
        self.catalog.themes()
    }

    /// The catalog itself.
    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    // ── Rendering ────────────────────────────────────────────────────────

    /// Show entry `id` now, replacing whatever is on the display.
    ///
    /// Procedural entries hold for the flat direct-render time rather than
    /// their `duration_ms`. An unknown id returns `false` and leaves the
    /// display alone.
    pub fn render_entry(&mut self, id: u16) -> bool {
        let Some(entry) = self.catalog.get(id) else {
            self.log.warn(&format!("Unknown entry id: {id}"));
            return false;
        };
        let now = self.clock.now_ms();
        let mut ctx = RenderContext {
            flash: &self.flash,
            files: self.catalog.files(),
            surface: &mut self.surface,
            log: &mut self.log,
        };
        self.dispatch.render(entry, RenderOrigin::Direct, &mut ctx, now)
    }

    // ── Schedule ─────────────────────────────────────────────────────────

    /// Turn automatic playback on or off.
    pub fn set_schedule_enabled(&mut self, enabled: bool) {
        let now = self.clock.now_ms();
        self.scheduler.set_enabled(enabled, now, &mut self.log);
    }

    /// Pick at random (`true`) or walk the playlist (`false`).
    pub fn set_random_enabled(&mut self, enabled: bool) {
        let now = self.clock.now_ms();
        self.scheduler.set_random_enabled(enabled, now, &mut self.log);
    }

    /// Gap before the first pick after the next off-to-on switch of
    /// [`set_schedule_enabled`](Self::set_schedule_enabled) or
    /// [`set_random_enabled`](Self::set_random_enabled). Holds latched by a
    /// selection use the entry's own duration, so the new value is not read
    /// until the scheduler is switched on again.
    pub fn set_random_interval(&mut self, interval_ms: u32) {
        self.scheduler.set_random_interval(interval_ms);
    }

    /// Only schedule entries tagged `theme`; `""` clears the filter.
    pub fn set_theme_filter(&mut self, theme: &str) {
        self.scheduler.set_theme_filter(theme, &mut self.log);
    }

    /// Ids to play in order while random mode is off.
    pub fn set_playlist(&mut self, ids: Vec<u16>) {
        self.scheduler.set_playlist(ids);
    }

    /// Scheduler state.
    pub fn schedule(&self) -> &ScheduleState {
        self.scheduler.state()
    }

    /// Advance the active render, then let the scheduler pick if its hold is over.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now_ms();
        self.dispatch.step(&mut self.surface, &mut self.log, now);

        let flash = &self.flash;
        let files = self.catalog.files();
        let surface = &mut self.surface;
        let dispatch = &mut self.dispatch;
        self.scheduler
            .tick(now, &self.catalog, &mut self.rng, &mut self.log, |entry, log| {
                let mut ctx = RenderContext {
                    flash,
                    files,
                    surface: &mut *surface,
                    log,
                };
                dispatch.render(entry, RenderOrigin::Scheduled, &mut ctx, now)
            })
    }

    // ── Introspection ────────────────────────────────────────────────────

    /// Recent log lines, oldest first.
    pub fn recent_logs(&self) -> impl Iterator<Item = &LogRecord> {
        self.log.iter()
    }

    /// The event log.
    pub fn log(&self) -> &EventLog<LOG_CAPACITY> {
        &self.log
    }

    /// Render dispatcher (active render, last error).
    pub fn dispatch(&self) -> &RenderDispatch<PlaceholderRenderer> {
        &self.dispatch
    }

    /// The display surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable display surface, for drivers that need to service it.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
