//! PlaybackScheduler: tick-driven selection of the next catalog entry.
//!
//! The scheduler never blocks. On each [`tick`](PlaybackScheduler::tick) it
//! checks whether the latched hold has elapsed and, if so, picks one entry
//! from the eligible pool and hands it to the dispatch callback.
//!
//! # State machine
//!
//! ```text
//! Disabled ──set_enabled(true)──► Holding ──hold elapsed──► Select
//!    ▲                               ▲                        │
//!    └──────set_enabled(false)───────┴──── latch new hold ────┘
//! ```
//!
//! Only the off-to-on edge of a switch restarts the clock; a latched item
//! hold always runs to completion.
//!
//! Selection comes from one of two sources:
//!
//! - random mode: uniform pick over every non-test entry matching the theme
//!   filter
//! - playlist mode: the next playlist id that resolves to a non-test entry
//!   matching the theme filter
//!
//! An empty pool leaves the clock untouched, so the next tick tries again.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use rand::Rng;

use library::{ContentCatalog, ContentEntry};
use platform::config::DEFAULT_RANDOM_INTERVAL_MS;
use platform::LogSink;

/// Everything the scheduler knows. Changed only through the setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleState {
    /// Master switch; nothing is selected while `false`
    pub enabled: bool,
    /// Uniform random source when `true`, playlist when `false`
    pub random_enabled: bool,
    /// Gap before the first pick after enabling
    pub random_interval_ms: u32,
    /// Only entries with this theme are eligible; empty means any
    pub theme_filter: String,
    /// Clock reading of the last selection (or of enabling)
    pub last_change_at: u64,
    /// Hold latched at the last selection
    pub current_hold_ms: u32,
    /// Ids played in order when random mode is off
    pub playlist: Vec<u16>,
    /// Position of the next playlist id
    pub playlist_cursor: usize,
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self {
            enabled: false,
            random_enabled: false,
            random_interval_ms: DEFAULT_RANDOM_INTERVAL_MS,
            theme_filter: String::new(),
            last_change_at: 0,
            current_hold_ms: 0,
            playlist: Vec::new(),
            playlist_cursor: 0,
        }
    }
}

impl ScheduleState {
    /// `true` if `entry` may be selected under the current filter.
    pub fn is_eligible(&self, entry: &ContentEntry) -> bool {
        !entry.kind.is_test() && (self.theme_filter.is_empty() || entry.theme == self.theme_filter)
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Scheduling is off
    Disabled,
    /// The latched hold has not elapsed
    Holding,
    /// No eligible entry; the clock was not advanced
    NoCandidate,
    /// `id` was handed to dispatch, which returned `rendered`
    Selected {
        /// Catalog id
        id: u16,
        /// Dispatch result
        rendered: bool,
    },
}

/// Tick-driven selector.
#[derive(Debug, Clone, Default)]
pub struct PlaybackScheduler {
    state: ScheduleState,
}

impl PlaybackScheduler {
    /// A disabled scheduler with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    /// Turn scheduling on or off. Switching from off to on restarts the
    /// clock with `random_interval_ms` as the first hold; repeating `true`
    /// while already on leaves the running hold alone.
    pub fn set_enabled<L: LogSink + ?Sized>(&mut self, enabled: bool, now_ms: u64, log: &mut L) {
        let was_enabled = core::mem::replace(&mut self.state.enabled, enabled);
        if enabled && !was_enabled {
            self.restart(now_ms);
        }
        log.info(if enabled { "Scheduler ON" } else { "Scheduler OFF" });
    }

    /// Switch between random and playlist selection. Switching random mode on
    /// restarts the clock like [`set_enabled`](Self::set_enabled), unless a
    /// hold is still running: an item that has started always plays out.
    pub fn set_random_enabled<L: LogSink + ?Sized>(&mut self, enabled: bool, now_ms: u64, log: &mut L) {
        let was_random = core::mem::replace(&mut self.state.random_enabled, enabled);
        if enabled && !was_random && !self.is_holding(now_ms) {
            self.restart(now_ms);
        }
        log.info(if enabled { "Random mode ON" } else { "Random mode OFF" });
    }

    /// Gap used by the next enable. A hold already running is not changed.
    pub fn set_random_interval(&mut self, interval_ms: u32) {
        self.state.random_interval_ms = interval_ms;
    }

    /// Restrict selection to `theme`; an empty string removes the filter.
    pub fn set_theme_filter<L: LogSink + ?Sized>(&mut self, theme: &str, log: &mut L) {
        self.state.theme_filter = theme.into();
        if theme.is_empty() {
            log.info("Random filter: ALL THEMES");
        } else {
            log.info(&format!("Random filter: {theme}"));
        }
    }

    /// Replace the playlist and rewind it.
    pub fn set_playlist(&mut self, ids: Vec<u16>) {
        self.state.playlist = ids;
        self.state.playlist_cursor = 0;
    }

    fn restart(&mut self, now_ms: u64) {
        self.state.last_change_at = now_ms;
        self.state.current_hold_ms = self.state.random_interval_ms;
    }

    /// `true` while the latched hold has not elapsed at `now_ms`.
    pub fn is_holding(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.state.last_change_at) < u64::from(self.state.current_hold_ms)
    }

    /// Run one scheduling step.
    ///
    /// `dispatch` renders the chosen entry and returns whether it succeeded.
    /// The clock advances after any dispatch, successful or not.
    pub fn tick<R, L, D>(
        &mut self,
        now_ms: u64,
        catalog: &ContentCatalog,
        rng: &mut R,
        log: &mut L,
        mut dispatch: D,
    ) -> TickOutcome
    where
        R: Rng + ?Sized,
        L: LogSink + ?Sized,
        D: FnMut(&ContentEntry, &mut L) -> bool,
    {
        if !self.state.enabled {
            return TickOutcome::Disabled;
        }
        if self.is_holding(now_ms) {
            return TickOutcome::Holding;
        }

        let picked = if self.state.random_enabled {
            self.pick_random(catalog, rng)
        } else {
            self.pick_playlist(catalog)
        };
        let Some(entry) = picked else {
            tracing::trace!(filter = %self.state.theme_filter, "no eligible entry");
            return TickOutcome::NoCandidate;
        };

        log.info(&format!("Playing: {}", entry.name));
        let rendered = dispatch(entry, log);
        self.state.last_change_at = now_ms;
        self.state.current_hold_ms = entry.duration_ms;
        TickOutcome::Selected {
            id: entry.id,
            rendered,
        }
    }

    fn pick_random<'c, R: Rng + ?Sized>(&self, catalog: &'c ContentCatalog, rng: &mut R) -> Option<&'c ContentEntry> {
        let pool: Vec<&ContentEntry> = catalog
            .entries()
            .iter()
            .filter(|e| self.state.is_eligible(e))
            .collect();
        if pool.is_empty() {
            return None;
        }
        pool.get(rng.gen_range(0..pool.len())).copied()
    }

    /// Walk at most one full lap of the playlist from the cursor.
    fn pick_playlist<'c>(&mut self, catalog: &'c ContentCatalog) -> Option<&'c ContentEntry> {
        let len = self.state.playlist.len();
        for _ in 0..len {
            let cursor = self.state.playlist_cursor.min(len.saturating_sub(1));
            let id = self.state.playlist.get(cursor).copied();
            self.state.playlist_cursor = if cursor.saturating_add(1) >= len {
                0
            } else {
                cursor.saturating_add(1)
            };
            if let Some(entry) = id.and_then(|id| catalog.get(id)) {
                if self.state.is_eligible(entry) {
                    return Some(entry);
                }
            }
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use library::FileTable;
    use platform::mocks::RamFlash;
    use platform::EventLog;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn builtin_catalog() -> ContentCatalog {
        let mut catalog = ContentCatalog::new();
        let mut log: EventLog<16> = EventLog::new();
        catalog.build(FileTable::new(), &RamFlash::new(Vec::new()), &mut log);
        catalog
    }

    #[test]
    fn starts_disabled() {
        let catalog = builtin_catalog();
        let mut s = PlaybackScheduler::new();
        let mut log: EventLog<8> = EventLog::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let out = s.tick(1_000_000, &catalog, &mut rng, &mut log, |_, _| true);
        assert_eq!(out, TickOutcome::Disabled);
    }

    #[test]
    fn enable_latches_random_interval() {
        let mut s = PlaybackScheduler::new();
        let mut log: EventLog<8> = EventLog::new();
        s.set_random_interval(3000);
        s.set_enabled(true, 500, &mut log);
        assert_eq!(s.state().last_change_at, 500);
        assert_eq!(s.state().current_hold_ms, 3000);
        assert!(s.is_holding(3499));
        assert!(!s.is_holding(3500));
    }

    #[test]
    fn interval_change_does_not_touch_running_hold() {
        let mut s = PlaybackScheduler::new();
        let mut log: EventLog<8> = EventLog::new();
        s.set_enabled(true, 0, &mut log);
        s.set_random_interval(1);
        assert_eq!(s.state().current_hold_ms, DEFAULT_RANDOM_INTERVAL_MS);
    }

    #[test]
    fn repeated_enable_keeps_running_hold() {
        let catalog = builtin_catalog();
        let mut s = PlaybackScheduler::new();
        let mut log: EventLog<8> = EventLog::new();
        let mut rng = SmallRng::seed_from_u64(1);
        s.set_random_interval(0);
        s.set_enabled(true, 0, &mut log);
        s.set_random_enabled(true, 0, &mut log);
        let first = s.tick(0, &catalog, &mut rng, &mut log, |_, _| true);
        assert!(matches!(first, TickOutcome::Selected { .. }));
        let hold = s.state().current_hold_ms;

        s.set_enabled(true, 100, &mut log);
        s.set_random_enabled(true, 100, &mut log);
        assert_eq!(s.state().last_change_at, 0);
        assert_eq!(s.state().current_hold_ms, hold);
        let second = s.tick(100, &catalog, &mut rng, &mut log, |_, _| true);
        assert_eq!(second, TickOutcome::Holding);
    }

    #[test]
    fn random_switch_does_not_replace_item_hold() {
        let catalog = builtin_catalog();
        let mut s = PlaybackScheduler::new();
        let mut log: EventLog<8> = EventLog::new();
        let mut rng = SmallRng::seed_from_u64(1);
        s.set_random_interval(0);
        s.set_playlist(vec![1]);
        s.set_enabled(true, 0, &mut log);
        let first = s.tick(0, &catalog, &mut rng, &mut log, |_, _| true);
        assert_eq!(first, TickOutcome::Selected { id: 1, rendered: true });

        s.set_random_enabled(false, 50, &mut log);
        s.set_random_enabled(true, 100, &mut log);
        assert_eq!(s.state().last_change_at, 0);
        assert_eq!(s.tick(100, &catalog, &mut rng, &mut log, |_, _| true), TickOutcome::Holding);
    }

    #[test]
    fn reenable_after_off_restarts_clock() {
        let mut s = PlaybackScheduler::new();
        let mut log: EventLog<8> = EventLog::new();
        s.set_enabled(true, 0, &mut log);
        s.set_enabled(false, 10, &mut log);
        s.set_enabled(true, 20, &mut log);
        assert_eq!(s.state().last_change_at, 20);
    }

    #[test]
    fn playlist_skips_tests_and_wraps() {
        let catalog = builtin_catalog();
        let mut s = PlaybackScheduler::new();
        let mut log: EventLog<32> = EventLog::new();
        let mut rng = SmallRng::seed_from_u64(1);
        // 8 is a test pattern, 99 does not exist.
        s.set_playlist(vec![2, 8, 99, 6]);
        s.set_enabled(true, 0, &mut log);

        let mut picked = Vec::new();
        let mut now = 0;
        for _ in 0..3 {
            now += 20_000;
            if let TickOutcome::Selected { id, .. } = s.tick(now, &catalog, &mut rng, &mut log, |_, _| true) {
                picked.push(id);
            }
        }
        assert_eq!(picked, [2, 6, 2]);
    }

    #[test]
    fn empty_playlist_is_no_candidate() {
        let catalog = builtin_catalog();
        let mut s = PlaybackScheduler::new();
        let mut log: EventLog<8> = EventLog::new();
        let mut rng = SmallRng::seed_from_u64(1);
        s.set_enabled(true, 0, &mut log);
        let out = s.tick(60_000, &catalog, &mut rng, &mut log, |_, _| true);
        assert_eq!(out, TickOutcome::NoCandidate);
        assert_eq!(s.state().last_change_at, 0);
    }

    #[test]
    fn failed_dispatch_still_advances_clock() {
        let catalog = builtin_catalog();
        let mut s = PlaybackScheduler::new();
        let mut log: EventLog<8> = EventLog::new();
        let mut rng = SmallRng::seed_from_u64(7);
        s.set_enabled(true, 0, &mut log);
        s.set_random_enabled(true, 0, &mut log);
        let out = s.tick(10_000, &catalog, &mut rng, &mut log, |_, _| false);
        assert!(matches!(out, TickOutcome::Selected { rendered: false, .. }));
        assert_eq!(s.state().last_change_at, 10_000);
        assert_eq!(s.state().current_hold_ms, 5000);
    }
}
