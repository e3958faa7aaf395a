//! Show configuration and constants
//!
//! Central configuration values used across the show. Everything that
//! describes the physical installation, the provisioned flash layout, or a
//! playback default lives here rather than being hardcoded at the call site.

/// The application name
pub const APP_NAME: &str = "Matrix Show";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ── Physical installation ────────────────────────────────────────────────────

/// Number of active LED matrices (right window = 0, left window = 1).
pub const MATRIX_COUNT: u8 = 2;

/// Number of scene slots carried by every catalog entry.
///
/// One more than [`MATRIX_COUNT`]: slot 2 is reserved for the mega matrix
/// which is not wired up yet.
pub const MATRIX_SLOTS: usize = 3;

/// Columns per matrix.
pub const MATRIX_WIDTH: u16 = 20;

/// Rows per matrix.
pub const MATRIX_HEIGHT: u16 = 25;

// ── Flash layout ─────────────────────────────────────────────────────────────

/// Absolute address of the data partition inside the SPI flash chip.
///
/// [`crate::FlashRegion`] offsets are relative to this address. It is
/// 512-aligned, so record alignment computed on region offsets matches the
/// alignment the provisioning tool computed on absolute addresses.
pub const DATA_PARTITION_OFFSET: u32 = 0x0029_0000;

/// Offset of the content index inside the data partition.
pub const INDEX_START: u32 = 0;

/// Sanity bound on the declared record count.
///
/// Erased flash reads back as `0xFFFF_FFFF`, which this rejects.
pub const MAX_INDEX_RECORDS: u32 = 500;

/// Longest path the provisioning tool writes, in bytes.
pub const MAX_PATH_LEN: u16 = 255;

/// Every record starts on a multiple of this many bytes.
pub const RECORD_ALIGN: u32 = 512;

// ── Playback defaults ────────────────────────────────────────────────────────

/// Hold time for entries whose metadata does not name one.
pub const DEFAULT_DURATION_MS: u32 = 5_000;

/// Default gap before the first random pick after random mode is enabled.
pub const DEFAULT_RANDOM_INTERVAL_MS: u32 = 10_000;

/// Flat hold used when a procedural entry is rendered directly (not scheduled).
pub const DIRECT_PROCEDURAL_HOLD_MS: u32 = 5_000;

/// Hold for a diagnostic fill pattern.
pub const TEST_PATTERN_HOLD_MS: u32 = 2_000;

// ── Logging ──────────────────────────────────────────────────────────────────

/// Lines kept by the in-memory event log (oldest evicted first).
pub const LOG_CAPACITY: usize = 100;

/// Bytes kept per log line; longer lines are truncated at a char boundary.
pub const LOG_LINE_CAPACITY: usize = 128;

/// Full application title (name + version)
pub const fn app_title() -> &'static str {
    APP_NAME
}
