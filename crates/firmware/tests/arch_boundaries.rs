//! Architecture boundary tests: run with `cargo test -p firmware --features std --test arch_boundaries`
#![allow(clippy::unwrap_used, clippy::expect_used)]
//!
//! Layering rules:
//!   Rule 1: platform (seams) must not depend on library, playback or firmware
//!   Rule 2: library must not depend on playback or firmware
//!   Rule 3: playback reaches the display only through `DisplaySurface`
//!
//! These are compile-time rules enforced by the workspace dependency graph.
//! The tests below name the types each layer exposes; if a layer gained an
//! upward dependency the workspace would fail to resolve (cycle) before these
//! ran.

use platform::mocks::{MockSurface, RamFlash};
use platform::EventLog;

/// The platform seams are nameable without any application types.
#[test]
fn platform_seams_are_independent() {
    fn _assert_surface<T: platform::DisplaySurface>() {}
    fn _assert_flash<T: platform::FlashRegion>() {}
    fn _assert_clock<T: platform::Clock>() {}
    fn _assert_sink<T: platform::LogSink>() {}

    _assert_surface::<MockSurface>();
    _assert_flash::<RamFlash>();
    _assert_sink::<EventLog<4>>();
}

/// The library layer builds a catalog with nothing but a flash region and a log.
#[test]
fn library_needs_only_platform() {
    let mut catalog = library::ContentCatalog::new();
    let mut log: EventLog<8> = EventLog::new();
    catalog.discover(&RamFlash::erased(16), 0, &mut log);
    assert_eq!(catalog.len(), 9);
}

/// Playback drives any `DisplaySurface`; it never names a concrete driver.
#[test]
fn playback_draws_through_surface_trait() {
    let mut surface = MockSurface::new();
    playback::draw_test_pattern(library::TestPattern::AllPixels, &mut surface);
    assert_eq!(surface.show_count(), 1);
    assert!(surface.lit_count() > 0);
}

/// The platform crate must not list any workspace crate as a dependency.
#[test]
fn platform_manifest_has_no_upward_deps() {
    let manifest = include_str!("../../platform/Cargo.toml");
    for upward in ["library", "playback", "firmware"] {
        assert!(
            !manifest.lines().any(|l| l.trim_start().starts_with(upward)),
            "platform must not depend on {upward}"
        );
    }
}

/// The library crate must not reach into playback or the application.
#[test]
fn library_manifest_has_no_upward_deps() {
    let manifest = include_str!("../../library/Cargo.toml");
    for upward in ["playback", "firmware"] {
        assert!(
            !manifest.lines().any(|l| l.trim_start().starts_with(upward)),
            "library must not depend on {upward}"
        );
    }
}

/// Firmware tests run against in-memory flash; no temp-file tooling.
#[test]
fn firmware_manifest_has_no_file_test_deps() {
    let manifest = include_str!("../Cargo.toml");
    assert!(
        !manifest.lines().any(|l| l.trim_start().starts_with("tempfile")),
        "firmware tests must not pull in tempfile"
    );
}
