//! Property tests for PlaybackScheduler selection.
//!
//! The catalog is built from a generated flash image, so theme tags and
//! entry kinds vary between cases.

use library::writer::IndexWriter;
use library::{ContentCatalog, ContentEntry};
use platform::mocks::RamFlash;
use platform::EventLog;
use playback::{PlaybackScheduler, TickOutcome};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

type Log = EventLog<32>;

const THEMES: [&str; 3] = ["christmas", "halloween", "osu"];

fn catalog_from(themes: &[usize]) -> ContentCatalog {
    let mut w = IndexWriter::new();
    for (i, t) in themes.iter().enumerate() {
        let theme = THEMES.get(*t).copied().unwrap_or("christmas");
        w.add(&format!("scenes/{theme}/s{i}.json"), b"{\"durationMs\": 1000}")
            .unwrap();
    }
    let flash = RamFlash::new(w.to_bytes());
    let mut catalog = ContentCatalog::new();
    catalog.discover(&flash, 0, &mut Log::new());
    catalog
}

fn run(
    scheduler: &mut PlaybackScheduler,
    catalog: &ContentCatalog,
    seed: u64,
    ticks: usize,
) -> Vec<TickOutcome> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut log = Log::new();
    (1..=ticks)
        .map(|i| {
            let now = u64::try_from(i).unwrap() * 20_000;
            scheduler.tick(now, catalog, &mut rng, &mut log, |_: &ContentEntry, _| true)
        })
        .collect()
}

fn picked_ids(outcomes: &[TickOutcome]) -> Vec<u16> {
    outcomes
        .iter()
        .filter_map(|o| match o {
            TickOutcome::Selected { id, .. } => Some(*id),
            _ => None,
        })
        .collect()
}

proptest! {
    #[test]
    fn random_mode_never_selects_test_patterns(
        themes in prop::collection::vec(0usize..3, 0..12),
        seed in any::<u64>(),
    ) {
        let catalog = catalog_from(&themes);
        let mut s = PlaybackScheduler::new();
        let mut log = Log::new();
        s.set_enabled(true, 0, &mut log);
        s.set_random_enabled(true, 0, &mut log);

        let outcomes = run(&mut s, &catalog, seed, 40);
        for id in picked_ids(&outcomes) {
            let entry = catalog.get(id).unwrap();
            prop_assert!(!entry.kind.is_test(), "picked {}", entry.name);
        }
    }

    #[test]
    fn theme_filter_is_honoured(
        themes in prop::collection::vec(0usize..3, 1..12),
        filter in 0usize..3,
        seed in any::<u64>(),
    ) {
        let catalog = catalog_from(&themes);
        let wanted = THEMES[filter];
        let mut s = PlaybackScheduler::new();
        let mut log = Log::new();
        s.set_theme_filter(wanted, &mut log);
        s.set_enabled(true, 0, &mut log);
        s.set_random_enabled(true, 0, &mut log);

        for id in picked_ids(&run(&mut s, &catalog, seed, 20)) {
            prop_assert_eq!(catalog.get(id).unwrap().theme.as_str(), wanted);
        }
    }

    #[test]
    fn unmatched_filter_never_advances_clock(
        themes in prop::collection::vec(0usize..3, 0..8),
        seed in any::<u64>(),
        random in any::<bool>(),
    ) {
        let catalog = catalog_from(&themes);
        let mut s = PlaybackScheduler::new();
        let mut log = Log::new();
        s.set_theme_filter("nope", &mut log);
        s.set_enabled(true, 0, &mut log);
        s.set_random_enabled(random, 0, &mut log);
        s.set_playlist(catalog.entries().iter().map(|e| e.id).collect());

        let outcomes = run(&mut s, &catalog, seed, 10);
        prop_assert!(outcomes.iter().all(|o| *o == TickOutcome::NoCandidate));
        prop_assert_eq!(s.state().last_change_at, 0);
    }

    #[test]
    fn playlist_order_is_kept(len in 1usize..6) {
        let catalog = catalog_from(&[]);
        let ids: Vec<u16> = catalog
            .entries()
            .iter()
            .filter(|e| !e.kind.is_test())
            .map(|e| e.id)
            .take(len)
            .collect();
        let mut s = PlaybackScheduler::new();
        let mut log = Log::new();
        s.set_playlist(ids.clone());
        s.set_enabled(true, 0, &mut log);

        let picked = picked_ids(&run(&mut s, &catalog, 0, ids.len() * 2));
        let expected: Vec<u16> = ids.iter().chain(ids.iter()).copied().collect();
        prop_assert_eq!(picked, expected);
    }
}
