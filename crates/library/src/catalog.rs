//! ContentCatalog: every playable entry, built once from the flash index.
//!
//! Flash records are classified by path, decoded for metadata, and followed
//! by the built-in procedural and test entries. Ids come from one counter
//! that restarts at 1 on every build, so rebuilding from the same index gives
//! the same catalog.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use platform::{FlashRegion, LogSink};

use crate::binary::IndexError;
use crate::entry::{ContentEntry, ContentKind, ProceduralKind, TestPattern};
use crate::metadata::{EntryMetadata, MetadataError};
use crate::reader::{read_index, read_payload, FileTable, IndexScan};

/// Theme assigned when a path has no theme segment.
pub const UNKNOWN_THEME: &str = "unknown";

// ---------------------------------------------------------------------------
// Path classification
// ---------------------------------------------------------------------------

/// Theme of `path`: the segment between the first and second `/`.
///
/// Returns [`UNKNOWN_THEME`] when there is no second `/` or the segment is empty.
pub fn extract_theme(path: &str) -> &str {
    let mut parts = path.splitn(3, '/');
    let _root = parts.next();
    match (parts.next(), parts.next()) {
        (Some(theme), Some(_)) if !theme.is_empty() => theme,
        _ => UNKNOWN_THEME,
    }
}

/// Kind and display name for a flash path, or `None` if the path is not content.
///
/// Rules are tried in order; the first match wins.
pub fn classify(path: &str) -> Option<(ContentKind, &str)> {
    let is_json = path.ends_with(".json");
    if path.starts_with("scenes/") && is_json {
        return Some((ContentKind::Scene, file_stem(path)));
    }
    if path.find("_timeline.json").is_some_and(|pos| pos > 0) {
        return Some((ContentKind::Animation, parent_dir(path)));
    }
    if path.starts_with("scroll/") && is_json {
        return Some((ContentKind::Scroll, file_stem(path)));
    }
    if path.starts_with("countdown/") && is_json {
        return Some((ContentKind::Countdown, file_stem(path)));
    }
    None
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    name.strip_suffix(".json").unwrap_or(name)
}

/// Last directory segment; the file stem when the path has no directory.
fn parent_dir(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some((dir, _)) => dir.rsplit('/').next().unwrap_or(dir),
        None => file_stem(path),
    }
}

// ---------------------------------------------------------------------------
// ThemeSet
// ---------------------------------------------------------------------------

/// Distinct theme tags in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeSet {
    themes: Vec<String>,
}

impl ThemeSet {
    /// An empty set.
    pub const fn new() -> Self {
        Self { themes: Vec::new() }
    }

    /// Add `theme` unless already present. Returns `true` if it was added.
    pub fn insert(&mut self, theme: &str) -> bool {
        if self.contains(theme) {
            return false;
        }
        self.themes.push(theme.into());
        true
    }

    /// `true` if `theme` has been seen.
    pub fn contains(&self, theme: &str) -> bool {
        self.themes.iter().any(|t| t == theme)
    }

    /// Themes in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(String::as_str)
    }

    /// Number of distinct themes.
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    /// `true` when no theme has been seen.
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    fn clear(&mut self) {
        self.themes.clear();
    }
}

// ---------------------------------------------------------------------------
// ContentCatalog
// ---------------------------------------------------------------------------

/// In-memory catalog of every playable entry.
///
/// `build` takes `&mut self`, so no query can observe a half-built catalog.
#[derive(Debug, Clone)]
pub struct ContentCatalog {
    entries: Vec<ContentEntry>,
    themes: ThemeSet,
    files: FileTable,
    next_id: u16,
    discovery_error: Option<IndexError>,
}

impl Default for ContentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentCatalog {
    /// An empty catalog; call [`discover`](Self::discover) or [`build`](Self::build).
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            themes: ThemeSet::new(),
            files: FileTable::new(),
            next_id: 1,
            discovery_error: None,
        }
    }

    /// Read the index at `start` and rebuild the catalog from it.
    ///
    /// A missing or invalid index leaves only the built-in entries; a
    /// truncated index keeps the records before the failure. Both are logged.
    pub fn discover<F, L>(&mut self, flash: &F, start: u32, log: &mut L)
    where
        F: FlashRegion,
        L: LogSink,
    {
        let (files, error) = match read_index(flash, start) {
            Ok(IndexScan { records, truncated }) => {
                log.info(&format!("Files in storage: {}", records.len()));
                if let Some(e) = truncated {
                    log.warn(&format!("{e}; keeping {} records", records.len()));
                }
                (records, truncated)
            }
            Err(e) => {
                log.warn(&format!("Content discovery failed: {e}"));
                (FileTable::new(), Some(e))
            }
        };
        self.build(files, flash, log);
        self.discovery_error = error;
    }

    /// Replace the catalog with entries built from `files`.
    ///
    /// Every classified record yields exactly one entry; metadata failures
    /// fall back to defaults. Built-ins follow the flash entries.
    pub fn build<F, L>(&mut self, files: FileTable, flash: &F, log: &mut L)
    where
        F: FlashRegion,
        L: LogSink,
    {
        self.entries.clear();
        self.themes.clear();
        self.next_id = 1;
        self.discovery_error = None;

        for record in &files {
            let Some((kind, name)) = classify(&record.path) else {
                tracing::debug!(path = %record.path, "record not classified");
                continue;
            };
            let theme = extract_theme(&record.path);
            if theme != UNKNOWN_THEME && self.themes.insert(theme) {
                log.info(&format!("Theme: {theme}"));
            }

            let meta = read_payload(flash, record)
                .map_err(|_| MetadataError::Read)
                .and_then(|bytes| EntryMetadata::decode(&bytes, &record.path))
                .unwrap_or_else(|e| {
                    log.warn(&format!("{}: {e}, using defaults", record.path));
                    EntryMetadata::defaults(&record.path)
                });

            let id = self.take_id();
            self.entries.push(ContentEntry {
                id,
                name: name.into(),
                theme: theme.into(),
                kind,
                source_path: record.path.clone(),
                duration_ms: meta.duration_ms,
                matrix: meta.matrix,
            });
        }

        for kind in ProceduralKind::ALL {
            let id = self.take_id();
            self.entries.push(ContentEntry::builtin(
                id,
                kind.name(),
                kind.theme(),
                ContentKind::Procedural(kind),
            ));
        }
        for pattern in TestPattern::ALL {
            let id = self.take_id();
            self.entries.push(ContentEntry::builtin(
                id,
                pattern.name(),
                TestPattern::THEME,
                ContentKind::Test(pattern),
            ));
        }

        self.files = files;
        log.info(&format!(
            "Catalog: {} entries, {} themes",
            self.entries.len(),
            self.themes.len()
        ));
    }

    fn take_id(&mut self) -> u16 {
        let id = self.next_id;
        // At most MAX_INDEX_RECORDS + 9 entries, far below u16::MAX.
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Every entry in id order.
    pub fn entries(&self) -> &[ContentEntry] {
        &self.entries
    }

    /// Entry with `id`.
    pub fn get(&self, id: u16) -> Option<&ContentEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries whose theme equals `theme` exactly.
    pub fn by_theme<'a>(&'a self, theme: &'a str) -> impl Iterator<Item = &'a ContentEntry> + 'a {
        self.entries.iter().filter(move |e| e.theme == theme)
    }

    /// Themes seen in flash, in first-seen order.
    pub fn themes(&self) -> &ThemeSet {
        &self.themes
    }

    /// Index records the catalog was built from.
    pub fn files(&self) -> &FileTable {
        &self.files
    }

    /// Why the last [`discover`](Self::discover) lost records, if it did.
    pub fn discovery_error(&self) -> Option<IndexError> {
        self.discovery_error
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` before the first build.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use platform::mocks::RamFlash;
    use platform::EventLog;

    #[test]
    fn theme_is_second_segment() {
        assert_eq!(extract_theme("scenes/christmas/tree.json"), "christmas");
        assert_eq!(extract_theme("a/b/c/d"), "b");
        assert_eq!(extract_theme("scenes/tree.json"), UNKNOWN_THEME);
        assert_eq!(extract_theme("tree.json"), UNKNOWN_THEME);
        assert_eq!(extract_theme("scenes//tree.json"), UNKNOWN_THEME);
    }

    #[test]
    fn classify_rules_in_order() {
        assert_eq!(
            classify("scenes/christmas/tree.json"),
            Some((ContentKind::Scene, "tree"))
        );
        // scenes/ wins over the timeline rule.
        assert_eq!(
            classify("scenes/x/snow_timeline.json"),
            Some((ContentKind::Scene, "snow_timeline"))
        );
        assert_eq!(
            classify("animations/christmas/sleigh/animation_timeline.json"),
            Some((ContentKind::Animation, "sleigh"))
        );
        assert_eq!(
            classify("scroll/osu/hello.json"),
            Some((ContentKind::Scroll, "hello"))
        );
        assert_eq!(
            classify("countdown/newyear/ny.json"),
            Some((ContentKind::Countdown, "ny"))
        );
    }

    #[test]
    fn classify_rejects_other_paths() {
        assert_eq!(classify("_timeline.json"), None);
        assert_eq!(classify("scenes/christmas/tree.png"), None);
        assert_eq!(classify("images/logo.json"), None);
        assert_eq!(classify("scroll/readme.txt"), None);
    }

    #[test]
    fn theme_set_keeps_first_seen_order() {
        let mut set = ThemeSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        assert_eq!(set.iter().collect::<Vec<_>>(), ["b", "a"]);
    }

    #[test]
    fn build_without_files_has_only_builtins() {
        let mut catalog = ContentCatalog::new();
        let mut log: EventLog<16> = EventLog::new();
        catalog.build(FileTable::new(), &RamFlash::new(Vec::new()), &mut log);
        assert_eq!(catalog.len(), 9);
        let ids: Vec<u16> = catalog.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, (1..=9).collect::<Vec<_>>());
        assert!(catalog.themes().is_empty());
        assert_eq!(catalog.by_theme("test").count(), 3);
        assert_eq!(catalog.by_theme("osu").count(), 1);
    }

    #[test]
    fn discover_erased_flash_logs_once() {
        let mut catalog = ContentCatalog::new();
        let mut log: EventLog<16> = EventLog::new();
        catalog.discover(&RamFlash::erased(4096), 0, &mut log);
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.discovery_error(), Some(IndexError::BadCount(u32::MAX)));
        let warnings = log
            .iter()
            .filter(|r| r.level == platform::LogLevel::Warn)
            .count();
        assert_eq!(warnings, 1);
    }
}
