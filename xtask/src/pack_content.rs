//! xtask pack-content: write a content tree as a flash index image.
//!
//! Every regular file under `content_dir` becomes one record whose path is
//! the file's path relative to `content_dir`, with `/` separators. Records
//! are added in sorted path order so the same tree always packs to the same
//! bytes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::Colorize;
use library::writer::IndexWriter;
use platform::config::{DATA_PARTITION_OFFSET, MAX_PATH_LEN};
use walkdir::WalkDir;

/// Entry point called from main.rs
pub fn run(content_dir: &Path, out: &Path) -> Result<()> {
    println!("Packing: {}", content_dir.display());
    let packed = pack(content_dir, out)?;
    println!(
        "{}",
        format!(
            "✓ {} records, {} bytes → {} (flash at {DATA_PARTITION_OFFSET:#x})",
            packed.records,
            packed.bytes,
            out.display()
        )
        .green()
    );
    for skipped in &packed.skipped {
        println!("{}", format!("  ⚠ skipped {}", skipped.display()).yellow());
    }
    Ok(())
}

/// Result of a pack.
#[derive(Debug)]
pub(crate) struct Packed {
    pub records: usize,
    pub bytes: usize,
    /// Files whose relative path is not UTF-8 or too long for a record.
    pub skipped: Vec<PathBuf>,
}

pub(crate) fn pack(content_dir: &Path, out: &Path) -> Result<Packed> {
    if !content_dir.is_dir() {
        bail!("{} is not a directory", content_dir.display());
    }
    let mut writer = IndexWriter::new();
    let mut skipped = Vec::new();
    for (path, record_path) in collect_files(content_dir)? {
        let Some(record_path) = record_path else {
            skipped.push(path);
            continue;
        };
        let payload = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        writer
            .add(&record_path, &payload)
            .with_context(|| format!("adding {record_path}"))?;
    }
    let bytes = writer.write_to(out).with_context(|| format!("writing {}", out.display()))?;
    Ok(Packed {
        records: writer.len(),
        bytes,
        skipped,
    })
}

/// Every file under `dir` paired with its record path, sorted.
///
/// The record path is `None` when it cannot be stored.
pub(crate) fn collect_files(dir: &Path) -> Result<Vec<(PathBuf, Option<String>)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let record_path = record_path(dir, entry.path());
        files.push((entry.into_path(), record_path));
    }
    Ok(files)
}

/// `path` relative to `root` with `/` separators, if it fits a record.
pub(crate) fn record_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = rel.iter().map(|c| c.to_str()).collect();
    let joined = parts?.join("/");
    let fits = !joined.is_empty() && joined.len() <= usize::from(MAX_PATH_LEN);
    fits.then_some(joined)
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
mod tests {
    use super::*;
    use library::read_index;
    use platform::flash_image::FileFlash;
    use tempfile::TempDir;

    fn create_content(root: &Path) {
        let scenes = root.join("scenes").join("christmas");
        fs::create_dir_all(&scenes).unwrap();
        fs::write(scenes.join("tree.json"), br#"{"durationMs":3000}"#).unwrap();
        fs::write(scenes.join("star.json"), b"{}").unwrap();

        let scroll = root.join("scroll");
        fs::create_dir_all(&scroll).unwrap();
        fs::write(scroll.join("hello.json"), br#"{"text":"HI"}"#).unwrap();
    }

    #[test]
    fn pack_writes_sorted_records() {
        let tmp = TempDir::new().unwrap();
        let content = tmp.path().join("content");
        create_content(&content);
        let out = tmp.path().join("out").join("content.bin");

        let packed = pack(&content, &out).unwrap();
        assert_eq!(packed.records, 3);
        assert!(packed.skipped.is_empty());

        let flash = FileFlash::open(&out).unwrap();
        let scan = read_index(&flash, 0).unwrap();
        assert!(scan.truncated.is_none());
        let paths: Vec<&str> = scan.records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            ["scenes/christmas/star.json", "scenes/christmas/tree.json", "scroll/hello.json"]
        );
        // Every record after the first starts on a 512-byte boundary.
        for r in scan.records.iter().skip(1) {
            let header = 2 + r.path.len() as u32 + 4;
            assert_eq!((r.offset - header) % 512, 0, "{}", r.path);
        }
    }

    #[test]
    fn record_path_uses_forward_slashes() {
        let root = Path::new("/content");
        let path = root.join("countdown").join("newyear.json");
        assert_eq!(record_path(root, &path).as_deref(), Some("countdown/newyear.json"));
    }

    #[test]
    fn record_path_rejects_overlong_paths() {
        let root = Path::new("/content");
        let path = root.join("a".repeat(300));
        assert_eq!(record_path(root, &path), None);
    }

    #[test]
    fn pack_rejects_missing_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(pack(&tmp.path().join("nope"), &tmp.path().join("x.bin")).is_err());
    }
}
