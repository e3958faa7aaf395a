//! xtask inspect: list what a flash image contains.
//!
//! Walks the index the same way the device does and classifies every record,
//! so a packed tree can be checked before it is flashed.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use library::{classify, extract_theme, read_index, ContentCatalog};
use platform::flash_image::FileFlash;
use platform::{EventLog, LogLevel};
use serde::Serialize;

/// Entry point called from main.rs
pub fn run(image: &Path, json: bool) -> Result<()> {
    let flash = FileFlash::open(image).with_context(|| format!("opening {}", image.display()))?;
    let report = inspect(&flash)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub(crate) struct Report {
    pub records: Vec<RecordReport>,
    /// Why the walk stopped early, if it did
    pub truncated: Option<String>,
    pub entries: usize,
    pub themes: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecordReport {
    pub path: String,
    pub offset: u32,
    pub size: u32,
    /// `None` for records the catalog ignores
    pub kind: Option<&'static str>,
    pub theme: String,
}

pub(crate) fn inspect(flash: &FileFlash) -> Result<Report> {
    let scan = read_index(flash, 0).map_err(|e| anyhow::anyhow!("index unreadable: {e}"))?;
    let records = scan
        .records
        .iter()
        .map(|r| RecordReport {
            path: r.path.clone(),
            offset: r.offset,
            size: r.size,
            kind: classify(&r.path).map(|(kind, _)| kind.label()),
            theme: extract_theme(&r.path).to_owned(),
        })
        .collect();

    let mut log: EventLog<64> = EventLog::new();
    let mut catalog = ContentCatalog::new();
    catalog.build(scan.records.clone(), flash, &mut log);

    Ok(Report {
        records,
        truncated: scan.truncated.map(|e| e.to_string()),
        entries: catalog.len(),
        themes: catalog.themes().iter().map(str::to_owned).collect(),
        warnings: log
            .iter()
            .filter(|r| r.level == LogLevel::Warn)
            .map(|r| r.line.to_string())
            .collect(),
    })
}

fn print_table(report: &Report) {
    println!("{:>10}  {:>8}  {:<10}  {:<12}  path", "offset", "size", "kind", "theme");
    for r in &report.records {
        let kind = r.kind.unwrap_or("-");
        let line = format!(
            "{:>#10x}  {:>8}  {:<10}  {:<12}  {}",
            r.offset, r.size, kind, r.theme, r.path
        );
        if r.kind.is_some() {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
    println!();
    println!(
        "{}",
        format!(
            "{} records, {} catalog entries, themes: {}",
            report.records.len(),
            report.entries,
            report.themes.join(", ")
        )
        .green()
    );
    if let Some(reason) = &report.truncated {
        println!("{}", format!("⚠ index truncated: {reason}").yellow());
    }
    for w in &report.warnings {
        println!("{}", format!("⚠ {w}").yellow());
    }
}
