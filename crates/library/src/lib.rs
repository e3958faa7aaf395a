//! Content library: flash index walk, metadata decoding, and the catalog.
//!
//! # Modules
//!
//! - [`binary`]: on-flash index layout, alignment, `IndexError`
//! - [`reader`]: `read_index` walk producing a `FileTable`
//! - [`entry`]: `ContentEntry`, `ContentKind` and the built-in kinds
//! - [`metadata`]: JSON metadata with per-field defaults
//! - [`catalog`]: `ContentCatalog` classification and queries
//! - `writer`: image builder (`std` only)

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![warn(missing_docs)]

extern crate alloc;

pub mod binary;
pub mod catalog;
pub mod entry;
pub mod metadata;
pub mod reader;

#[cfg(feature = "std")]
pub mod writer;

// Top-level re-exports for convenience
pub use binary::{IndexError, RecordField};
pub use catalog::{classify, extract_theme, ContentCatalog, ThemeSet, UNKNOWN_THEME};
pub use entry::{ContentEntry, ContentKind, MatrixAssignment, ProceduralKind, SnowfallStyle, TestPattern};
pub use metadata::{CountdownError, CountdownTarget, EntryMetadata, MetadataError, ScrollSettings};
pub use reader::{read_index, read_payload, FileRecord, FileTable, IndexScan};
