//! `read_index`: walk the content index in a [`FlashRegion`].
//!
//! The walk reads only headers and paths; payloads are read later, on demand,
//! through [`FileRecord::offset`] and [`FileRecord::size`].
//!
//! # Failure modes
//!
//! | Condition | Result |
//! |-----------|--------|
//! | count unreadable | `Err(IndexError::Unreadable)` |
//! | count > `MAX_INDEX_RECORDS` | `Err(IndexError::BadCount(n))` |
//! | count == 0 | `Ok` with an empty table |
//! | record field fails mid-walk | `Ok` with the records before it and `truncated` set |

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use platform::config::MAX_INDEX_RECORDS;
use platform::FlashRegion;

use crate::binary::{
    align_up, valid_path_len, IndexError, RecordField, COUNT_SIZE, PATH_LEN_SIZE,
    PAYLOAD_LEN_SIZE,
};

// ---------------------------------------------------------------------------
// FileRecord / FileTable
// ---------------------------------------------------------------------------

/// One addressable blob in the flash region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path as written by the provisioning tool (unique within the index).
    pub path: String,
    /// Absolute region offset of the first payload byte.
    pub offset: u32,
    /// Payload length in bytes.
    pub size: u32,
}

/// Ordered list of [`FileRecord`]s in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTable {
    records: Vec<FileRecord>,
}

impl FileTable {
    /// An empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record whose path equals `path` exactly.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&FileRecord> {
        self.records.iter().find(|r| r.path == path)
    }

    /// Records in index order.
    pub fn iter(&self) -> core::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when the index held no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[FileRecord] {
        &self.records
    }
}

impl From<Vec<FileRecord>> for FileTable {
    fn from(records: Vec<FileRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a FileTable {
    type Item = &'a FileRecord;
    type IntoIter = core::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Result of a successful index walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexScan {
    /// Records parsed before the walk stopped.
    pub records: FileTable,
    /// Set when a record failed part-way; always `IndexError::Truncated`.
    pub truncated: Option<IndexError>,
}

// ---------------------------------------------------------------------------
// read_index
// ---------------------------------------------------------------------------

/// Walk the index that starts at region offset `start`.
///
/// # Errors
///
/// Returns [`IndexError::Unreadable`] if the record count cannot be read and
/// [`IndexError::BadCount`] if it exceeds `MAX_INDEX_RECORDS`. Failures inside
/// a record are reported through [`IndexScan::truncated`] instead.
pub fn read_index<F: FlashRegion>(flash: &F, start: u32) -> Result<IndexScan, IndexError> {
    let count = read_u32(flash, start).ok_or(IndexError::Unreadable)?;
    if count > MAX_INDEX_RECORDS {
        return Err(IndexError::BadCount(count));
    }
    let mut cursor = start
        .checked_add(COUNT_SIZE)
        .ok_or(IndexError::Unreadable)?;

    // count <= MAX_INDEX_RECORDS, so the cast is lossless.
    let mut records = Vec::with_capacity(usize::try_from(count).unwrap_or(0));
    for record in 0..count {
        match read_record(flash, &mut cursor) {
            Ok(file) => {
                tracing::trace!(path = %file.path, offset = file.offset, size = file.size, "index record");
                records.push(file);
            }
            Err(field) => {
                return Ok(IndexScan {
                    records: FileTable::from(records),
                    truncated: Some(IndexError::Truncated { record, field }),
                });
            }
        }
    }

    tracing::debug!(count, "content index read");
    Ok(IndexScan {
        records: FileTable::from(records),
        truncated: None,
    })
}

/// Parse one record at `*cursor`, leaving `*cursor` on the next record boundary.
fn read_record<F: FlashRegion>(flash: &F, cursor: &mut u32) -> Result<FileRecord, RecordField> {
    let path_len = read_u16(flash, *cursor).ok_or(RecordField::PathLength)?;
    if !valid_path_len(path_len) {
        return Err(RecordField::PathLength);
    }
    let path_at = cursor
        .checked_add(PATH_LEN_SIZE)
        .ok_or(RecordField::PathLength)?;

    let mut path = vec![0u8; usize::from(path_len)];
    flash.read(path_at, &mut path).map_err(|_| RecordField::Path)?;
    let path = String::from_utf8(path).map_err(|_| RecordField::Path)?;

    let len_at = path_at
        .checked_add(u32::from(path_len))
        .ok_or(RecordField::Path)?;
    let size = read_u32(flash, len_at).ok_or(RecordField::PayloadLength)?;
    let offset = len_at
        .checked_add(PAYLOAD_LEN_SIZE)
        .ok_or(RecordField::PayloadLength)?;

    let end = offset
        .checked_add(size)
        .filter(|end| *end <= flash.capacity())
        .ok_or(RecordField::Payload)?;
    *cursor = align_up(end).ok_or(RecordField::Padding)?;

    Ok(FileRecord { path, offset, size })
}

fn read_u16<F: FlashRegion>(flash: &F, offset: u32) -> Option<u16> {
    let mut buf = [0u8; 2];
    flash.read(offset, &mut buf).ok()?;
    Some(u16::from_le_bytes(buf))
}

fn read_u32<F: FlashRegion>(flash: &F, offset: u32) -> Option<u32> {
    let mut buf = [0u8; 4];
    flash.read(offset, &mut buf).ok()?;
    Some(u32::from_le_bytes(buf))
}

/// Read the full payload of `record` into a buffer owned by the caller.
///
/// # Errors
///
/// Propagates the region's read error.
pub fn read_payload<F: FlashRegion>(flash: &F, record: &FileRecord) -> Result<Vec<u8>, F::Error> {
    let mut buf = vec![0u8; usize::try_from(record.size).unwrap_or(0)];
    flash.read(record.offset, &mut buf)?;
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::mocks::RamFlash;

    /// Hand-assemble an image so these tests do not depend on the writer.
    fn record(buf: &mut Vec<u8>, path: &[u8], payload: &[u8]) {
        buf.extend_from_slice(&(path.len() as u16).to_le_bytes());
        buf.extend_from_slice(path);
        buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        buf.extend_from_slice(payload);
        while buf.len() % 512 != 0 {
            buf.push(0);
        }
    }

    fn image(count: u32, records: &[(&[u8], &[u8])]) -> Vec<u8> {
        let mut buf = count.to_le_bytes().to_vec();
        for (path, payload) in records {
            record(&mut buf, path, payload);
        }
        buf
    }

    #[test]
    fn reads_single_record() {
        let flash = RamFlash::new(image(1, &[(b"a.json", b"{}")]));
        let scan = read_index(&flash, 0).unwrap();
        assert!(scan.truncated.is_none());
        let rec = scan.records.find("a.json").unwrap();
        assert_eq!(rec.offset, 4 + 2 + 6 + 4);
        assert_eq!(rec.size, 2);
    }

    #[test]
    fn second_record_starts_on_boundary() {
        let flash = RamFlash::new(image(2, &[(b"a", b"xyz"), (b"b", b"q")]));
        let scan = read_index(&flash, 0).unwrap();
        let b = scan.records.find("b").unwrap();
        assert_eq!(b.offset, 512 + 2 + 1 + 4);
    }

    #[test]
    fn zero_count_is_empty_not_error() {
        let flash = RamFlash::new(image(0, &[]));
        let scan = read_index(&flash, 0).unwrap();
        assert!(scan.records.is_empty());
        assert!(scan.truncated.is_none());
    }

    #[test]
    fn erased_flash_is_bad_count() {
        let flash = RamFlash::erased(1024);
        assert_eq!(read_index(&flash, 0), Err(IndexError::BadCount(u32::MAX)));
    }

    #[test]
    fn count_above_limit_is_bad_count() {
        let flash = RamFlash::new(image(501, &[]));
        assert_eq!(read_index(&flash, 0), Err(IndexError::BadCount(501)));
    }

    #[test]
    fn count_at_limit_is_accepted() {
        let flash = RamFlash::new(image(500, &[]));
        let scan = read_index(&flash, 0).unwrap();
        assert_eq!(
            scan.truncated,
            Some(IndexError::Truncated {
                record: 0,
                field: RecordField::PathLength
            })
        );
    }

    #[test]
    fn unreadable_count() {
        let flash = RamFlash::new(vec![0; 2]);
        assert_eq!(read_index(&flash, 0), Err(IndexError::Unreadable));
    }

    #[test]
    fn count_larger_than_records_truncates_after_last() {
        let mut bytes = image(3, &[(b"a", b"1"), (b"b", b"2")]);
        bytes.truncate(512 + 6);
        let flash = RamFlash::new(bytes);
        let scan = read_index(&flash, 0).unwrap();
        assert_eq!(scan.records.len(), 1);
        assert_eq!(
            scan.truncated,
            Some(IndexError::Truncated {
                record: 1,
                field: RecordField::Payload
            })
        );
    }

    #[test]
    fn zero_path_length_truncates() {
        let mut bytes = 1u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
        let flash = RamFlash::new(bytes);
        let scan = read_index(&flash, 0).unwrap();
        assert!(scan.records.is_empty());
        assert_eq!(
            scan.truncated,
            Some(IndexError::Truncated {
                record: 0,
                field: RecordField::PathLength
            })
        );
    }

    #[test]
    fn invalid_utf8_path_truncates() {
        let flash = RamFlash::new(image(1, &[(&[0xFF, 0xFE], b"{}")]));
        let scan = read_index(&flash, 0).unwrap();
        assert_eq!(
            scan.truncated,
            Some(IndexError::Truncated {
                record: 0,
                field: RecordField::Path
            })
        );
    }

    #[test]
    fn read_fault_in_path_truncates() {
        let flash = RamFlash::new(image(2, &[(b"a", b"1"), (b"bb", b"2")])).with_fault(514..516);
        let scan = read_index(&flash, 0).unwrap();
        assert_eq!(scan.records.len(), 1);
        assert_eq!(
            scan.truncated,
            Some(IndexError::Truncated {
                record: 1,
                field: RecordField::Path
            })
        );
    }

    #[test]
    fn nonzero_start_offset() {
        let mut bytes = vec![0u8; 512];
        bytes.extend(image(1, &[(b"x", b"hi")]));
        let flash = RamFlash::new(bytes);
        let scan = read_index(&flash, 512).unwrap();
        assert_eq!(scan.records.find("x").unwrap().offset, 512 + 4 + 2 + 1 + 4);
    }

    #[test]
    fn payload_read_back() {
        let flash = RamFlash::new(image(1, &[(b"p", b"payload")]));
        let scan = read_index(&flash, 0).unwrap();
        let rec = scan.records.find("p").unwrap();
        assert_eq!(read_payload(&flash, rec).unwrap(), b"payload");
    }

    #[test]
    fn find_requires_exact_match() {
        let flash = RamFlash::new(image(1, &[(b"scenes/a.json", b"{}")]));
        let scan = read_index(&flash, 0).unwrap();
        assert!(scan.records.find("scenes/a").is_none());
        assert!(scan.records.find("scenes/a.json").is_some());
    }
}
