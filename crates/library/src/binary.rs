//! Binary layout of the content index in the flash data region.
//!
//! One count header followed by variable-length records, each starting on a
//! 512-byte boundary. All multi-byte integers are little-endian.
//!
//! ```text
//! [0..4]          record_count    u32 le
//! per record:
//!   [+0..+2]      path_len (N)    u16 le, 1..=255
//!   [+2..+2+N]    path            UTF-8, not null-terminated
//!   [..+4]        payload_len (M) u32 le
//!   [..+M]        payload
//!   [..]          zero padding    P = (512 - (cursor % 512)) % 512
//! ```

use platform::config::{MAX_PATH_LEN, RECORD_ALIGN};

/// Size of the record-count header.
pub const COUNT_SIZE: u32 = 4;

/// Size of a record's path-length field.
pub const PATH_LEN_SIZE: u32 = 2;

/// Size of a record's payload-length field.
pub const PAYLOAD_LEN_SIZE: u32 = 4;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// The record field that could not be read or validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordField {
    /// u16 path length (unreadable, zero, or longer than 255)
    PathLength,
    /// path bytes (unreadable or not UTF-8)
    Path,
    /// u32 payload length
    PayloadLength,
    /// payload extends past the end of the flash region
    Payload,
    /// next 512-byte boundary overflows the address space
    Padding,
}

impl core::fmt::Display for RecordField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::PathLength => "path length",
            Self::Path => "path",
            Self::PayloadLength => "payload length",
            Self::Payload => "payload",
            Self::Padding => "padding",
        };
        f.write_str(name)
    }
}

/// Errors raised while walking the content index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndexError {
    /// The record count could not be read.
    Unreadable,
    /// The record count exceeds `MAX_INDEX_RECORDS` (erased flash reads 0xFFFF_FFFF).
    BadCount(u32),
    /// Record `record` (0-based) stopped parsing at `field`.
    Truncated {
        /// 0-based record number
        record: u32,
        /// failing field
        field: RecordField,
    },
}

#[cfg(feature = "std")]
impl std::error::Error for IndexError {}

impl core::fmt::Display for IndexError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unreadable => write!(f, "index count unreadable"),
            Self::BadCount(n) => write!(f, "invalid index count: {n}"),
            Self::Truncated { record, field } => {
                write!(f, "index truncated at record {record} ({field})")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Zero bytes needed after `cursor` to reach the next record boundary.
#[must_use]
#[allow(clippy::arithmetic_side_effects)] // RECORD_ALIGN is a non-zero constant and cursor % RECORD_ALIGN < RECORD_ALIGN
pub const fn padding_for(cursor: u32) -> u32 {
    (RECORD_ALIGN - cursor % RECORD_ALIGN) % RECORD_ALIGN
}

/// `cursor` rounded up to the next record boundary, `None` on overflow.
#[must_use]
pub const fn align_up(cursor: u32) -> Option<u32> {
    cursor.checked_add(padding_for(cursor))
}

/// `true` if `len` is an acceptable path length.
#[must_use]
pub const fn valid_path_len(len: u16) -> bool {
    len >= 1 && len <= MAX_PATH_LEN
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn padding_zero_on_boundary() {
        assert_eq!(padding_for(0), 0);
        assert_eq!(padding_for(512), 0);
        assert_eq!(padding_for(1024), 0);
    }

    #[test]
    fn padding_reaches_next_boundary() {
        assert_eq!(padding_for(1), 511);
        assert_eq!(padding_for(511), 1);
        assert_eq!(padding_for(700), 324);
    }

    #[test]
    fn align_up_overflows_near_max() {
        assert_eq!(align_up(u32::MAX), None);
        assert_eq!(align_up(u32::MAX - 511), Some(u32::MAX - 511));
    }

    #[test]
    fn path_len_bounds() {
        assert!(!valid_path_len(0));
        assert!(valid_path_len(1));
        assert!(valid_path_len(255));
        assert!(!valid_path_len(256));
    }

    #[test]
    fn truncated_display_names_field() {
        let e = IndexError::Truncated {
            record: 3,
            field: RecordField::Payload,
        };
        assert_eq!(e.to_string(), "index truncated at record 3 (payload)");
    }
}
