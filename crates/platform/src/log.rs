//! Bounded event log.
//!
//! `EventLog<N>` keeps the most recent `N` log lines in a fixed-capacity ring
//! without heap allocation, and forwards every line to `tracing` as it is
//! recorded. It is constructed once by the application and handed to each
//! component as `&mut impl LogSink`; there is no global logger.
//!
//! # Constraints
//!
//! - Never holds more than `N` records. When full, the oldest record is
//!   overwritten first.
//! - Lines longer than [`LOG_LINE_CAPACITY`] bytes are truncated at a char
//!   boundary.
//! - Not `Sync`: the show loop is single-threaded and owns the log.

use crate::config::LOG_LINE_CAPACITY;

/// One stored log line.
pub type LogLine = heapless::String<LOG_LINE_CAPACITY>;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogLevel {
    /// Normal progress (discovery counts, selections, mode changes).
    Info,
    /// A non-fatal failure (missing index, undecodable metadata, failed render).
    Warn,
}

/// A single entry in the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Severity.
    pub level: LogLevel,
    /// Message text (possibly truncated).
    pub line: LogLine,
}

/// Destination for free-text log lines.
pub trait LogSink {
    /// Record `message` at `level`.
    fn log(&mut self, level: LogLevel, message: &str);

    /// Record an informational line.
    fn info(&mut self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Record a non-fatal failure.
    fn warn(&mut self, message: &str) {
        self.log(LogLevel::Warn, message);
    }
}

impl<T: LogSink + ?Sized> LogSink for &mut T {
    fn log(&mut self, level: LogLevel, message: &str) {
        (**self).log(level, message);
    }
}

/// A fixed-capacity ring of the most recent `N` log records.
pub struct EventLog<const N: usize> {
    slots: heapless::Vec<LogRecord, N>,
    /// Index of the oldest record once the ring has wrapped; 0 before that.
    oldest: usize,
}

impl<const N: usize> EventLog<N> {
    /// Create a new, empty log.
    pub const fn new() -> Self {
        Self {
            slots: heapless::Vec::new(),
            oldest: 0,
        }
    }

    /// Append a record, evicting the oldest one when the ring is full.
    #[allow(clippy::arithmetic_side_effects)] // Safety: N > 0 checked above; oldest < N so oldest + 1 <= N
    pub fn push(&mut self, record: LogRecord) {
        if N == 0 {
            return;
        }
        if self.slots.len() < N {
            // Cannot fail: len < N was checked above.
            let _ = self.slots.push(record);
            return;
        }
        if let Some(slot) = self.slots.get_mut(self.oldest) {
            *slot = record;
        }
        self.oldest = (self.oldest + 1) % N;
    }

    /// Iterate records from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &LogRecord> {
        let newer = self.slots.get(self.oldest..).unwrap_or(&[]);
        let older = self.slots.get(..self.oldest).unwrap_or(&[]);
        newer.iter().chain(older.iter())
    }

    /// Most recently recorded entry.
    pub fn last(&self) -> Option<&LogRecord> {
        self.iter().last()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Maximum number of records the log can hold.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// `true` when nothing has been recorded since construction or [`clear`](Self::clear).
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every stored record.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.oldest = 0;
    }

    /// `true` if any stored line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.iter().any(|r| r.line.contains(needle))
    }
}

impl<const N: usize> Default for EventLog<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LogSink for EventLog<N> {
    fn log(&mut self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => tracing::info!(target: "matrix_show", "{}", message),
            LogLevel::Warn => tracing::warn!(target: "matrix_show", "{}", message),
        }
        self.push(LogRecord {
            level,
            line: truncate_line(message),
        });
    }
}

/// Copy as much of `message` as fits into a [`LogLine`], stopping at a char boundary.
fn truncate_line(message: &str) -> LogLine {
    let mut line = LogLine::new();
    for ch in message.chars() {
        if line.push(ch).is_err() {
            break;
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<const N: usize>(log: &EventLog<N>) -> Vec<&str> {
        log.iter().map(|r| r.line.as_str()).collect()
    }

    #[test]
    fn test_log_starts_empty() {
        let log: EventLog<4> = EventLog::new();
        assert!(log.is_empty());
        assert_eq!(log.capacity(), 4);
    }

    #[test]
    fn test_log_keeps_insertion_order() {
        let mut log: EventLog<4> = EventLog::new();
        log.info("a");
        log.warn("b");
        assert_eq!(texts(&log), ["a", "b"]);
        assert_eq!(log.last().map(|r| r.level), Some(LogLevel::Warn));
    }

    #[test]
    fn test_log_evicts_oldest_first() {
        let mut log: EventLog<3> = EventLog::new();
        for msg in ["1", "2", "3", "4", "5"] {
            log.info(msg);
        }
        assert_eq!(log.len(), 3);
        assert_eq!(texts(&log), ["3", "4", "5"]);
    }

    #[test]
    fn test_log_truncates_long_lines_on_char_boundary() {
        let mut log: EventLog<1> = EventLog::new();
        let long = "é".repeat(LOG_LINE_CAPACITY);
        log.info(&long);
        let stored = &log.last().unwrap().line;
        assert!(stored.len() <= LOG_LINE_CAPACITY);
        assert!(stored.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_zero_capacity_log_drops_everything() {
        let mut log: EventLog<0> = EventLog::new();
        log.info("ignored");
        assert!(log.is_empty());
    }

    #[test]
    fn test_clear_resets_ring() {
        let mut log: EventLog<2> = EventLog::new();
        log.info("a");
        log.info("b");
        log.info("c");
        log.clear();
        log.info("d");
        assert_eq!(texts(&log), ["d"]);
    }
}
