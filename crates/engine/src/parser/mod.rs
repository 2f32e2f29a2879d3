/// Log parsing module
///
/// Turns the raw ALAS text stream into structured [`LogRecord`]s, one logical
/// entry at a time.
///
/// # Architecture
///
/// - `model.rs`: record and severity types
/// - `pattern.rs`: line classification (separator, header, plain text)
/// - `record.rs`: the lazy record parser (pending-record state machine)
/// - `metrics.rs`: per-pass parsing counters
///
/// # Guarantees
///
/// The parser never fails on malformed input: a line that does not match the
/// header pattern is treated as continuation or orphan text.

pub mod metrics;
pub mod model;
pub mod pattern;
pub mod record;

// Re-export commonly used types
pub use metrics::ParseStats;
pub use model::{Level, LogRecord};
pub use record::{parse, RecordParser};

// Constants
pub const SEPARATOR_MIN_RUN: usize = 50; // Box-drawing characters per separator line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f"; // Millisecond fraction enforced by the header pattern
