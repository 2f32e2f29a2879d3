//! Line classification for the record parser.
//!
//! Pure helpers deciding whether a raw line is a section separator, a
//! timestamped header or plain text. Used by [`super::record::RecordParser`].

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use super::model::Level;
use super::{SEPARATOR_MIN_RUN, TIMESTAMP_FORMAT};

// 2026-01-25 12:00:59.205 | INFO | Message
static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})\s+(\d{2}:\d{2}:\d{2}\.\d{3})\s*\|\s*(\w+)\s*\|\s*(.*)$")
        .unwrap()
});

/// What a single raw line looks like on its own.
#[derive(Debug, PartialEq)]
pub(crate) enum LineKind<'a> {
    Separator { title: Option<String> },
    Header {
        timestamp: NaiveDateTime,
        level: Level,
        message: &'a str,
    },
    Text,
    Blank,
}

pub(crate) fn classify(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if let Some(title) = separator_title(line) {
        return LineKind::Separator { title };
    }
    if let Some((timestamp, level, message)) = parse_header(line) {
        return LineKind::Header {
            timestamp,
            level,
            message,
        };
    }
    LineKind::Text
}

fn is_box_char(c: char) -> bool {
    c == '═' || c == '─'
}

/// `Some(title)` when the line is a separator, `None` otherwise.
///
/// Accepts a pure run of box-drawing characters, or a title embedded between
/// two box-drawing runs (`═══ REWARD ═══`). Either way the line must carry at
/// least [`SEPARATOR_MIN_RUN`] box characters.
pub(crate) fn separator_title(line: &str) -> Option<Option<String>> {
    let line = line.trim_end();
    let first = line.chars().next()?;
    let last = line.chars().last()?;
    if !is_box_char(first) || !is_box_char(last) {
        return None;
    }
    if line.chars().filter(|c| is_box_char(*c)).count() < SEPARATOR_MIN_RUN {
        return None;
    }

    let inner = line.trim_matches(|c: char| is_box_char(c) || c.is_whitespace());
    if inner.is_empty() {
        if line.chars().all(is_box_char) {
            return Some(None);
        }
        return None;
    }
    title_text(inner).map(Some)
}

/// A line consisting solely of an uppercase section title.
pub(crate) fn title_text(line: &str) -> Option<String> {
    let title = line.trim();
    let mut chars = title.chars();
    let first = chars.next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    if chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' || c == ' ') {
        Some(title.to_string())
    } else {
        None
    }
}

/// Match the `timestamp | LEVEL | message` header.
///
/// A line that has the right shape but an impossible date (month 13, ...) is
/// not a header; it falls back to plain text like any other mismatch.
pub(crate) fn parse_header(line: &str) -> Option<(NaiveDateTime, Level, &str)> {
    let caps = HEADER_REGEX.captures(line)?;
    let stamp = format!("{} {}", &caps[1], &caps[2]);
    let timestamp = NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT).ok()?;
    let level = Level::from(&caps[3]);
    let message = caps.get(4).map_or("", |m| m.as_str());
    Some((timestamp, level, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn bar(n: usize) -> String {
        "═".repeat(n)
    }

    // ── Separators ───────────────────────────────────────────────

    #[test]
    fn test_pure_separator() {
        assert_eq!(separator_title(&bar(50)), Some(None));
        assert_eq!(separator_title(&"─".repeat(80)), Some(None));
    }

    #[test]
    fn test_mixed_box_chars_separator() {
        let line = format!("{}{}", bar(30), "─".repeat(30));
        assert_eq!(separator_title(&line), Some(None));
    }

    #[test]
    fn test_short_run_is_not_separator() {
        assert_eq!(separator_title(&bar(49)), None);
    }

    #[test]
    fn test_embedded_title() {
        let line = format!("{} COMMISSION {}", bar(30), bar(30));
        assert_eq!(separator_title(&line), Some(Some("COMMISSION".to_string())));
    }

    #[test]
    fn test_embedded_title_needs_enough_box_chars() {
        let line = format!("{} REWARD {}", bar(10), bar(10));
        assert_eq!(separator_title(&line), None);
    }

    #[test]
    fn test_lowercase_embedded_text_is_not_title() {
        let line = format!("{} reward {}", bar(30), bar(30));
        assert_eq!(separator_title(&line), None);
    }

    #[test]
    fn test_title_text() {
        assert_eq!(title_text("    OPSI ASH   "), Some("OPSI ASH".to_string()));
        assert_eq!(title_text("START"), Some("START".to_string()));
        assert_eq!(title_text("Start"), None);
        assert_eq!(title_text(""), None);
        assert_eq!(title_text("<<< COMBAT END >>>"), None);
    }

    // ── Headers ──────────────────────────────────────────────────

    #[test]
    fn test_header_parsed() {
        let (ts, level, msg) =
            parse_header("2026-01-25 12:00:59.205 | INFO | Scheduler: Start task `Commission`")
                .unwrap();
        assert_eq!(ts.nanosecond(), 205_000_000);
        assert_eq!(level, Level::Info);
        assert_eq!(msg, "Scheduler: Start task `Commission`");
    }

    #[test]
    fn test_header_tolerates_spacing() {
        let (_, level, msg) = parse_header("2026-01-25  12:00:59.205|ERROR|   boom").unwrap();
        assert_eq!(level, Level::Error);
        assert_eq!(msg, "boom");
    }

    #[test]
    fn test_header_requires_milliseconds() {
        assert!(parse_header("2026-01-25 12:00:59 | INFO | no millis").is_none());
    }

    #[test]
    fn test_impossible_date_is_not_header() {
        assert!(parse_header("2026-13-45 12:00:59.205 | INFO | bad month").is_none());
    }

    #[test]
    fn test_empty_message_header() {
        let (_, _, msg) = parse_header("2026-01-25 12:00:59.205 | INFO | ").unwrap();
        assert_eq!(msg, "");
    }

    // ── classify ─────────────────────────────────────────────────

    #[test]
    fn test_classify() {
        assert_eq!(classify("   "), LineKind::Blank);
        assert_eq!(classify(&bar(60)), LineKind::Separator { title: None });
        assert_eq!(classify("  File \"module/base.py\", line 3"), LineKind::Text);
        assert!(matches!(
            classify("2026-01-25 12:00:59.205 | WARNING | careful"),
            LineKind::Header { level: Level::Warning, .. }
        ));
    }
}
