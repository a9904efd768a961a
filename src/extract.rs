//! Timestamp extraction from free-form comment text.
//!
//! Comments reference moments in a video using a handful of human notations:
//! plain colon timestamps (`1:23`, `1:23:45`), unit letters (`1h 2m 3s`),
//! and Korean minute/second forms (`2분 30초`, `125초`). Every pattern family
//! is applied to the same text and the results are concatenated; extraction
//! never stops at the first matching family.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Colon notation: `M:SS` or `H:MM:SS`. Boundary handling is done manually
/// (see [`colon_bounded`]) because the surrounding context must not be
/// consumed by the match.
static COLON_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2})(?::(\d{2}))?").unwrap());

/// Unit-letter notation: `1h 23m`. A lone `23m` is not enough; hours and
/// minutes are both required, seconds are optional.
static UNIT_LETTER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)h\s*(\d+)m(?:\s*(\d+)s)?").unwrap());

/// Korean minute/second notation: `1분 23초`, `23분`, `1분23초`.
static MINUTE_SECOND_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)분(?:\s*(\d+)초)?").unwrap());

/// Korean bare-seconds notation: `123초`.
static BARE_SECONDS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)초").unwrap());

/// A normalized time offset extracted from comment text.
///
/// `display` is the canonical human-readable form (`H:MM:SS` or `M:SS`) and
/// `seconds` the canonical duration from video start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeOffset {
    pub display: String,
    pub seconds: u32,
}

/// Extract every recognizable time offset from `text`.
///
/// All pattern families run over the full text and their results are
/// concatenated. Within one text, offsets with identical display strings are
/// kept only once, in first-seen order. Offsets whose components fail to
/// parse are discarded; the patterns make that impossible in practice, but
/// the conversion still checks.
pub fn extract_all(text: &str) -> Vec<TimeOffset> {
    let mut offsets = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    collect_colon(text, &mut offsets, &mut seen);
    collect_unit_letters(text, &mut offsets, &mut seen);
    collect_minute_seconds(text, &mut offsets, &mut seen);
    collect_bare_seconds(text, &mut offsets, &mut seen);

    offsets
}

/// Parse a colon display string (`M:SS` or `H:MM:SS`) back into seconds.
///
/// Fields are weighted right-to-left: seconds, minutes, hours.
pub fn display_to_seconds(display: &str) -> Option<u32> {
    let mut total: u32 = 0;
    let mut weight: u32 = 1;
    for part in display.split(':').rev() {
        let value: u32 = part.trim().parse().ok()?;
        total = total.checked_add(value.checked_mul(weight)?)?;
        weight = weight.checked_mul(60)?;
    }
    Some(total)
}

// ============================================================
// Pattern families
// ============================================================

fn collect_colon(text: &str, offsets: &mut Vec<TimeOffset>, seen: &mut HashSet<String>) {
    for caps in COLON_REGEX.captures_iter(text) {
        let whole = caps.get(0).expect("group 0 always present");
        if !colon_bounded(text, whole.start(), whole.end()) {
            continue;
        }

        let (hours, minutes, seconds_field) = match caps.get(3) {
            Some(s) => (&caps[1], &caps[2], s.as_str()),
            None => ("0", &caps[1], &caps[2]),
        };
        let Some(seconds) = parse_component(hours)
            .zip(parse_component(minutes))
            .zip(parse_component(seconds_field))
            .and_then(|((h, m), s)| total_seconds(h, m, s))
        else {
            continue;
        };

        // Colon notation reuses the matched groups as-is for display.
        let display = match caps.get(3) {
            Some(s) => format!("{}:{}:{}", &caps[1], &caps[2], s.as_str()),
            None => format!("{}:{}", &caps[1], &caps[2]),
        };
        push_unique(offsets, seen, display, seconds);
    }
}

fn collect_unit_letters(text: &str, offsets: &mut Vec<TimeOffset>, seen: &mut HashSet<String>) {
    for caps in UNIT_LETTER_REGEX.captures_iter(text) {
        let Some(h) = parse_component(&caps[1]) else {
            continue;
        };
        let Some(m) = parse_component(&caps[2]) else {
            continue;
        };
        let Some(s) = caps.get(3).map_or(Some(0), |g| parse_component(g.as_str())) else {
            continue;
        };
        let Some(seconds) = total_seconds(h, m, s) else {
            continue;
        };

        // Unit-letter notation is re-rendered H:MM:SS; fields stay as
        // written, so `1h 75m` renders as 1:75:00.
        let display = format!("{h}:{m:02}:{s:02}");
        push_unique(offsets, seen, display, seconds);
    }
}

fn collect_minute_seconds(text: &str, offsets: &mut Vec<TimeOffset>, seen: &mut HashSet<String>) {
    for caps in MINUTE_SECOND_REGEX.captures_iter(text) {
        let Some(m) = parse_component(&caps[1]) else {
            continue;
        };
        let Some(s) = caps.get(2).map_or(Some(0), |g| parse_component(g.as_str())) else {
            continue;
        };
        let Some(seconds) = total_seconds(0, m, s) else {
            continue;
        };

        // Minutes stay as written (`90분` renders as 90:00, not 1:30:00).
        let display = format!("{m}:{s:02}");
        push_unique(offsets, seen, display, seconds);
    }
}

fn collect_bare_seconds(text: &str, offsets: &mut Vec<TimeOffset>, seen: &mut HashSet<String>) {
    for caps in BARE_SECONDS_REGEX.captures_iter(text) {
        let Some(total) = parse_component(&caps[1]) else {
            continue;
        };
        let display = format!("{}:{:02}", total / 60, total % 60);
        push_unique(offsets, seen, display, total);
    }
}

// ============================================================
// Helpers
// ============================================================

/// Boundary rule for colon notation: the match must be preceded by the start
/// of the text or whitespace, and followed by the end of the text or a
/// character that is neither an ASCII digit nor `:`. This keeps a trailing
/// digit run (e.g. the year in `20251:23`) from being swallowed into a
/// spurious match.
fn colon_bounded(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .is_none_or(char::is_whitespace);
    let after_ok = text[end..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_ascii_digit() && c != ':');
    before_ok && after_ok
}

fn parse_component(field: &str) -> Option<u32> {
    field.parse::<u32>().ok()
}

/// Combine hour/minute/second fields into a total duration, discarding on
/// overflow.
fn total_seconds(h: u32, m: u32, s: u32) -> Option<u32> {
    h.checked_mul(3600)?
        .checked_add(m.checked_mul(60)?)?
        .checked_add(s)
}

fn push_unique(
    offsets: &mut Vec<TimeOffset>,
    seen: &mut HashSet<String>,
    display: String,
    seconds: u32,
) {
    if seen.insert(display.clone()) {
        offsets.push(TimeOffset { display, seconds });
    }
}

// ============================================================
// Tests
// ============================================================
