// ── RouterOS durations ──
//
// RouterOS prints the same interval in several spellings (`300ms`,
// `0.3s`, `00:00:00.3`, `1w2d3h`). Values are compared as exact
// nanosecond counts.

use serde_json::Value;

/// Rule that treats two differing values as equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSuppress {
    /// Equal when both parse as the same duration.
    TimeEqual,
}

impl DiffSuppress {
    pub fn suppresses(self, old: &Value, new: &Value) -> bool {
        match self {
            Self::TimeEqual => match (old.as_str(), new.as_str()) {
                (Some(a), Some(b)) => time_equal(a, b),
                _ => old == new,
            },
        }
    }
}

/// Compare two duration strings. Falls back to plain string equality
/// when either side does not parse.
pub fn time_equal(a: &str, b: &str) -> bool {
    match (parse_duration(a), parse_duration(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

const NS: u128 = 1;
const US: u128 = 1_000 * NS;
const MS: u128 = 1_000 * US;
const SEC: u128 = 1_000 * MS;
const MIN: u128 = 60 * SEC;
const HOUR: u128 = 60 * MIN;
const DAY: u128 = 24 * HOUR;
const WEEK: u128 = 7 * DAY;

/// Parse a RouterOS duration into nanoseconds.
///
/// Accepts unit sequences (`1w2d`, `1h30m`, `1.5s`, `300ms`, `20us`),
/// bare numbers as seconds, and clock notation `hh:mm:ss[.fff]`.
pub fn parse_duration(input: &str) -> Option<u128> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if s.contains(':') {
        return parse_clock(s);
    }
    if let Some(n) = parse_decimal(s, SEC) {
        return Some(n);
    }

    let mut total = 0u128;
    let mut rest = s;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_len == 0 {
            return None;
        }
        let (number, tail) = rest.split_at(num_len);
        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        let scale = match unit {
            "w" => WEEK,
            "d" => DAY,
            "h" => HOUR,
            "m" => MIN,
            "s" | "" => SEC,
            "ms" => MS,
            "us" => US,
            "ns" => NS,
            _ => return None,
        };
        total = total.checked_add(parse_decimal(number, scale)?)?;
        rest = next;
    }
    Some(total)
}

// `hh:mm:ss` or `hh:mm:ss.fff`, optionally with a leading day count (`3d01:00:00`).
fn parse_clock(s: &str) -> Option<u128> {
    let (days, clock) = match s.split_once('d') {
        Some((d, c)) => (parse_decimal(d, DAY)?, c),
        None => (0, s),
    };
    let mut parts = clock.split(':');
    let h = parts.next()?;
    let m = parts.next()?;
    let sec = parts.next()?;
    if parts.next().is_some() || h.contains('.') || m.contains('.') {
        return None;
    }
    let total = days
        .checked_add(parse_decimal(h, HOUR)?)?
        .checked_add(parse_decimal(m, MIN)?)?
        .checked_add(parse_decimal(sec, SEC)?)?;
    Some(total)
}

// Digits with an optional fraction, scaled without floating point.
fn parse_decimal(s: &str, scale: u128) -> Option<u128> {
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let whole_value: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut value = whole_value.checked_mul(scale)?;

    let mut unit = scale;
    for digit in frac.bytes() {
        unit /= 10;
        if unit == 0 {
            break;
        }
        value = value.checked_add(u128::from(digit - b'0') * unit)?;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equivalent_spellings_compare_equal() {
        assert!(time_equal("300ms", "0.3s"));
        assert!(time_equal("300ms", "00:00:00.3"));
        assert!(time_equal("1s", "1000ms"));
        assert!(time_equal("90s", "1m30s"));
        assert!(time_equal("1w", "7d"));
        assert!(time_equal("1d", "24:00:00"));
        assert!(time_equal("2", "2s"));
    }

    #[test]
    fn different_durations_differ() {
        assert!(!time_equal("500ms", "300ms"));
        assert!(!time_equal("1s", "1001ms"));
        assert!(!time_equal("1m", "1h"));
    }

    #[test]
    fn unparseable_falls_back_to_string_equality() {
        assert!(time_equal("soon", "soon"));
        assert!(!time_equal("soon", "later"));
        assert!(!time_equal("soon", "1s"));
    }

    #[test]
    fn parses_compound_units() {
        assert_eq!(parse_duration("1h30m"), Some(90 * MIN));
        assert_eq!(parse_duration("1w2d3h4m5s"), Some(WEEK + 2 * DAY + 3 * HOUR + 4 * MIN + 5 * SEC));
        assert_eq!(parse_duration("1.5s"), Some(1_500 * MS));
        assert_eq!(parse_duration("20us"), Some(20 * US));
        assert_eq!(parse_duration("3d01:00:00"), Some(3 * DAY + HOUR));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("ms"), None);
        assert_eq!(parse_duration("5x"), None);
        assert_eq!(parse_duration("1:2"), None);
        assert_eq!(parse_duration("."), None);
    }

    #[test]
    fn suppression_only_applies_to_strings() {
        assert!(DiffSuppress::TimeEqual.suppresses(&json!("300ms"), &json!("0.3s")));
        assert!(!DiffSuppress::TimeEqual.suppresses(&json!("300ms"), &json!(300)));
    }
}
