use crate::config::SEARCH_WINDOW_DAYS;
use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Parse an ISO8601 duration (PT1H2M3S, P1DT4M, PT12.5S) into seconds.
///
/// Returns `None` for anything that is not a plain day/time duration, including
/// year and month designators whose length in seconds is ambiguous.
pub fn parse_iso8601_duration(duration_str: &str) -> Option<f64> {
    let rest = duration_str.strip_prefix('P')?;
    if rest.is_empty() {
        return None;
    }

    let mut total_seconds = 0.0;
    let mut current_number = String::new();
    let mut in_time = false;
    let mut saw_component = false;

    for ch in rest.chars() {
        if ch.is_ascii_digit() || ch == '.' {
            current_number.push(ch);
            continue;
        }
        if ch == 'T' {
            if in_time || !current_number.is_empty() {
                return None;
            }
            in_time = true;
            continue;
        }

        let num: f64 = current_number.parse().ok()?;
        current_number.clear();
        let unit_seconds = match (ch, in_time) {
            ('W', false) => 7.0 * 86_400.0,
            ('D', false) => 86_400.0,
            ('H', true) => 3_600.0,
            ('M', true) => 60.0,
            ('S', true) => 1.0,
            _ => return None,
        };
        total_seconds += num * unit_seconds;
        saw_component = true;
    }

    if !current_number.is_empty() || !saw_component {
        return None;
    }
    Some(total_seconds)
}

/// `publishedAt` timestamps are reduced to their date part.
pub fn published_date(published_at: &str) -> Option<String> {
    published_at.get(..10).map(str::to_string)
}

/// Lower and upper `publishedAfter`/`publishedBefore` bounds of the search window.
pub fn search_window(now: DateTime<Utc>) -> (String, String) {
    let after = now - Duration::days(SEARCH_WINDOW_DAYS);
    (
        after.to_rfc3339_opts(SecondsFormat::Secs, true),
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

pub fn run_date(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Statistics counters come back as JSON strings.
pub fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}
