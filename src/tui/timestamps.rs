use chrono::{DateTime, Local, Utc};

use crate::config::{DurationFormat, TimeFormat};

const SECOND_MS: i64 = 1000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;
const MONTH_MS: i64 = 30 * DAY_MS;
const YEAR_MS: i64 = 365 * DAY_MS;

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format when a command ran, relative to `now_ms` or as a local date.
///
/// Timestamps stored in micro- or nanoseconds are scaled down first.
/// Non-positive timestamps render as `n/a`.
pub fn format_when(ts_ms: i64, format: TimeFormat, now_ms: i64) -> String {
    let ts_ms = normalize_timestamp_ms(ts_ms, now_ms);
    if ts_ms <= 0 {
        return "n/a".to_string();
    }

    match format {
        TimeFormat::Relative => human_since(now_ms.saturating_sub(ts_ms)),
        TimeFormat::Absolute => match DateTime::from_timestamp_millis(ts_ms) {
            Some(ts) => ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            None => "n/a".to_string(),
        },
    }
}

/// Scale micro/nanosecond timestamps to milliseconds.
pub fn normalize_timestamp_ms(ts: i64, now_ms: i64) -> i64 {
    if ts <= 0 || now_ms <= 0 {
        return ts;
    }
    if ts > now_ms.saturating_mul(1_000_000) {
        ts / 1_000_000
    } else if ts > now_ms.saturating_mul(1000) {
        ts / 1000
    } else {
        ts
    }
}

/// Tiered age: seconds, minutes, hours, days, weeks, months, years.
pub fn human_since(elapsed_ms: i64) -> String {
    let d = elapsed_ms.saturating_abs();
    match d {
        d if d < MINUTE_MS => format!("{}s ago", d / SECOND_MS),
        d if d < HOUR_MS => format!("{}m ago", d / MINUTE_MS),
        d if d < DAY_MS => format!("{}h ago", d / HOUR_MS),
        d if d < WEEK_MS => format!("{}d ago", d / DAY_MS),
        d if d < MONTH_MS => format!("{}w ago", d / WEEK_MS),
        d if d < YEAR_MS => format!("{}mo ago", d / MONTH_MS),
        d => format!("{}y ago", d / YEAR_MS),
    }
}

pub fn format_duration(ms: i64, format: DurationFormat) -> String {
    match format {
        DurationFormat::Ms => format!("{}ms", ms),
        DurationFormat::S => format!("{:.2}s", ms as f64 / 1000.0),
        DurationFormat::Auto => human_duration(ms),
    }
}

fn human_duration(ms: i64) -> String {
    if ms < SECOND_MS {
        return format!("{}ms", ms);
    }
    let secs = ms as f64 / 1000.0;
    if secs < 60.0 {
        return format!("{:.1}s", secs);
    }
    let minutes = secs / 60.0;
    if minutes < 60.0 {
        return format!("{:.1}m", minutes);
    }
    format!("{:.1}h", minutes / 60.0)
}

/// Right-align `text` in `width` columns, cutting it if too long.
pub fn fit_right(text: &str, width: usize) -> String {
    let cut: String = text.chars().take(width).collect();
    format!("{:>width$}", cut, width = width)
}
