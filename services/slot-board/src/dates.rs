//! Date parsing and display labels
//!
//! The booking site works in Japan Standard Time, so every label is
//! rendered at a fixed UTC+09:00 offset.

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Offset, Utc};

const JST_OFFSET_SECONDS: i32 = 9 * 3600;
const WEEKDAYS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

pub const FETCHED_LABEL_EMPTY: &str = "｜ 取得時刻: -";

/// Japan Standard Time
pub fn jst() -> FixedOffset {
    // 9h is always a valid offset
    FixedOffset::east_opt(JST_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

/// Calendar date of `now` in JST
pub fn today_jst(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&jst()).date_naive()
}

/// Parse `YYYY-MM-DD` or compact `YYYYMMDD[...]`
pub fn parse_date_string(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if s.len() == 10 && s.as_bytes().get(4) == Some(&b'-') {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
    }
    let compact = s.get(..8)?;
    if !compact.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(compact, "%Y%m%d").ok()
}

/// `M/D(曜)`, e.g. `1/17(土)`
pub fn format_date_label(date: NaiveDate) -> String {
    let weekday = WEEKDAYS[date.weekday().num_days_from_sunday() as usize];
    format!("{}/{}({})", date.month(), date.day(), weekday)
}

/// Label for a date key; keys that do not parse are shown as-is
pub fn display_date(key: &str) -> String {
    match parse_date_string(key) {
        Some(date) => format_date_label(date),
        None => key.to_string(),
    }
}

/// `YYYYMMDD[HHMM]` → `YYYY/MM/DD`, or `-` when too short
pub fn format_api_date(s: &str) -> String {
    match (s.get(0..4), s.get(4..6), s.get(6..8)) {
        (Some(year), Some(month), Some(day)) => format!("{}/{}/{}", year, month, day),
        _ => "-".to_string(),
    }
}

/// `YYYYMMDD` plus `0000` or `2359`, as the booking site API expects
pub fn to_api_date(date: NaiveDate, end_of_day: bool) -> String {
    let time = if end_of_day { "2359" } else { "0000" };
    format!("{}{}", date.format("%Y%m%d"), time)
}

/// Last day of a window of `days` days starting at `start`
pub fn window_end(start: NaiveDate, days: u32) -> NaiveDate {
    start
        .checked_add_days(Days::new(u64::from(days.saturating_sub(1))))
        .unwrap_or(start)
}

/// Range line shown above the tables
pub fn range_label(start: &str, end: &str) -> String {
    format!("対象期間: {} 〜 {}（1時間枠・残り枠）", start, end)
}

/// Range line computed locally when no page reported a range
pub fn fallback_range_label(today: NaiveDate, days: u32) -> String {
    let end = window_end(today, days);
    range_label(
        &format!("{}/{}/{}", today.year(), today.month(), today.day()),
        &format!("{}/{}/{}", end.year(), end.month(), end.day()),
    )
}

/// Parse an RFC 3339 timestamp, also accepting a `+HHMM` offset
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(fixed) = colon_offset(value) {
        if let Ok(ts) = DateTime::parse_from_rfc3339(&fixed) {
            return Some(ts.with_timezone(&Utc));
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// `...+0900` → `...+09:00`
fn colon_offset(value: &str) -> Option<String> {
    let split = value.len().checked_sub(5)?;
    let (head, offset) = (value.get(..split)?, value.get(split..)?);
    let mut chars = offset.chars();
    let sign = chars.next()?;
    if sign != '+' && sign != '-' {
        return None;
    }
    let digits = offset.get(1..)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{}{}{}:{}", head, sign, &digits[..2], &digits[2..]))
}

/// `YYYY/MM/DD HH:MM` in JST
pub fn format_jst(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&jst()).format("%Y/%m/%d %H:%M").to_string()
}

/// `｜ 取得時刻: <jst>`
pub fn fetched_label(ts: DateTime<Utc>) -> String {
    format!("｜ 取得時刻: {}", format_jst(ts))
}

/// Milliseconds since the Unix epoch, clamped at zero
pub fn epoch_ms(ts: DateTime<Utc>) -> u64 {
    u64::try_from(ts.timestamp_millis()).unwrap_or(0)
}
