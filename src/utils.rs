use chrono::{DateTime, NaiveDate, Utc};

use crate::types::AlbumArtist;

/// Parses a catalog release date at whatever precision it comes in.
///
/// `"2023"` becomes 2023-01-01, `"2023-06"` becomes 2023-06-01 and
/// `"2023-06-15"` is taken as is. Anything else yields `None`.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parts: Vec<&str> = raw.split('-').collect();
    if parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    // year must be four digits, month and day two
    if parts[0].len() != 4 || parts.iter().skip(1).any(|p| p.len() != 2) {
        return None;
    }

    let year: i32 = parts[0].parse().ok()?;
    let month: u32 = match parts.get(1) {
        Some(m) => m.parse().ok()?,
        None => 1,
    };
    let day: u32 = match parts.get(2) {
        Some(d) => d.parse().ok()?,
        None => 1,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// A release is new if its date, taken at midnight UTC, lies strictly after
/// the checkpoint. Unparsable dates are never new.
pub fn is_new_release(release_date: &str, last_checked: DateTime<Utc>) -> bool {
    match parse_release_date(release_date) {
        Some(date) => date.and_time(chrono::NaiveTime::MIN).and_utc() > last_checked,
        None => false,
    }
}

pub fn join_artist_names(artists: &[AlbumArtist]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `225000` -> `"3:45"`
pub fn format_duration_ms(ms: Option<u64>) -> String {
    match ms {
        Some(ms) => {
            let secs = ms / 1000;
            format!("{}:{:02}", secs / 60, secs % 60)
        }
        None => String::from("-"),
    }
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
