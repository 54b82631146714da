//! Rendering an estimated date in several timezones.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// Layout matching the classic `date(1)` output, e.g. `Fri Mar  1 12:00:00 UTC 2024`.
pub const UNIX_DATE: &str = "%a %b %e %H:%M:%S %Z %Y";

/// Zones shown when `--timezones` is not given.
pub const DEFAULT_ZONES: &str =
    "Local,UTC,Asia/Tokyo,Australia/NSW,Asia/Istanbul,US/Pacific,US/Eastern";

/// A timezone the estimate can be shown in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Local,
    Utc,
    Named(Tz),
    Fixed(FixedOffset),
}

impl FromStr for Zone {
    type Err = String;

    /// `Local`, `UTC`, an IANA name such as `Asia/Tokyo`, or a fixed offset
    /// such as `+09:00`, `-0530` or `UTC+9`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "local" => return Ok(Zone::Local),
            "utc" | "gmt" | "z" => return Ok(Zone::Utc),
            _ => {}
        }
        if let Ok(tz) = trimmed.parse::<Tz>() {
            return Ok(Zone::Named(tz));
        }
        parse_offset(trimmed)
            .map(Zone::Fixed)
            .ok_or_else(|| s.to_string())
    }
}

/// `+HH:MM`, `+HHMM` or `+H`, optionally prefixed by `UTC`/`GMT`.
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let offset = raw
        .strip_prefix("UTC")
        .or_else(|| raw.strip_prefix("GMT"))
        .unwrap_or(raw);
    let (sign, digits) = match offset.chars().next() {
        Some('+') => (1, &offset[1..]),
        Some('-') => (-1, &offset[1..]),
        _ => return None,
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == ':') {
        return None;
    }
    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "0"),
    };
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl Zone {
    pub fn format(&self, date: DateTime<Utc>) -> String {
        match self {
            Zone::Local => date.with_timezone(&Local).format(UNIX_DATE).to_string(),
            Zone::Utc => date.format(UNIX_DATE).to_string(),
            Zone::Named(tz) => date.with_timezone(tz).format(UNIX_DATE).to_string(),
            Zone::Fixed(offset) => date.with_timezone(offset).format(UNIX_DATE).to_string(),
        }
    }

    /// The instant `naive` names on this zone's wall clock.
    pub fn from_local(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Zone::Local => earliest_utc(&Local, naive),
            Zone::Utc => earliest_utc(&Utc, naive),
            Zone::Named(tz) => earliest_utc(tz, naive),
            Zone::Fixed(offset) => earliest_utc(offset, naive),
        }
    }
}

/// Earliest instant matching `naive` in `zone`; `None` inside a DST gap.
pub fn earliest_utc<Z: TimeZone>(zone: &Z, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
    zone.from_local_datetime(naive)
        .earliest()
        .map(|date| date.with_timezone(&Utc))
}

/// One line per requested zone, labels right-aligned to the longest name.
///
/// Unknown zones produce an explanatory line instead of a date.
pub fn render(date: DateTime<Utc>, names: &[String]) -> Vec<String> {
    let width = names.iter().map(|n| n.len()).max().unwrap_or(0);
    names
        .iter()
        .map(|name| match name.parse::<Zone>() {
            Ok(zone) => format!("{name:>width$}: {}", zone.format(date)),
            Err(_) => format!("unable to find timezone {name}"),
        })
        .collect()
}
