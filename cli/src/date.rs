//! Parsing of user-supplied target dates.

use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::zones::{earliest_utc, Zone};

/// Date-time layouts without an offset, interpreted in the caller's zone.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Date-only layouts, taken as midnight in the caller's zone.
const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse `raw` as a point in time.
///
/// Accepts `@<unix seconds>`, RFC 3339, RFC 2822, `date(1)` output such as
/// `Mon Jan 2 15:04:05 MST 2006`, and `YYYY-MM-DD[ HH:MM[:SS]]` (also with `/`
/// separators or a `T`), the last interpreted in `zone`.
pub fn parse_date<Tz: TimeZone>(raw: &str, zone: &Tz) -> anyhow::Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Some(secs) = raw.strip_prefix('@') {
        let secs: i64 = secs
            .parse()
            .with_context(|| format!("invalid unix timestamp {raw:?}"))?;
        return DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| anyhow!("unix timestamp {secs} is out of range"));
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(raw) {
        return Ok(date.with_timezone(&Utc));
    }
    if let Some(date) = parse_unix_date(raw)? {
        return Ok(date);
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| anyhow!("unrecognised date {raw:?}"))?;

    earliest_utc(zone, &naive)
        .ok_or_else(|| anyhow!("{raw:?} does not exist in the local timezone"))
}

/// `Weekday Month Day HH:MM:SS Zone Year`, the layout dates are printed in.
///
/// `Ok(None)` when `raw` does not have that shape; an error when it does but
/// the zone token is unknown.
fn parse_unix_date(raw: &str) -> anyhow::Result<Option<DateTime<Utc>>> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let [weekday, month, day, time, zone, year] = tokens.as_slice() else {
        return Ok(None);
    };
    let wall_clock = format!("{weekday} {month} {day} {time} {year}");
    let Ok(naive) = NaiveDateTime::parse_from_str(&wall_clock, "%a %b %e %H:%M:%S %Y") else {
        return Ok(None);
    };
    let Ok(zone) = zone.parse::<Zone>() else {
        bail!("unknown timezone {zone:?} in {raw:?}");
    };
    zone.from_local(&naive)
        .map(Some)
        .ok_or_else(|| anyhow!("{raw:?} does not exist in timezone {zone:?}"))
}
