//! # Temporal Literals and Zones
//!
//! Parses `YYYY-MM-DD[( |T)HH:MM[:SS[.f{1,9}]]][zone]` where the zone is `Z`,
//! `UTC`, `GMT`, a fixed offset (`+HH`, `+HH:MM`, `+HHMM`, optionally after
//! `UTC`/`GMT`) or a named region separated by a space (`Europe/Berlin`).
//!
//! Local wall-clock times are resolved in a zone with two rules:
//! - a time inside a spring-forward gap takes the offset that was in effect
//!   24 hours earlier (the pre-transition offset)
//! - a time inside a fall-back overlap takes the earlier instant

use std::fmt;

use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;

use crate::context::ValueContext;
use crate::error::{ValueError, ValueResult};

/// A zone used to interpret local date-times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneSpec {
    Fixed(FixedOffset),
    Region(Tz),
}

impl ZoneSpec {
    pub fn utc() -> Self {
        ZoneSpec::Fixed(Utc.fix())
    }

    /// Parses a zone designator; see [`parse_zone`]
    pub fn parse(text: &str) -> ValueResult<Self> {
        parse_zone(text)
    }

    /// Offset in effect at a UTC instant
    pub fn offset_at(&self, utc: &NaiveDateTime) -> FixedOffset {
        match self {
            ZoneSpec::Fixed(offset) => *offset,
            ZoneSpec::Region(tz) => tz.offset_from_utc_datetime(utc).fix(),
        }
    }

    /// Interprets a wall-clock time in this zone
    pub fn resolve_local(&self, local: &NaiveDateTime) -> ValueResult<DateTime<FixedOffset>> {
        let offset = match self {
            ZoneSpec::Fixed(offset) => *offset,
            ZoneSpec::Region(tz) => match tz.from_local_datetime(local) {
                LocalResult::Single(dt) => return Ok(dt.fixed_offset()),
                LocalResult::Ambiguous(earliest, _) => return Ok(earliest.fixed_offset()),
                LocalResult::None => {
                    let day_before = local
                        .checked_sub_signed(TimeDelta::hours(24))
                        .ok_or_else(|| out_of_range(local))?;
                    let offset = tz.offset_from_utc_datetime(&day_before).fix();
                    tracing::trace!(zone = %tz.name(), %local, %offset, "local_time_in_gap");
                    offset
                }
            },
        };
        with_offset(local, offset)
    }
}

impl fmt::Display for ZoneSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneSpec::Fixed(offset) if offset.local_minus_utc() == 0 => f.write_str("UTC"),
            ZoneSpec::Fixed(offset) => f.write_str(&format_offset(*offset)),
            ZoneSpec::Region(tz) => f.write_str(tz.name()),
        }
    }
}

impl Default for ZoneSpec {
    fn default() -> Self {
        ZoneSpec::utc()
    }
}

/// Attaches a fixed offset to a wall-clock time
pub fn with_offset(local: &NaiveDateTime, offset: FixedOffset) -> ValueResult<DateTime<FixedOffset>> {
    let utc = local
        .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
        .ok_or_else(|| out_of_range(local))?;
    Ok(DateTime::from_naive_utc_and_offset(utc, offset))
}

/// Date-time literal split into its parts
struct Literal {
    date: NaiveDate,
    time: Option<NaiveTime>,
    zone: Option<ZoneSpec>,
}

fn split_literal(operation: &'static str, text: &str) -> ValueResult<Literal> {
    let fail = || ValueError::datetime(operation, text);
    let trimmed = text.trim();
    let date_end = date_length(trimmed).ok_or_else(fail)?;
    let date = parse_date_part(&trimmed[..date_end]).ok_or_else(fail)?;
    let mut rest = &trimmed[date_end..];

    let mut time = None;
    if let Some(after) = rest.strip_prefix(['T', 't', ' ']) {
        let after = after.trim_start();
        if after.starts_with(|c: char| c.is_ascii_digit()) {
            let end = after
                .find(|c: char| !(c.is_ascii_digit() || c == ':' || c == '.'))
                .unwrap_or(after.len());
            time = Some(parse_time_part(&after[..end]).ok_or_else(fail)?);
            rest = &after[end..];
        } else {
            rest = after;
        }
    }

    let rest = rest.trim();
    let zone = if rest.is_empty() {
        None
    } else {
        Some(parse_zone_in(operation, rest)?)
    };
    Ok(Literal { date, time, zone })
}

/// Byte length of the leading `[-]Y+-M{1,2}-D{1,2}` part
fn date_length(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = usize::from(bytes.first() == Some(&b'-'));
    for field in 0..3 {
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == start {
            return None;
        }
        if field < 2 {
            if bytes.get(i) != Some(&b'-') {
                return None;
            }
            i += 1;
        }
    }
    Some(i)
}

fn parse_date_part(text: &str) -> Option<NaiveDate> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, text),
    };
    let mut fields = body.splitn(3, '-');
    let year_text = fields.next()?;
    if year_text.len() < 4 {
        return None;
    }
    let year: i32 = year_text.parse().ok()?;
    let month_text = fields.next()?;
    let day_text = fields.next()?;
    if month_text.len() > 2 || day_text.len() > 2 {
        return None;
    }
    let year = if negative { -year } else { year };
    NaiveDate::from_ymd_opt(year, month_text.parse().ok()?, day_text.parse().ok()?)
}

fn parse_time_part(text: &str) -> Option<NaiveTime> {
    let mut fields = text.split(':');
    let hour = two_digits(fields.next()?)?;
    let minute = two_digits(fields.next()?)?;
    let (second, nanos) = match fields.next() {
        None => (0, 0),
        Some(sec) => {
            let (whole, fraction) = match sec.split_once('.') {
                Some((w, f)) => (w, Some(f)),
                None => (sec, None),
            };
            let nanos = match fraction {
                None => 0,
                Some(f) if !f.is_empty() && f.len() <= 9 && f.bytes().all(|b| b.is_ascii_digit()) => {
                    f.parse::<u32>().ok()? * 10u32.pow(9 - f.len() as u32)
                }
                Some(_) => return None,
            };
            (two_digits(whole)?, nanos)
        }
    };
    if fields.next().is_some() {
        return None;
    }
    NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
}

fn two_digits(text: &str) -> Option<u32> {
    if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parses a zone designator: `Z`, `UTC`, `GMT`, a fixed offset or a region
pub fn parse_zone(text: &str) -> ValueResult<ZoneSpec> {
    parse_zone_in("parse_zone", text)
}

fn parse_zone_in(operation: &'static str, text: &str) -> ValueResult<ZoneSpec> {
    let trimmed = text.trim();
    let upper = trimmed.to_ascii_uppercase();
    if matches!(upper.as_str(), "Z" | "UTC" | "GMT") {
        return Ok(ZoneSpec::utc());
    }
    let signed = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(&upper);
    if signed.starts_with(['+', '-']) {
        return parse_offset(signed)
            .map(ZoneSpec::Fixed)
            .ok_or_else(|| ValueError::datetime(operation, text));
    }
    trimmed
        .parse::<Tz>()
        .map(ZoneSpec::Region)
        .map_err(|_| ValueError::UnknownTimeZone {
            operation,
            zone: trimmed.to_string(),
        })
}

/// `+HH`, `+HH:MM`, `+HHMM` or `+HH:MM:SS`, and the `-` forms
fn parse_offset(text: &str) -> Option<FixedOffset> {
    let (sign, body) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    let (hours, minutes, seconds) = if body.contains(':') {
        let mut fields = body.split(':');
        let h = two_digits(fields.next()?)?;
        let m = fields.next().map_or(Some(0), two_digits)?;
        let s = fields.next().map_or(Some(0), two_digits)?;
        if fields.next().is_some() {
            return None;
        }
        (h, m, s)
    } else {
        match body.len() {
            1 | 2 => (two_digits(body)?, 0, 0),
            4 => (two_digits(body.get(..2)?)?, two_digits(body.get(2..)?)?, 0),
            _ => return None,
        }
    };
    if hours > 18 || minutes > 59 || seconds > 59 {
        return None;
    }
    let total = (hours * 3600 + minutes * 60 + seconds) as i32;
    FixedOffset::east_opt(sign * total)
}

/// Parses a literal into an absolute instant. Zone-less literals are
/// interpreted in the context zone.
pub fn parse_instant(text: &str, ctx: &ValueContext) -> ValueResult<DateTime<Utc>> {
    Ok(parse_zoned("parse_instant", text, ctx)?.with_timezone(&Utc))
}

/// Parses a literal into a zoned timestamp keeping its resolved offset
pub fn parse_timestamp_tz(text: &str, ctx: &ValueContext) -> ValueResult<DateTime<FixedOffset>> {
    parse_zoned("parse_timestamp_tz", text, ctx)
}

fn parse_zoned(
    operation: &'static str,
    text: &str,
    ctx: &ValueContext,
) -> ValueResult<DateTime<FixedOffset>> {
    let literal = split_literal(operation, text)?;
    let local = literal.date.and_time(literal.time.unwrap_or(NaiveTime::MIN));
    literal.zone.unwrap_or(ctx.time_zone).resolve_local(&local)
}

/// Parses a literal into a local timestamp. A literal carrying its own zone is
/// converted to the wall clock of the context zone.
pub fn parse_timestamp(text: &str, ctx: &ValueContext) -> ValueResult<NaiveDateTime> {
    let literal = split_literal("parse_timestamp", text)?;
    let local = literal.date.and_time(literal.time.unwrap_or(NaiveTime::MIN));
    match literal.zone {
        None => Ok(local),
        Some(zone) => {
            let instant = zone.resolve_local(&local)?;
            Ok(to_local(&instant, ctx))
        }
    }
}

pub fn parse_date(text: &str) -> ValueResult<NaiveDate> {
    let literal = split_literal("parse_date", text)?;
    if literal.time.is_some() || literal.zone.is_some() {
        return Err(ValueError::datetime("parse_date", text));
    }
    Ok(literal.date)
}

pub fn parse_time(text: &str) -> ValueResult<NaiveTime> {
    parse_time_part(text.trim()).ok_or_else(|| ValueError::datetime("parse_time", text))
}

/// Parses `HH:MM[:SS[.f]][zone]`. A zone-less time, or a time in a named
/// region, takes the zone's offset as of 1970-01-01.
pub fn parse_time_tz(text: &str, ctx: &ValueContext) -> ValueResult<(NaiveTime, FixedOffset)> {
    let fail = || ValueError::datetime("parse_time_tz", text);
    let trimmed = text.trim();
    let end = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == ':' || c == '.'))
        .unwrap_or(trimmed.len());
    let time = parse_time_part(&trimmed[..end]).ok_or_else(fail)?;
    let rest = trimmed[end..].trim();
    let zone = if rest.is_empty() {
        ctx.time_zone
    } else {
        parse_zone_in("parse_time_tz", rest)?
    };
    Ok((time, reference_offset(zone)))
}

/// Offset of a zone for values that carry no date
pub fn reference_offset(zone: ZoneSpec) -> FixedOffset {
    zone.offset_at(&DateTime::<Utc>::UNIX_EPOCH.naive_utc())
}

/// Wall clock of an instant in the context zone
pub fn to_local(instant: &DateTime<FixedOffset>, ctx: &ValueContext) -> NaiveDateTime {
    let utc = instant.naive_utc();
    let offset = ctx.time_zone.offset_at(&utc);
    instant.with_timezone(&offset).naive_local()
}

/// `HH:MM:SS` with trailing zeros of the fraction trimmed
pub fn format_time(time: &NaiveTime) -> String {
    let mut out = format!("{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second());
    let nanos = time.nanosecond();
    if nanos != 0 {
        let digits = format!("{nanos:09}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    format!("{} {}", format_date(&ts.date()), format_time(&ts.time()))
}

/// `+HH:MM`, with seconds only when present
pub fn format_offset(offset: FixedOffset) -> String {
    let total = offset.local_minus_utc();
    let sign = if total < 0 { '-' } else { '+' };
    let abs = total.unsigned_abs();
    let (h, m, s) = (abs / 3600, abs % 3600 / 60, abs % 60);
    if s == 0 {
        format!("{sign}{h:02}:{m:02}")
    } else {
        format!("{sign}{h:02}:{m:02}:{s:02}")
    }
}

pub fn format_timestamp_tz(ts: &DateTime<FixedOffset>) -> String {
    format!("{}{}", format_timestamp(&ts.naive_local()), format_offset(*ts.offset()))
}

fn out_of_range(local: &NaiveDateTime) -> ValueError {
    ValueError::datetime("resolve_local", &local.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offsets() {
        assert_eq!(parse_offset("+01"), FixedOffset::east_opt(3600));
        assert_eq!(parse_offset("-0530"), FixedOffset::east_opt(-5 * 3600 - 1800));
        assert_eq!(parse_offset("+05:45"), FixedOffset::east_opt(5 * 3600 + 45 * 60));
        assert_eq!(parse_offset("+19"), None);
        assert_eq!(parse_offset("+123"), None);
    }

    #[test]
    fn test_split_literal_forms() {
        let lit = split_literal("test", "2018-03-25T02:30:00.5Z").unwrap();
        assert_eq!(lit.time, NaiveTime::from_hms_milli_opt(2, 30, 0, 500));
        assert_eq!(lit.zone, Some(ZoneSpec::utc()));

        let lit = split_literal("test", "2018-03-25 02:30 Europe/Berlin").unwrap();
        assert_eq!(lit.zone, Some(ZoneSpec::Region(chrono_tz::Europe::Berlin)));

        let lit = split_literal("test", "2018-03-25").unwrap();
        assert!(lit.time.is_none() && lit.zone.is_none());
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["2018-3", "18-03-25", "2018-03-25 25:00", "2018-03-25 10:00:00.1234567890"] {
            assert!(
                matches!(split_literal("test", bad), Err(ValueError::InvalidDatetimeFormat { .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_unknown_region() {
        assert!(matches!(
            parse_zone("Mars/Olympus_Mons"),
            Err(ValueError::UnknownTimeZone { .. })
        ));
    }

    #[test]
    fn test_format_time_trims_fraction() {
        let t = NaiveTime::from_hms_nano_opt(1, 2, 3, 120_000_000).unwrap();
        assert_eq!(format_time(&t), "01:02:03.12");
        let t = NaiveTime::from_hms_opt(1, 2, 3).unwrap();
        assert_eq!(format_time(&t), "01:02:03");
    }
}
