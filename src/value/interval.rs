//! SQL intervals.
//!
//! An interval is stored as a sign, a leading field magnitude and a remaining
//! magnitude whose unit depends on the qualifier:
//!
//! | Qualifier | leading | remaining |
//! |-----------|---------|-----------|
//! | `YEAR`, `MONTH`, `DAY`, `HOUR`, `MINUTE` | field count | always 0 |
//! | `SECOND` | seconds | nanoseconds (< 10^9) |
//! | `YEAR TO MONTH` | years | months (< 12) |
//! | `DAY TO HOUR` | days | hours (< 24) |
//! | `DAY TO MINUTE` | days | minutes (< 1440) |
//! | `DAY TO SECOND` | days | nanoseconds of day |
//! | `HOUR TO MINUTE` | hours | minutes (< 60) |
//! | `HOUR TO SECOND` | hours | nanoseconds of hour |
//! | `MINUTE TO SECOND` | minutes | nanoseconds of minute |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ValueError, ValueResult};
use crate::value::ValueKind;

/// Largest leading field value (18 decimal digits)
pub const MAX_LEADING: u64 = 999_999_999_999_999_999;

/// Largest and default leading field precision
pub const MAX_INTERVAL_PRECISION: i64 = 18;

/// Largest and default fractional seconds precision
pub const MAX_INTERVAL_SCALE: i32 = 9;

const NANOS_PER_SECOND: u64 = 1_000_000_000;
const NANOS_PER_MINUTE: u64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: u64 = 24 * NANOS_PER_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalQualifier {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    YearToMonth,
    DayToHour,
    DayToMinute,
    DayToSecond,
    HourToMinute,
    HourToSecond,
    MinuteToSecond,
}

impl IntervalQualifier {
    pub fn from_sql(text: &str) -> Option<Self> {
        let normalized: Vec<String> = text
            .split_whitespace()
            .map(str::to_ascii_uppercase)
            .collect();
        let normalized: Vec<&str> = normalized.iter().map(String::as_str).collect();
        let qualifier = match normalized.as_slice() {
            ["YEAR"] => IntervalQualifier::Year,
            ["MONTH"] => IntervalQualifier::Month,
            ["DAY"] => IntervalQualifier::Day,
            ["HOUR"] => IntervalQualifier::Hour,
            ["MINUTE"] => IntervalQualifier::Minute,
            ["SECOND"] => IntervalQualifier::Second,
            ["YEAR", "TO", "MONTH"] => IntervalQualifier::YearToMonth,
            ["DAY", "TO", "HOUR"] => IntervalQualifier::DayToHour,
            ["DAY", "TO", "MINUTE"] => IntervalQualifier::DayToMinute,
            ["DAY", "TO", "SECOND"] => IntervalQualifier::DayToSecond,
            ["HOUR", "TO", "MINUTE"] => IntervalQualifier::HourToMinute,
            ["HOUR", "TO", "SECOND"] => IntervalQualifier::HourToSecond,
            ["MINUTE", "TO", "SECOND"] => IntervalQualifier::MinuteToSecond,
            _ => return None,
        };
        Some(qualifier)
    }

    pub fn sql(&self) -> &'static str {
        match self {
            IntervalQualifier::Year => "YEAR",
            IntervalQualifier::Month => "MONTH",
            IntervalQualifier::Day => "DAY",
            IntervalQualifier::Hour => "HOUR",
            IntervalQualifier::Minute => "MINUTE",
            IntervalQualifier::Second => "SECOND",
            IntervalQualifier::YearToMonth => "YEAR TO MONTH",
            IntervalQualifier::DayToHour => "DAY TO HOUR",
            IntervalQualifier::DayToMinute => "DAY TO MINUTE",
            IntervalQualifier::DayToSecond => "DAY TO SECOND",
            IntervalQualifier::HourToMinute => "HOUR TO MINUTE",
            IntervalQualifier::HourToSecond => "HOUR TO SECOND",
            IntervalQualifier::MinuteToSecond => "MINUTE TO SECOND",
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            IntervalQualifier::Year => "INTERVAL YEAR",
            IntervalQualifier::Month => "INTERVAL MONTH",
            IntervalQualifier::Day => "INTERVAL DAY",
            IntervalQualifier::Hour => "INTERVAL HOUR",
            IntervalQualifier::Minute => "INTERVAL MINUTE",
            IntervalQualifier::Second => "INTERVAL SECOND",
            IntervalQualifier::YearToMonth => "INTERVAL YEAR TO MONTH",
            IntervalQualifier::DayToHour => "INTERVAL DAY TO HOUR",
            IntervalQualifier::DayToMinute => "INTERVAL DAY TO MINUTE",
            IntervalQualifier::DayToSecond => "INTERVAL DAY TO SECOND",
            IntervalQualifier::HourToMinute => "INTERVAL HOUR TO MINUTE",
            IntervalQualifier::HourToSecond => "INTERVAL HOUR TO SECOND",
            IntervalQualifier::MinuteToSecond => "INTERVAL MINUTE TO SECOND",
        }
    }

    pub fn is_year_month(&self) -> bool {
        matches!(
            self,
            IntervalQualifier::Year | IntervalQualifier::Month | IntervalQualifier::YearToMonth
        )
    }

    pub fn has_seconds(&self) -> bool {
        matches!(
            self,
            IntervalQualifier::Second
                | IntervalQualifier::DayToSecond
                | IntervalQualifier::HourToSecond
                | IntervalQualifier::MinuteToSecond
        )
    }

    /// Width of the rendered fields that follow the leading field
    fn tail_width(&self) -> i32 {
        match self {
            IntervalQualifier::Year
            | IntervalQualifier::Month
            | IntervalQualifier::Day
            | IntervalQualifier::Hour
            | IntervalQualifier::Minute
            | IntervalQualifier::Second => 0,
            IntervalQualifier::YearToMonth
            | IntervalQualifier::DayToHour
            | IntervalQualifier::HourToMinute
            | IntervalQualifier::MinuteToSecond => 3,
            IntervalQualifier::DayToMinute | IntervalQualifier::HourToSecond => 6,
            IntervalQualifier::DayToSecond => 9,
        }
    }

    /// Maximum width of `INTERVAL '-<leading><tail>[.<fraction>]' <QUALIFIER>`
    pub fn display_size(&self, precision: i64, scale: i32) -> i32 {
        // "INTERVAL '" + sign + leading digits + tail + "' " + qualifier
        let mut size = 10 + 1 + precision as i32 + self.tail_width() + 2 + self.sql().len() as i32;
        if self.has_seconds() && scale > 0 {
            size += 1 + scale;
        }
        size
    }

    /// Nanoseconds (day-time) or months (year-month) per leading unit
    fn leading_unit(&self) -> u64 {
        match self {
            IntervalQualifier::Year | IntervalQualifier::YearToMonth => 12,
            IntervalQualifier::Month => 1,
            IntervalQualifier::Day
            | IntervalQualifier::DayToHour
            | IntervalQualifier::DayToMinute
            | IntervalQualifier::DayToSecond => NANOS_PER_DAY,
            IntervalQualifier::Hour
            | IntervalQualifier::HourToMinute
            | IntervalQualifier::HourToSecond => NANOS_PER_HOUR,
            IntervalQualifier::Minute | IntervalQualifier::MinuteToSecond => NANOS_PER_MINUTE,
            IntervalQualifier::Second => NANOS_PER_SECOND,
        }
    }

    /// Unit of the remaining field, 0 when the qualifier has none
    fn remaining_unit(&self) -> u64 {
        match self {
            IntervalQualifier::Year
            | IntervalQualifier::Month
            | IntervalQualifier::Day
            | IntervalQualifier::Hour
            | IntervalQualifier::Minute => 0,
            IntervalQualifier::YearToMonth => 1,
            IntervalQualifier::DayToHour => NANOS_PER_HOUR,
            IntervalQualifier::DayToMinute | IntervalQualifier::HourToMinute => NANOS_PER_MINUTE,
            IntervalQualifier::Second
            | IntervalQualifier::DayToSecond
            | IntervalQualifier::HourToSecond
            | IntervalQualifier::MinuteToSecond => 1,
        }
    }

    /// Exclusive upper bound of the remaining field
    fn remaining_bound(&self) -> u64 {
        match self.remaining_unit() {
            0 => 1,
            unit => self.leading_unit() / unit,
        }
    }
}

impl fmt::Display for IntervalQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

/// An interval value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    qualifier: IntervalQualifier,
    negative: bool,
    leading: u64,
    remaining: u64,
}

impl Interval {
    pub fn new(
        qualifier: IntervalQualifier,
        negative: bool,
        leading: u64,
        remaining: u64,
    ) -> ValueResult<Self> {
        let kind = ValueKind::Interval(qualifier);
        if leading > MAX_LEADING {
            return Err(ValueError::conversion(
                "interval",
                kind,
                kind,
                format!("leading field {leading} exceeds 18 digits"),
            ));
        }
        if remaining >= qualifier.remaining_bound() {
            return Err(ValueError::conversion(
                "interval",
                kind,
                kind,
                format!("remaining field {remaining} out of range"),
            ));
        }
        Ok(Interval {
            qualifier,
            negative: negative && (leading != 0 || remaining != 0),
            leading,
            remaining,
        })
    }

    pub fn qualifier(&self) -> IntervalQualifier {
        self.qualifier
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn leading(&self) -> u64 {
        self.leading
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn signum(&self) -> i32 {
        if self.leading == 0 && self.remaining == 0 {
            0
        } else if self.negative {
            -1
        } else {
            1
        }
    }

    /// Signed total in months (year-month) or nanoseconds (day-time)
    pub fn total(&self) -> i128 {
        let magnitude = self.leading as i128 * self.qualifier.leading_unit() as i128
            + self.remaining as i128 * self.qualifier.remaining_unit() as i128;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Builds an interval from a total in the qualifier's class, dropping
    /// units finer than the qualifier's last field.
    pub fn from_total(qualifier: IntervalQualifier, total: i128) -> ValueResult<Self> {
        let kind = ValueKind::Interval(qualifier);
        let magnitude = total.unsigned_abs();
        let leading_unit = qualifier.leading_unit() as u128;
        let leading = magnitude / leading_unit;
        let leading = u64::try_from(leading).map_err(|_| {
            ValueError::conversion("interval", kind, kind, format!("total {total} out of range"))
        })?;
        let remaining = match qualifier.remaining_unit() {
            0 => 0,
            unit => ((magnitude % leading_unit) / unit as u128) as u64,
        };
        Interval::new(qualifier, total < 0, leading, remaining)
    }

    /// Number of decimal digits in the leading field
    pub fn leading_digits(&self) -> i64 {
        digit_count(self.leading)
    }

    /// Rounds fractional seconds half up to `scale` digits
    pub fn round_fraction(&self, scale: i32) -> ValueResult<Self> {
        if !self.qualifier.has_seconds() || scale >= MAX_INTERVAL_SCALE {
            return Ok(*self);
        }
        let step = 10u128.pow((MAX_INTERVAL_SCALE - scale) as u32);
        let magnitude = self.total().unsigned_abs();
        let rounded = (magnitude + step / 2) / step * step;
        let signed = if self.negative {
            -(rounded as i128)
        } else {
            rounded as i128
        };
        Interval::from_total(self.qualifier, signed)
    }

    /// Parses the field text of an interval (`-1-6`, `3 04:05:06.5`) or a full
    /// literal (`INTERVAL '-1-6' YEAR TO MONTH`) for the given qualifier.
    pub fn parse(qualifier: IntervalQualifier, text: &str) -> ValueResult<Self> {
        let kind = ValueKind::Interval(qualifier);
        let fail = || {
            ValueError::conversion(
                "parse_interval",
                ValueKind::Varchar,
                kind,
                format!("\"{text}\""),
            )
        };

        let mut body = text.trim();
        let mut qualifier = qualifier;
        if body
            .get(..8)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("INTERVAL"))
        {
            let rest = body[8..].trim_start();
            let rest = rest.strip_prefix('\'').ok_or_else(fail)?;
            let (inner, tail) = rest.split_once('\'').ok_or_else(fail)?;
            qualifier = IntervalQualifier::from_sql(tail).ok_or_else(fail)?;
            body = inner.trim();
        }

        let (negative, body) = match body.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, body.strip_prefix('+').unwrap_or(body)),
        };

        let (leading_text, rest) = match qualifier {
            IntervalQualifier::YearToMonth => {
                let (l, r) = body.split_once('-').ok_or_else(fail)?;
                (l, Some(r))
            }
            IntervalQualifier::DayToHour
            | IntervalQualifier::DayToMinute
            | IntervalQualifier::DayToSecond => {
                let (l, r) = body.split_once(' ').ok_or_else(fail)?;
                (l, Some(r.trim_start()))
            }
            IntervalQualifier::HourToMinute
            | IntervalQualifier::HourToSecond
            | IntervalQualifier::MinuteToSecond => {
                let (l, r) = body.split_once(':').ok_or_else(fail)?;
                (l, Some(r))
            }
            _ => (body, None),
        };

        let (leading_text, leading_fraction) = if qualifier == IntervalQualifier::Second {
            split_fraction(leading_text).ok_or_else(fail)?
        } else {
            (leading_text, 0)
        };
        let leading = parse_digits(leading_text).ok_or_else(fail)?;

        let remaining = match (qualifier, rest) {
            (IntervalQualifier::Second, _) => leading_fraction,
            (_, None) => 0,
            (IntervalQualifier::YearToMonth, Some(months)) => parse_bounded(months, 12).ok_or_else(fail)?,
            (IntervalQualifier::DayToHour, Some(hours)) => {
                parse_bounded(hours, 24).ok_or_else(fail)? * NANOS_PER_HOUR
            }
            (IntervalQualifier::DayToMinute, Some(tail)) => {
                let (h, m) = tail.split_once(':').ok_or_else(fail)?;
                parse_bounded(h, 24).ok_or_else(fail)? * NANOS_PER_HOUR
                    + parse_bounded(m, 60).ok_or_else(fail)? * NANOS_PER_MINUTE
            }
            (IntervalQualifier::DayToSecond, Some(tail)) => {
                let mut parts = tail.splitn(3, ':');
                let h = parts.next().ok_or_else(fail)?;
                let m = parts.next().ok_or_else(fail)?;
                let s = parts.next().ok_or_else(fail)?;
                parse_bounded(h, 24).ok_or_else(fail)? * NANOS_PER_HOUR
                    + parse_bounded(m, 60).ok_or_else(fail)? * NANOS_PER_MINUTE
                    + parse_seconds(s).ok_or_else(fail)?
            }
            (IntervalQualifier::HourToMinute, Some(m)) => {
                parse_bounded(m, 60).ok_or_else(fail)? * NANOS_PER_MINUTE
            }
            (IntervalQualifier::HourToSecond, Some(tail)) => {
                let (m, s) = tail.split_once(':').ok_or_else(fail)?;
                parse_bounded(m, 60).ok_or_else(fail)? * NANOS_PER_MINUTE
                    + parse_seconds(s).ok_or_else(fail)?
            }
            (IntervalQualifier::MinuteToSecond, Some(s)) => parse_seconds(s).ok_or_else(fail)?,
            (_, Some(_)) => return Err(fail()),
        };

        // Stored remaining units differ from nanoseconds for the coarser qualifiers
        let remaining = match qualifier.remaining_unit() {
            0 | 1 => remaining,
            unit => remaining / unit,
        };
        Interval::new(qualifier, negative, leading, remaining)
    }

    /// The quoted field text, e.g. `-1-6` or `3 04:05:06.5`
    pub fn field_text(&self) -> String {
        let mut out = String::new();
        if self.negative {
            out.push('-');
        }
        out.push_str(&self.leading.to_string());
        let r = self.remaining;
        match self.qualifier {
            IntervalQualifier::Year
            | IntervalQualifier::Month
            | IntervalQualifier::Day
            | IntervalQualifier::Hour
            | IntervalQualifier::Minute => {}
            IntervalQualifier::Second => push_fraction(&mut out, r),
            IntervalQualifier::YearToMonth => out.push_str(&format!("-{r}")),
            IntervalQualifier::DayToHour => out.push_str(&format!(" {r:02}")),
            IntervalQualifier::DayToMinute => {
                out.push_str(&format!(" {:02}:{:02}", r / 60, r % 60));
            }
            IntervalQualifier::DayToSecond => {
                out.push_str(&format!(
                    " {:02}:{:02}:{:02}",
                    r / NANOS_PER_HOUR,
                    r % NANOS_PER_HOUR / NANOS_PER_MINUTE,
                    r % NANOS_PER_MINUTE / NANOS_PER_SECOND
                ));
                push_fraction(&mut out, r % NANOS_PER_SECOND);
            }
            IntervalQualifier::HourToMinute => out.push_str(&format!(":{r:02}")),
            IntervalQualifier::HourToSecond => {
                out.push_str(&format!(
                    ":{:02}:{:02}",
                    r / NANOS_PER_MINUTE,
                    r % NANOS_PER_MINUTE / NANOS_PER_SECOND
                ));
                push_fraction(&mut out, r % NANOS_PER_SECOND);
            }
            IntervalQualifier::MinuteToSecond => {
                out.push_str(&format!(":{:02}", r / NANOS_PER_SECOND));
                push_fraction(&mut out, r % NANOS_PER_SECOND);
            }
        }
        out
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INTERVAL '{}' {}", self.field_text(), self.qualifier)
    }
}

fn digit_count(mut n: u64) -> i64 {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

fn parse_digits(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn parse_bounded(text: &str, bound: u64) -> Option<u64> {
    parse_digits(text.trim()).filter(|v| *v < bound)
}

/// Splits `12.5` into (`12`, 500_000_000 nanoseconds)
fn split_fraction(text: &str) -> Option<(&str, u64)> {
    match text.split_once('.') {
        None => Some((text, 0)),
        Some((whole, fraction)) => {
            if fraction.is_empty() || fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let nanos: u64 = fraction.parse().ok()?;
            Some((whole, nanos * 10u64.pow(9 - fraction.len() as u32)))
        }
    }
}

fn parse_seconds(text: &str) -> Option<u64> {
    let (whole, nanos) = split_fraction(text.trim())?;
    Some(parse_bounded(whole, 60)? * NANOS_PER_SECOND + nanos)
}

fn push_fraction(out: &mut String, nanos: u64) {
    if nanos != 0 {
        let digits = format!("{nanos:09}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
}
