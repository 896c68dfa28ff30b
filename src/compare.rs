//! # Comparison Engine
//!
//! A total order inside each [`ValueFamily`]. NULL sorts lowest against any
//! value; values of different families are incomparable.
//!
//! Large objects are compared in matched chunks of
//! [`ValueContext::lob_chunk_size`] bytes so that memory use stays bounded
//! regardless of their length.

use std::cmp::Ordering;

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::context::{Collation, ValueContext};
use crate::error::{ValueError, ValueResult};
use crate::value::lob::compare_lobs;
use crate::value::{Lob, Value, ValueFamily, ValueKind};

/// Float order: -inf < finite < +inf < NaN, with NaN equal to NaN and -0
/// equal to 0
pub fn total_cmp_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Compares two values in the context's zone and collation
pub fn compare(a: &Value, b: &Value, ctx: &ValueContext) -> ValueResult<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => return Ok(Ordering::Equal),
        (Value::Null, _) => return Ok(Ordering::Less),
        (_, Value::Null) => return Ok(Ordering::Greater),
        _ => {}
    }
    let family = a.family();
    if family != b.family() {
        return Err(incomparable(a, b));
    }
    match family {
        ValueFamily::Boolean => match (a, b) {
            (Value::Boolean(x), Value::Boolean(y)) => Ok(x.cmp(y)),
            _ => Err(incomparable(a, b)),
        },
        ValueFamily::ExactNumeric => {
            if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
                return Ok(x.cmp(&y));
            }
            match (a.as_decimal(), b.as_decimal()) {
                (Some(x), Some(y)) => Ok(x.cmp(&y)),
                _ => Err(incomparable(a, b)),
            }
        }
        ValueFamily::ApproximateNumeric => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => Ok(total_cmp_f64(x, y)),
            _ => Err(incomparable(a, b)),
        },
        ValueFamily::Character => compare_character(a, b, ctx),
        ValueFamily::Binary => compare_binary(a, b, ctx),
        ValueFamily::DateTime => compare_datetime(a, b, ctx),
        ValueFamily::TimeOfDay => match (a, b) {
            (Value::Time(x), Value::Time(y)) => Ok(x.cmp(y)),
            _ => Err(incomparable(a, b)),
        },
        ValueFamily::ZonedTimeOfDay => match (a, b) {
            (
                Value::TimeTz { time: ta, offset: oa },
                Value::TimeTz { time: tb, offset: ob },
            ) => {
                let x = utc_nanos(ta, oa.local_minus_utc());
                let y = utc_nanos(tb, ob.local_minus_utc());
                Ok(x.cmp(&y))
            }
            _ => Err(incomparable(a, b)),
        },
        ValueFamily::YearMonthInterval | ValueFamily::DayTimeInterval => match (a, b) {
            (Value::Interval(x), Value::Interval(y)) => Ok(x.total().cmp(&y.total())),
            _ => Err(incomparable(a, b)),
        },
        ValueFamily::Uuid => match (a, b) {
            (Value::Uuid(x), Value::Uuid(y)) => Ok(x.cmp(y)),
            _ => Err(incomparable(a, b)),
        },
        ValueFamily::Object => match (a, b) {
            (Value::JavaObject(x), Value::JavaObject(y)) => Ok(x.bytes().cmp(y.bytes())),
            _ => Err(incomparable(a, b)),
        },
        ValueFamily::Enum => match (a, b) {
            (Value::Enum { ordinal: x, .. }, Value::Enum { ordinal: y, .. }) => Ok(x.cmp(y)),
            _ => Err(incomparable(a, b)),
        },
        ValueFamily::Geometry | ValueFamily::Json => match (a, b) {
            (Value::Geometry(x), Value::Geometry(y)) | (Value::Json(x), Value::Json(y)) => Ok(x.cmp(y)),
            _ => Err(incomparable(a, b)),
        },
        ValueFamily::Array => match (a, b) {
            (Value::Array(x), Value::Array(y)) => compare_elements(x.elements(), y.elements(), ctx),
            _ => Err(incomparable(a, b)),
        },
        ValueFamily::Row => match (a, b) {
            (Value::Row(x), Value::Row(y)) if x.len() == y.len() => compare_elements(x, y, ctx),
            (Value::Row(x), Value::Row(y)) => Err(ValueError::conversion(
                "compare",
                a.kind(),
                b.kind(),
                format!("rows of degree {} and {}", x.len(), y.len()),
            )),
            _ => Err(incomparable(a, b)),
        },
        ValueFamily::ResultSet | ValueFamily::Null | ValueFamily::Unknown => Err(incomparable(a, b)),
    }
}

fn incomparable(a: &Value, b: &Value) -> ValueError {
    ValueError::conversion("compare", a.kind(), b.kind(), "values are not comparable")
}

/// Element-wise; a shorter sequence that is a prefix of a longer one sorts
/// first
fn compare_elements(a: &[Value], b: &[Value], ctx: &ValueContext) -> ValueResult<Ordering> {
    for (x, y) in a.iter().zip(b) {
        let ord = compare(x, y, ctx)?;
        if ord != Ordering::Equal {
            return Ok(ord);
        }
    }
    Ok(a.len().cmp(&b.len()))
}

fn compare_character(a: &Value, b: &Value, ctx: &ValueContext) -> ValueResult<Ordering> {
    if let (Some(x), Some(y)) = (a.as_str(), b.as_str()) {
        let ignore_case =
            matches!(a, Value::VarcharIgnoreCase(_)) || matches!(b, Value::VarcharIgnoreCase(_));
        let collation = if ignore_case {
            Collation::CaseInsensitive
        } else {
            ctx.collation
        };
        return Ok(collation.compare(x, y));
    }
    let x = character_lob(a).ok_or_else(|| incomparable(a, b))?;
    let y = character_lob(b).ok_or_else(|| incomparable(a, b))?;
    compare_lobs(&x, &y, ctx.lob_chunk_size)
}

fn compare_binary(a: &Value, b: &Value, ctx: &ValueContext) -> ValueResult<Ordering> {
    if let (Some(x), Some(y)) = (a.as_bytes(), b.as_bytes()) {
        return Ok(x.cmp(y));
    }
    let x = binary_lob(a).ok_or_else(|| incomparable(a, b))?;
    let y = binary_lob(b).ok_or_else(|| incomparable(a, b))?;
    compare_lobs(&x, &y, ctx.lob_chunk_size)
}

fn character_lob(v: &Value) -> Option<Lob> {
    match v {
        Value::Lob(lob) => Some(lob.clone()),
        other => other.as_str().map(Lob::clob),
    }
}

fn binary_lob(v: &Value) -> Option<Lob> {
    match v {
        Value::Lob(lob) => Some(lob.clone()),
        other => other.as_bytes().map(|b| Lob::blob(b.to_vec())),
    }
}

fn compare_datetime(a: &Value, b: &Value, ctx: &ValueContext) -> ValueResult<Ordering> {
    match (local_datetime(a), local_datetime(b)) {
        (Some(x), Some(y)) => Ok(x.cmp(&y)),
        _ => Ok(utc_instant(a, ctx)?.cmp(&utc_instant(b, ctx)?)),
    }
}

/// Zone-less DATE and TIMESTAMP as a wall-clock time
fn local_datetime(v: &Value) -> Option<NaiveDateTime> {
    match v {
        Value::Date(d) => Some(d.and_time(NaiveTime::MIN)),
        Value::Timestamp(ts) => Some(*ts),
        _ => None,
    }
}

fn utc_instant(v: &Value, ctx: &ValueContext) -> ValueResult<NaiveDateTime> {
    match v {
        Value::TimestampTz(ts) => Ok(ts.naive_utc()),
        other => match local_datetime(other) {
            Some(local) => Ok(ctx.time_zone.resolve_local(&local)?.naive_utc()),
            None => Err(ValueError::conversion(
                "compare",
                other.kind(),
                ValueKind::TimestampTz,
                "not a date-time value",
            )),
        },
    }
}

/// Nanoseconds since UTC midnight, without wrapping
fn utc_nanos(time: &NaiveTime, offset_seconds: i32) -> i64 {
    let local = i64::from(time.num_seconds_from_midnight()) * 1_000_000_000 + i64::from(time.nanosecond());
    local - i64::from(offset_seconds) * 1_000_000_000
}

impl Value {
    pub fn compare(&self, other: &Value, ctx: &ValueContext) -> ValueResult<Ordering> {
        compare(self, other, ctx)
    }

    /// Comparison as -1, 0 or 1
    pub fn compare_signum(&self, other: &Value, ctx: &ValueContext) -> ValueResult<i32> {
        Ok(match compare(self, other, ctx)? {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::ZoneSpec;
    use bigdecimal::BigDecimal;
    use chrono::{FixedOffset, NaiveDate};
    use std::str::FromStr;

    #[test]
    fn test_float_order() {
        let ordered = [f64::NEG_INFINITY, -1.0, 0.0, 1.0, f64::INFINITY, f64::NAN];
        for w in ordered.windows(2) {
            assert_eq!(total_cmp_f64(w[0], w[1]), Ordering::Less, "{} < {}", w[0], w[1]);
        }
        assert_eq!(total_cmp_f64(-0.0, 0.0), Ordering::Equal);
    }

    #[test]
    fn test_exact_numeric_across_widths() {
        let ctx = ValueContext::default();
        let ord = Value::TinyInt(5).compare(&Value::BigInt(5), &ctx).unwrap();
        assert_eq!(ord, Ordering::Equal);
        let dec = Value::numeric(BigDecimal::from_str("4.5").unwrap());
        assert_eq!(dec.compare(&Value::Integer(5), &ctx).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_null_sorts_first() {
        let ctx = ValueContext::default();
        assert_eq!(Value::Null.compare_signum(&Value::Integer(i32::MIN), &ctx).unwrap(), -1);
        assert_eq!(Value::varchar("").compare_signum(&Value::Null, &ctx).unwrap(), 1);
    }

    #[test]
    fn test_cross_family_fails() {
        let ctx = ValueContext::default();
        let err = Value::Integer(1).compare(&Value::varchar("1"), &ctx).unwrap_err();
        match err {
            ValueError::DataConversion { operation, source_kind, target_kind, .. } => {
                assert_eq!(operation, "compare");
                assert_eq!(source_kind, ValueKind::Integer);
                assert_eq!(target_kind, ValueKind::Varchar);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_date_against_zoned_timestamp() {
        let ctx = ValueContext::default().with_time_zone(ZoneSpec::Fixed(FixedOffset::east_opt(3600).unwrap()));
        let date = Value::Date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        let utc_midnight = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .fixed_offset();
        // local midnight at +01:00 is 23:00 UTC the day before
        let ord = date.compare(&Value::TimestampTz(utc_midnight), &ctx).unwrap();
        assert_eq!(ord, Ordering::Less);
    }

    #[test]
    fn test_time_tz_normalized_to_utc() {
        let ctx = ValueContext::default();
        let t = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let berlin = Value::time_tz(t, FixedOffset::east_opt(3600).unwrap());
        let utc = Value::time_tz(NaiveTime::from_hms_opt(9, 0, 0).unwrap(), FixedOffset::east_opt(0).unwrap());
        assert_eq!(berlin.compare(&utc, &ctx).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_row_degree_mismatch() {
        let ctx = ValueContext::default();
        let a = Value::row(vec![Value::Integer(1)]);
        let b = Value::row(vec![Value::Integer(1), Value::Integer(2)]);
        assert!(a.compare(&b, &ctx).is_err());
    }
}
