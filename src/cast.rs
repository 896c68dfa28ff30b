//! # Cast Engine
//!
//! Converts a value to a target [`TypeDescriptor`] in two steps: conversion to
//! the target kind, then fitting to the target's precision and scale.
//!
//! Fitting never fails for length: strings, binaries, LOBs and arrays longer
//! than the target are truncated, CHARACTER and BINARY of a declared length are
//! padded. Numerics and temporal values are rounded half up to the target
//! scale; a NUMERIC that still has too many digits is an error.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{
    DateTime, FixedOffset, NaiveDateTime, NaiveTime, TimeDelta, Timelike,
};
use num_traits::{ToPrimitive, Zero};

use crate::context::ValueContext;
use crate::error::{ValueError, ValueResult};
use crate::ids::UuidFactory;
use crate::temporal::{self, ZoneSpec};
use crate::types::{TypeDescriptor, MAX_TEMPORAL_SCALE};
use crate::value::{Interval, Lob, LobKind, ObjectPayload, ObjectValue, Value, ValueKind};

const OPERATION: &str = "cast_to";

/// Casts `value` to `target`. NULL casts to NULL of any kind.
pub fn cast(value: &Value, target: &TypeDescriptor, ctx: &ValueContext) -> ValueResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    let converted = convert(value, target.kind(), ctx)?;
    fit(converted, target)
}

impl Value {
    pub fn cast_to(&self, target: &TypeDescriptor, ctx: &ValueContext) -> ValueResult<Value> {
        cast(self, target, ctx)
    }
}

fn fail(value: &Value, kind: ValueKind, detail: impl Into<String>) -> ValueError {
    ValueError::conversion(OPERATION, value.kind(), kind, detail)
}

fn unparsable(value: &Value, kind: ValueKind) -> ValueError {
    let text = value.render().unwrap_or_default();
    fail(value, kind, format!("cannot parse \"{text}\""))
}

fn convert(value: &Value, kind: ValueKind, ctx: &ValueContext) -> ValueResult<Value> {
    if value.kind() == kind {
        return Ok(value.clone());
    }
    match kind {
        ValueKind::Unknown => Err(ValueError::UnsupportedType {
            operation: OPERATION,
            kind: kind.to_string(),
        }),
        ValueKind::Null => Err(fail(value, kind, "only NULL converts to NULL")),
        ValueKind::Boolean => to_boolean(value).map(Value::Boolean),
        ValueKind::TinyInt | ValueKind::SmallInt | ValueKind::Integer | ValueKind::BigInt => {
            to_integer(value, kind)
        }
        ValueKind::Numeric => to_decimal(value).map(Value::numeric),
        ValueKind::Real => to_f64(value, kind).map(|f| Value::Real(f as f32)),
        ValueKind::Double => to_f64(value, kind).map(Value::Double),
        ValueKind::Char => Ok(Value::char(&text_of(value)?)),
        ValueKind::Varchar => Ok(Value::varchar(&text_of(value)?)),
        ValueKind::VarcharIgnoreCase => Ok(Value::varchar_ignorecase(&text_of(value)?)),
        ValueKind::Clob => Ok(Value::Lob(Lob::clob(&text_of(value)?))),
        ValueKind::Binary => bytes_of(value, kind).map(Value::binary),
        ValueKind::Varbinary => bytes_of(value, kind).map(Value::varbinary),
        ValueKind::Blob => bytes_of(value, kind).map(|b| Value::Lob(Lob::blob(b))),
        ValueKind::Date => to_date(value, ctx),
        ValueKind::Time => to_time(value, ctx),
        ValueKind::TimeTz => to_time_tz(value, ctx),
        ValueKind::Timestamp => to_timestamp(value, ctx),
        ValueKind::TimestampTz => to_timestamp_tz(value, ctx),
        ValueKind::Interval(q) => to_interval(value, kind, q),
        ValueKind::Uuid => to_uuid(value),
        ValueKind::JavaObject => to_object(value),
        ValueKind::Enum => Err(fail(value, kind, "ENUM conversion needs the enumerator list")),
        ValueKind::Geometry => match value {
            Value::Binary(b) | Value::Varbinary(b) => Ok(Value::Geometry(b.clone())),
            Value::Lob(lob) if lob.kind() == LobKind::Blob => {
                Ok(Value::geometry(lob.read_bytes(OPERATION)?))
            }
            _ => Err(fail(value, kind, "no conversion")),
        },
        ValueKind::Json => to_json(value),
        ValueKind::Array => Ok(Value::array(
            TypeDescriptor::of(value.kind())?,
            vec![value.clone()],
        )),
        ValueKind::Row => Ok(Value::row(vec![value.clone()])),
        ValueKind::ResultSet => Err(fail(value, kind, "no conversion")),
    }
}

fn to_boolean(value: &Value) -> ValueResult<bool> {
    let kind = ValueKind::Boolean;
    if let Some(n) = value.as_i64() {
        return Ok(n != 0);
    }
    match value {
        Value::Numeric(d) => Ok(!d.is_zero()),
        Value::Real(_) | Value::Double(_) => Ok(value.as_f64().is_some_and(|f| f != 0.0)),
        Value::Char(_) | Value::Varchar(_) | Value::VarcharIgnoreCase(_) | Value::Lob(_) => {
            let text = text_of(value)?;
            match text.trim().to_ascii_uppercase().as_str() {
                "TRUE" | "T" | "YES" | "Y" | "1" => Ok(true),
                "FALSE" | "F" | "NO" | "N" | "0" => Ok(false),
                _ => Err(unparsable(value, kind)),
            }
        }
        _ => Err(fail(value, kind, "no conversion")),
    }
}

fn to_integer(value: &Value, kind: ValueKind) -> ValueResult<Value> {
    let n: i64 = match value {
        Value::Boolean(b) => i64::from(*b),
        Value::TinyInt(_) | Value::SmallInt(_) | Value::Integer(_) | Value::BigInt(_) => {
            value.as_i64().unwrap_or_default()
        }
        Value::Numeric(d) => decimal_to_i64(d).ok_or_else(|| out_of_range(value, kind))?,
        Value::Real(_) | Value::Double(_) => {
            let f = value.as_f64().unwrap_or_default();
            let rounded = f.round();
            // i64::MAX as f64 rounds up to 2^63
            if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
                return Err(out_of_range(value, kind));
            }
            rounded as i64
        }
        Value::Char(_) | Value::Varchar(_) | Value::VarcharIgnoreCase(_) | Value::Lob(_)
            if value.kind() != ValueKind::Blob =>
        {
            let text = text_of(value)?;
            let trimmed = text.trim();
            match trimmed.parse::<i64>() {
                Ok(n) => n,
                Err(_) => {
                    let d = BigDecimal::from_str(trimmed).map_err(|_| unparsable(value, kind))?;
                    decimal_to_i64(&d).ok_or_else(|| out_of_range(value, kind))?
                }
            }
        }
        Value::Enum { ordinal, .. } => i64::from(*ordinal),
        _ => return Err(fail(value, kind, "no conversion")),
    };
    let narrowed = match kind {
        ValueKind::TinyInt => i8::try_from(n).ok().map(Value::TinyInt),
        ValueKind::SmallInt => i16::try_from(n).ok().map(Value::SmallInt),
        ValueKind::Integer => i32::try_from(n).ok().map(Value::Integer),
        _ => Some(Value::BigInt(n)),
    };
    narrowed.ok_or_else(|| out_of_range(value, kind))
}

fn decimal_to_i64(d: &BigDecimal) -> Option<i64> {
    d.with_scale_round(0, RoundingMode::HalfUp).to_i64()
}

fn out_of_range(value: &Value, kind: ValueKind) -> ValueError {
    let text = value.render().unwrap_or_default();
    fail(value, kind, format!("numeric value out of range: \"{text}\""))
}

fn to_decimal(value: &Value) -> ValueResult<BigDecimal> {
    let kind = ValueKind::Numeric;
    if let Some(d) = value.as_decimal() {
        return Ok(d);
    }
    match value {
        Value::Boolean(b) => Ok(BigDecimal::from(i64::from(*b))),
        Value::Real(f) if f.is_finite() => BigDecimal::from_str(&f.to_string()).map_err(|_| unparsable(value, kind)),
        Value::Double(f) if f.is_finite() => BigDecimal::from_str(&f.to_string()).map_err(|_| unparsable(value, kind)),
        Value::Real(_) | Value::Double(_) => Err(fail(value, kind, "not a finite number")),
        Value::Char(_) | Value::Varchar(_) | Value::VarcharIgnoreCase(_) | Value::Lob(_)
            if value.kind() != ValueKind::Blob =>
        {
            BigDecimal::from_str(text_of(value)?.trim()).map_err(|_| unparsable(value, kind))
        }
        _ => Err(fail(value, kind, "no conversion")),
    }
}

fn to_f64(value: &Value, kind: ValueKind) -> ValueResult<f64> {
    if let Some(f) = value.as_f64() {
        return Ok(f);
    }
    if let Some(n) = value.as_i64() {
        return Ok(n as f64);
    }
    match value {
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Numeric(d) => d.to_f64().ok_or_else(|| out_of_range(value, kind)),
        Value::Char(_) | Value::Varchar(_) | Value::VarcharIgnoreCase(_) | Value::Lob(_)
            if value.kind() != ValueKind::Blob =>
        {
            text_of(value)?.trim().parse::<f64>().map_err(|_| unparsable(value, kind))
        }
        _ => Err(fail(value, kind, "no conversion")),
    }
}

/// String value; CLOBs are read in full
fn text_of(value: &Value) -> ValueResult<String> {
    match value {
        Value::Lob(lob) if lob.kind() == LobKind::Clob => lob.read_string(OPERATION),
        other => other.render(),
    }
}

fn bytes_of(value: &Value, kind: ValueKind) -> ValueResult<Vec<u8>> {
    match value {
        Value::Binary(b) | Value::Varbinary(b) | Value::Geometry(b) | Value::Json(b) => Ok(b.to_vec()),
        Value::JavaObject(o) => Ok(o.bytes().to_vec()),
        Value::Lob(lob) => lob.read_bytes(OPERATION),
        Value::Char(s) | Value::Varchar(s) | Value::VarcharIgnoreCase(s) => Ok(s.as_bytes().to_vec()),
        Value::Uuid(u) => Ok(u.as_bytes().to_vec()),
        Value::TinyInt(v) => Ok(v.to_be_bytes().to_vec()),
        Value::SmallInt(v) => Ok(v.to_be_bytes().to_vec()),
        Value::Integer(v) => Ok(v.to_be_bytes().to_vec()),
        Value::BigInt(v) => Ok(v.to_be_bytes().to_vec()),
        _ => Err(fail(value, kind, "no conversion")),
    }
}

fn is_text(value: &Value) -> bool {
    value.kind().is_string() || value.kind() == ValueKind::Clob
}

fn to_date(value: &Value, ctx: &ValueContext) -> ValueResult<Value> {
    match value {
        Value::Timestamp(ts) => Ok(Value::Date(ts.date())),
        Value::TimestampTz(ts) => Ok(Value::Date(temporal::to_local(ts, ctx).date())),
        v if is_text(v) => {
            let text = text_of(v)?;
            match temporal::parse_date(&text) {
                Ok(d) => Ok(Value::Date(d)),
                Err(_) => Ok(Value::Date(temporal::parse_timestamp(&text, ctx)?.date())),
            }
        }
        _ => Err(fail(value, ValueKind::Date, "no conversion")),
    }
}

fn shift_time(time: &NaiveTime, seconds: i32) -> NaiveTime {
    time.overflowing_add_signed(TimeDelta::seconds(i64::from(seconds))).0
}

fn to_time(value: &Value, ctx: &ValueContext) -> ValueResult<Value> {
    match value {
        Value::Timestamp(ts) => Ok(Value::Time(ts.time())),
        Value::TimestampTz(ts) => Ok(Value::Time(temporal::to_local(ts, ctx).time())),
        Value::TimeTz { time, offset } => {
            let local = temporal::reference_offset(ctx.time_zone);
            Ok(Value::Time(shift_time(
                time,
                local.local_minus_utc() - offset.local_minus_utc(),
            )))
        }
        v if is_text(v) => Ok(Value::Time(temporal::parse_time(&text_of(v)?)?)),
        _ => Err(fail(value, ValueKind::Time, "no conversion")),
    }
}

fn to_time_tz(value: &Value, ctx: &ValueContext) -> ValueResult<Value> {
    match value {
        Value::Time(t) => Ok(Value::time_tz(*t, temporal::reference_offset(ctx.time_zone))),
        Value::TimestampTz(ts) => Ok(Value::time_tz(ts.time(), *ts.offset())),
        Value::Timestamp(ts) => {
            let zoned = ctx.time_zone.resolve_local(ts)?;
            Ok(Value::time_tz(zoned.time(), *zoned.offset()))
        }
        v if is_text(v) => {
            let (time, offset) = temporal::parse_time_tz(&text_of(v)?, ctx)?;
            Ok(Value::time_tz(time, offset))
        }
        _ => Err(fail(value, ValueKind::TimeTz, "no conversion")),
    }
}

fn to_timestamp(value: &Value, ctx: &ValueContext) -> ValueResult<Value> {
    match value {
        Value::Date(d) => Ok(Value::Timestamp(d.and_time(NaiveTime::MIN))),
        Value::TimestampTz(ts) => Ok(Value::Timestamp(temporal::to_local(ts, ctx))),
        v if is_text(v) => Ok(Value::Timestamp(temporal::parse_timestamp(&text_of(v)?, ctx)?)),
        _ => Err(fail(value, ValueKind::Timestamp, "no conversion")),
    }
}

fn to_timestamp_tz(value: &Value, ctx: &ValueContext) -> ValueResult<Value> {
    let zone: ZoneSpec = ctx.time_zone;
    match value {
        Value::Date(d) => Ok(Value::TimestampTz(zone.resolve_local(&d.and_time(NaiveTime::MIN))?)),
        Value::Timestamp(ts) => Ok(Value::TimestampTz(zone.resolve_local(ts)?)),
        v if is_text(v) => Ok(Value::TimestampTz(temporal::parse_timestamp_tz(&text_of(v)?, ctx)?)),
        _ => Err(fail(value, ValueKind::TimestampTz, "no conversion")),
    }
}

fn to_interval(
    value: &Value,
    kind: ValueKind,
    qualifier: crate::value::IntervalQualifier,
) -> ValueResult<Value> {
    match value {
        Value::Interval(i) if i.qualifier().is_year_month() == qualifier.is_year_month() => {
            Ok(Value::Interval(Interval::from_total(qualifier, i.total())?))
        }
        Value::Interval(_) => Err(fail(value, kind, "year-month and day-time intervals do not mix")),
        v if v.kind().is_integer() => {
            let n = v.as_i64().unwrap_or_default();
            Ok(Value::Interval(Interval::new(qualifier, n < 0, n.unsigned_abs(), 0)?))
        }
        v if is_text(v) => Ok(Value::Interval(Interval::parse(qualifier, &text_of(v)?)?)),
        _ => Err(fail(value, kind, "no conversion")),
    }
}

fn to_uuid(value: &Value) -> ValueResult<Value> {
    match value {
        Value::Binary(b) | Value::Varbinary(b) => UuidFactory::from_bytes(b).map(Value::Uuid),
        Value::Lob(lob) if lob.kind() == LobKind::Blob => {
            UuidFactory::from_bytes(&lob.read_bytes(OPERATION)?).map(Value::Uuid)
        }
        Value::JavaObject(o) => UuidFactory::from_object(o).map(Value::Uuid),
        v if is_text(v) => UuidFactory::parse(&text_of(v)?).map(Value::Uuid),
        _ => Err(fail(value, ValueKind::Uuid, "no conversion")),
    }
}

fn to_object(value: &Value) -> ValueResult<Value> {
    let payload = match value {
        Value::Binary(b) | Value::Varbinary(b) => {
            return Ok(Value::JavaObject(ObjectValue::from_bytes(b.clone())))
        }
        Value::Lob(lob) if lob.kind() == LobKind::Blob => {
            return Ok(Value::JavaObject(ObjectValue::from_bytes(lob.read_bytes(OPERATION)?)))
        }
        Value::Uuid(u) => ObjectPayload::Uuid(*u),
        Value::Boolean(b) => ObjectPayload::Boolean(*b),
        Value::Real(_) | Value::Double(_) => ObjectPayload::Double(value.as_f64().unwrap_or_default()),
        v if v.kind().is_integer() => ObjectPayload::Integer(v.as_i64().unwrap_or_default()),
        v if is_text(v) => ObjectPayload::Text(text_of(v)?),
        _ => return Err(fail(value, ValueKind::JavaObject, "no conversion")),
    };
    ObjectValue::serialize(&payload).map(Value::JavaObject)
}

fn to_json(value: &Value) -> ValueResult<Value> {
    let kind = ValueKind::Json;
    let text = match value {
        v if is_text(v) => serde_json::to_string(&text_of(v)?).map_err(|e| fail(v, kind, e.to_string()))?,
        Value::Boolean(b) => b.to_string(),
        Value::Real(_) | Value::Double(_) if !value.as_f64().is_some_and(f64::is_finite) => {
            return Err(fail(value, kind, "not a finite number"))
        }
        v if v.kind().is_numeric() => v.render()?,
        Value::Binary(_) | Value::Varbinary(_) | Value::Lob(_) => {
            let bytes = bytes_of(value, kind)?;
            serde_json::from_slice::<serde_json::Value>(&bytes).map_err(|e| fail(value, kind, e.to_string()))?;
            return Ok(Value::Json(bytes.into()));
        }
        _ => return Err(fail(value, kind, "no conversion")),
    };
    Ok(Value::Json(text.into_bytes().into()))
}

/// Applies the target's length, precision and scale
fn fit(value: Value, target: &TypeDescriptor) -> ValueResult<Value> {
    let declared = target.has_declared_length();
    let limit = usize::try_from(target.precision()).unwrap_or(usize::MAX);
    let fitted = match value {
        Value::Char(s) if declared => {
            let n = s.chars().count();
            if n > limit {
                tracing::debug!(from = n, to = limit, "char_truncated");
                Value::char(&s.chars().take(limit).collect::<String>())
            } else if n < limit {
                tracing::debug!(from = n, to = limit, "char_padded");
                let mut padded = String::with_capacity(s.len() + limit - n);
                padded.push_str(&s);
                padded.extend(std::iter::repeat(' ').take(limit - n));
                Value::char(&padded)
            } else {
                Value::Char(s)
            }
        }
        Value::Varchar(s) if declared && s.chars().count() > limit => {
            tracing::debug!(to = limit, "varchar_truncated");
            Value::varchar(&s.chars().take(limit).collect::<String>())
        }
        Value::VarcharIgnoreCase(s) if declared && s.chars().count() > limit => {
            tracing::debug!(to = limit, "varchar_truncated");
            Value::varchar_ignorecase(&s.chars().take(limit).collect::<String>())
        }
        Value::Binary(b) if declared && b.len() != limit => {
            let mut bytes = b.to_vec();
            tracing::debug!(from = bytes.len(), to = limit, "binary_fitted");
            bytes.resize(limit, 0);
            Value::binary(bytes)
        }
        Value::Varbinary(b) if declared && b.len() > limit => {
            tracing::debug!(from = b.len(), to = limit, "varbinary_truncated");
            Value::varbinary(b[..limit].to_vec())
        }
        Value::Lob(lob) if declared => {
            let units = u64::try_from(target.precision()).unwrap_or(u64::MAX);
            Value::Lob(lob.truncate(units, OPERATION)?)
        }
        Value::Array(a) if declared && a.len() > limit => {
            tracing::debug!(from = a.len(), to = limit, "array_truncated");
            Value::Array(a.truncated(limit))
        }
        Value::Numeric(d) => fit_decimal(d, target)?,
        Value::Time(t) => Value::Time(round_time(&t, target.scale())),
        Value::TimeTz { time, offset } => Value::time_tz(round_time(&time, target.scale()), offset),
        Value::Timestamp(ts) => Value::Timestamp(round_timestamp(&ts, target.scale())?),
        Value::TimestampTz(ts) => Value::TimestampTz(round_timestamp_tz(&ts, target.scale())?),
        Value::Interval(i) => {
            let rounded = i.round_fraction(target.scale())?;
            if rounded.leading_digits() > target.precision() {
                return Err(ValueError::conversion(
                    OPERATION,
                    target.kind(),
                    target.kind(),
                    format!("{rounded} exceeds leading precision {}", target.precision()),
                ));
            }
            Value::Interval(rounded)
        }
        other => other,
    };
    Ok(fitted)
}

fn fit_decimal(d: BigDecimal, target: &TypeDescriptor) -> ValueResult<Value> {
    let scale = i64::from(target.scale());
    let (_, current) = d.as_bigint_and_exponent();
    let rounded = if current > scale {
        d.with_scale_round(scale, RoundingMode::HalfUp)
    } else {
        d
    };
    if target.has_declared_length() && rounded.digits() > target.precision().unsigned_abs() {
        return Err(ValueError::conversion(
            OPERATION,
            ValueKind::Numeric,
            ValueKind::Numeric,
            format!(
                "{} does not fit NUMERIC({}, {})",
                rounded.to_plain_string(),
                target.precision(),
                target.scale()
            ),
        ));
    }
    Ok(Value::numeric(rounded))
}

/// Nanoseconds rounded half up to `scale` fractional digits
fn rounded_nanos(nanos: u32, scale: i32) -> i64 {
    if scale >= MAX_TEMPORAL_SCALE {
        return i64::from(nanos);
    }
    let step = 10i64.pow((MAX_TEMPORAL_SCALE - scale.max(0)) as u32);
    (i64::from(nanos) + step / 2) / step * step
}

fn round_time(time: &NaiveTime, scale: i32) -> NaiveTime {
    let nanos = rounded_nanos(time.nanosecond(), scale);
    match time.with_nanosecond(0) {
        Some(base) => base.overflowing_add_signed(TimeDelta::nanoseconds(nanos)).0,
        None => *time,
    }
}

fn round_timestamp(ts: &NaiveDateTime, scale: i32) -> ValueResult<NaiveDateTime> {
    let nanos = rounded_nanos(ts.nanosecond(), scale);
    ts.with_nanosecond(0)
        .and_then(|base| base.checked_add_signed(TimeDelta::nanoseconds(nanos)))
        .ok_or_else(|| ValueError::datetime(OPERATION, &ts.to_string()))
}

fn round_timestamp_tz(ts: &DateTime<FixedOffset>, scale: i32) -> ValueResult<DateTime<FixedOffset>> {
    let nanos = rounded_nanos(ts.nanosecond(), scale);
    ts.with_nanosecond(0)
        .and_then(|base| base.checked_add_signed(TimeDelta::nanoseconds(nanos)))
        .ok_or_else(|| ValueError::datetime(OPERATION, &ts.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ctx() -> ValueContext {
        ValueContext::default()
    }

    #[test]
    fn test_string_to_integer() {
        let v = Value::varchar(" 42 ").cast_to(&TypeDescriptor::INTEGER, &ctx()).unwrap();
        assert_eq!(v, Value::Integer(42));
        let err = Value::varchar("abc").cast_to(&TypeDescriptor::INTEGER, &ctx()).unwrap_err();
        assert!(matches!(err, ValueError::DataConversion { source_kind: ValueKind::Varchar, target_kind: ValueKind::Integer, .. }));
    }

    #[test]
    fn test_narrowing_out_of_range() {
        assert!(Value::Integer(300).cast_to(&TypeDescriptor::TINYINT, &ctx()).is_err());
        assert_eq!(
            Value::Integer(-128).cast_to(&TypeDescriptor::TINYINT, &ctx()).unwrap(),
            Value::TinyInt(-128)
        );
    }

    #[test]
    fn test_decimal_rounds_half_up() {
        let target = TypeDescriptor::with(ValueKind::Numeric, Some(10), Some(1)).unwrap();
        let v = Value::numeric(BigDecimal::from_str("2.25").unwrap());
        assert_eq!(v.cast_to(&target, &ctx()).unwrap().render().unwrap(), "2.3");
        let too_big = Value::numeric(BigDecimal::from_str("123456789012").unwrap());
        assert!(too_big.cast_to(&target, &ctx()).is_err());
    }

    #[test]
    fn test_timestamp_scale_rounding() {
        let ts = NaiveDate::from_ymd_opt(2020, 12, 31)
            .unwrap()
            .and_hms_nano_opt(23, 59, 59, 999_600_000)
            .unwrap();
        let target = TypeDescriptor::with(ValueKind::Timestamp, None, Some(3)).unwrap();
        let v = Value::Timestamp(ts).cast_to(&target, &ctx()).unwrap();
        assert_eq!(v.render().unwrap(), "2021-01-01 00:00:00");
    }

    #[test]
    fn test_float_to_numeric_uses_shortest_form() {
        let v = Value::Double(0.1).cast_to(&TypeDescriptor::NUMERIC, &ctx()).unwrap();
        assert_eq!(v.render().unwrap(), "0.1");
    }

    #[test]
    fn test_string_to_json_is_json_string() {
        let v = Value::varchar("a\"b").cast_to(&TypeDescriptor::JSON, &ctx()).unwrap();
        assert_eq!(v.render().unwrap(), "\"a\\\"b\"");
    }

    #[test]
    fn test_unknown_target() {
        let target = TypeDescriptor::raw(ValueKind::Unknown, 0, 0, 0);
        assert!(matches!(
            Value::Integer(1).cast_to(&target, &ctx()),
            Err(ValueError::UnsupportedType { .. })
        ));
    }
}
