//! # Type Descriptors
//!
//! A [`TypeDescriptor`] is the `(kind, precision, scale, display_size)` tuple
//! used as column metadata. Descriptors are plain `Copy` values compared over
//! all four fields, so two descriptors with equal fields are interchangeable.
//!
//! Precision is the maximum length (characters, bytes, elements) for variable
//! kinds, the digit count for numerics and the width of the rendered literal for
//! temporal kinds. The implementation maximum stands for "not declared".

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ValueError, ValueResult};
use crate::value::interval::{MAX_INTERVAL_PRECISION, MAX_INTERVAL_SCALE};
use crate::value::{IntervalQualifier, ValueKind};

/// Largest length of character, binary and composite kinds
pub const MAX_STRING_LENGTH: i64 = i32::MAX as i64;

/// Largest length of large objects
pub const MAX_LOB_LENGTH: i64 = i64::MAX;

/// Largest scale of NUMERIC, also its default
pub const MAX_NUMERIC_SCALE: i32 = 100_000;

/// Largest fractional-seconds scale of temporal kinds, also the default
pub const MAX_TEMPORAL_SCALE: i32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    kind: ValueKind,
    precision: i64,
    scale: i32,
    display_size: i32,
}

impl TypeDescriptor {
    pub const NULL: TypeDescriptor = TypeDescriptor::raw(ValueKind::Null, 1, 0, 4);
    pub const BOOLEAN: TypeDescriptor = TypeDescriptor::raw(ValueKind::Boolean, 1, 0, 5);
    pub const TINYINT: TypeDescriptor = TypeDescriptor::raw(ValueKind::TinyInt, 3, 0, 4);
    pub const SMALLINT: TypeDescriptor = TypeDescriptor::raw(ValueKind::SmallInt, 5, 0, 6);
    pub const INTEGER: TypeDescriptor = TypeDescriptor::raw(ValueKind::Integer, 10, 0, 11);
    pub const BIGINT: TypeDescriptor = TypeDescriptor::raw(ValueKind::BigInt, 19, 0, 20);
    pub const REAL: TypeDescriptor = TypeDescriptor::raw(ValueKind::Real, 7, 0, 15);
    pub const DOUBLE: TypeDescriptor = TypeDescriptor::raw(ValueKind::Double, 17, 0, 24);
    pub const NUMERIC: TypeDescriptor =
        TypeDescriptor::raw(ValueKind::Numeric, MAX_STRING_LENGTH, MAX_NUMERIC_SCALE, i32::MAX);
    pub const DATE: TypeDescriptor = TypeDescriptor::raw(ValueKind::Date, 10, 0, 10);
    pub const TIME: TypeDescriptor = TypeDescriptor::raw(ValueKind::Time, 18, 9, 18);
    pub const TIME_TZ: TypeDescriptor = TypeDescriptor::raw(ValueKind::TimeTz, 24, 9, 24);
    pub const TIMESTAMP: TypeDescriptor = TypeDescriptor::raw(ValueKind::Timestamp, 29, 9, 29);
    pub const TIMESTAMP_TZ: TypeDescriptor =
        TypeDescriptor::raw(ValueKind::TimestampTz, 35, 9, 35);
    pub const CHAR: TypeDescriptor = TypeDescriptor::unbounded(ValueKind::Char);
    pub const VARCHAR: TypeDescriptor = TypeDescriptor::unbounded(ValueKind::Varchar);
    pub const VARCHAR_IGNORECASE: TypeDescriptor =
        TypeDescriptor::unbounded(ValueKind::VarcharIgnoreCase);
    pub const BINARY: TypeDescriptor = TypeDescriptor::unbounded(ValueKind::Binary);
    pub const VARBINARY: TypeDescriptor = TypeDescriptor::unbounded(ValueKind::Varbinary);
    pub const BLOB: TypeDescriptor =
        TypeDescriptor::raw(ValueKind::Blob, MAX_LOB_LENGTH, 0, i32::MAX);
    pub const CLOB: TypeDescriptor =
        TypeDescriptor::raw(ValueKind::Clob, MAX_LOB_LENGTH, 0, i32::MAX);
    pub const UUID: TypeDescriptor = TypeDescriptor::raw(ValueKind::Uuid, 16, 0, 36);
    pub const JAVA_OBJECT: TypeDescriptor = TypeDescriptor::unbounded(ValueKind::JavaObject);
    pub const ENUM: TypeDescriptor = TypeDescriptor::unbounded(ValueKind::Enum);
    pub const GEOMETRY: TypeDescriptor = TypeDescriptor::unbounded(ValueKind::Geometry);
    pub const JSON: TypeDescriptor = TypeDescriptor::unbounded(ValueKind::Json);
    pub const ARRAY: TypeDescriptor = TypeDescriptor::unbounded(ValueKind::Array);
    pub const ROW: TypeDescriptor = TypeDescriptor::unbounded(ValueKind::Row);
    pub const RESULT_SET: TypeDescriptor =
        TypeDescriptor::raw(ValueKind::ResultSet, MAX_STRING_LENGTH, i32::MAX, i32::MAX);

    /// Builds a descriptor without validation
    pub(crate) const fn raw(kind: ValueKind, precision: i64, scale: i32, display_size: i32) -> Self {
        TypeDescriptor {
            kind,
            precision,
            scale,
            display_size,
        }
    }

    const fn unbounded(kind: ValueKind) -> Self {
        TypeDescriptor::raw(kind, MAX_STRING_LENGTH, 0, i32::MAX)
    }

    /// Default descriptor of a kind
    pub fn of(kind: ValueKind) -> ValueResult<Self> {
        TypeDescriptor::with(kind, None, None)
    }

    /// Descriptor of a kind with optional declared precision and scale.
    /// Parameters are ignored by kinds whose shape is fixed.
    pub fn with(kind: ValueKind, precision: Option<i64>, scale: Option<i32>) -> ValueResult<Self> {
        let invalid = |detail: String| ValueError::InvalidTypeParameter { kind, detail };
        let descriptor = match kind {
            ValueKind::Unknown => {
                return Err(ValueError::UnsupportedType {
                    operation: "type_descriptor",
                    kind: kind.to_string(),
                })
            }
            ValueKind::Null => TypeDescriptor::NULL,
            ValueKind::Boolean => TypeDescriptor::BOOLEAN,
            ValueKind::TinyInt => TypeDescriptor::TINYINT,
            ValueKind::SmallInt => TypeDescriptor::SMALLINT,
            ValueKind::Integer => TypeDescriptor::INTEGER,
            ValueKind::BigInt => TypeDescriptor::BIGINT,
            ValueKind::Real => TypeDescriptor::REAL,
            ValueKind::Double => TypeDescriptor::DOUBLE,
            ValueKind::Date => TypeDescriptor::DATE,
            ValueKind::Uuid => TypeDescriptor::UUID,
            ValueKind::ResultSet => TypeDescriptor::RESULT_SET,
            ValueKind::Numeric => {
                if let Some(p) = precision {
                    if !(1..=MAX_STRING_LENGTH).contains(&p) {
                        return Err(invalid(format!("precision {p} out of range")));
                    }
                }
                if let Some(s) = scale {
                    if !(0..=MAX_NUMERIC_SCALE).contains(&s) {
                        return Err(invalid(format!("scale {s} out of range")));
                    }
                }
                match (precision, scale) {
                    (None, None) => TypeDescriptor::NUMERIC,
                    (None, Some(s)) => TypeDescriptor::raw(kind, MAX_STRING_LENGTH, s, i32::MAX),
                    (Some(p), s) => {
                        let scale = s.unwrap_or((p / 2) as i32);
                        TypeDescriptor::raw(kind, p, scale, cap_display(p + 2))
                    }
                }
            }
            ValueKind::Time | ValueKind::TimeTz | ValueKind::Timestamp | ValueKind::TimestampTz => {
                let s = scale.unwrap_or(MAX_TEMPORAL_SCALE);
                if !(0..=MAX_TEMPORAL_SCALE).contains(&s) {
                    return Err(invalid(format!("fractional seconds scale {s} out of range")));
                }
                let base = match kind {
                    ValueKind::Time => 8,
                    ValueKind::TimeTz => 14,
                    ValueKind::Timestamp => 19,
                    _ => 25,
                };
                let p = base + if s > 0 { s + 1 } else { 0 };
                TypeDescriptor::raw(kind, p as i64, s, p)
            }
            ValueKind::Interval(q) => interval_descriptor(q, precision, scale)?,
            ValueKind::Blob | ValueKind::Clob => match precision {
                None => TypeDescriptor::raw(kind, MAX_LOB_LENGTH, 0, i32::MAX),
                Some(p) if p >= 1 => TypeDescriptor::raw(kind, p, 0, cap_display(p)),
                Some(p) => return Err(invalid(format!("length {p} out of range"))),
            },
            ValueKind::Char
            | ValueKind::Varchar
            | ValueKind::VarcharIgnoreCase
            | ValueKind::Binary
            | ValueKind::Varbinary
            | ValueKind::JavaObject
            | ValueKind::Enum
            | ValueKind::Geometry
            | ValueKind::Json
            | ValueKind::Array
            | ValueKind::Row => {
                let min = if kind == ValueKind::Array { 0 } else { 1 };
                match precision {
                    None => TypeDescriptor::unbounded(kind),
                    Some(p) if (min..=MAX_STRING_LENGTH).contains(&p) => {
                        TypeDescriptor::raw(kind, p, 0, cap_display(p))
                    }
                    Some(p) => return Err(invalid(format!("length {p} out of range"))),
                }
            }
        };
        Ok(descriptor)
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn precision(&self) -> i64 {
        self.precision
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }

    pub fn display_size(&self) -> i32 {
        self.display_size
    }

    /// True when the precision is a declared limit rather than the
    /// implementation maximum
    pub fn has_declared_length(&self) -> bool {
        let max = if self.kind.is_lob() {
            MAX_LOB_LENGTH
        } else {
            MAX_STRING_LENGTH
        };
        self.precision < max
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ValueKind::Numeric if self.has_declared_length() => {
                write!(f, "NUMERIC({}, {})", self.precision, self.scale)
            }
            ValueKind::Time | ValueKind::Timestamp => write!(f, "{}({})", self.kind, self.scale),
            ValueKind::TimeTz => write!(f, "TIME({}) WITH TIME ZONE", self.scale),
            ValueKind::TimestampTz => write!(f, "TIMESTAMP({}) WITH TIME ZONE", self.scale),
            ValueKind::Char
            | ValueKind::Varchar
            | ValueKind::VarcharIgnoreCase
            | ValueKind::Binary
            | ValueKind::Varbinary
            | ValueKind::Blob
            | ValueKind::Clob
                if self.has_declared_length() =>
            {
                write!(f, "{}({})", self.kind, self.precision)
            }
            ValueKind::Array if self.has_declared_length() => write!(f, "ARRAY[{}]", self.precision),
            _ => write!(f, "{}", self.kind),
        }
    }
}

fn interval_descriptor(
    qualifier: IntervalQualifier,
    precision: Option<i64>,
    scale: Option<i32>,
) -> ValueResult<TypeDescriptor> {
    let kind = ValueKind::Interval(qualifier);
    let p = precision.unwrap_or(MAX_INTERVAL_PRECISION);
    if !(1..=MAX_INTERVAL_PRECISION).contains(&p) {
        return Err(ValueError::InvalidTypeParameter {
            kind,
            detail: format!("leading field precision {p} out of range"),
        });
    }
    let s = if qualifier.has_seconds() {
        let s = scale.unwrap_or(MAX_INTERVAL_SCALE);
        if !(0..=MAX_INTERVAL_SCALE).contains(&s) {
            return Err(ValueError::InvalidTypeParameter {
                kind,
                detail: format!("fractional seconds scale {s} out of range"),
            });
        }
        s
    } else {
        0
    };
    Ok(TypeDescriptor::raw(kind, p, s, qualifier.display_size(p, s)))
}

fn cap_display(n: i64) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_fails() {
        let err = TypeDescriptor::of(ValueKind::Unknown).unwrap_err();
        assert!(matches!(err, ValueError::UnsupportedType { .. }));
    }

    #[test]
    fn test_numeric_precision_only() {
        let d = TypeDescriptor::with(ValueKind::Numeric, Some(65_535), None).unwrap();
        assert_eq!((d.precision(), d.scale(), d.display_size()), (65_535, 32_767, 65_537));
    }

    #[test]
    fn test_temporal_scale_formula() {
        let t = TypeDescriptor::with(ValueKind::Time, None, Some(0)).unwrap();
        assert_eq!((t.precision(), t.display_size()), (8, 8));
        let t = TypeDescriptor::with(ValueKind::Timestamp, None, Some(3)).unwrap();
        assert_eq!((t.precision(), t.display_size()), (23, 23));
        assert_eq!(TypeDescriptor::of(ValueKind::TimeTz).unwrap(), TypeDescriptor::TIME_TZ);
    }

    #[test]
    fn test_out_of_range_parameters() {
        assert!(matches!(
            TypeDescriptor::with(ValueKind::Time, None, Some(10)),
            Err(ValueError::InvalidTypeParameter { .. })
        ));
        assert!(TypeDescriptor::with(ValueKind::Varchar, Some(0), None).is_err());
        assert!(TypeDescriptor::with(ValueKind::Array, Some(0), None).is_ok());
        assert!(
            TypeDescriptor::with(ValueKind::Interval(IntervalQualifier::Day), Some(19), None).is_err()
        );
    }

    #[test]
    fn test_declared_length() {
        assert!(!TypeDescriptor::VARCHAR.has_declared_length());
        assert!(!TypeDescriptor::CLOB.has_declared_length());
        let d = TypeDescriptor::with(ValueKind::Clob, Some(10), None).unwrap();
        assert!(d.has_declared_length());
        assert_eq!(d.display_size(), 10);
    }

    #[test]
    fn test_descriptor_serde() {
        let json = serde_json::to_string(&TypeDescriptor::UUID).unwrap();
        let back: TypeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TypeDescriptor::UUID);
    }
}
