//! Descriptor formulas per kind, validation of declared parameters and the
//! descriptors values report for themselves.

use typelayer::{IntervalQualifier, TypeDescriptor, Value, ValueError, ValueKind};

fn shape(d: TypeDescriptor) -> (i64, i32, i32) {
    (d.precision(), d.scale(), d.display_size())
}

#[test]
fn test_fixed_width_numerics() {
    assert_eq!(shape(TypeDescriptor::of(ValueKind::TinyInt).unwrap()), (3, 0, 4));
    assert_eq!(shape(TypeDescriptor::of(ValueKind::SmallInt).unwrap()), (5, 0, 6));
    assert_eq!(shape(TypeDescriptor::of(ValueKind::Integer).unwrap()), (10, 0, 11));
    assert_eq!(shape(TypeDescriptor::of(ValueKind::BigInt).unwrap()), (19, 0, 20));
    assert_eq!(shape(TypeDescriptor::of(ValueKind::Real).unwrap()), (7, 0, 15));
    assert_eq!(shape(TypeDescriptor::of(ValueKind::Double).unwrap()), (17, 0, 24));
}

#[test]
fn test_uuid_descriptor() {
    assert_eq!(shape(TypeDescriptor::of(ValueKind::Uuid).unwrap()), (16, 0, 36));
}

#[test]
fn test_numeric_precision_only_derives_scale() {
    let d = TypeDescriptor::with(ValueKind::Numeric, Some(20), None).unwrap();
    assert_eq!(shape(d), (20, 10, 22));
    let unspecified = TypeDescriptor::of(ValueKind::Numeric).unwrap();
    assert!(!unspecified.has_declared_length());
}

#[test]
fn test_temporal_scales() {
    let time0 = TypeDescriptor::with(ValueKind::Time, None, Some(0)).unwrap();
    assert_eq!(shape(time0), (8, 0, 8));
    let time3 = TypeDescriptor::with(ValueKind::Time, None, Some(3)).unwrap();
    assert_eq!(shape(time3), (12, 3, 12));
    let ts6 = TypeDescriptor::with(ValueKind::Timestamp, None, Some(6)).unwrap();
    assert_eq!(shape(ts6), (26, 6, 26));
    let tstz9 = TypeDescriptor::with(ValueKind::TimestampTz, None, Some(9)).unwrap();
    assert_eq!(shape(tstz9), (35, 9, 35));
    assert_eq!(TypeDescriptor::of(ValueKind::Timestamp).unwrap(), TypeDescriptor::TIMESTAMP);
}

#[test]
fn test_invalid_temporal_scale() {
    let err = TypeDescriptor::with(ValueKind::Time, None, Some(10)).unwrap_err();
    assert!(matches!(err, ValueError::InvalidTypeParameter { kind: ValueKind::Time, .. }));
}

#[test]
fn test_variable_kinds_default_to_maximum() {
    for kind in [ValueKind::Varchar, ValueKind::Varbinary, ValueKind::Array] {
        let d = TypeDescriptor::of(kind).unwrap();
        assert_eq!(d.precision(), i64::from(i32::MAX));
        assert_eq!(d.scale(), 0);
        assert_eq!(i64::from(d.display_size()), d.precision());
        assert!(!d.has_declared_length());
    }
    let blob = TypeDescriptor::of(ValueKind::Blob).unwrap();
    assert_eq!(blob.precision(), i64::MAX);
    assert!(!blob.has_declared_length());
}

#[test]
fn test_declared_lengths() {
    let d = TypeDescriptor::with(ValueKind::Varchar, Some(10), None).unwrap();
    assert_eq!(shape(d), (10, 0, 10));
    assert!(d.has_declared_length());
    assert!(TypeDescriptor::with(ValueKind::Varchar, Some(0), None).is_err());
    assert!(TypeDescriptor::with(ValueKind::Array, Some(0), None).is_ok());
}

#[test]
fn test_interval_descriptors() {
    let day = TypeDescriptor::with(ValueKind::Interval(IntervalQualifier::Day), Some(5), None).unwrap();
    assert_eq!(day.precision(), 5);
    assert_eq!(day.scale(), 0);
    let secs = TypeDescriptor::with(
        ValueKind::Interval(IntervalQualifier::DayToSecond),
        Some(2),
        Some(3),
    )
    .unwrap();
    assert_eq!((secs.precision(), secs.scale()), (2, 3));
    assert!(secs.display_size() > day.display_size());
    assert!(TypeDescriptor::with(ValueKind::Interval(IntervalQualifier::Year), Some(19), None).is_err());
}

#[test]
fn test_unknown_kind_is_unsupported() {
    assert!(matches!(
        TypeDescriptor::of(ValueKind::Unknown),
        Err(ValueError::UnsupportedType { .. })
    ));
}

#[test]
fn test_identical_parameters_are_interchangeable() {
    let a = TypeDescriptor::with(ValueKind::Numeric, Some(12), Some(4)).unwrap();
    let b = TypeDescriptor::with(ValueKind::Numeric, Some(12), Some(4)).unwrap();
    assert_eq!(a, b);
    let json = serde_json::to_string(&a).unwrap();
    let back: TypeDescriptor = serde_json::from_str(&json).unwrap();
    assert_eq!(back, a);
}

#[test]
fn test_every_constructible_kind_has_a_descriptor() {
    for kind in ValueKind::ALL {
        let result = TypeDescriptor::of(kind);
        if kind == ValueKind::Unknown {
            assert!(result.is_err());
        } else {
            assert_eq!(result.unwrap().kind(), kind);
        }
    }
}

#[test]
fn test_value_reports_actual_length() {
    let d = Value::varchar("héllo").type_descriptor();
    assert_eq!((d.kind(), d.precision()), (ValueKind::Varchar, 5));
    let a = Value::array(TypeDescriptor::INTEGER, vec![Value::Integer(1), Value::Integer(2)]);
    assert_eq!(a.type_descriptor().precision(), 2);
}
