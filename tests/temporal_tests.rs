//! Literal parsing and zone resolution, including the Europe/Berlin
//! transitions of 2018.

use chrono::{NaiveDate, TimeDelta, Timelike};
use typelayer::temporal::{
    format_timestamp, parse_date, parse_instant, parse_time, parse_time_tz, parse_timestamp,
    parse_timestamp_tz, parse_zone,
};
use typelayer::{TypeDescriptor, Value, ValueContext, ValueError, ZoneSpec};

fn berlin() -> ValueContext {
    ValueContext::default().with_time_zone(parse_zone("Europe/Berlin").unwrap())
}

#[test]
fn test_before_spring_forward_matches_standard_offset() {
    let ctx = berlin();
    let zoned = parse_instant("2018-03-25 01:59:00.123123123", &ctx).unwrap();
    let explicit = parse_instant("2018-03-25 01:59:00.123123123+01", &ctx).unwrap();
    assert_eq!(zoned, explicit);
    assert_eq!(zoned.nanosecond(), 123_123_123);
}

#[test]
fn test_after_spring_forward_is_one_minute_later() {
    let ctx = berlin();
    let before = parse_instant("2018-03-25 01:59:00.123123123", &ctx).unwrap();
    let after = parse_instant("2018-03-25 03:00:00.123123123", &ctx).unwrap();
    assert_eq!(after - before, TimeDelta::milliseconds(60_000));
    let explicit = parse_instant("2018-03-25 03:00:00.123123123+02", &ctx).unwrap();
    assert_eq!(after, explicit);
}

#[test]
fn test_gap_uses_pre_transition_offset() {
    let ctx = berlin();
    let in_gap = parse_timestamp_tz("2018-03-25 02:30:00", &ctx).unwrap();
    assert_eq!(in_gap.offset().local_minus_utc(), 3600);
    let explicit = parse_instant("2018-03-25 02:30:00+01:00", &ctx).unwrap();
    assert_eq!(in_gap, explicit);
}

#[test]
fn test_overlap_uses_earlier_instant() {
    let ctx = berlin();
    let ambiguous = parse_instant("2018-10-28 02:30:00", &ctx).unwrap();
    let summer = parse_instant("2018-10-28 02:30:00+02:00", &ctx).unwrap();
    assert_eq!(ambiguous, summer);
}

#[test]
fn test_named_zone_in_literal() {
    let utc = ValueContext::default();
    let a = parse_instant("2018-07-01 12:00:00 Europe/Berlin", &utc).unwrap();
    let b = parse_instant("2018-07-01 10:00:00Z", &utc).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_timestamp_literal_converted_to_context_zone() {
    let ctx = berlin();
    let local = parse_timestamp("2018-07-01 10:00:00+00", &ctx).unwrap();
    assert_eq!(format_timestamp(&local), "2018-07-01 12:00:00");
}

#[test]
fn test_nanoseconds_round_trip() {
    let ctx = ValueContext::default();
    let text = "2000-01-02 03:04:05.000000001";
    let ts = parse_timestamp(text, &ctx).unwrap();
    assert_eq!(format_timestamp(&ts), text);
    let value = Value::varchar(text).cast_to(&TypeDescriptor::TIMESTAMP, &ctx).unwrap();
    assert_eq!(value.render().unwrap(), text);
}

#[test]
fn test_dates_and_times() {
    assert_eq!(parse_date("2024-02-29").unwrap(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert!(parse_date("2023-02-29").is_err());
    let t = parse_time("23:59:59.5").unwrap();
    assert_eq!((t.hour(), t.nanosecond()), (23, 500_000_000));
    assert!(parse_time("24:00:00").is_err());
}

#[test]
fn test_time_with_zone() {
    let ctx = ValueContext::default();
    let (time, offset) = parse_time_tz("10:15:00-03:30", &ctx).unwrap();
    assert_eq!(time.minute(), 15);
    assert_eq!(offset.local_minus_utc(), -(3 * 3600 + 1800));
    let (_, berlin_offset) = parse_time_tz("10:15:00 Europe/Berlin", &ctx).unwrap();
    assert_eq!(berlin_offset.local_minus_utc(), 3600);
}

#[test]
fn test_malformed_literals() {
    let ctx = ValueContext::default();
    for text in ["", "2018-03", "18-03-25", "2018-03-25 25:00:00", "2018-03-25T10:00:00+19"] {
        assert!(
            matches!(parse_timestamp_tz(text, &ctx), Err(ValueError::InvalidDatetimeFormat { .. })),
            "{text}"
        );
    }
}

#[test]
fn test_unknown_zone() {
    let err = parse_instant("2018-03-25 10:00:00 Atlantis/Central", &ValueContext::default()).unwrap_err();
    match err {
        ValueError::UnknownTimeZone { zone, .. } => assert_eq!(zone, "Atlantis/Central"),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(matches!(ZoneSpec::parse("Nowhere"), Err(ValueError::UnknownTimeZone { .. })));
}

#[test]
fn test_zoned_values_compare_by_instant() {
    let ctx = berlin();
    let a = Value::TimestampTz(parse_timestamp_tz("2018-07-01 12:00:00+02", &ctx).unwrap());
    let b = Value::TimestampTz(parse_timestamp_tz("2018-07-01 10:00:00Z", &ctx).unwrap());
    assert!(a.compare(&b, &ctx).unwrap().is_eq());
    assert_ne!(a, b);
    let naive = Value::Timestamp(parse_timestamp("2018-07-01 12:00:00", &ctx).unwrap());
    assert!(naive.compare(&a, &ctx).unwrap().is_eq());
}
