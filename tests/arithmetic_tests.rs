//! Modulus and the `%` operator.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use typelayer::{modulus, remainder, Value, ValueError};

fn dec(s: &str) -> Value {
    Value::numeric(BigDecimal::from_str(s).unwrap())
}

#[test]
fn test_twelve_mod_ten() {
    assert_eq!(modulus(&Value::Double(12.0), &Value::Double(10.0)).unwrap(), Value::Double(2.0));
    assert_eq!(modulus(&dec("12"), &dec("10")).unwrap(), dec("2"));
}

#[test]
fn test_twelve_mod_zero() {
    for (a, b) in [
        (Value::Double(12.0), Value::Double(0.0)),
        (dec("12"), dec("0")),
        (dec("12"), dec("0.000")),
    ] {
        match modulus(&a, &b) {
            Err(ValueError::DivisionByZero { operation, dividend }) => {
                assert_eq!(operation, "modulus");
                assert!(dividend.starts_with("12"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}

#[test]
fn test_sign_follows_dividend() {
    assert_eq!(modulus(&Value::Double(-7.0), &Value::Double(3.0)).unwrap(), Value::Double(-1.0));
    assert_eq!(modulus(&Value::Double(7.0), &Value::Double(-3.0)).unwrap(), Value::Double(1.0));
    assert_eq!(modulus(&dec("-7.5"), &dec("2")).unwrap(), dec("-1.5"));
}

#[test]
fn test_null_operand() {
    assert!(modulus(&Value::Null, &dec("1")).unwrap().is_null());
    assert!(remainder(&Value::Integer(1), &Value::Null).unwrap().is_null());
}

#[test]
fn test_integer_remainder_stays_integral() {
    assert_eq!(remainder(&Value::Integer(12), &Value::Integer(10)).unwrap(), Value::Integer(2));
    assert_eq!(remainder(&Value::SmallInt(-12), &Value::TinyInt(5)).unwrap(), Value::SmallInt(-2));
    assert_eq!(remainder(&Value::BigInt(i64::MAX), &Value::Integer(2)).unwrap(), Value::BigInt(1));
    assert!(matches!(
        remainder(&Value::Integer(1), &Value::Integer(0)),
        Err(ValueError::DivisionByZero { .. })
    ));
}

#[test]
fn test_non_numeric_operands() {
    assert!(matches!(
        remainder(&Value::varchar("12"), &Value::Integer(5)),
        Err(ValueError::DataConversion { .. })
    ));
}
