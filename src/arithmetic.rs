//! # Arithmetic
//!
//! Modulus and remainder have truncated semantics: the result is
//! `a - trunc(a / b) * b`, so its sign follows the dividend.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::compare::total_cmp_f64;
use crate::error::{ValueError, ValueResult};
use crate::value::{Value, ValueFamily, ValueKind};

/// Modulus over the floating family (REAL, DOUBLE PRECISION) and the exact
/// numeric family, which is computed as NUMERIC
///
/// NULL in either operand yields NULL.
pub fn modulus(a: &Value, b: &Value) -> ValueResult<Value> {
    if a.is_null() || b.is_null() {
        return Ok(Value::Null);
    }
    match (a.family(), b.family()) {
        (ValueFamily::ApproximateNumeric, ValueFamily::ApproximateNumeric) => {
            let (x, y) = floats(a, b, "modulus")?;
            if y == 0.0 {
                return Err(division_by_zero("modulus", a));
            }
            match (a, b) {
                (Value::Real(x), Value::Real(y)) => Ok(Value::Real(x % y)),
                _ => Ok(Value::Double(x % y)),
            }
        }
        (ValueFamily::ExactNumeric, ValueFamily::ExactNumeric) => {
            let (x, y) = decimals(a, b, "modulus")?;
            if y.is_zero() {
                return Err(division_by_zero("modulus", a));
            }
            Ok(Value::numeric(decimal_rem(&x, &y)))
        }
        _ => Err(ValueError::conversion(
            "modulus",
            a.kind(),
            b.kind(),
            "operands must both be floating or both be exact numerics",
        )),
    }
}

/// The `%` operator over any two numerics
///
/// Two fixed-width integers give an integer of the wider of the two kinds.
/// An integer with a NUMERIC gives NUMERIC, anything floating gives DOUBLE
/// PRECISION.
pub fn remainder(a: &Value, b: &Value) -> ValueResult<Value> {
    if a.is_null() || b.is_null() {
        return Ok(Value::Null);
    }
    if !a.kind().is_numeric() || !b.kind().is_numeric() {
        return Err(ValueError::conversion(
            "remainder",
            a.kind(),
            b.kind(),
            "operands must be numeric",
        ));
    }
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if y == 0 {
            return Err(division_by_zero("remainder", a));
        }
        // i128 keeps i64::MIN % -1 from overflowing
        let r = (i128::from(x) % i128::from(y)) as i64;
        return Ok(integer_of(wider(a.kind(), b.kind()), r));
    }
    if a.family() == ValueFamily::ExactNumeric && b.family() == ValueFamily::ExactNumeric {
        let (x, y) = decimals(a, b, "remainder")?;
        if y.is_zero() {
            return Err(division_by_zero("remainder", a));
        }
        return Ok(Value::numeric(decimal_rem(&x, &y)));
    }
    let x = approximate(a, b)?;
    let y = approximate(b, a)?;
    if y == 0.0 {
        return Err(division_by_zero("remainder", a));
    }
    Ok(Value::Double(x % y))
}

/// Sign of a numeric or interval value as -1, 0 or 1
///
/// Floats follow the total order used for comparison: NaN is 1 and both zeros
/// are 0.
pub fn signum(value: &Value) -> ValueResult<i32> {
    if let Some(v) = value.as_i64() {
        return Ok(v.signum() as i32);
    }
    match value {
        Value::Numeric(d) => Ok(if d.is_zero() {
            0
        } else if d.is_negative() {
            -1
        } else {
            1
        }),
        Value::Real(_) | Value::Double(_) => {
            let v = value.as_f64().unwrap_or_default();
            Ok(total_cmp_f64(v, 0.0) as i32)
        }
        Value::Interval(i) => Ok(i.signum()),
        other => Err(ValueError::conversion(
            "signum",
            other.kind(),
            ValueKind::Integer,
            "value has no sign",
        )),
    }
}

impl Value {
    pub fn signum(&self) -> ValueResult<i32> {
        signum(self)
    }
}

/// Truncated remainder of two decimals at the larger of their scales
fn decimal_rem(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    let (ia, sa) = a.as_bigint_and_exponent();
    let (ib, sb) = b.as_bigint_and_exponent();
    let scale = sa.max(sb);
    let ia = rescale(ia, scale - sa);
    let ib = rescale(ib, scale - sb);
    BigDecimal::new(ia % ib, scale)
}

fn rescale(digits: BigInt, by: i64) -> BigInt {
    if by <= 0 {
        return digits;
    }
    digits * num_traits::pow(BigInt::from(10), by as usize)
}

fn decimals(a: &Value, b: &Value, operation: &'static str) -> ValueResult<(BigDecimal, BigDecimal)> {
    match (a.as_decimal(), b.as_decimal()) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(ValueError::conversion(operation, a.kind(), b.kind(), "not an exact numeric")),
    }
}

fn floats(a: &Value, b: &Value, operation: &'static str) -> ValueResult<(f64, f64)> {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(ValueError::conversion(operation, a.kind(), b.kind(), "not a floating value")),
    }
}

/// Any numeric as f64; `other` only names the peer kind in errors
fn approximate(v: &Value, other: &Value) -> ValueResult<f64> {
    if let Some(f) = v.as_f64() {
        return Ok(f);
    }
    if let Some(i) = v.as_i64() {
        return Ok(i as f64);
    }
    match v {
        Value::Numeric(d) => d.to_f64().ok_or_else(|| {
            ValueError::conversion("remainder", v.kind(), other.kind(), "decimal out of floating range")
        }),
        _ => Err(ValueError::conversion("remainder", v.kind(), other.kind(), "not numeric")),
    }
}

fn width_rank(kind: ValueKind) -> u8 {
    match kind {
        ValueKind::TinyInt => 0,
        ValueKind::SmallInt => 1,
        ValueKind::Integer => 2,
        _ => 3,
    }
}

fn wider(a: ValueKind, b: ValueKind) -> ValueKind {
    if width_rank(a) >= width_rank(b) {
        a
    } else {
        b
    }
}

/// |r| never exceeds the dividend, so it always fits the wider kind
fn integer_of(kind: ValueKind, r: i64) -> Value {
    match kind {
        ValueKind::TinyInt => i8::try_from(r).map_or(Value::BigInt(r), Value::TinyInt),
        ValueKind::SmallInt => i16::try_from(r).map_or(Value::BigInt(r), Value::SmallInt),
        ValueKind::Integer => i32::try_from(r).map_or(Value::BigInt(r), Value::Integer),
        _ => Value::BigInt(r),
    }
}

fn division_by_zero(operation: &'static str, dividend: &Value) -> ValueError {
    ValueError::DivisionByZero {
        operation,
        dividend: dividend.render().unwrap_or_else(|_| dividend.kind().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Value {
        Value::numeric(BigDecimal::from_str(s).unwrap())
    }

    #[test]
    fn test_decimal_modulus_aligns_scales() {
        assert_eq!(modulus(&dec("5.5"), &dec("2")).unwrap(), dec("1.5"));
        assert_eq!(modulus(&dec("-7"), &dec("3")).unwrap(), dec("-1"));
        assert_eq!(modulus(&dec("7"), &dec("-3")).unwrap(), dec("1"));
    }

    #[test]
    fn test_real_stays_real() {
        assert_eq!(modulus(&Value::Real(7.5), &Value::Real(2.0)).unwrap(), Value::Real(1.5));
    }

    #[test]
    fn test_mixed_family_modulus_rejected() {
        assert!(matches!(
            modulus(&Value::Double(1.0), &dec("1")),
            Err(ValueError::DataConversion { .. })
        ));
    }

    #[test]
    fn test_remainder_result_kinds() {
        assert_eq!(
            remainder(&Value::TinyInt(7), &Value::Integer(4)).unwrap(),
            Value::Integer(3)
        );
        assert_eq!(remainder(&Value::Integer(7), &dec("2.5")).unwrap(), dec("2"));
        assert_eq!(
            remainder(&Value::Integer(7), &Value::Double(2.0)).unwrap(),
            Value::Double(1.0)
        );
    }

    #[test]
    fn test_remainder_min_by_minus_one() {
        let r = remainder(&Value::BigInt(i64::MIN), &Value::BigInt(-1)).unwrap();
        assert_eq!(r, Value::BigInt(0));
    }

    #[test]
    fn test_signum_values() {
        assert_eq!(signum(&Value::Double(f64::NAN)).unwrap(), 1);
        assert_eq!(signum(&Value::Double(-0.0)).unwrap(), 0);
        assert_eq!(signum(&dec("-0.001")).unwrap(), -1);
        assert_eq!(signum(&Value::SmallInt(0)).unwrap(), 0);
        assert!(signum(&Value::varchar("1")).is_err());
    }
}
