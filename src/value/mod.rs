//! # Value Type System
//!
//! The closed family of typed SQL values. Every value is exactly one
//! [`Value`] variant; per-kind behaviour is an exhaustive `match`.
//!
//! ## Design Decisions
//!
//! - **Immutable**: payloads are `Arc`-shared, so cloning a value is cheap and
//!   values can cross threads freely
//! - **Two-case LOBs**: a large object is either inline bytes or a handle to an
//!   external stream ([`lob::LobData`])
//! - **Explicit context**: zone, collation and LOB tuning are passed in a
//!   [`ValueContext`](crate::context::ValueContext), never read from globals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use typelayer::{Value, ValueContext, TypeDescriptor, ValueKind};
//!
//! let ctx = ValueContext::default();
//! let v = Value::varchar("42");
//! let n = v.cast_to(&TypeDescriptor::INTEGER, &ctx)?;
//! assert_eq!(n, Value::Integer(42));
//! ```

pub mod composite;
pub mod interval;
pub mod kind;
pub mod lob;
pub mod object;

pub use composite::{ArrayValue, ResultColumn, ResultSetValue};
pub use interval::{Interval, IntervalQualifier};
pub use kind::{ValueFamily, ValueKind};
pub use lob::{Lob, LobData, LobKind, LobLength, LobSource, MemoryLobSource};
pub use object::{ObjectPayload, ObjectValue};

use std::fmt;
use std::fmt::Write as _;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::compare::total_cmp_f64;
use crate::context::ValueContext;
use crate::error::{ValueError, ValueResult};
use crate::temporal;
use crate::types::TypeDescriptor;

/// A typed SQL value
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Integer(i32),
    BigInt(i64),
    /// Arbitrary precision decimal; the scale is never negative
    Numeric(BigDecimal),
    Real(f32),
    Double(f64),
    /// Fixed length character string
    Char(Arc<str>),
    Varchar(Arc<str>),
    /// Character string compared without regard to case
    VarcharIgnoreCase(Arc<str>),
    Binary(Arc<[u8]>),
    Varbinary(Arc<[u8]>),
    /// BLOB or CLOB
    Lob(Lob),
    Date(NaiveDate),
    Time(NaiveTime),
    TimeTz { time: NaiveTime, offset: FixedOffset },
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<FixedOffset>),
    Interval(Interval),
    Uuid(Uuid),
    JavaObject(ObjectValue),
    Enum { ordinal: i32, label: Arc<str> },
    /// Opaque geometry bytes
    Geometry(Arc<[u8]>),
    /// UTF-8 encoded JSON text
    Json(Arc<[u8]>),
    Array(ArrayValue),
    Row(Arc<[Value]>),
    ResultSet(ResultSetValue),
}

/// Foreign representation of a value
#[derive(Debug, Clone, PartialEq)]
pub enum Canonical {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(BigDecimal),
    Text(String),
    Bytes(Vec<u8>),
    Sequence(Vec<Canonical>),
}

impl Value {
    pub fn numeric(value: BigDecimal) -> Self {
        let (_, scale) = value.as_bigint_and_exponent();
        if scale < 0 {
            Value::Numeric(value.with_scale(0))
        } else {
            Value::Numeric(value)
        }
    }

    pub fn char(s: &str) -> Self {
        Value::Char(Arc::from(s))
    }

    pub fn varchar(s: &str) -> Self {
        Value::Varchar(Arc::from(s))
    }

    pub fn varchar_ignorecase(s: &str) -> Self {
        Value::VarcharIgnoreCase(Arc::from(s))
    }

    pub fn binary(bytes: impl Into<Arc<[u8]>>) -> Self {
        Value::Binary(bytes.into())
    }

    pub fn varbinary(bytes: impl Into<Arc<[u8]>>) -> Self {
        Value::Varbinary(bytes.into())
    }

    pub fn blob(bytes: impl Into<Arc<[u8]>>) -> Self {
        Value::Lob(Lob::blob(bytes))
    }

    pub fn clob(text: &str) -> Self {
        Value::Lob(Lob::clob(text))
    }

    pub fn time_tz(time: NaiveTime, offset: FixedOffset) -> Self {
        Value::TimeTz { time, offset }
    }

    pub fn enumerated(ordinal: i32, label: &str) -> Self {
        Value::Enum {
            ordinal,
            label: Arc::from(label),
        }
    }

    pub fn geometry(bytes: impl Into<Arc<[u8]>>) -> Self {
        Value::Geometry(bytes.into())
    }

    /// JSON value from text, which must be well-formed JSON
    pub fn json(text: &str) -> ValueResult<Self> {
        serde_json::from_str::<serde_json::Value>(text).map_err(|e| {
            ValueError::conversion("json", ValueKind::Varchar, ValueKind::Json, e.to_string())
        })?;
        Ok(Value::Json(Arc::from(text.as_bytes())))
    }

    pub fn java_object(object: ObjectValue) -> Self {
        Value::JavaObject(object)
    }

    pub fn array(component: TypeDescriptor, elements: Vec<Value>) -> Self {
        Value::Array(ArrayValue::new(component, elements))
    }

    pub fn row(elements: Vec<Value>) -> Self {
        Value::Row(elements.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::TinyInt(_) => ValueKind::TinyInt,
            Value::SmallInt(_) => ValueKind::SmallInt,
            Value::Integer(_) => ValueKind::Integer,
            Value::BigInt(_) => ValueKind::BigInt,
            Value::Numeric(_) => ValueKind::Numeric,
            Value::Real(_) => ValueKind::Real,
            Value::Double(_) => ValueKind::Double,
            Value::Char(_) => ValueKind::Char,
            Value::Varchar(_) => ValueKind::Varchar,
            Value::VarcharIgnoreCase(_) => ValueKind::VarcharIgnoreCase,
            Value::Binary(_) => ValueKind::Binary,
            Value::Varbinary(_) => ValueKind::Varbinary,
            Value::Lob(lob) => lob.kind().value_kind(),
            Value::Date(_) => ValueKind::Date,
            Value::Time(_) => ValueKind::Time,
            Value::TimeTz { .. } => ValueKind::TimeTz,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::TimestampTz(_) => ValueKind::TimestampTz,
            Value::Interval(i) => ValueKind::Interval(i.qualifier()),
            Value::Uuid(_) => ValueKind::Uuid,
            Value::JavaObject(_) => ValueKind::JavaObject,
            Value::Enum { .. } => ValueKind::Enum,
            Value::Geometry(_) => ValueKind::Geometry,
            Value::Json(_) => ValueKind::Json,
            Value::Array(_) => ValueKind::Array,
            Value::Row(_) => ValueKind::Row,
            Value::ResultSet(_) => ValueKind::ResultSet,
        }
    }

    pub fn family(&self) -> ValueFamily {
        self.kind().family()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text of CHAR, VARCHAR and VARCHAR_IGNORECASE values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Char(s) | Value::Varchar(s) | Value::VarcharIgnoreCase(s) => Some(s),
            _ => None,
        }
    }

    /// Bytes of BINARY and BINARY VARYING values
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) | Value::Varbinary(b) => Some(b),
            _ => None,
        }
    }

    /// Fixed-width integers widened to i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::TinyInt(v) => Some(i64::from(*v)),
            Value::SmallInt(v) => Some(i64::from(*v)),
            Value::Integer(v) => Some(i64::from(*v)),
            Value::BigInt(v) => Some(*v),
            _ => None,
        }
    }

    /// REAL and DOUBLE PRECISION widened to f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Any exact numeric as a decimal
    pub fn as_decimal(&self) -> Option<BigDecimal> {
        match self {
            Value::Numeric(d) => Some(d.clone()),
            other => other.as_i64().map(BigDecimal::from),
        }
    }

    pub fn as_lob(&self) -> Option<&Lob> {
        match self {
            Value::Lob(lob) => Some(lob),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Descriptor of this value, reporting its actual length, cardinality or
    /// digit count for variable kinds
    pub fn type_descriptor(&self) -> TypeDescriptor {
        let kind = self.kind();
        let sized = |n: usize| {
            let p = i64::try_from(n).unwrap_or(i64::MAX);
            TypeDescriptor::raw(kind, p, 0, i32::try_from(p).unwrap_or(i32::MAX))
        };
        match self {
            Value::Null => TypeDescriptor::NULL,
            Value::Boolean(_) => TypeDescriptor::BOOLEAN,
            Value::TinyInt(_) => TypeDescriptor::TINYINT,
            Value::SmallInt(_) => TypeDescriptor::SMALLINT,
            Value::Integer(_) => TypeDescriptor::INTEGER,
            Value::BigInt(_) => TypeDescriptor::BIGINT,
            Value::Numeric(d) => {
                let precision = i64::try_from(d.digits()).unwrap_or(i64::MAX);
                let scale = i32::try_from(d.as_bigint_and_exponent().1).unwrap_or(i32::MAX);
                let display = i32::try_from(precision.saturating_add(2)).unwrap_or(i32::MAX);
                TypeDescriptor::raw(kind, precision, scale, display)
            }
            Value::Real(_) => TypeDescriptor::REAL,
            Value::Double(_) => TypeDescriptor::DOUBLE,
            Value::Char(s) | Value::Varchar(s) | Value::VarcharIgnoreCase(s) => sized(s.chars().count()),
            Value::Binary(b) | Value::Varbinary(b) | Value::Geometry(b) | Value::Json(b) => sized(b.len()),
            Value::Lob(lob) => {
                let p = lob.precision();
                TypeDescriptor::raw(kind, p, 0, i32::try_from(p).unwrap_or(i32::MAX))
            }
            Value::Date(_) => TypeDescriptor::DATE,
            Value::Time(_) => TypeDescriptor::TIME,
            Value::TimeTz { .. } => TypeDescriptor::TIME_TZ,
            Value::Timestamp(_) => TypeDescriptor::TIMESTAMP,
            Value::TimestampTz(_) => TypeDescriptor::TIMESTAMP_TZ,
            Value::Interval(i) => {
                let q = i.qualifier();
                let p = interval::MAX_INTERVAL_PRECISION;
                let s = if q.has_seconds() { interval::MAX_INTERVAL_SCALE } else { 0 };
                TypeDescriptor::raw(kind, p, s, q.display_size(p, s))
            }
            Value::Uuid(_) => TypeDescriptor::UUID,
            Value::JavaObject(o) => sized(o.bytes().len()),
            Value::Enum { label, .. } => sized(label.chars().count()),
            Value::Array(a) => sized(a.len()),
            Value::Row(r) => sized(r.len()),
            Value::ResultSet(_) => TypeDescriptor::RESULT_SET,
        }
    }

    /// The string value. External LOBs are read in full.
    pub fn render(&self) -> ValueResult<String> {
        let text = match self {
            Value::Null => "NULL".to_string(),
            Value::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Value::TinyInt(v) => v.to_string(),
            Value::SmallInt(v) => v.to_string(),
            Value::Integer(v) => v.to_string(),
            Value::BigInt(v) => v.to_string(),
            Value::Numeric(d) => d.to_plain_string(),
            Value::Real(v) => format_float(f64::from(*v), &v.to_string()),
            Value::Double(v) => format_float(*v, &v.to_string()),
            Value::Char(s) | Value::Varchar(s) | Value::VarcharIgnoreCase(s) => s.to_string(),
            Value::Binary(b) | Value::Varbinary(b) | Value::Geometry(b) => hex(b),
            Value::JavaObject(o) => hex(o.bytes()),
            Value::Lob(lob) => match lob.kind() {
                LobKind::Blob => hex(&lob.read_bytes("render")?),
                LobKind::Clob => lob.read_string("render")?,
            },
            Value::Date(d) => temporal::format_date(d),
            Value::Time(t) => temporal::format_time(t),
            Value::TimeTz { time, offset } => {
                format!("{}{}", temporal::format_time(time), temporal::format_offset(*offset))
            }
            Value::Timestamp(ts) => temporal::format_timestamp(ts),
            Value::TimestampTz(ts) => temporal::format_timestamp_tz(ts),
            Value::Interval(i) => i.to_string(),
            Value::Uuid(u) => u.hyphenated().to_string(),
            Value::Enum { label, .. } => label.to_string(),
            Value::Json(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Value::Array(a) => format!("[{}]", render_list(a.elements())?),
            Value::Row(r) => format!("ROW ({})", render_list(r)?),
            Value::ResultSet(rs) => {
                let rows = rs
                    .rows()
                    .iter()
                    .map(|row| render_list(row).map(|r| format!("({r})")))
                    .collect::<ValueResult<Vec<_>>>()?;
                format!("({})", rows.join(", "))
            }
        };
        Ok(text)
    }

    /// Projection onto the foreign representation
    pub fn to_canonical(&self) -> ValueResult<Canonical> {
        let canonical = match self {
            Value::Null => Canonical::Null,
            Value::Boolean(b) => Canonical::Bool(*b),
            Value::TinyInt(_) | Value::SmallInt(_) | Value::Integer(_) | Value::BigInt(_) => {
                Canonical::Int(self.as_i64().unwrap_or_default())
            }
            Value::Numeric(d) => Canonical::Decimal(d.clone()),
            Value::Real(v) => Canonical::Float(f64::from(*v)),
            Value::Double(v) => Canonical::Float(*v),
            Value::Binary(b) | Value::Varbinary(b) | Value::Geometry(b) => Canonical::Bytes(b.to_vec()),
            Value::JavaObject(o) => Canonical::Bytes(o.bytes().to_vec()),
            Value::Lob(lob) if lob.kind() == LobKind::Blob => {
                Canonical::Bytes(lob.read_bytes("to_canonical")?)
            }
            Value::Array(a) => Canonical::Sequence(
                a.elements()
                    .iter()
                    .map(Value::to_canonical)
                    .collect::<ValueResult<_>>()?,
            ),
            Value::Row(r) => {
                Canonical::Sequence(r.iter().map(Value::to_canonical).collect::<ValueResult<_>>()?)
            }
            Value::ResultSet(rs) => Canonical::Sequence(
                rs.rows()
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(Value::to_canonical)
                            .collect::<ValueResult<_>>()
                            .map(Canonical::Sequence)
                    })
                    .collect::<ValueResult<_>>()?,
            ),
            other => Canonical::Text(other.render()?),
        };
        Ok(canonical)
    }

    /// Binds a foreign representation to a kind. Reading the result back
    /// through [`Value::to_canonical`] yields the same representation.
    pub fn from_canonical(kind: ValueKind, canonical: Canonical, ctx: &ValueContext) -> ValueResult<Self> {
        if matches!(kind, ValueKind::Enum | ValueKind::ResultSet) {
            return Err(ValueError::conversion(
                "from_canonical",
                canonical_kind(&canonical),
                kind,
                "no canonical binding for this kind",
            ));
        }
        let target = TypeDescriptor::of(kind)?;
        let natural = match canonical {
            Canonical::Sequence(items) if kind == ValueKind::Row => Value::row(
                items
                    .into_iter()
                    .map(Value::from_natural)
                    .collect::<ValueResult<_>>()?,
            ),
            other => Value::from_natural(other)?,
        };
        natural.cast_to(&target, ctx)
    }

    /// The value a canonical form denotes without a target kind
    fn from_natural(canonical: Canonical) -> ValueResult<Self> {
        Ok(match canonical {
            Canonical::Null => Value::Null,
            Canonical::Bool(b) => Value::Boolean(b),
            Canonical::Int(v) => Value::BigInt(v),
            Canonical::Float(v) => Value::Double(v),
            Canonical::Decimal(d) => Value::numeric(d),
            Canonical::Text(s) => Value::varchar(&s),
            Canonical::Bytes(b) => Value::varbinary(b),
            Canonical::Sequence(items) => {
                let elements: Vec<Value> = items
                    .into_iter()
                    .map(Value::from_natural)
                    .collect::<ValueResult<_>>()?;
                let component = match elements.first() {
                    Some(first) => TypeDescriptor::of(first.kind())?,
                    None => TypeDescriptor::NULL,
                };
                Value::array(component, elements)
            }
        })
    }
}

fn canonical_kind(canonical: &Canonical) -> ValueKind {
    match canonical {
        Canonical::Null => ValueKind::Null,
        Canonical::Bool(_) => ValueKind::Boolean,
        Canonical::Int(_) => ValueKind::BigInt,
        Canonical::Float(_) => ValueKind::Double,
        Canonical::Decimal(_) => ValueKind::Numeric,
        Canonical::Text(_) => ValueKind::Varchar,
        Canonical::Bytes(_) => ValueKind::Varbinary,
        Canonical::Sequence(_) => ValueKind::Array,
    }
}

fn render_list(values: &[Value]) -> ValueResult<String> {
    let parts = values.iter().map(Value::render).collect::<ValueResult<Vec<_>>>()?;
    Ok(parts.join(", "))
}

fn format_float(v: f64, shortest: &str) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if shortest.contains(['.', 'e']) {
        shortest.to_string()
    } else {
        format!("{shortest}.0")
    }
}

pub(crate) fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn write_list(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{v}")?;
    }
    Ok(())
}

/// SQL literal form
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::TinyInt(v) => write!(f, "CAST({v} AS TINYINT)"),
            Value::SmallInt(v) => write!(f, "CAST({v} AS SMALLINT)"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::BigInt(v) => write!(f, "CAST({v} AS BIGINT)"),
            Value::Numeric(d) => write!(f, "{}", d.to_plain_string()),
            Value::Real(v) => write!(f, "CAST({} AS REAL)", format_float(f64::from(*v), &v.to_string())),
            Value::Double(v) if v.is_finite() => write!(f, "{}", format_float(*v, &v.to_string())),
            Value::Double(v) => write!(f, "CAST('{}' AS DOUBLE PRECISION)", format_float(*v, "")),
            Value::Char(s) => write!(f, "CAST({} AS CHARACTER({}))", quote(s), s.chars().count()),
            Value::Varchar(s) => write!(f, "{}", quote(s)),
            Value::VarcharIgnoreCase(s) => write!(f, "CAST({} AS VARCHAR_IGNORECASE)", quote(s)),
            Value::Binary(b) | Value::Varbinary(b) => write!(f, "X'{}'", hex(b)),
            Value::Lob(lob) => match (lob.kind(), lob.data()) {
                (LobKind::Blob, LobData::Inline(b)) => write!(f, "CAST(X'{}' AS BLOB)", hex(b)),
                (LobKind::Clob, LobData::Inline(b)) => {
                    write!(f, "CAST({} AS CLOB)", quote(&String::from_utf8_lossy(b)))
                }
                (kind, LobData::External { length, .. }) => {
                    let kind = kind.value_kind();
                    match length {
                        LobLength::Known(n) => write!(f, "<external {kind}, length {n}>"),
                        LobLength::Unknown => write!(f, "<external {kind}, length unknown>"),
                    }
                }
            },
            Value::Date(d) => write!(f, "DATE '{}'", temporal::format_date(d)),
            Value::Time(t) => write!(f, "TIME '{}'", temporal::format_time(t)),
            Value::TimeTz { time, offset } => write!(
                f,
                "TIME WITH TIME ZONE '{}{}'",
                temporal::format_time(time),
                temporal::format_offset(*offset)
            ),
            Value::Timestamp(ts) => write!(f, "TIMESTAMP '{}'", temporal::format_timestamp(ts)),
            Value::TimestampTz(ts) => {
                write!(f, "TIMESTAMP WITH TIME ZONE '{}'", temporal::format_timestamp_tz(ts))
            }
            Value::Interval(i) => write!(f, "{i}"),
            Value::Uuid(u) => write!(f, "UUID '{}'", u.hyphenated()),
            Value::JavaObject(o) => write!(f, "CAST(X'{}' AS JAVA_OBJECT)", hex(o.bytes())),
            Value::Enum { label, .. } => write!(f, "{}", quote(label)),
            Value::Geometry(b) => write!(f, "CAST(X'{}' AS GEOMETRY)", hex(b)),
            Value::Json(b) => write!(f, "JSON {}", quote(&String::from_utf8_lossy(b))),
            Value::Array(a) => {
                write!(f, "ARRAY [")?;
                write_list(f, a.elements())?;
                write!(f, "]")
            }
            Value::Row(r) => {
                write!(f, "ROW (")?;
                write_list(f, r)?;
                write!(f, ")")
            }
            Value::ResultSet(rs) => write!(
                f,
                "<result set, {} columns, {} rows>",
                rs.columns().len(),
                rs.rows().len()
            ),
        }
    }
}

fn float_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

// Same-kind equality. Floats follow their total order, case is ignored for
// VARCHAR_IGNORECASE and zoned timestamps must agree on the offset too.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::TinyInt(a), Value::TinyInt(b)) => a == b,
            (Value::SmallInt(a), Value::SmallInt(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Numeric(a), Value::Numeric(b)) => a == b,
            (Value::Real(a), Value::Real(b)) => total_cmp_f64(f64::from(*a), f64::from(*b)).is_eq(),
            (Value::Double(a), Value::Double(b)) => total_cmp_f64(*a, *b).is_eq(),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Varchar(a), Value::Varchar(b)) => a == b,
            (Value::VarcharIgnoreCase(a), Value::VarcharIgnoreCase(b)) => a
                .chars()
                .flat_map(char::to_lowercase)
                .eq(b.chars().flat_map(char::to_lowercase)),
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Varbinary(a), Value::Varbinary(b)) => a == b,
            (Value::Lob(a), Value::Lob(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (
                Value::TimeTz { time: ta, offset: oa },
                Value::TimeTz { time: tb, offset: ob },
            ) => ta == tb && oa == ob,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::TimestampTz(a), Value::TimestampTz(b)) => a == b && a.offset() == b.offset(),
            (Value::Interval(a), Value::Interval(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::JavaObject(a), Value::JavaObject(b)) => a == b,
            (
                Value::Enum { ordinal: oa, label: la },
                Value::Enum { ordinal: ob, label: lb },
            ) => oa == ob && la == lb,
            (Value::Geometry(a), Value::Geometry(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Row(a), Value::Row(b)) => a == b,
            (Value::ResultSet(a), Value::ResultSet(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            Value::TinyInt(v) => v.hash(state),
            Value::SmallInt(v) => v.hash(state),
            Value::Integer(v) => v.hash(state),
            Value::BigInt(v) => v.hash(state),
            Value::Numeric(d) => d.normalized().hash(state),
            Value::Real(v) => float_bits(f64::from(*v)).hash(state),
            Value::Double(v) => float_bits(*v).hash(state),
            Value::Char(s) | Value::Varchar(s) => s.hash(state),
            Value::VarcharIgnoreCase(s) => {
                for c in s.chars().flat_map(char::to_lowercase) {
                    c.hash(state);
                }
            }
            Value::Binary(b) | Value::Varbinary(b) | Value::Geometry(b) | Value::Json(b) => b.hash(state),
            Value::Lob(lob) => lob.hash(state),
            Value::Date(d) => d.hash(state),
            Value::Time(t) => t.hash(state),
            Value::TimeTz { time, offset } => {
                time.hash(state);
                offset.local_minus_utc().hash(state);
            }
            Value::Timestamp(ts) => ts.hash(state),
            Value::TimestampTz(ts) => {
                ts.naive_utc().hash(state);
                ts.offset().local_minus_utc().hash(state);
            }
            Value::Interval(i) => i.hash(state),
            Value::Uuid(u) => u.hash(state),
            Value::JavaObject(o) => o.hash(state),
            Value::Enum { ordinal, label } => {
                ordinal.hash(state);
                label.hash(state);
            }
            Value::Array(a) => a.hash(state),
            Value::Row(r) => r.hash(state),
            Value::ResultSet(rs) => rs.hash(state),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::TinyInt(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::SmallInt(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Real(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<BigDecimal> for Value {
    fn from(v: BigDecimal) -> Self {
        Value::numeric(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::varchar(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Varchar(Arc::from(s))
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(ts: DateTime<FixedOffset>) -> Self {
        Value::TimestampTz(ts)
    }
}

impl From<Interval> for Value {
    fn from(i: Interval) -> Self {
        Value::Interval(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::str::FromStr;

    fn hash_of(v: &Value) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_numeric_scale_normalized() {
        let v = Value::numeric(BigDecimal::from_str("1E+3").unwrap());
        match &v {
            Value::Numeric(d) => assert_eq!(d.as_bigint_and_exponent().1, 0),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(v.render().unwrap(), "1000");
    }

    #[test]
    fn test_float_equality_and_hash() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_eq!(Value::Double(-0.0), Value::Double(0.0));
        assert_eq!(hash_of(&Value::Double(-0.0)), hash_of(&Value::Double(0.0)));
        assert_ne!(Value::Double(1.0), Value::Real(1.0));
    }

    #[test]
    fn test_ignorecase_equality() {
        let a = Value::varchar_ignorecase("Hello");
        let b = Value::varchar_ignorecase("hELLO");
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(Value::varchar("Hello"), Value::varchar("hELLO"));
    }

    #[test]
    fn test_numeric_equality_ignores_trailing_zeros() {
        let a = Value::numeric(BigDecimal::from_str("1.50").unwrap());
        let b = Value::numeric(BigDecimal::from_str("1.5").unwrap());
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_value_descriptor_reports_actual_length() {
        let d = Value::varchar("héllo").type_descriptor();
        assert_eq!((d.kind(), d.precision(), d.display_size()), (ValueKind::Varchar, 5, 5));
        let d = Value::numeric(BigDecimal::from_str("123.45").unwrap()).type_descriptor();
        assert_eq!((d.precision(), d.scale(), d.display_size()), (5, 2, 7));
        let d = Value::array(TypeDescriptor::INTEGER, vec![Value::Integer(1)]).type_descriptor();
        assert_eq!(d.precision(), 1);
    }

    #[test]
    fn test_sql_literals() {
        assert_eq!(Value::varchar("it's").to_string(), "'it''s'");
        assert_eq!(Value::varbinary(vec![0xab, 0x01]).to_string(), "X'ab01'");
        assert_eq!(Value::Double(f64::NEG_INFINITY).to_string(), "CAST('-Infinity' AS DOUBLE PRECISION)");
        assert_eq!(Value::Double(2.0).to_string(), "2.0");
        let d = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        assert_eq!(Value::Date(d).to_string(), "DATE '2020-02-29'");
        let arr = Value::array(TypeDescriptor::INTEGER, vec![Value::Integer(1), Value::Null]);
        assert_eq!(arr.to_string(), "ARRAY [1, NULL]");
    }

    #[test]
    fn test_render_string_values() {
        assert_eq!(Value::Boolean(true).render().unwrap(), "TRUE");
        assert_eq!(Value::Double(f64::NAN).render().unwrap(), "NaN");
        let u = Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
        assert_eq!(Value::Uuid(u).render().unwrap(), "01234567-89ab-cdef-0123-456789abcdef");
    }

    #[test]
    fn test_json_validation() {
        assert!(Value::json("{\"a\": 1}").is_ok());
        assert!(matches!(Value::json("{oops"), Err(ValueError::DataConversion { .. })));
    }

    #[test]
    fn test_canonical_binding_matches_projection() {
        let ctx = ValueContext::default();
        let cases = vec![
            (ValueKind::Integer, Canonical::Int(42)),
            (ValueKind::Double, Canonical::Float(1.5)),
            (ValueKind::Varchar, Canonical::Text("abc".into())),
            (ValueKind::Varbinary, Canonical::Bytes(vec![1, 2, 3])),
            (ValueKind::Date, Canonical::Text("2020-01-31".into())),
            (ValueKind::Boolean, Canonical::Bool(true)),
            (
                ValueKind::Array,
                Canonical::Sequence(vec![Canonical::Int(1), Canonical::Int(2)]),
            ),
        ];
        for (kind, canonical) in cases {
            let v = Value::from_canonical(kind, canonical.clone(), &ctx).unwrap();
            assert_eq!(v.kind(), kind);
            assert_eq!(v.to_canonical().unwrap(), canonical, "{kind}");
        }
    }

    #[test]
    fn test_canonical_enum_rejected() {
        let ctx = ValueContext::default();
        let err = Value::from_canonical(ValueKind::Enum, Canonical::Text("RED".into()), &ctx);
        assert!(matches!(err, Err(ValueError::DataConversion { .. })));
    }
}
