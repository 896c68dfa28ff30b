//! Value kinds and the comparison families they belong to.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::interval::IntervalQualifier;

/// Tag identifying the type of a value
///
/// `Unknown` is a placeholder for kinds that cannot be constructed; asking for
/// its descriptor fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Unknown,
    Null,
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Numeric,
    Real,
    Double,
    Char,
    Varchar,
    VarcharIgnoreCase,
    Binary,
    Varbinary,
    Blob,
    Clob,
    Date,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    Interval(IntervalQualifier),
    Uuid,
    JavaObject,
    Enum,
    Geometry,
    Json,
    Array,
    Row,
    ResultSet,
}

/// Grouping of kinds that share a comparison and arithmetic domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueFamily {
    Null,
    Boolean,
    ExactNumeric,
    ApproximateNumeric,
    Character,
    Binary,
    DateTime,
    TimeOfDay,
    ZonedTimeOfDay,
    YearMonthInterval,
    DayTimeInterval,
    Uuid,
    Object,
    Enum,
    Geometry,
    Json,
    Array,
    Row,
    ResultSet,
    Unknown,
}

impl ValueKind {
    /// Every constructible kind, in tag order
    pub const ALL: [ValueKind; 42] = [
        ValueKind::Null,
        ValueKind::Boolean,
        ValueKind::TinyInt,
        ValueKind::SmallInt,
        ValueKind::Integer,
        ValueKind::BigInt,
        ValueKind::Numeric,
        ValueKind::Real,
        ValueKind::Double,
        ValueKind::Char,
        ValueKind::Varchar,
        ValueKind::VarcharIgnoreCase,
        ValueKind::Binary,
        ValueKind::Varbinary,
        ValueKind::Blob,
        ValueKind::Clob,
        ValueKind::Date,
        ValueKind::Time,
        ValueKind::TimeTz,
        ValueKind::Timestamp,
        ValueKind::TimestampTz,
        ValueKind::Interval(IntervalQualifier::Year),
        ValueKind::Interval(IntervalQualifier::Month),
        ValueKind::Interval(IntervalQualifier::Day),
        ValueKind::Interval(IntervalQualifier::Hour),
        ValueKind::Interval(IntervalQualifier::Minute),
        ValueKind::Interval(IntervalQualifier::Second),
        ValueKind::Interval(IntervalQualifier::YearToMonth),
        ValueKind::Interval(IntervalQualifier::DayToHour),
        ValueKind::Interval(IntervalQualifier::DayToMinute),
        ValueKind::Interval(IntervalQualifier::DayToSecond),
        ValueKind::Interval(IntervalQualifier::HourToMinute),
        ValueKind::Interval(IntervalQualifier::HourToSecond),
        ValueKind::Interval(IntervalQualifier::MinuteToSecond),
        ValueKind::Uuid,
        ValueKind::JavaObject,
        ValueKind::Enum,
        ValueKind::Geometry,
        ValueKind::Json,
        ValueKind::Array,
        ValueKind::Row,
        ValueKind::ResultSet,
    ];

    /// The comparison family of this kind
    pub fn family(&self) -> ValueFamily {
        match self {
            ValueKind::Unknown => ValueFamily::Unknown,
            ValueKind::Null => ValueFamily::Null,
            ValueKind::Boolean => ValueFamily::Boolean,
            ValueKind::TinyInt
            | ValueKind::SmallInt
            | ValueKind::Integer
            | ValueKind::BigInt
            | ValueKind::Numeric => ValueFamily::ExactNumeric,
            ValueKind::Real | ValueKind::Double => ValueFamily::ApproximateNumeric,
            ValueKind::Char | ValueKind::Varchar | ValueKind::VarcharIgnoreCase | ValueKind::Clob => {
                ValueFamily::Character
            }
            ValueKind::Binary | ValueKind::Varbinary | ValueKind::Blob => ValueFamily::Binary,
            ValueKind::Date | ValueKind::Timestamp | ValueKind::TimestampTz => ValueFamily::DateTime,
            ValueKind::Time => ValueFamily::TimeOfDay,
            ValueKind::TimeTz => ValueFamily::ZonedTimeOfDay,
            ValueKind::Interval(q) if q.is_year_month() => ValueFamily::YearMonthInterval,
            ValueKind::Interval(_) => ValueFamily::DayTimeInterval,
            ValueKind::Uuid => ValueFamily::Uuid,
            ValueKind::JavaObject => ValueFamily::Object,
            ValueKind::Enum => ValueFamily::Enum,
            ValueKind::Geometry => ValueFamily::Geometry,
            ValueKind::Json => ValueFamily::Json,
            ValueKind::Array => ValueFamily::Array,
            ValueKind::Row => ValueFamily::Row,
            ValueKind::ResultSet => ValueFamily::ResultSet,
        }
    }

    /// Fixed-width exact integer kinds
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ValueKind::TinyInt | ValueKind::SmallInt | ValueKind::Integer | ValueKind::BigInt
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self.family(),
            ValueFamily::ExactNumeric | ValueFamily::ApproximateNumeric
        )
    }

    /// Character kinds whose values are held as plain text
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            ValueKind::Char | ValueKind::Varchar | ValueKind::VarcharIgnoreCase
        )
    }

    pub fn is_lob(&self) -> bool {
        matches!(self, ValueKind::Blob | ValueKind::Clob)
    }

    /// Parses the SQL name of a kind
    pub fn from_sql_name(name: &str) -> Option<ValueKind> {
        let normalized = name.trim().to_ascii_uppercase();
        let kind = match normalized.as_str() {
            "NULL" => ValueKind::Null,
            "BOOLEAN" | "BOOL" => ValueKind::Boolean,
            "TINYINT" => ValueKind::TinyInt,
            "SMALLINT" => ValueKind::SmallInt,
            "INTEGER" | "INT" => ValueKind::Integer,
            "BIGINT" => ValueKind::BigInt,
            "NUMERIC" | "DECIMAL" => ValueKind::Numeric,
            "REAL" => ValueKind::Real,
            "DOUBLE PRECISION" | "DOUBLE" | "FLOAT" => ValueKind::Double,
            "CHARACTER" | "CHAR" => ValueKind::Char,
            "CHARACTER VARYING" | "VARCHAR" => ValueKind::Varchar,
            "VARCHAR_IGNORECASE" => ValueKind::VarcharIgnoreCase,
            "BINARY" => ValueKind::Binary,
            "BINARY VARYING" | "VARBINARY" => ValueKind::Varbinary,
            "BINARY LARGE OBJECT" | "BLOB" => ValueKind::Blob,
            "CHARACTER LARGE OBJECT" | "CLOB" => ValueKind::Clob,
            "DATE" => ValueKind::Date,
            "TIME" => ValueKind::Time,
            "TIME WITH TIME ZONE" => ValueKind::TimeTz,
            "TIMESTAMP" => ValueKind::Timestamp,
            "TIMESTAMP WITH TIME ZONE" => ValueKind::TimestampTz,
            "UUID" => ValueKind::Uuid,
            "JAVA_OBJECT" | "OTHER" => ValueKind::JavaObject,
            "ENUM" => ValueKind::Enum,
            "GEOMETRY" => ValueKind::Geometry,
            "JSON" => ValueKind::Json,
            "ARRAY" => ValueKind::Array,
            "ROW" => ValueKind::Row,
            "RESULT_SET" => ValueKind::ResultSet,
            other => {
                let qualifier = other.strip_prefix("INTERVAL ")?;
                ValueKind::Interval(IntervalQualifier::from_sql(qualifier)?)
            }
        };
        Some(kind)
    }

    /// SQL name of the kind, as used in error messages and metadata
    pub fn sql_name(&self) -> &'static str {
        match self {
            ValueKind::Unknown => "UNKNOWN",
            ValueKind::Null => "NULL",
            ValueKind::Boolean => "BOOLEAN",
            ValueKind::TinyInt => "TINYINT",
            ValueKind::SmallInt => "SMALLINT",
            ValueKind::Integer => "INTEGER",
            ValueKind::BigInt => "BIGINT",
            ValueKind::Numeric => "NUMERIC",
            ValueKind::Real => "REAL",
            ValueKind::Double => "DOUBLE PRECISION",
            ValueKind::Char => "CHARACTER",
            ValueKind::Varchar => "CHARACTER VARYING",
            ValueKind::VarcharIgnoreCase => "VARCHAR_IGNORECASE",
            ValueKind::Binary => "BINARY",
            ValueKind::Varbinary => "BINARY VARYING",
            ValueKind::Blob => "BINARY LARGE OBJECT",
            ValueKind::Clob => "CHARACTER LARGE OBJECT",
            ValueKind::Date => "DATE",
            ValueKind::Time => "TIME",
            ValueKind::TimeTz => "TIME WITH TIME ZONE",
            ValueKind::Timestamp => "TIMESTAMP",
            ValueKind::TimestampTz => "TIMESTAMP WITH TIME ZONE",
            ValueKind::Interval(q) => q.kind_name(),
            ValueKind::Uuid => "UUID",
            ValueKind::JavaObject => "JAVA_OBJECT",
            ValueKind::Enum => "ENUM",
            ValueKind::Geometry => "GEOMETRY",
            ValueKind::Json => "JSON",
            ValueKind::Array => "ARRAY",
            ValueKind::Row => "ROW",
            ValueKind::ResultSet => "RESULT_SET",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}
