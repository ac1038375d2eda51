//! Logical column types understood by the pruning engine.

use std::fmt;

use super::value::Value;

/// Fractional-second precision of a timestamp column.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimestampPrecision {
    /// Three fractional digits.
    Millis,
    /// Six fractional digits.
    Micros,
    /// Nine fractional digits.
    Nanos,
}

impl TimestampPrecision {
    /// Number of fractional-second digits.
    #[must_use]
    pub fn digits(self) -> u8 {
        match self {
            TimestampPrecision::Millis => 3,
            TimestampPrecision::Micros => 6,
            TimestampPrecision::Nanos => 9,
        }
    }
}

/// Declared logical type of a column.
///
/// The set is closed: every consumer matches on it exhaustively, so adding a
/// variant is a compile error everywhere a type-specific rule is missing.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ColumnType {
    /// `BOOLEAN`
    Boolean,
    /// `TINYINT`
    TinyInt,
    /// `SMALLINT`
    SmallInt,
    /// `INTEGER`
    Integer,
    /// `BIGINT`
    BigInt,
    /// `REAL`, single precision.
    Real,
    /// `DOUBLE`
    Double,
    /// `DECIMAL(precision, scale)`.
    Decimal {
        /// Total number of digits, 1 to 38.
        precision: u8,
        /// Digits after the decimal point.
        scale: u8,
    },
    /// `CHAR(length)`, blank padded.
    Char {
        /// Declared length in code points.
        length: u32,
    },
    /// `VARCHAR` with an optional length bound.
    Varchar {
        /// Declared maximum length in code points, if bounded.
        length: Option<u32>,
    },
    /// `VARBINARY`
    Varbinary,
    /// `DATE`, days since the epoch.
    Date,
    /// `TIME(precision)`, time of day.
    Time {
        /// Fractional-second digits, 0 to 12.
        precision: u8,
    },
    /// `TIMESTAMP(p)` without time zone.
    Timestamp(TimestampPrecision),
    /// `TIMESTAMP(p) WITH TIME ZONE`.
    TimestampWithTimeZone(TimestampPrecision),
}

/// Largest precision a decimal stored in a single `i64` may declare.
pub(crate) const MAX_SHORT_DECIMAL_PRECISION: u8 = 18;
const MAX_DECIMAL_PRECISION: u8 = 38;

impl ColumnType {
    /// Creates a decimal type.
    ///
    /// # Panics
    ///
    /// Panics if the precision is outside `1..=38` or the scale exceeds it.
    #[must_use]
    pub fn decimal(precision: u8, scale: u8) -> Self {
        assert!(
            (1..=MAX_DECIMAL_PRECISION).contains(&precision),
            "decimal precision must be between 1 and {MAX_DECIMAL_PRECISION}, got {precision}"
        );
        assert!(
            scale <= precision,
            "decimal scale {scale} must not exceed precision {precision}"
        );
        ColumnType::Decimal { precision, scale }
    }

    /// Creates a `CHAR(length)` type.
    #[must_use]
    pub fn char(length: u32) -> Self {
        ColumnType::Char { length }
    }

    /// Creates an unbounded `VARCHAR` type.
    #[must_use]
    pub fn varchar() -> Self {
        ColumnType::Varchar { length: None }
    }

    /// Returns true for decimals whose unscaled value fits in an `i64`.
    #[must_use]
    pub fn is_short_decimal(&self) -> bool {
        matches!(
            self,
            ColumnType::Decimal { precision, .. } if *precision <= MAX_SHORT_DECIMAL_PRECISION
        )
    }

    /// Returns true for decimals that need 128-bit unscaled values.
    #[must_use]
    pub fn is_long_decimal(&self) -> bool {
        matches!(
            self,
            ColumnType::Decimal { precision, .. } if *precision > MAX_SHORT_DECIMAL_PRECISION
        )
    }

    /// The value representation used for this type.
    #[must_use]
    pub fn value_kind(&self) -> ValueKind {
        match self {
            ColumnType::Boolean => ValueKind::Boolean,
            ColumnType::TinyInt
            | ColumnType::SmallInt
            | ColumnType::Integer
            | ColumnType::BigInt
            | ColumnType::Date
            | ColumnType::Time { .. }
            | ColumnType::Timestamp(TimestampPrecision::Millis)
            | ColumnType::Timestamp(TimestampPrecision::Micros)
            | ColumnType::TimestampWithTimeZone(TimestampPrecision::Millis) => ValueKind::Long,
            ColumnType::Decimal { precision, .. } => {
                if *precision <= MAX_SHORT_DECIMAL_PRECISION {
                    ValueKind::Long
                } else {
                    ValueKind::Int128
                }
            }
            ColumnType::Real => ValueKind::Real,
            ColumnType::Double => ValueKind::Double,
            ColumnType::Char { .. } | ColumnType::Varchar { .. } | ColumnType::Varbinary => {
                ValueKind::Slice
            }
            ColumnType::Timestamp(TimestampPrecision::Nanos) => ValueKind::LongTimestamp,
            ColumnType::TimestampWithTimeZone(TimestampPrecision::Micros)
            | ColumnType::TimestampWithTimeZone(TimestampPrecision::Nanos) => {
                ValueKind::LongTimestampWithTimeZone
            }
        }
    }

    /// Returns true when `value` uses this type's representation.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        value.kind() == self.value_kind()
    }

    /// Panics unless `value` uses this type's representation.
    pub(crate) fn check_value(&self, value: &Value) {
        assert!(
            self.accepts(value),
            "value {value:?} does not match column type {self} (expected {:?})",
            self.value_kind()
        );
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Boolean => f.write_str("boolean"),
            ColumnType::TinyInt => f.write_str("tinyint"),
            ColumnType::SmallInt => f.write_str("smallint"),
            ColumnType::Integer => f.write_str("integer"),
            ColumnType::BigInt => f.write_str("bigint"),
            ColumnType::Real => f.write_str("real"),
            ColumnType::Double => f.write_str("double"),
            ColumnType::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
            ColumnType::Char { length } => write!(f, "char({length})"),
            ColumnType::Varchar { length: Some(length) } => write!(f, "varchar({length})"),
            ColumnType::Varchar { length: None } => f.write_str("varchar"),
            ColumnType::Varbinary => f.write_str("varbinary"),
            ColumnType::Date => f.write_str("date"),
            ColumnType::Time { precision } => write!(f, "time({precision})"),
            ColumnType::Timestamp(precision) => write!(f, "timestamp({})", precision.digits()),
            ColumnType::TimestampWithTimeZone(precision) => {
                write!(f, "timestamp({}) with time zone", precision.digits())
            }
        }
    }
}

/// Native representation a [`ColumnType`] stores its values in.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValueKind {
    /// [`Value::Boolean`]
    Boolean,
    /// [`Value::Long`]
    Long,
    /// [`Value::Int128`]
    Int128,
    /// [`Value::Real`]
    Real,
    /// [`Value::Double`]
    Double,
    /// [`Value::Slice`]
    Slice,
    /// [`Value::LongTimestamp`]
    LongTimestamp,
    /// [`Value::LongTimestampWithTimeZone`]
    LongTimestampWithTimeZone,
}
