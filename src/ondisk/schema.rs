use arrow::datatypes::{DataType, TimeUnit};
use section_domain::{ColumnType, TimestampPrecision};

use crate::pruning::PruneError;

/// Logical column type for an Arrow field type.
///
/// Only types whose Parquet statistics can be turned into sound bounds are
/// supported; everything else is [`PruneError::UnsupportedType`].
pub fn column_type_from_arrow(data_type: &DataType) -> Result<ColumnType, PruneError> {
    let column_type = match data_type {
        DataType::Boolean => ColumnType::Boolean,
        DataType::Int8 => ColumnType::TinyInt,
        DataType::Int16 => ColumnType::SmallInt,
        DataType::Int32 => ColumnType::Integer,
        DataType::Int64 => ColumnType::BigInt,
        DataType::Float32 => ColumnType::Real,
        DataType::Float64 => ColumnType::Double,
        DataType::Decimal128(precision, scale)
            if (1..=38).contains(precision)
                && *scale >= 0
                && scale.unsigned_abs() <= *precision =>
        {
            ColumnType::decimal(*precision, scale.unsigned_abs())
        }
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => ColumnType::varchar(),
        DataType::Binary | DataType::LargeBinary | DataType::BinaryView => ColumnType::Varbinary,
        DataType::Date32 => ColumnType::Date,
        DataType::Time32(TimeUnit::Millisecond) => ColumnType::Time { precision: 3 },
        DataType::Time64(TimeUnit::Microsecond) => ColumnType::Time { precision: 6 },
        DataType::Time64(TimeUnit::Nanosecond) => ColumnType::Time { precision: 9 },
        DataType::Timestamp(unit, zone) => {
            let precision = match unit {
                TimeUnit::Millisecond => TimestampPrecision::Millis,
                TimeUnit::Microsecond => TimestampPrecision::Micros,
                TimeUnit::Nanosecond => TimestampPrecision::Nanos,
                TimeUnit::Second => return Err(unsupported(data_type)),
            };
            if zone.is_some() {
                ColumnType::TimestampWithTimeZone(precision)
            } else {
                ColumnType::Timestamp(precision)
            }
        }
        other => return Err(unsupported(other)),
    };
    Ok(column_type)
}

fn unsupported(data_type: &DataType) -> PruneError {
    PruneError::UnsupportedType(data_type.to_string())
}
