//! Translating Parquet footer statistics into section statistics.

use std::sync::Arc;

use arrow::datatypes::{DataType, TimeUnit};
use bytes::Bytes;
use parquet::{
    arrow::parquet_to_arrow_schema,
    basic::Type as PhysicalType,
    file::{
        metadata::{ParquetMetaData, RowGroupMetaData},
        statistics::Statistics,
    },
};
use section_domain::{ColumnType, TimestampPrecision};

use crate::{
    observability::log_debug,
    ondisk::{
        bloom::supports_bloom_filter, column_type_from_arrow, ParquetBloomFilter,
        RowGroupBloomProvider,
    },
    pruning::PruneError,
    statistics::{
        ColumnId, ColumnStatistics, DecimalValue, RangeStatistics, SectionStatistics,
        TypedStatistics,
    },
};

const MICROS_PER_MILLI: i64 = 1_000;
const NANOS_PER_MILLI: i64 = 1_000_000;
const NANOS_PER_MICRO: i64 = 1_000;

/// A top-level leaf column of a Parquet file.
#[derive(Clone, Debug)]
pub struct FooterColumn {
    id: ColumnId,
    leaf_index: usize,
    name: String,
    column_type: ColumnType,
    data_type: DataType,
    physical_type: PhysicalType,
    nullable: bool,
}

impl FooterColumn {
    /// Column id; the leaf index in the Parquet schema.
    #[must_use]
    pub fn id(&self) -> ColumnId {
        self.id
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logical column type.
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Parquet physical type.
    #[must_use]
    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    /// Whether the leaf is declared optional.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

/// Columns of a Parquet file whose statistics the pruning engine understands.
///
/// Nested leaves and columns with unsupported types are left out; predicates
/// on them see no statistics and never skip.
#[derive(Clone, Debug)]
pub struct FooterColumns {
    columns: Vec<FooterColumn>,
}

impl FooterColumns {
    /// Resolve the columns of the file described by `metadata`.
    pub fn try_new(metadata: &ParquetMetaData) -> Result<Self, PruneError> {
        let file_metadata = metadata.file_metadata();
        let descriptor = file_metadata.schema_descr();
        let schema = parquet_to_arrow_schema(descriptor, file_metadata.key_value_metadata())?;

        let mut columns = Vec::new();
        for (leaf_index, leaf) in descriptor.columns().iter().enumerate() {
            let [name] = leaf.path().parts() else {
                continue;
            };
            let Ok(field) = schema.field_with_name(name) else {
                continue;
            };
            let column_type = match column_type_from_arrow(field.data_type()) {
                Ok(column_type) => column_type,
                Err(err) => {
                    log_debug!(
                        component = "footer",
                        event = "column_ignored",
                        column = %name,
                        error = %err,
                    );
                    continue;
                }
            };
            let id = u32::try_from(leaf_index)
                .map(ColumnId::new)
                .map_err(|_| PruneError::message(format!("too many columns: {leaf_index}")))?;
            columns.push(FooterColumn {
                id,
                leaf_index,
                name: name.clone(),
                column_type,
                data_type: field.data_type().clone(),
                physical_type: leaf.physical_type(),
                nullable: leaf.self_type().is_optional(),
            });
        }
        Ok(Self { columns })
    }

    /// Resolved columns in schema order.
    #[must_use]
    pub fn columns(&self) -> &[FooterColumn] {
        &self.columns
    }

    /// Column with the given id.
    #[must_use]
    pub fn column(&self, id: ColumnId) -> Option<&FooterColumn> {
        self.columns.iter().find(|column| column.id == id)
    }

    /// Id of the column named `name`.
    #[must_use]
    pub fn column_id(&self, name: &str) -> Option<ColumnId> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .map(|column| column.id)
    }

    /// Statistics of every resolved column in `row_group`.
    pub fn section_statistics(
        &self,
        row_group: &RowGroupMetaData,
    ) -> Result<SectionStatistics, PruneError> {
        let row_count = row_count(row_group)?;
        let mut statistics = SectionStatistics::new();
        for column in &self.columns {
            let Some(chunk) = row_group.columns().get(column.leaf_index) else {
                return Err(PruneError::message(format!(
                    "row group has no chunk for column {}",
                    column.name
                )));
            };
            let Some(chunk_statistics) = chunk.statistics() else {
                continue;
            };
            let number_of_values =
                non_null_count(column.nullable, row_count, chunk_statistics.null_count_opt());
            let mut column_statistics = ColumnStatistics::new(number_of_values);
            if let Some(typed) = typed_statistics(column, chunk_statistics) {
                column_statistics = column_statistics.with_statistics(typed);
            }
            statistics.insert(column.id, column_statistics);
        }
        Ok(statistics)
    }

    /// Load bloom filters of `columns` in row group `row_group_idx` into
    /// `statistics`.
    ///
    /// Columns without statistics, or whose filter encoding differs from the
    /// stored one, are left untouched.
    pub fn attach_bloom_filters(
        &self,
        statistics: &mut SectionStatistics,
        row_group_idx: usize,
        columns: &[ColumnId],
        provider: &mut dyn RowGroupBloomProvider,
    ) -> Result<(), PruneError> {
        for id in columns {
            let Some(column) = self.column(*id) else {
                continue;
            };
            if !supports_bloom_filter(column.column_type) {
                continue;
            }
            let Some(column_statistics) = statistics.get_mut(column.id) else {
                continue;
            };
            if let Some(filter) = provider.bloom_filter(row_group_idx, column.leaf_index)? {
                column_statistics.set_bloom_filter(Arc::new(ParquetBloomFilter::new(
                    filter,
                    column.physical_type,
                )));
            }
        }
        Ok(())
    }
}

/// Row count of `row_group`; negative counts are corrupt metadata.
pub(crate) fn row_count(row_group: &RowGroupMetaData) -> Result<u64, PruneError> {
    u64::try_from(row_group.num_rows()).map_err(|_| {
        PruneError::message(format!("negative row count {}", row_group.num_rows()))
    })
}

/// Values present in a chunk of `row_count` rows, if known.
///
/// Footers that omit the null count decode as zero nulls, so a zero count on
/// an optional leaf is not evidence of a null-free chunk.
fn non_null_count(nullable: bool, row_count: u64, null_count: Option<u64>) -> Option<u64> {
    if !nullable {
        return Some(row_count);
    }
    match null_count {
        None | Some(0) => None,
        Some(nulls) => row_count.checked_sub(nulls),
    }
}

fn typed_statistics(column: &FooterColumn, statistics: &Statistics) -> Option<TypedStatistics> {
    use TypedStatistics as T;

    // Legacy min/max of byte arrays were written in signed byte order.
    if statistics.is_min_max_deprecated()
        && matches!(
            column.physical_type,
            PhysicalType::BYTE_ARRAY | PhysicalType::FIXED_LEN_BYTE_ARRAY
        )
    {
        return None;
    }

    let typed = match (column.column_type, statistics) {
        (
            ColumnType::TinyInt | ColumnType::SmallInt | ColumnType::Integer,
            Statistics::Int32(stats),
        ) => T::Integer(bounds(
            stats.min_opt(),
            stats.max_opt(),
            |v| Some(i64::from(*v)),
            |v| Some(i64::from(*v)),
        )),
        (ColumnType::BigInt, Statistics::Int64(stats)) => T::Integer(bounds(
            stats.min_opt(),
            stats.max_opt(),
            |v| Some(*v),
            |v| Some(*v),
        )),
        (ColumnType::Date, Statistics::Int32(stats)) => T::Date(bounds(
            stats.min_opt(),
            stats.max_opt(),
            |v| Some(*v),
            |v| Some(*v),
        )),
        (ColumnType::Real, Statistics::Float(stats)) => T::Double(bounds(
            stats.min_opt(),
            stats.max_opt(),
            |v| Some(f64::from(*v)),
            |v| Some(f64::from(*v)),
        )),
        (ColumnType::Double, Statistics::Double(stats)) => T::Double(bounds(
            stats.min_opt(),
            stats.max_opt(),
            |v| Some(*v),
            |v| Some(*v),
        )),
        (ColumnType::Varchar { .. } | ColumnType::Varbinary, Statistics::ByteArray(stats)) => {
            T::String(bounds(
                stats.min_opt(),
                stats.max_opt(),
                |v| Some(Bytes::copy_from_slice(v.data())),
                |v| Some(Bytes::copy_from_slice(v.data())),
            ))
        }
        (ColumnType::Decimal { scale, .. }, Statistics::Int32(stats)) => T::Decimal(bounds(
            stats.min_opt(),
            stats.max_opt(),
            |v| Some(DecimalValue::new(i128::from(*v), scale)),
            |v| Some(DecimalValue::new(i128::from(*v), scale)),
        )),
        (ColumnType::Decimal { scale, .. }, Statistics::Int64(stats)) => T::Decimal(bounds(
            stats.min_opt(),
            stats.max_opt(),
            |v| Some(DecimalValue::new(i128::from(*v), scale)),
            |v| Some(DecimalValue::new(i128::from(*v), scale)),
        )),
        (ColumnType::Decimal { scale, .. }, Statistics::FixedLenByteArray(stats)) => {
            T::Decimal(bounds(
                stats.min_opt(),
                stats.max_opt(),
                |v| decode_decimal(v.data()).map(|unscaled| DecimalValue::new(unscaled, scale)),
                |v| decode_decimal(v.data()).map(|unscaled| DecimalValue::new(unscaled, scale)),
            ))
        }
        (ColumnType::Decimal { scale, .. }, Statistics::ByteArray(stats)) => T::Decimal(bounds(
            stats.min_opt(),
            stats.max_opt(),
            |v| decode_decimal(v.data()).map(|unscaled| DecimalValue::new(unscaled, scale)),
            |v| decode_decimal(v.data()).map(|unscaled| DecimalValue::new(unscaled, scale)),
        )),
        (ColumnType::Time { .. }, Statistics::Int32(stats)) => {
            // Time32 is stored in milliseconds.
            T::Integer(bounds(
                stats.min_opt(),
                stats.max_opt(),
                |v| i64::from(*v).checked_mul(MICROS_PER_MILLI),
                |v| i64::from(*v).checked_mul(MICROS_PER_MILLI),
            ))
        }
        (ColumnType::Time { .. }, Statistics::Int64(stats)) => match column.data_type {
            DataType::Time64(TimeUnit::Nanosecond) => T::Integer(bounds(
                stats.min_opt(),
                stats.max_opt(),
                |v| Some(v.div_euclid(NANOS_PER_MICRO)),
                |v| Some(ceil_div(*v, NANOS_PER_MICRO)),
            )),
            _ => T::Integer(bounds(
                stats.min_opt(),
                stats.max_opt(),
                |v| Some(*v),
                |v| Some(*v),
            )),
        },
        (
            ColumnType::Timestamp(precision) | ColumnType::TimestampWithTimeZone(precision),
            Statistics::Int64(stats),
        ) => {
            let per_milli = match precision {
                TimestampPrecision::Millis => 1,
                TimestampPrecision::Micros => MICROS_PER_MILLI,
                TimestampPrecision::Nanos => NANOS_PER_MILLI,
            };
            // Upper bounds are widened to the end of their millisecond during
            // reconstruction, so flooring both sides is enough.
            T::Timestamp(bounds(
                stats.min_opt(),
                stats.max_opt(),
                |v| Some(v.div_euclid(per_milli)),
                |v| Some(v.div_euclid(per_milli)),
            ))
        }
        _ => return None,
    };
    Some(typed)
}

fn bounds<T, U, L, H>(min: Option<&T>, max: Option<&T>, low: L, high: H) -> RangeStatistics<U>
where
    L: FnOnce(&T) -> Option<U>,
    H: FnOnce(&T) -> Option<U>,
{
    RangeStatistics::new(min.and_then(low), max.and_then(high))
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    let quotient = value.div_euclid(divisor);
    if value.rem_euclid(divisor) == 0 {
        quotient
    } else {
        quotient + 1
    }
}

/// Big-endian two's-complement unscaled decimal.
fn decode_decimal(bytes: &[u8]) -> Option<i128> {
    let first = *bytes.first()?;
    if bytes.len() > 16 {
        return None;
    }
    let fill = if first & 0x80 == 0 { 0x00 } else { 0xFF };
    let mut buffer = [fill; 16];
    buffer[16 - bytes.len()..].copy_from_slice(bytes);
    Some(i128::from_be_bytes(buffer))
}
