//! Rebuilding a value domain from section statistics.
//!
//! Every bound produced here is inclusive and at least as wide as the values
//! the section can hold. A conversion that cannot be done exactly either widens
//! or drops its bound.

use bytes::Bytes;
use section_domain::{
    pack_date_time_with_zone, ColumnType, Domain, LongTimestamp, LongTimestampWithTimeZone, Range,
    TimeZoneKey, TimestampPrecision, Value, ValueSet, MICROSECONDS_PER_MILLISECOND,
    PICOSECONDS_PER_MICROSECOND,
};

use crate::statistics::{
    BooleanStatistics, ColumnStatistics, DecimalValue, RangeStatistics, Rounding, TypedStatistics,
};

/// Largest sub-millisecond fraction of a microsecond-precision timestamp, in
/// picoseconds.
const MAX_PICOS_OF_MILLI_MICROS: u32 = 999_000_000;
/// Largest sub-millisecond fraction of a nanosecond-precision timestamp, in
/// picoseconds.
const MAX_PICOS_OF_MILLI_NANOS: u32 = 999_999_000;

/// Domain of the values a section may hold in a column of `column_type`.
///
/// `statistics` is `None` when the section recorded nothing for the column.
#[must_use]
pub fn section_domain(
    column_type: ColumnType,
    row_count: u64,
    statistics: Option<&ColumnStatistics>,
) -> Domain {
    if row_count == 0 {
        return Domain::none(column_type);
    }
    let Some(statistics) = statistics else {
        return Domain::all(column_type);
    };
    let number_of_values = statistics.number_of_values();
    if number_of_values == Some(0) {
        return Domain::only_null(column_type);
    }
    let null_allowed = number_of_values != Some(row_count);

    statistics
        .typed_statistics()
        .and_then(|typed| typed_values(column_type, number_of_values, typed))
        .map_or_else(
            || Domain::new(column_type, ValueSet::all(), null_allowed),
            |values| Domain::new(column_type, values, null_allowed),
        )
}

fn typed_values(
    column_type: ColumnType,
    number_of_values: Option<u64>,
    statistics: &TypedStatistics,
) -> Option<ValueSet> {
    use TimestampPrecision::{Micros, Millis, Nanos};
    use TypedStatistics as S;

    match (column_type, statistics) {
        (ColumnType::Boolean, S::Boolean(stats)) => boolean_values(number_of_values, stats),
        (
            ColumnType::TinyInt | ColumnType::SmallInt | ColumnType::Integer | ColumnType::BigInt,
            S::Integer(stats),
        ) => range_values(stats, |v| Some(Value::Long(*v)), |v| Some(Value::Long(*v))),
        (ColumnType::Real, S::Double(stats)) => range_values(
            stats,
            |v| Some(Value::real(*v as f32)),
            |v| Some(Value::real(*v as f32)),
        ),
        (ColumnType::Double, S::Double(stats)) => range_values(
            stats,
            |v| Some(Value::Double(*v)),
            |v| Some(Value::Double(*v)),
        ),
        (ColumnType::Decimal { scale, .. }, S::Decimal(stats)) => {
            let long = column_type.is_long_decimal();
            let bound = move |value: &DecimalValue, rounding| {
                let unscaled = value.rescale(scale, rounding)?;
                if long {
                    Some(Value::Int128(unscaled))
                } else {
                    i64::try_from(unscaled).ok().map(Value::Long)
                }
            };
            range_values(
                stats,
                |v| bound(v, Rounding::Floor),
                |v| bound(v, Rounding::Ceiling),
            )
        }
        (ColumnType::Char { length }, S::String(stats)) => range_values(
            stats,
            |v| Some(Value::Slice(truncate_to_length_and_trim_spaces(v, length))),
            |v| Some(Value::Slice(truncate_to_length_and_trim_spaces(v, length))),
        ),
        (ColumnType::Varchar { .. } | ColumnType::Varbinary, S::String(stats)) => range_values(
            stats,
            |v| Some(Value::Slice(v.clone())),
            |v| Some(Value::Slice(v.clone())),
        ),
        (ColumnType::Date, S::Date(stats)) => range_values(
            stats,
            |v| Some(Value::Long(i64::from(*v))),
            |v| Some(Value::Long(i64::from(*v))),
        ),
        (ColumnType::Time { .. }, S::Integer(stats)) => {
            let picos = |v: &i64| v.checked_mul(PICOSECONDS_PER_MICROSECOND).map(Value::Long);
            range_values(stats, picos, picos)
        }
        (ColumnType::Timestamp(Millis), S::Timestamp(stats)) => {
            range_values(stats, |v| Some(Value::Long(*v)), |v| Some(Value::Long(*v)))
        }
        (ColumnType::Timestamp(Micros), S::Timestamp(stats)) => range_values(
            stats,
            |v| epoch_micros(*v).map(Value::Long),
            |v| upper_epoch_micros(*v).map(Value::Long),
        ),
        (ColumnType::Timestamp(Nanos), S::Timestamp(stats)) => range_values(
            stats,
            |v| epoch_micros(*v).map(|micros| LongTimestamp::new(micros, 0).into()),
            |v| upper_epoch_micros(*v).map(|micros| LongTimestamp::new(micros, 0).into()),
        ),
        (ColumnType::TimestampWithTimeZone(Millis), S::Timestamp(stats)) => {
            let packed =
                |v: &i64| pack_date_time_with_zone(*v, TimeZoneKey::UTC).map(Value::Long);
            range_values(stats, packed, packed)
        }
        (ColumnType::TimestampWithTimeZone(Micros), S::Timestamp(stats)) => range_values(
            stats,
            |v| Some(timestamp_with_time_zone(*v, 0)),
            |v| Some(timestamp_with_time_zone(*v, MAX_PICOS_OF_MILLI_MICROS)),
        ),
        (ColumnType::TimestampWithTimeZone(Nanos), S::Timestamp(stats)) => range_values(
            stats,
            |v| Some(timestamp_with_time_zone(*v, 0)),
            |v| Some(timestamp_with_time_zone(*v, MAX_PICOS_OF_MILLI_NANOS)),
        ),
        _ => None,
    }
}

fn boolean_values(number_of_values: Option<u64>, stats: &BooleanStatistics) -> Option<ValueSet> {
    let has_true = stats.true_value_count() != 0;
    let has_false = number_of_values != Some(stats.true_value_count());
    match (has_true, has_false) {
        (true, true) => Some(ValueSet::all()),
        (true, false) => Some(ValueSet::of([Value::Boolean(true)])),
        (false, true) => Some(ValueSet::of([Value::Boolean(false)])),
        (false, false) => None,
    }
}

/// `[min, max]` from optional bounds; a bound whose conversion fails is
/// dropped. Returns `None` (no information) when neither bound survives or the
/// bounds are inverted.
fn range_values<T, L, H>(stats: &RangeStatistics<T>, low: L, high: H) -> Option<ValueSet>
where
    L: FnOnce(&T) -> Option<Value>,
    H: FnOnce(&T) -> Option<Value>,
{
    let min = stats.min().and_then(low);
    let max = stats.max().and_then(high);
    let range = match (min, max) {
        (Some(min), Some(max)) => {
            if min > max {
                return None;
            }
            Range::between(min, true, max, true)
        }
        (Some(min), None) => Range::greater_than_or_equal(min),
        (None, Some(max)) => Range::less_than_or_equal(max),
        (None, None) => return None,
    };
    Some(ValueSet::of_ranges([range]))
}

fn epoch_micros(epoch_millis: i64) -> Option<i64> {
    epoch_millis.checked_mul(MICROSECONDS_PER_MILLISECOND)
}

/// First microsecond past the millisecond holding `epoch_millis`.
fn upper_epoch_micros(epoch_millis: i64) -> Option<i64> {
    epoch_millis.checked_add(1).and_then(epoch_micros)
}

fn timestamp_with_time_zone(epoch_millis: i64, picos_of_milli: u32) -> Value {
    LongTimestampWithTimeZone::from_epoch_millis_and_fraction(
        epoch_millis,
        picos_of_milli,
        TimeZoneKey::UTC,
    )
    .into()
}

/// First `length` code points of `value` with trailing spaces removed.
fn truncate_to_length_and_trim_spaces(value: &Bytes, length: u32) -> Bytes {
    let mut end = value.len();
    let mut code_points = 0_u32;
    for (index, byte) in value.iter().enumerate() {
        // Continuation bytes do not start a code point.
        if byte & 0xC0 == 0x80 {
            continue;
        }
        if code_points == length {
            end = index;
            break;
        }
        code_points += 1;
    }
    let mut trimmed = &value[..end];
    while let [rest @ .., b' '] = trimmed {
        trimmed = rest;
    }
    value.slice(..trimmed.len())
}

#[cfg(test)]
mod tests {
    use section_domain::unpack_millis_utc;

    use super::*;

    fn with_stats(number_of_values: Option<u64>, typed: TypedStatistics) -> ColumnStatistics {
        ColumnStatistics::new(number_of_values).with_statistics(typed)
    }

    fn integer(min: Option<i64>, max: Option<i64>) -> TypedStatistics {
        TypedStatistics::Integer(RangeStatistics::new(min, max))
    }

    fn closed(column_type: ColumnType, low: Value, high: Value, null_allowed: bool) -> Domain {
        Domain::new(
            column_type,
            ValueSet::of_ranges([Range::between(low, true, high, true)]),
            null_allowed,
        )
    }

    #[test]
    fn zero_rows_is_none() {
        let stats = with_stats(Some(0), integer(Some(1), Some(2)));
        let domain = section_domain(ColumnType::BigInt, 0, Some(&stats));
        assert!(domain.is_none());
        assert!(!domain.is_null_allowed());
    }

    #[test]
    fn missing_statistics_is_all() {
        assert!(section_domain(ColumnType::BigInt, 10, None).is_all());
    }

    #[test]
    fn all_null_column_is_only_null() {
        let stats = ColumnStatistics::new(Some(0));
        let domain = section_domain(ColumnType::Date, 25, Some(&stats));
        assert!(domain.is_only_null());
    }

    #[test]
    fn unknown_value_count_allows_nulls() {
        let stats = with_stats(None, integer(Some(1), Some(2)));
        let domain = section_domain(ColumnType::Integer, 10, Some(&stats));
        assert!(domain.is_null_allowed());
    }

    #[test]
    fn integer_bounds() {
        let stats = with_stats(Some(10), integer(Some(10), Some(20)));
        assert_eq!(
            section_domain(ColumnType::BigInt, 10, Some(&stats)),
            closed(ColumnType::BigInt, Value::Long(10), Value::Long(20), false)
        );

        let with_nulls = with_stats(Some(8), integer(Some(10), Some(20)));
        assert!(section_domain(ColumnType::BigInt, 10, Some(&with_nulls)).is_null_allowed());
    }

    #[test]
    fn one_sided_bounds() {
        let min_only = with_stats(Some(5), integer(Some(3), None));
        let domain = section_domain(ColumnType::Integer, 5, Some(&min_only));
        assert!(domain.includes_null_or_value(Some(&Value::Long(i64::MAX))));
        assert!(!domain.includes_null_or_value(Some(&Value::Long(2))));

        let max_only = with_stats(Some(5), integer(None, Some(3)));
        let domain = section_domain(ColumnType::Integer, 5, Some(&max_only));
        assert!(domain.includes_null_or_value(Some(&Value::Long(i64::MIN))));
        assert!(!domain.includes_null_or_value(Some(&Value::Long(4))));

        let neither = with_stats(Some(5), integer(None, None));
        assert!(section_domain(ColumnType::Integer, 5, Some(&neither))
            .values()
            .is_all());
    }

    #[test]
    fn mismatched_statistics_are_ignored() {
        let stats = with_stats(
            Some(4),
            TypedStatistics::String(RangeStatistics::new(
                Some(Bytes::from_static(b"a")),
                Some(Bytes::from_static(b"b")),
            )),
        );
        let domain = section_domain(ColumnType::BigInt, 5, Some(&stats));
        assert_eq!(domain, Domain::all(ColumnType::BigInt));

        let date_as_integer = with_stats(Some(5), integer(Some(1), Some(2)));
        assert!(section_domain(ColumnType::Date, 5, Some(&date_as_integer))
            .values()
            .is_all());
    }

    #[test]
    fn inverted_bounds_are_ignored() {
        let stats = with_stats(Some(5), integer(Some(9), Some(1)));
        assert!(section_domain(ColumnType::BigInt, 5, Some(&stats))
            .values()
            .is_all());
    }

    #[test]
    fn boolean_presence() {
        let boolean = |count, trues| {
            with_stats(
                count,
                TypedStatistics::Boolean(BooleanStatistics::new(trues)),
            )
        };

        let mixed = section_domain(ColumnType::Boolean, 10, Some(&boolean(Some(8), 3)));
        assert!(mixed.values().is_all());
        assert!(mixed.is_null_allowed());

        let all_true = section_domain(ColumnType::Boolean, 10, Some(&boolean(Some(10), 10)));
        assert_eq!(
            all_true,
            Domain::single_value(ColumnType::Boolean, Value::Boolean(true))
        );

        let all_false = section_domain(ColumnType::Boolean, 10, Some(&boolean(Some(10), 0)));
        assert_eq!(
            all_false,
            Domain::single_value(ColumnType::Boolean, Value::Boolean(false))
        );

        let unknown_count = section_domain(ColumnType::Boolean, 10, Some(&boolean(None, 4)));
        assert!(unknown_count.values().is_all());
    }

    #[test]
    fn real_bounds_are_narrowed() {
        let stats = with_stats(
            Some(3),
            TypedStatistics::Double(RangeStatistics::new(Some(1.5), Some(2.5))),
        );
        assert_eq!(
            section_domain(ColumnType::Real, 3, Some(&stats)),
            closed(
                ColumnType::Real,
                Value::real(1.5),
                Value::real(2.5),
                false
            )
        );
    }

    #[test]
    fn decimal_rescale_rounds_outward() {
        let stats = with_stats(
            Some(3),
            TypedStatistics::Decimal(RangeStatistics::new(
                Some(DecimalValue::new(12_345, 3)),
                Some(DecimalValue::new(67_891, 3)),
            )),
        );
        assert_eq!(
            section_domain(ColumnType::decimal(10, 2), 3, Some(&stats)),
            closed(
                ColumnType::decimal(10, 2),
                Value::Long(1_234),
                Value::Long(6_790),
                false
            )
        );
        assert_eq!(
            section_domain(ColumnType::decimal(30, 4), 3, Some(&stats)),
            closed(
                ColumnType::decimal(30, 4),
                Value::Int128(123_450),
                Value::Int128(678_910),
                false
            )
        );
    }

    #[test]
    fn decimal_overflow_drops_bound() {
        let stats = with_stats(
            Some(3),
            TypedStatistics::Decimal(RangeStatistics::new(
                Some(DecimalValue::new(1, 0)),
                Some(DecimalValue::new(i128::from(i64::MAX), 0)),
            )),
        );
        let domain = section_domain(ColumnType::decimal(18, 2), 3, Some(&stats));
        assert_eq!(
            domain,
            Domain::new(
                ColumnType::decimal(18, 2),
                ValueSet::of_ranges([Range::greater_than_or_equal(Value::Long(100))]),
                false
            )
        );
    }

    #[test]
    fn char_bounds_are_truncated_and_trimmed() {
        let stats = with_stats(
            Some(2),
            TypedStatistics::String(RangeStatistics::new(
                Some(Bytes::from_static(b"ab  ")),
                Some(Bytes::from("h\u{e9}llo".as_bytes().to_vec())),
            )),
        );
        assert_eq!(
            section_domain(ColumnType::char(2), 2, Some(&stats)),
            closed(
                ColumnType::char(2),
                Value::slice("ab"),
                Value::slice("h\u{e9}"),
                false
            )
        );
    }

    #[test]
    fn char_truncation_trims_spaces_inside_cut() {
        let value = Bytes::from_static(b"a b  cd");
        assert_eq!(
            truncate_to_length_and_trim_spaces(&value, 4),
            Bytes::from_static(b"a b")
        );
        assert_eq!(
            truncate_to_length_and_trim_spaces(&Bytes::from_static(b"   "), 5),
            Bytes::new()
        );
    }

    #[test]
    fn time_scales_to_picoseconds() {
        let stats = with_stats(Some(1), integer(Some(1), Some(2)));
        assert_eq!(
            section_domain(ColumnType::Time { precision: 6 }, 1, Some(&stats)),
            closed(
                ColumnType::Time { precision: 6 },
                Value::Long(1_000_000),
                Value::Long(2_000_000),
                false
            )
        );
    }

    fn timestamp(min: i64, max: i64) -> ColumnStatistics {
        with_stats(
            Some(4),
            TypedStatistics::Timestamp(RangeStatistics::new(Some(min), Some(max))),
        )
    }

    #[test]
    fn timestamp_widening() {
        let stats = timestamp(1_000, 2_000);

        let millis = ColumnType::Timestamp(TimestampPrecision::Millis);
        assert_eq!(
            section_domain(millis, 4, Some(&stats)),
            closed(millis, Value::Long(1_000), Value::Long(2_000), false)
        );

        let micros = ColumnType::Timestamp(TimestampPrecision::Micros);
        assert_eq!(
            section_domain(micros, 4, Some(&stats)),
            closed(micros, Value::Long(1_000_000), Value::Long(2_001_000), false)
        );

        let nanos = ColumnType::Timestamp(TimestampPrecision::Nanos);
        assert_eq!(
            section_domain(nanos, 4, Some(&stats)),
            closed(
                nanos,
                LongTimestamp::new(1_000_000, 0).into(),
                LongTimestamp::new(2_001_000, 0).into(),
                false
            )
        );
    }

    #[test]
    fn timestamp_with_time_zone_bounds() {
        let stats = timestamp(1_000, 2_000);

        let millis = ColumnType::TimestampWithTimeZone(TimestampPrecision::Millis);
        let domain = section_domain(millis, 4, Some(&stats));
        let ValueSet::Ranges(ranges) = domain.values() else {
            panic!("expected ranges, got {domain:?}");
        };
        let span = ranges.span().expect("span");
        let std::ops::Bound::Included(Value::Long(low)) = span.low() else {
            panic!("expected inclusive low bound");
        };
        assert_eq!(unpack_millis_utc(*low), 1_000);

        let micros = ColumnType::TimestampWithTimeZone(TimestampPrecision::Micros);
        assert_eq!(
            section_domain(micros, 4, Some(&stats)),
            closed(
                micros,
                timestamp_with_time_zone(1_000, 0),
                timestamp_with_time_zone(2_000, 999_000_000),
                false
            )
        );

        let nanos = ColumnType::TimestampWithTimeZone(TimestampPrecision::Nanos);
        assert_eq!(
            section_domain(nanos, 4, Some(&stats)),
            closed(
                nanos,
                timestamp_with_time_zone(1_000, 0),
                timestamp_with_time_zone(2_000, 999_999_000),
                false
            )
        );
    }

    #[test]
    fn timestamp_overflow_drops_bound() {
        let stats = timestamp(0, i64::MAX);
        let micros = ColumnType::Timestamp(TimestampPrecision::Micros);
        assert_eq!(
            section_domain(micros, 4, Some(&stats)),
            Domain::new(
                micros,
                ValueSet::of_ranges([Range::greater_than_or_equal(Value::Long(0))]),
                false
            )
        );
    }
}
