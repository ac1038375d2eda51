//! Column statistics as reported by a storage section.
//!
//! Readers translate whatever their footer format carries into these types;
//! the pruning engine never looks at format-specific metadata directly.

mod filter;

use std::{collections::HashMap, fmt, sync::Arc};

use bytes::Bytes;

pub use self::filter::MembershipFilter;

/// Identifies a column within a scan.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ColumnId(u32);

impl ColumnId {
    /// Wraps a column ordinal.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The column ordinal.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Optional lower and upper bound observed over a section's non-null values.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeStatistics<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<T> RangeStatistics<T> {
    /// Creates range statistics; either bound may be unknown.
    #[must_use]
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    /// Smallest non-null value, if recorded.
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        self.min.as_ref()
    }

    /// Largest non-null value, if recorded.
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        self.max.as_ref()
    }
}

/// Rounding direction used when a decimal bound loses digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    /// Towards negative infinity.
    Floor,
    /// Towards positive infinity.
    Ceiling,
}

/// A decimal number stored as an unscaled integer and a scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecimalValue {
    unscaled: i128,
    scale: u8,
}

impl DecimalValue {
    /// `unscaled * 10^-scale`.
    #[must_use]
    pub const fn new(unscaled: i128, scale: u8) -> Self {
        Self { unscaled, scale }
    }

    /// Unscaled integer.
    #[must_use]
    pub const fn unscaled(&self) -> i128 {
        self.unscaled
    }

    /// Digits after the decimal point.
    #[must_use]
    pub const fn scale(&self) -> u8 {
        self.scale
    }

    /// Unscaled value at `scale`, rounding in `rounding` direction when digits
    /// are dropped. Returns `None` when the result does not fit in `i128`.
    #[must_use]
    pub fn rescale(&self, scale: u8, rounding: Rounding) -> Option<i128> {
        if scale >= self.scale {
            let factor = 10_i128.checked_pow(u32::from(scale - self.scale))?;
            return self.unscaled.checked_mul(factor);
        }
        let Some(factor) = 10_i128.checked_pow(u32::from(self.scale - scale)) else {
            // Dividing by more than i128::MAX leaves only the sign.
            return Some(match (rounding, self.unscaled.signum()) {
                (Rounding::Floor, -1) => -1,
                (Rounding::Ceiling, 1) => 1,
                _ => 0,
            });
        };
        let quotient = self.unscaled.div_euclid(factor);
        match rounding {
            Rounding::Floor => Some(quotient),
            Rounding::Ceiling if self.unscaled.rem_euclid(factor) != 0 => quotient.checked_add(1),
            Rounding::Ceiling => Some(quotient),
        }
    }
}

/// Counts kept for boolean columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BooleanStatistics {
    true_value_count: u64,
}

impl BooleanStatistics {
    /// Creates boolean statistics.
    #[must_use]
    pub const fn new(true_value_count: u64) -> Self {
        Self { true_value_count }
    }

    /// Number of `true` values in the section.
    #[must_use]
    pub const fn true_value_count(&self) -> u64 {
        self.true_value_count
    }
}

/// Type-specific part of a column's statistics.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedStatistics {
    /// Boolean counts.
    Boolean(BooleanStatistics),
    /// Bounds of integer-valued columns, times in microseconds of the day.
    Integer(RangeStatistics<i64>),
    /// Bounds of floating point columns.
    Double(RangeStatistics<f64>),
    /// Bounds of decimal columns, each at its own scale.
    Decimal(RangeStatistics<DecimalValue>),
    /// Bounds of character and binary columns, as raw bytes.
    String(RangeStatistics<Bytes>),
    /// Bounds of date columns in days since the epoch.
    Date(RangeStatistics<i32>),
    /// Bounds of timestamp columns in milliseconds since the epoch.
    Timestamp(RangeStatistics<i64>),
}

/// Statistics for one column in one section.
#[derive(Clone, Debug, Default)]
pub struct ColumnStatistics {
    number_of_values: Option<u64>,
    statistics: Option<TypedStatistics>,
    bloom_filter: Option<Arc<dyn MembershipFilter>>,
}

impl ColumnStatistics {
    /// Creates statistics carrying only the non-null value count.
    #[must_use]
    pub fn new(number_of_values: Option<u64>) -> Self {
        Self {
            number_of_values,
            statistics: None,
            bloom_filter: None,
        }
    }

    /// Attaches type-specific statistics.
    #[must_use]
    pub fn with_statistics(mut self, statistics: TypedStatistics) -> Self {
        self.statistics = Some(statistics);
        self
    }

    /// Attaches a membership filter over the section's values.
    #[must_use]
    pub fn with_bloom_filter(mut self, filter: Arc<dyn MembershipFilter>) -> Self {
        self.bloom_filter = Some(filter);
        self
    }

    /// Replaces the membership filter in place.
    pub fn set_bloom_filter(&mut self, filter: Arc<dyn MembershipFilter>) {
        self.bloom_filter = Some(filter);
    }

    /// Whether the non-null value count is known.
    #[must_use]
    pub fn has_number_of_values(&self) -> bool {
        self.number_of_values.is_some()
    }

    /// Number of non-null values, if known.
    #[must_use]
    pub fn number_of_values(&self) -> Option<u64> {
        self.number_of_values
    }

    /// Type-specific statistics, if present.
    #[must_use]
    pub fn typed_statistics(&self) -> Option<&TypedStatistics> {
        self.statistics.as_ref()
    }

    /// Membership filter, if present.
    #[must_use]
    pub fn bloom_filter(&self) -> Option<&dyn MembershipFilter> {
        self.bloom_filter.as_deref()
    }
}

/// Statistics for the columns of one section.
///
/// Columns without an entry have no statistics and never cause a skip.
#[derive(Clone, Debug, Default)]
pub struct SectionStatistics {
    columns: HashMap<ColumnId, ColumnStatistics>,
}

impl SectionStatistics {
    /// Empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the statistics of `column`, returning the previous entry.
    pub fn insert(
        &mut self,
        column: ColumnId,
        statistics: ColumnStatistics,
    ) -> Option<ColumnStatistics> {
        self.columns.insert(column, statistics)
    }

    /// Statistics of `column`.
    #[must_use]
    pub fn get(&self, column: ColumnId) -> Option<&ColumnStatistics> {
        self.columns.get(&column)
    }

    /// Mutable statistics of `column`.
    pub fn get_mut(&mut self, column: ColumnId) -> Option<&mut ColumnStatistics> {
        self.columns.get_mut(&column)
    }

    /// Number of columns with statistics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no column has statistics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns and their statistics, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (ColumnId, &ColumnStatistics)> {
        self.columns.iter().map(|(column, stats)| (*column, stats))
    }
}

impl FromIterator<(ColumnId, ColumnStatistics)> for SectionStatistics {
    fn from_iter<I: IntoIterator<Item = (ColumnId, ColumnStatistics)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescale_up_multiplies() {
        let value = DecimalValue::new(1234, 2);
        assert_eq!(value.rescale(4, Rounding::Floor), Some(123_400));
        assert_eq!(value.rescale(2, Rounding::Ceiling), Some(1234));
    }

    #[test]
    fn rescale_down_rounds_outward() {
        let positive = DecimalValue::new(1234, 3);
        assert_eq!(positive.rescale(1, Rounding::Floor), Some(12));
        assert_eq!(positive.rescale(1, Rounding::Ceiling), Some(13));

        let negative = DecimalValue::new(-1234, 3);
        assert_eq!(negative.rescale(1, Rounding::Floor), Some(-13));
        assert_eq!(negative.rescale(1, Rounding::Ceiling), Some(-12));

        let exact = DecimalValue::new(1200, 3);
        assert_eq!(exact.rescale(1, Rounding::Ceiling), Some(12));
    }

    #[test]
    fn rescale_overflow_is_none() {
        let value = DecimalValue::new(i128::MAX / 10, 0);
        assert_eq!(value.rescale(2, Rounding::Floor), None);
        assert_eq!(DecimalValue::new(1, 0).rescale(60, Rounding::Floor), None);
    }

    #[test]
    fn rescale_far_down_keeps_sign() {
        let value = DecimalValue::new(-5, 60);
        assert_eq!(value.rescale(0, Rounding::Floor), Some(-1));
        assert_eq!(value.rescale(0, Rounding::Ceiling), Some(0));
    }

    #[test]
    fn section_statistics_lookup() {
        let statistics: SectionStatistics = [(
            ColumnId::new(3),
            ColumnStatistics::new(Some(7)).with_statistics(TypedStatistics::Integer(
                RangeStatistics::new(Some(1), None),
            )),
        )]
        .into_iter()
        .collect();

        let column = statistics.get(ColumnId::new(3)).expect("column stats");
        assert_eq!(column.number_of_values(), Some(7));
        assert!(column.bloom_filter().is_none());
        assert!(statistics.get(ColumnId::new(4)).is_none());
        assert_eq!(statistics.len(), 1);
    }
}
