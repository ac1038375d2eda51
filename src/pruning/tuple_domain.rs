//! Tuple-domain section predicate.

use section_domain::{
    unpack_millis_utc, ColumnType, Domain, TimestampPrecision, TupleDomain, Value, ValueSet,
    MICROSECONDS_PER_MILLISECOND,
};

use crate::{
    observability::{log_debug, log_trace},
    pruning::{section_domain, SectionPredicate},
    statistics::{ColumnId, ColumnStatistics, MembershipFilter, SectionStatistics},
};

/// Why a section was skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Exclusion {
    /// The predicate is unsatisfiable.
    Unsatisfiable,
    /// Section values and predicate values are disjoint.
    NoOverlap,
    /// The membership filter rejected every wanted value.
    BloomFilter,
}

impl Exclusion {
    fn as_str(self) -> &'static str {
        match self {
            Exclusion::Unsatisfiable => "unsatisfiable",
            Exclusion::NoOverlap => "no_overlap",
            Exclusion::BloomFilter => "bloom_filter",
        }
    }
}

#[derive(Clone, Debug)]
struct ColumnDomain {
    column: ColumnId,
    domain: Domain,
    discrete_values: Option<Vec<Value>>,
}

/// Skips sections whose statistics prove that no row satisfies a conjunction
/// of column domains.
///
/// Built once per scan via [`TupleDomainPredicate::builder`] and immutable
/// afterwards, so a single instance can be shared across threads evaluating
/// sections concurrently.
#[derive(Clone, Debug)]
pub struct TupleDomainPredicate {
    columns: Vec<ColumnDomain>,
    bloom_filters_enabled: bool,
    unsatisfiable: bool,
}

impl TupleDomainPredicate {
    /// Start building a predicate. Membership filters are off by default.
    #[must_use]
    pub fn builder() -> TupleDomainPredicateBuilder {
        TupleDomainPredicateBuilder::default()
    }

    /// Whether membership filters are consulted.
    #[must_use]
    pub fn bloom_filters_enabled(&self) -> bool {
        self.bloom_filters_enabled
    }

    /// Whether the predicate rejects every section.
    #[must_use]
    pub fn is_unsatisfiable(&self) -> bool {
        self.unsatisfiable
    }

    /// Constrained columns in insertion order.
    pub fn column_domains(&self) -> impl Iterator<Item = (ColumnId, &Domain)> {
        self.columns
            .iter()
            .map(|column| (column.column, &column.domain))
    }

    fn column_exclusion(
        &self,
        column: &ColumnDomain,
        number_of_rows: u64,
        statistics: &ColumnStatistics,
    ) -> Option<Exclusion> {
        let wanted = &column.domain;
        let present = section_domain(wanted.column_type(), number_of_rows, Some(statistics));
        if !wanted.overlaps(&present) {
            return Some(Exclusion::NoOverlap);
        }

        if !self.bloom_filters_enabled {
            return None;
        }
        // A null match needs no value to be present.
        if wanted.is_null_allowed() && present.is_null_allowed() {
            return None;
        }
        let values = column.discrete_values.as_ref()?;
        let filter = statistics.bloom_filter()?;
        let maybe_present = values
            .iter()
            .any(|value| check_in_bloom_filter(filter, value, wanted.column_type()));
        (!maybe_present).then_some(Exclusion::BloomFilter)
    }
}

impl SectionPredicate for TupleDomainPredicate {
    fn matches(&self, number_of_rows: u64, statistics: &SectionStatistics) -> bool {
        if self.unsatisfiable {
            log_trace!(
                component = "predicate",
                event = "section_skipped",
                reason = Exclusion::Unsatisfiable.as_str(),
                number_of_rows,
            );
            return false;
        }
        for column in &self.columns {
            let Some(column_statistics) = statistics.get(column.column) else {
                continue;
            };
            if let Some(reason) = self.column_exclusion(column, number_of_rows, column_statistics)
            {
                log_trace!(
                    component = "predicate",
                    event = "section_skipped",
                    column = %column.column,
                    reason = reason.as_str(),
                    number_of_rows,
                );
                return false;
            }
        }
        true
    }

    fn bloom_filter_columns(&self) -> Vec<ColumnId> {
        if !self.bloom_filters_enabled {
            return Vec::new();
        }
        self.columns
            .iter()
            .filter(|column| {
                column
                    .discrete_values
                    .as_ref()
                    .is_some_and(|values| !values.is_empty())
            })
            .map(|column| column.column)
            .collect()
    }
}

/// Accumulates column domains for a [`TupleDomainPredicate`].
#[derive(Debug, Default)]
pub struct TupleDomainPredicateBuilder {
    columns: Vec<ColumnDomain>,
    bloom_filters_enabled: bool,
    unsatisfiable: bool,
}

impl TupleDomainPredicateBuilder {
    /// Constrain `column` to `domain`.
    #[must_use]
    pub fn add_column(mut self, column: ColumnId, domain: Domain) -> Self {
        let discrete_values = extract_discrete_values(domain.values());
        self.columns.push(ColumnDomain {
            column,
            domain,
            discrete_values,
        });
        self
    }

    /// Constrain every column of `tuple_domain`. An unsatisfiable tuple domain
    /// makes the predicate skip every section.
    #[must_use]
    pub fn add_tuple_domain(mut self, tuple_domain: &TupleDomain<ColumnId>) -> Self {
        match tuple_domain.domains() {
            None => self.unsatisfiable = true,
            Some(domains) => {
                for (column, domain) in domains {
                    self = self.add_column(*column, domain.clone());
                }
            }
        }
        self
    }

    /// Toggle membership filter checks.
    #[must_use]
    pub fn set_bloom_filters_enabled(mut self, enabled: bool) -> Self {
        self.bloom_filters_enabled = enabled;
        self
    }

    /// Finish the predicate.
    #[must_use]
    pub fn build(self) -> TupleDomainPredicate {
        log_debug!(
            component = "predicate",
            event = "predicate_built",
            columns = self.columns.len(),
            bloom_filters_enabled = self.bloom_filters_enabled,
            unsatisfiable = self.unsatisfiable,
        );
        TupleDomainPredicate {
            columns: self.columns,
            bloom_filters_enabled: self.bloom_filters_enabled,
            unsatisfiable: self.unsatisfiable,
        }
    }
}

/// Explicit values of `values`, if it is made only of single values.
///
/// `None` means "not discrete" (every value, or some range wider than a
/// point); an empty list means no value at all.
#[must_use]
pub fn extract_discrete_values(values: &ValueSet) -> Option<Vec<Value>> {
    match values {
        ValueSet::All => None,
        ValueSet::None => Some(Vec::new()),
        ValueSet::Discrete(values) => Some(values.clone()),
        ValueSet::Ranges(ranges) => ranges
            .iter()
            .map(|range| range.single_value().cloned())
            .collect(),
    }
}

/// Whether `filter` may contain `value` of a `column_type` column.
///
/// Types without a filter encoding always answer `true`.
///
/// # Panics
///
/// Panics if `value` does not use the representation of `column_type`.
#[must_use]
pub fn check_in_bloom_filter(
    filter: &dyn MembershipFilter,
    value: &Value,
    column_type: ColumnType,
) -> bool {
    use TimestampPrecision::{Micros, Millis, Nanos};

    match (column_type, value) {
        (
            ColumnType::TinyInt
            | ColumnType::SmallInt
            | ColumnType::Integer
            | ColumnType::BigInt
            | ColumnType::Date
            | ColumnType::Timestamp(Millis),
            Value::Long(value),
        ) => filter.test_long(*value),
        (ColumnType::Double, Value::Double(value)) => filter.test_double(*value),
        (ColumnType::Real, Value::Real(bits)) => filter.test_float(f32::from_bits(*bits as u32)),
        (ColumnType::Varchar { .. } | ColumnType::Varbinary, Value::Slice(bytes)) => {
            filter.test_bytes(bytes)
        }
        (ColumnType::Timestamp(Micros), Value::Long(epoch_micros)) => {
            filter.test_long(epoch_micros.div_euclid(MICROSECONDS_PER_MILLISECOND))
        }
        (ColumnType::Timestamp(Nanos), Value::LongTimestamp(timestamp)) => filter.test_long(
            timestamp
                .epoch_micros()
                .div_euclid(MICROSECONDS_PER_MILLISECOND),
        ),
        (ColumnType::TimestampWithTimeZone(Millis), Value::Long(packed)) => {
            filter.test_long(unpack_millis_utc(*packed))
        }
        (
            ColumnType::TimestampWithTimeZone(Micros | Nanos),
            Value::LongTimestampWithTimeZone(timestamp),
        ) => filter.test_long(timestamp.epoch_millis()),
        (
            ColumnType::Boolean
            | ColumnType::Decimal { .. }
            | ColumnType::Char { .. }
            | ColumnType::Time { .. },
            value,
        ) if column_type.accepts(value) => true,
        (column_type, value) => {
            panic!("value {value:?} does not match column type {column_type} in filter check")
        }
    }
}
