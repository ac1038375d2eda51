//! Common test utilities for integration tests.
#![allow(dead_code)]

use std::{collections::HashSet, sync::Arc};

use section_pruner::statistics::{
    ColumnId, ColumnStatistics, MembershipFilter, RangeStatistics, SectionStatistics,
    TypedStatistics,
};

/// Seed for randomized tests; override with `SECTION_PRUNER_SEED`.
pub fn make_rng() -> fastrand::Rng {
    let seed = std::env::var("SECTION_PRUNER_SEED")
        .ok()
        .and_then(|seed| seed.parse().ok())
        .unwrap_or(0x5EC7_10A5);
    fastrand::Rng::with_seed(seed)
}

/// Membership filter with no false positives.
#[derive(Debug, Default)]
pub struct ExactFilter {
    longs: HashSet<i64>,
    doubles: HashSet<u64>,
    bytes: HashSet<Vec<u8>>,
}

impl ExactFilter {
    pub fn longs(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            longs: values.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn doubles(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            doubles: values.into_iter().map(f64::to_bits).collect(),
            ..Self::default()
        }
    }

    pub fn bytes<'a>(values: impl IntoIterator<Item = &'a [u8]>) -> Self {
        Self {
            bytes: values.into_iter().map(<[u8]>::to_vec).collect(),
            ..Self::default()
        }
    }
}

impl MembershipFilter for ExactFilter {
    fn test_long(&self, value: i64) -> bool {
        self.longs.contains(&value)
    }

    fn test_double(&self, value: f64) -> bool {
        self.doubles.contains(&value.to_bits())
    }

    fn test_float(&self, value: f32) -> bool {
        self.doubles.contains(&f64::from(value).to_bits())
    }

    fn test_bytes(&self, value: &[u8]) -> bool {
        self.bytes.contains(value)
    }
}

/// Exact statistics for an integer column holding `values` (`None` is null).
pub fn integer_statistics(values: &[Option<i64>], with_filter: bool) -> ColumnStatistics {
    let present: Vec<i64> = values.iter().flatten().copied().collect();
    let mut statistics = ColumnStatistics::new(Some(present.len() as u64));
    if let (Some(min), Some(max)) = (present.iter().min(), present.iter().max()) {
        statistics = statistics.with_statistics(TypedStatistics::Integer(RangeStatistics::new(
            Some(*min),
            Some(*max),
        )));
    }
    if with_filter {
        statistics = statistics.with_bloom_filter(Arc::new(ExactFilter::longs(present)));
    }
    statistics
}

/// Section statistics for one column.
pub fn single_column(column: ColumnId, statistics: ColumnStatistics) -> SectionStatistics {
    [(column, statistics)].into_iter().collect()
}
