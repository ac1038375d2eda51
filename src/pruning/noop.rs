//! No-op pruning implementation.

use crate::{pruning::SectionPredicate, statistics::SectionStatistics};

/// Predicate that keeps every section.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPredicate;

impl SectionPredicate for NoopPredicate {
    fn matches(&self, _number_of_rows: u64, _statistics: &SectionStatistics) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::{ColumnId, ColumnStatistics, RangeStatistics, TypedStatistics};

    #[test]
    fn keeps_empty_sections() {
        assert!(NoopPredicate.matches(0, &SectionStatistics::new()));
    }

    #[test]
    fn keeps_sections_regardless_of_statistics() {
        let statistics: SectionStatistics = [(
            ColumnId::new(0),
            ColumnStatistics::new(Some(0))
                .with_statistics(TypedStatistics::Integer(RangeStatistics::new(None, None))),
        )]
        .into_iter()
        .collect();
        assert!(NoopPredicate.matches(10, &statistics));
        assert!(NoopPredicate.bloom_filter_columns().is_empty());
    }
}
