use std::{iter::repeat_with, sync::Arc};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use section_pruner::{
    domain::{ColumnType, Domain, Range, Value, ValueSet},
    statistics::{
        ColumnId, ColumnStatistics, MembershipFilter, RangeStatistics, SectionStatistics,
        TypedStatistics,
    },
    SectionPredicate, TupleDomainPredicate,
};

/// Filter that keeps every key; forces the full discrete-value walk.
#[derive(Debug)]
struct MaybeFilter;

impl MembershipFilter for MaybeFilter {
    fn test_long(&self, _value: i64) -> bool {
        true
    }

    fn test_double(&self, _value: f64) -> bool {
        true
    }

    fn test_float(&self, _value: f32) -> bool {
        true
    }

    fn test_bytes(&self, _value: &[u8]) -> bool {
        true
    }
}

fn sections(columns: u32, count: usize) -> Vec<SectionStatistics> {
    let filter: Arc<dyn MembershipFilter> = Arc::new(MaybeFilter);
    repeat_with(|| {
        (0..columns)
            .map(|column| {
                let min = fastrand::i64(0..1_000_000);
                let max = min + fastrand::i64(0..10_000);
                let statistics = ColumnStatistics::new(Some(1_024))
                    .with_statistics(TypedStatistics::Integer(RangeStatistics::new(
                        Some(min),
                        Some(max),
                    )))
                    .with_bloom_filter(Arc::clone(&filter));
                (ColumnId::new(column), statistics)
            })
            .collect()
    })
    .take(count)
    .collect()
}

fn range_predicate(columns: u32) -> TupleDomainPredicate {
    (0..columns)
        .fold(TupleDomainPredicate::builder(), |builder, column| {
            let low = fastrand::i64(0..1_000_000);
            builder.add_column(
                ColumnId::new(column),
                Domain::new(
                    ColumnType::BigInt,
                    ValueSet::of_ranges([Range::between(
                        Value::Long(low),
                        true,
                        Value::Long(low + 50_000),
                        true,
                    )]),
                    false,
                ),
            )
        })
        .build()
}

fn point_predicate(values: usize) -> TupleDomainPredicate {
    TupleDomainPredicate::builder()
        .add_column(
            ColumnId::new(0),
            Domain::multiple_values(
                ColumnType::BigInt,
                repeat_with(|| Value::Long(fastrand::i64(0..1_000_000))).take(values),
            ),
        )
        .set_bloom_filters_enabled(true)
        .build()
}

#[inline(never)]
fn count_matches(predicate: &dyn SectionPredicate, sections: &[SectionStatistics]) -> usize {
    sections
        .iter()
        .filter(|statistics| predicate.matches(1_024, statistics))
        .count()
}

fn range_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_columns");

    for columns in [1, 4, 16] {
        let sections = sections(columns, 1_000);
        let predicate = range_predicate(columns);
        group.bench_with_input(
            BenchmarkId::new("TupleDomain", columns),
            &sections,
            |b, sections| b.iter(|| count_matches(&predicate, sections)),
        );
    }
    group.finish();
}

fn point_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_lookups");

    let sections = sections(1, 1_000);
    for values in [1, 32, 512] {
        let predicate = point_predicate(values);
        group.bench_with_input(
            BenchmarkId::new("BloomFilter", values),
            &sections,
            |b, sections| b.iter(|| count_matches(&predicate, sections)),
        );
    }
    group.finish();
}

criterion_group!(benches, range_columns, point_lookups);
criterion_main!(benches);
