#![deny(missing_docs)]
//! Statistics-driven section pruning for columnar storage.
//!
//! A scan builds one [`TupleDomainPredicate`] from the per-column domains its
//! planner pushed down, then asks it about every candidate section (stripe,
//! row group, ...) before decoding anything. The predicate rebuilds a
//! [`Domain`] from each column's section statistics and skips the section when
//! that domain cannot overlap the query's, optionally consulting the section's
//! membership filters for point lookups.
//!
//! ```
//! use section_pruner::{
//!     domain::{ColumnType, Domain, Range, Value, ValueSet},
//!     statistics::{
//!         ColumnId, ColumnStatistics, RangeStatistics, SectionStatistics, TypedStatistics,
//!     },
//!     SectionPredicate, TupleDomainPredicate,
//! };
//!
//! let wanted = Domain::new(
//!     ColumnType::BigInt,
//!     ValueSet::of_ranges([Range::between(Value::Long(25), true, Value::Long(30), true)]),
//!     false,
//! );
//! let predicate = TupleDomainPredicate::builder()
//!     .add_column(ColumnId::new(1), wanted)
//!     .build();
//!
//! let statistics: SectionStatistics = [(
//!     ColumnId::new(1),
//!     ColumnStatistics::new(Some(100))
//!         .with_statistics(TypedStatistics::Integer(RangeStatistics::new(Some(10), Some(20)))),
//! )]
//! .into_iter()
//! .collect();
//!
//! assert!(!predicate.matches(100, &statistics));
//! ```

mod observability;

/// Parquet footer integration: schema mapping, statistics, bloom filters.
pub mod ondisk;

/// Section predicates, domain reconstruction and pruning configuration.
pub mod pruning;

/// Per-section column statistics and membership filters.
pub mod statistics;

pub use section_domain as domain;
pub use section_domain::Domain;

pub use crate::pruning::{
    check_in_bloom_filter, extract_discrete_values, section_domain, NoopPredicate, PruneError,
    PruningConfig, SectionPredicate, TupleDomainPredicate, TupleDomainPredicateBuilder,
};
