#![deny(missing_docs)]
//! Value domains for statistics-driven section pruning.
//!
//! A [`Domain`] describes the values a single column may take, either because a
//! query predicate permits them or because a storage section's statistics say
//! they can be present. Domains are typed by a closed [`ColumnType`] and hold
//! values in each type's native comparison representation, so overlap tests are
//! plain ordered comparisons. [`TupleDomain`] combines per-column domains into a
//! conjunction.

mod core;

pub use core::{
    float_compare, pack_date_time_with_zone, unpack_millis_utc, unpack_zone_key, ColumnType,
    Domain, LongTimestamp, LongTimestampWithTimeZone, Range, SortedRangeSet, TimeZoneKey,
    TimestampPrecision, TupleDomain, Value, ValueKind, ValueSet, MICROSECONDS_PER_MILLISECOND,
    PICOSECONDS_PER_MICROSECOND, PICOSECONDS_PER_MILLISECOND,
};
