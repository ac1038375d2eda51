#![deny(missing_docs)]
//! Core domain structures shared by the pruning engine.

mod domain;
mod range;
mod tuple_domain;
mod types;
mod value;
mod value_set;

pub use domain::Domain;
pub use range::{Range, SortedRangeSet};
pub use tuple_domain::TupleDomain;
pub use types::{ColumnType, TimestampPrecision, ValueKind};
pub use value::{
    float_compare, pack_date_time_with_zone, unpack_millis_utc, unpack_zone_key, LongTimestamp,
    LongTimestampWithTimeZone, TimeZoneKey, Value, MICROSECONDS_PER_MILLISECOND,
    PICOSECONDS_PER_MICROSECOND, PICOSECONDS_PER_MILLISECOND,
};
pub use value_set::ValueSet;
