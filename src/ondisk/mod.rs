//! Parquet integration for section pruning.
//!
//! Row groups are the sections. Their footer statistics and split-block bloom
//! filters are translated into [`SectionStatistics`](crate::statistics::SectionStatistics)
//! so any [`SectionPredicate`](crate::pruning::SectionPredicate) can evaluate
//! them.

mod bloom;
mod footer;
mod schema;

pub(crate) use self::footer::row_count;
pub use self::{
    bloom::{CachingBloomProvider, ParquetBloomFilter, RowGroupBloomProvider},
    footer::{FooterColumn, FooterColumns},
    schema::column_type_from_arrow,
};
