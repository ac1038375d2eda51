//! Section-level pruning.
//!
//! Predicates live behind the [`SectionPredicate`] trait so readers can drive
//! any implementation with the same per-section statistics. The default
//! implementation is [`TupleDomainPredicate`]; [`PruningConfig`] picks between
//! it and [`NoopPredicate`].

mod config;
mod noop;
mod reconstruct;
mod row_groups;
mod tuple_domain;

use std::fmt;

use parquet::errors::ParquetError;
use thiserror::Error;

pub use self::{
    config::{PredicatePolicy, PruningConfig},
    noop::NoopPredicate,
    reconstruct::section_domain,
    row_groups::{prune_or_all, prune_row_groups, read_all, PruneOutput},
    tuple_domain::{
        check_in_bloom_filter, extract_discrete_values, TupleDomainPredicate,
        TupleDomainPredicateBuilder,
    },
};
use crate::statistics::{ColumnId, SectionStatistics};

/// Decides, from statistics alone, whether a section may hold matching rows.
pub trait SectionPredicate: fmt::Debug + Send + Sync {
    /// Returns `false` only when no row of the section can satisfy the
    /// predicate.
    fn matches(&self, number_of_rows: u64, statistics: &SectionStatistics) -> bool;

    /// Columns whose membership filters [`matches`](Self::matches) would
    /// consult. Readers may skip loading filters for every other column.
    fn bloom_filter_columns(&self) -> Vec<ColumnId> {
        Vec::new()
    }
}

/// Errors raised while gathering section statistics.
#[derive(Debug, Error)]
pub enum PruneError {
    /// The footer could not be read.
    #[error("parquet metadata error: {0}")]
    Parquet(#[from] ParquetError),
    /// A column's storage type has no logical counterpart.
    #[error("unsupported column type: {0}")]
    UnsupportedType(String),
    /// Generic pruning failure.
    #[error("pruning failed: {0}")]
    Message(String),
}

impl PruneError {
    /// Construct a pruning error from a message.
    pub(crate) fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}
