//! Bloom filter loading utilities for Parquet row groups.

use std::collections::{hash_map::Entry, HashMap, VecDeque};

use parquet::{
    basic::Type as PhysicalType,
    bloom_filter::Sbbf,
    data_type::ByteArray,
    file::{
        reader::{ChunkReader, FileReader},
        serialized_reader::SerializedFileReader,
    },
};
use section_domain::{ColumnType, TimestampPrecision};

use crate::{pruning::PruneError, statistics::MembershipFilter};

const DEFAULT_BLOOM_CACHE_ENTRIES: usize = 256;

/// Whether values of `column_type` are tested with the same encoding Parquet
/// writers hash into the filter.
pub(crate) fn supports_bloom_filter(column_type: ColumnType) -> bool {
    match column_type {
        ColumnType::TinyInt
        | ColumnType::SmallInt
        | ColumnType::Integer
        | ColumnType::BigInt
        | ColumnType::Date
        | ColumnType::Real
        | ColumnType::Double
        | ColumnType::Varchar { .. }
        | ColumnType::Varbinary
        | ColumnType::Timestamp(TimestampPrecision::Millis)
        | ColumnType::TimestampWithTimeZone(TimestampPrecision::Millis) => true,
        // Micro and nano timestamps are tested on milliseconds; decimals,
        // chars, booleans and times have no filter encoding.
        ColumnType::Boolean
        | ColumnType::Decimal { .. }
        | ColumnType::Char { .. }
        | ColumnType::Time { .. }
        | ColumnType::Timestamp(_)
        | ColumnType::TimestampWithTimeZone(_) => false,
    }
}

/// A Parquet split-block bloom filter over one column chunk.
///
/// Keys are hashed in the chunk's physical encoding; a test whose key cannot
/// be expressed in that encoding answers "maybe present".
#[derive(Clone, Debug)]
pub struct ParquetBloomFilter {
    filter: Sbbf,
    physical_type: PhysicalType,
}

impl ParquetBloomFilter {
    /// Wraps `filter` read from a column chunk of `physical_type`.
    #[must_use]
    pub fn new(filter: Sbbf, physical_type: PhysicalType) -> Self {
        Self {
            filter,
            physical_type,
        }
    }

    /// Physical type the filter's keys were hashed in.
    #[must_use]
    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }
}

impl MembershipFilter for ParquetBloomFilter {
    fn test_long(&self, value: i64) -> bool {
        match self.physical_type {
            // A key outside the i32 range cannot have been written.
            PhysicalType::INT32 => {
                i32::try_from(value).is_ok_and(|value| self.filter.check(&value))
            }
            PhysicalType::INT64 => self.filter.check(&value),
            _ => true,
        }
    }

    fn test_double(&self, value: f64) -> bool {
        match self.physical_type {
            PhysicalType::DOUBLE => self.filter.check(&value),
            _ => true,
        }
    }

    fn test_float(&self, value: f32) -> bool {
        match self.physical_type {
            PhysicalType::FLOAT => self.filter.check(&value),
            _ => true,
        }
    }

    fn test_bytes(&self, value: &[u8]) -> bool {
        match self.physical_type {
            PhysicalType::BYTE_ARRAY | PhysicalType::FIXED_LEN_BYTE_ARRAY => {
                self.filter.check(&ByteArray::from(value.to_vec()))
            }
            _ => true,
        }
    }
}

/// Loads the bloom filter of a `(row group, column)` pair.
pub trait RowGroupBloomProvider {
    /// Filter of leaf column `column_idx` in row group `row_group_idx`, if the
    /// file has one.
    fn bloom_filter(
        &mut self,
        row_group_idx: usize,
        column_idx: usize,
    ) -> Result<Option<Sbbf>, PruneError>;
}

/// Reads filters through the file reader. They are only present when the
/// reader was opened with bloom filter reading enabled.
impl<R> RowGroupBloomProvider for SerializedFileReader<R>
where
    R: ChunkReader + 'static,
{
    fn bloom_filter(
        &mut self,
        row_group_idx: usize,
        column_idx: usize,
    ) -> Result<Option<Sbbf>, PruneError> {
        let row_group = self.get_row_group(row_group_idx)?;
        Ok(row_group.get_column_bloom_filter(column_idx).cloned())
    }
}

/// Provider that remembers filters already loaded, evicting the oldest entry
/// once full.
#[derive(Debug)]
pub struct CachingBloomProvider<P> {
    inner: P,
    max_entries: usize,
    order: VecDeque<(usize, usize)>,
    entries: HashMap<(usize, usize), Option<Sbbf>>,
}

impl<P> CachingBloomProvider<P> {
    /// Cache up to `max_entries` lookups of `inner`.
    #[must_use]
    pub fn new(inner: P, max_entries: usize) -> Self {
        Self {
            inner,
            max_entries: max_entries.max(1),
            order: VecDeque::new(),
            entries: HashMap::new(),
        }
    }

    /// Cache with the default capacity.
    #[must_use]
    pub fn with_default_capacity(inner: P) -> Self {
        Self::new(inner, DEFAULT_BLOOM_CACHE_ENTRIES)
    }

    /// Number of cached lookups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The wrapped provider.
    pub fn into_inner(self) -> P {
        self.inner
    }

    fn insert(&mut self, key: (usize, usize), value: Option<Sbbf>) {
        if let Entry::Occupied(mut entry) = self.entries.entry(key) {
            entry.insert(value);
            return;
        }
        self.order.push_back(key);
        self.entries.insert(key, value);
        while self.entries.len() > self.max_entries {
            if let Some(evicted) = self.order.pop_front() {
                self.entries.remove(&evicted);
            }
        }
    }
}

impl<P> RowGroupBloomProvider for CachingBloomProvider<P>
where
    P: RowGroupBloomProvider,
{
    fn bloom_filter(
        &mut self,
        row_group_idx: usize,
        column_idx: usize,
    ) -> Result<Option<Sbbf>, PruneError> {
        let key = (row_group_idx, column_idx);
        if let Some(cached) = self.entries.get(&key) {
            return Ok(cached.clone());
        }
        let loaded = self.inner.bloom_filter(row_group_idx, column_idx)?;
        self.insert(key, loaded.clone());
        Ok(loaded)
    }
}
