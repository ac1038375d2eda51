//! Row-group selection for Parquet files.

use parquet::file::metadata::ParquetMetaData;

use crate::{
    observability::{log_debug, log_warn},
    ondisk::{row_count, FooterColumns, RowGroupBloomProvider},
    pruning::{PruneError, SectionPredicate},
};

/// Result of a pruning pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PruneOutput {
    /// Row groups selected for scanning, ascending.
    pub row_groups: Vec<usize>,
}

/// Every row group of the file.
#[must_use]
pub fn read_all(metadata: &ParquetMetaData) -> PruneOutput {
    PruneOutput {
        row_groups: (0..metadata.num_row_groups()).collect(),
    }
}

/// Evaluate `predicate` against every row group of the file.
///
/// Bloom filters are loaded through `bloom_provider` only for the columns the
/// predicate asks for.
pub fn prune_row_groups(
    metadata: &ParquetMetaData,
    predicate: &dyn SectionPredicate,
    mut bloom_provider: Option<&mut dyn RowGroupBloomProvider>,
) -> Result<PruneOutput, PruneError> {
    let columns = FooterColumns::try_new(metadata)?;
    let bloom_columns = predicate.bloom_filter_columns();

    let mut row_groups = Vec::new();
    for (row_group_idx, row_group) in metadata.row_groups().iter().enumerate() {
        let mut statistics = columns.section_statistics(row_group)?;
        if let Some(provider) = bloom_provider.as_deref_mut() {
            if !bloom_columns.is_empty() {
                columns.attach_bloom_filters(
                    &mut statistics,
                    row_group_idx,
                    &bloom_columns,
                    provider,
                )?;
            }
        }
        if predicate.matches(row_count(row_group)?, &statistics) {
            row_groups.push(row_group_idx);
        }
    }

    log_debug!(
        component = "row_groups",
        event = "row_groups_pruned",
        total = metadata.num_row_groups(),
        selected = row_groups.len(),
    );
    Ok(PruneOutput { row_groups })
}

/// Run [`prune_row_groups`], falling back to a full scan on errors.
pub fn prune_or_all(
    metadata: &ParquetMetaData,
    predicate: &dyn SectionPredicate,
    bloom_provider: Option<&mut dyn RowGroupBloomProvider>,
) -> PruneOutput {
    match prune_row_groups(metadata, predicate, bloom_provider) {
        Ok(output) => output,
        Err(err) => {
            log_warn!(
                component = "row_groups",
                event = "prune_fallback",
                error = %err,
                row_groups = metadata.num_row_groups(),
            );
            read_all(metadata)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::Int64Array,
        datatypes::{DataType, Field, Schema},
        record_batch::RecordBatch,
    };
    use bytes::Bytes;
    use parquet::{
        arrow::ArrowWriter,
        bloom_filter::Sbbf,
        file::{
            properties::WriterProperties,
            reader::FileReader,
            serialized_reader::SerializedFileReader,
        },
    };
    use section_domain::{ColumnType, Domain, Range, Value, ValueSet};

    use super::*;
    use crate::{
        pruning::{NoopPredicate, TupleDomainPredicate},
        statistics::ColumnId,
    };

    fn build_metadata() -> ParquetMetaData {
        let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
        let ids = Int64Array::from(vec![1, 2, 100, 200]);
        let batch = RecordBatch::try_new(Arc::clone(&schema), vec![Arc::new(ids)]).expect("batch");

        let props = WriterProperties::builder()
            .set_max_row_group_size(2)
            .build();
        let mut buffer = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buffer, schema, Some(props)).expect("writer");
        writer.write(&batch).expect("write");
        writer.close().expect("close");

        let reader = SerializedFileReader::new(Bytes::from(buffer)).expect("reader");
        reader.metadata().clone()
    }

    fn less_than(value: i64) -> TupleDomainPredicate {
        TupleDomainPredicate::builder()
            .add_column(
                ColumnId::new(0),
                Domain::new(
                    ColumnType::BigInt,
                    ValueSet::of_ranges([Range::less_than(Value::Long(value))]),
                    false,
                ),
            )
            .build()
    }

    struct FailingProvider;

    impl RowGroupBloomProvider for FailingProvider {
        fn bloom_filter(
            &mut self,
            _row_group_idx: usize,
            _column_idx: usize,
        ) -> Result<Option<Sbbf>, PruneError> {
            Err(PruneError::message("bloom filter unavailable"))
        }
    }

    #[test]
    fn prunes_row_groups_by_range() {
        let metadata = build_metadata();
        let output = prune_row_groups(&metadata, &less_than(10), None).expect("prune");
        assert_eq!(output.row_groups, vec![0]);
    }

    #[test]
    fn noop_returns_all_row_groups() {
        let metadata = build_metadata();
        let output = prune_row_groups(&metadata, &NoopPredicate, None).expect("prune");
        assert_eq!(output, read_all(&metadata));
        assert_eq!(output.row_groups, vec![0, 1]);
    }

    #[test]
    fn provider_errors_fall_back_to_all() {
        let metadata = build_metadata();
        let predicate = TupleDomainPredicate::builder()
            .add_column(
                ColumnId::new(0),
                Domain::single_value(ColumnType::BigInt, Value::Long(150)),
            )
            .set_bloom_filters_enabled(true)
            .build();
        let mut provider = FailingProvider;

        assert!(prune_row_groups(&metadata, &predicate, Some(&mut provider)).is_err());
        let output = prune_or_all(&metadata, &predicate, Some(&mut provider));
        assert_eq!(output.row_groups, vec![0, 1]);
    }

    #[test]
    fn provider_is_not_consulted_without_point_lookups() {
        let metadata = build_metadata();
        let mut provider = FailingProvider;
        let output =
            prune_row_groups(&metadata, &less_than(10), Some(&mut provider)).expect("prune");
        assert_eq!(output.row_groups, vec![0]);
    }
}
