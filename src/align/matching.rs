use tracing::debug;

use crate::partition::{BlockData, Partition};
use crate::substrate::Substrate;
use crate::table::Table;
use crate::types::Label;

/// Slice one column partition to match a target row-partitioning.
///
/// Used to align the right side of a merge with the left side's
/// row-partition boundaries once both sides already share index identity:
/// `shared_index` is pushed down as the partition's row labels (the one
/// place correct placement can be guaranteed), then the rows are sliced
/// sequentially into chunks of `target_lengths`. If the source runs out
/// before all target lengths are consumed, the remaining outputs are empty
/// partitions that still carry the full column label set.
///
/// Precondition (caller's responsibility, unchecked): the partition's rows
/// already correspond to `shared_index` positionally. No verification is
/// performed here.
pub fn match_partitioning(
    substrate: &Substrate,
    column_partition: &Partition,
    target_lengths: Vec<usize>,
    shared_index: Vec<Label>,
) -> Vec<Partition> {
    let n = target_lengths.len();
    debug!(targets = n, "match partition lengths");
    let column_partition = column_partition.clone();

    let parent = substrate.submit(async move {
        let block = column_partition.resolve().await?;
        let mut rest = block.as_table().clone();
        rest.set_row_labels(shared_index);
        let columns = rest.col_labels().to_vec();

        let mut out = Vec::with_capacity(target_lengths.len());
        for length in target_lengths {
            if rest.num_rows() == 0 {
                out.push(BlockData::Table(Table::empty_with_columns(columns.clone())));
                continue;
            }
            let take = length.min(rest.num_rows());
            out.push(BlockData::Table(rest.slice_rows(0..take)));
            rest = rest.slice_rows(take..rest.num_rows());
        }
        Ok(out)
    });
    substrate.scatter(&parent, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{measure_lengths, measure_widths, split, SplitSpec};
    use crate::table::Table;
    use crate::types::{Axis, DataValue};

    fn table_7x2() -> Table {
        let mut t = Table::from_columns(vec![
            (0..7).map(DataValue::Int32).collect(),
            (10..17).map(DataValue::Int32).collect(),
        ]);
        t.set_col_labels(vec!["k".into(), "v".into()]);
        t
    }

    #[tokio::test]
    async fn exhausted_source_yields_short_then_empty() {
        let substrate = Substrate::new();
        let table = table_7x2();
        let index = Label::range(7);
        let parts = split(&substrate, table, Axis::Rows, SplitSpec::Count(1));

        let out = match_partitioning(&substrate, &parts[0], vec![3, 3, 3], index);
        assert_eq!(out.len(), 3);
        // 7 rows against [3, 3, 3]: the last chunk only has 1 row left.
        assert_eq!(measure_lengths(&out).await.unwrap(), vec![3, 3, 1]);
        // Never columnless, even when short.
        assert_eq!(measure_widths(&out).await.unwrap(), vec![2, 2, 2]);
    }

    #[tokio::test]
    async fn trailing_targets_get_empty_blocks_with_columns() {
        let substrate = Substrate::new();
        let table = table_7x2();
        let index = Label::range(7);
        let parts = split(&substrate, table, Axis::Rows, SplitSpec::Count(1));

        let out = match_partitioning(&substrate, &parts[0], vec![7, 2, 2], index);
        assert_eq!(measure_lengths(&out).await.unwrap(), vec![7, 0, 0]);
        let empty = out[2].resolve().await.unwrap();
        assert_eq!(
            empty.as_table().col_labels(),
            &[Label::from("k"), Label::from("v")]
        );
    }

    #[tokio::test]
    async fn index_is_pushed_down() {
        let substrate = Substrate::new();
        let table = table_7x2();
        let index: Vec<Label> = (100..107).map(Label::Int).collect();
        let parts = split(&substrate, table, Axis::Rows, SplitSpec::Count(1));

        let out = match_partitioning(&substrate, &parts[0], vec![4, 3], index);
        let first = out[0].resolve().await.unwrap();
        assert_eq!(first.as_table().row_labels()[0], Label::Int(100));
        let second = out[1].resolve().await.unwrap();
        assert_eq!(second.as_table().row_labels()[0], Label::Int(104));
    }
}
