use itertools::Itertools;
use tracing::debug;

use super::{BlockData, CoordinateFrame, Partition};
use crate::substrate::{resolve_all, Substrate, TaskResult};
use crate::table::Table;
use crate::types::{Axis, Label};

/// How to size the blocks of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitSpec {
    /// Target number of near-equal partitions.
    Count(usize),
    /// Fixed extent per partition.
    ChunkSize(usize),
}

/// Split a table into near-equal blocks along an axis and upload each block.
///
/// With `Count(n)` the chunk is `ceil(extent / n)`; chunks are sliced off
/// the front until at most one chunk remains, so only the last partition
/// may be shorter. Every emitted block has both axes relabeled to dense
/// integer ranges, making partitions self-indexed.
///
/// `Count(1)` uploads the table unsplit with its labels untouched. A zero
/// extent always yields exactly one partition.
pub fn split(substrate: &Substrate, table: Table, axis: Axis, spec: SplitSpec) -> Vec<Partition> {
    let extent = table.extent(axis);
    let chunk = match spec {
        SplitSpec::Count(n) => {
            assert!(n >= 1, "partition count must be positive");
            if n == 1 {
                return vec![substrate.upload(BlockData::Table(table))];
            }
            extent.div_ceil(n)
        }
        SplitSpec::ChunkSize(c) => {
            assert!(c >= 1, "chunk size must be positive");
            c
        }
    };
    if extent == 0 {
        return vec![upload_block(substrate, slice(&table, axis, 0, 0))];
    }

    let mut partitions = Vec::with_capacity(extent.div_ceil(chunk));
    let mut start = 0;
    while extent - start > chunk {
        partitions.push(upload_block(substrate, slice(&table, axis, start, start + chunk)));
        start += chunk;
    }
    partitions.push(upload_block(substrate, slice(&table, axis, start, extent)));
    debug!(?axis, chunk, count = partitions.len(), "split table");
    partitions
}

/// Split a table into exactly `npartitions` fixed-stride blocks.
///
/// The in-task counterpart of [`split`], used when a dispatched unit of
/// work re-splits its combined result. Trailing blocks beyond the extent
/// come out empty. `npartitions == 1` returns the table as-is.
pub fn split_local(table: Table, axis: Axis, npartitions: usize) -> Vec<Table> {
    assert!(npartitions >= 1, "partition count must be positive");
    if npartitions == 1 {
        return vec![table];
    }
    let extent = table.extent(axis);
    let block = extent.div_ceil(npartitions);
    (0..npartitions)
        .map(|i| {
            let start = (i * block).min(extent);
            let end = ((i + 1) * block).min(extent);
            slice(&table, axis, start, end)
        })
        .collect()
}

fn slice(table: &Table, axis: Axis, start: usize, end: usize) -> Table {
    let mut block = match axis {
        Axis::Rows => table.slice_rows(start..end),
        Axis::Cols => table.slice_cols(start..end),
    };
    block.reset_row_labels();
    block.reset_col_labels();
    block
}

fn upload_block(substrate: &Substrate, block: Table) -> Partition {
    substrate.upload(BlockData::Table(block))
}

/// Build the coordinate metadata for one axis from per-partition lengths.
pub fn build_coordinate_frame(lengths: &[usize], labels: Vec<Label>) -> CoordinateFrame {
    CoordinateFrame::from_lengths(lengths, labels)
}

/// Row count of each partition. A degenerate (scalar) payload reports 0
/// rather than failing, so frame construction is total over any sequence.
pub async fn measure_lengths(partitions: &[Partition]) -> TaskResult<Vec<usize>> {
    let blocks = resolve_all(partitions).await?;
    Ok(blocks.iter().map(|b| b.num_rows()).collect())
}

/// Column count of each partition; 0 for degenerate payloads.
pub async fn measure_widths(partitions: &[Partition]) -> TaskResult<Vec<usize>> {
    let blocks = resolve_all(partitions).await?;
    Ok(blocks.iter().map(|b| b.num_cols()).collect())
}

/// Materialize row partitions back into one table with global labels.
pub async fn to_table(
    partitions: &[Partition],
    row_labels: Vec<Label>,
    col_labels: Vec<Label>,
) -> TaskResult<Table> {
    let blocks = resolve_all(partitions).await?;
    let tables = blocks.iter().map(|b| b.as_table()).collect_vec();
    let mut table = Table::concat(&tables, Axis::Rows);
    table.set_row_labels(row_labels);
    table.set_col_labels(col_labels);
    Ok(table)
}

/// Stitch per-partition label runs back into one global label sequence.
pub fn concat_labels(parts: &[Vec<Label>]) -> Vec<Label> {
    parts.iter().flatten().cloned().collect()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::types::DataValue;

    fn table_10x2() -> Table {
        Table::from_columns(vec![
            (0..10).map(DataValue::Int32).collect(),
            (10..20).map(DataValue::Int32).collect(),
        ])
    }

    #[tokio::test]
    async fn split_count_3_gives_4_4_2() {
        let substrate = Substrate::new();
        let parts = split(&substrate, table_10x2(), Axis::Rows, SplitSpec::Count(3));
        let lengths = measure_lengths(&parts).await.unwrap();
        assert_eq!(lengths, vec![4, 4, 2]);
    }

    #[test_case(1 ; "single partition")]
    #[test_case(2 ; "even split")]
    #[test_case(3 ; "ragged split")]
    #[test_case(7 ; "more chunks than fit evenly")]
    #[tokio::test]
    async fn split_then_concat_roundtrips(n: usize) {
        let substrate = Substrate::new();
        let original = table_10x2();
        let parts = split(&substrate, original.clone(), Axis::Rows, SplitSpec::Count(n));

        let lengths = measure_lengths(&parts).await.unwrap();
        assert_eq!(lengths.iter().sum::<usize>(), 10);
        let chunk = 10usize.div_ceil(n);
        assert!(lengths.iter().all(|&l| l <= chunk));
        assert!(lengths[..lengths.len() - 1].iter().all(|&l| l == chunk));

        let back = to_table(
            &parts,
            original.row_labels().to_vec(),
            original.col_labels().to_vec(),
        )
        .await
        .unwrap();
        assert_eq!(back, original);
    }

    #[tokio::test]
    async fn split_resets_block_labels() {
        let substrate = Substrate::new();
        let parts = split(&substrate, table_10x2(), Axis::Rows, SplitSpec::ChunkSize(4));
        let last = parts[2].resolve().await.unwrap();
        assert_eq!(last.as_table().row_labels(), &Label::range(2)[..]);
        assert_eq!(last.as_table().col_labels(), &Label::range(2)[..]);
    }

    #[tokio::test]
    async fn zero_extent_is_one_partition() {
        let substrate = Substrate::new();
        let parts = split(
            &substrate,
            Table::default(),
            Axis::Rows,
            SplitSpec::Count(4),
        );
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].resolve().await.unwrap().num_rows(), 0);
    }

    #[test]
    fn split_local_widths() {
        let table = Table::from_columns((0..10).map(|i| vec![DataValue::Int64(i)]));
        let blocks = split_local(table, Axis::Cols, 3);
        let widths = blocks.iter().map(Table::num_cols).collect_vec();
        assert_eq!(widths, vec![4, 4, 2]);
    }

    #[test]
    fn split_local_single_is_untouched() {
        let mut table = table_10x2();
        table.set_row_labels((0..10).map(|i| Label::Int(i + 100)).collect());
        let blocks = split_local(table.clone(), Axis::Rows, 1);
        assert_eq!(blocks, vec![table]);
    }

    #[tokio::test]
    async fn scalar_partitions_measure_zero() {
        let substrate = Substrate::new();
        let parts = vec![
            substrate.upload(BlockData::Table(table_10x2())),
            substrate.upload(BlockData::Scalar(DataValue::Int64(3))),
        ];
        assert_eq!(measure_lengths(&parts).await.unwrap(), vec![10, 0]);
        assert_eq!(measure_widths(&parts).await.unwrap(), vec![2, 0]);
    }

    #[test]
    fn concat_labels_stitches_runs_in_order() {
        let parts = vec![Label::range(2), vec![], vec!["a".into(), "b".into()]];
        assert_eq!(
            concat_labels(&parts),
            vec![Label::Int(0), Label::Int(1), "a".into(), "b".into()]
        );
        assert!(concat_labels(&[]).is_empty());
    }

    #[tokio::test]
    async fn frame_matches_original_rows() {
        let substrate = Substrate::new();
        let original = table_10x2();
        let parts = split(&substrate, original.clone(), Axis::Rows, SplitSpec::Count(3));
        let lengths = measure_lengths(&parts).await.unwrap();
        let frame = build_coordinate_frame(&lengths, original.row_labels().to_vec());

        for (label, coord) in frame.iter() {
            let pos = original
                .row_labels()
                .iter()
                .position(|l| l == label)
                .unwrap();
            let block = parts[coord.partition].resolve().await.unwrap();
            assert_eq!(block.as_table().row(coord.offset), original.row(pos));
        }
    }
}
