use itertools::Itertools;
use tracing::debug;

use crate::partition::{split_local, BlockData, Partition};
use crate::substrate::{resolve_all, Substrate};
use crate::table::Table;
use crate::types::{Axis, Label};

/// A relabeling of one axis ahead of a join or concat.
#[derive(Clone)]
pub struct ReindexRequest {
    /// Blocks dividing the table along the axis orthogonal to `axis`.
    pub partitions: Vec<Partition>,
    /// Current labels of the reindexed axis.
    pub old_labels: Vec<Label>,
    /// Labels to align to. Labels absent from `old_labels` become
    /// null-filled positions; labels dropped from `new_labels` disappear.
    pub new_labels: Vec<Label>,
    /// The axis being reindexed.
    pub axis: Axis,
    /// Number of partitions to re-split into afterwards.
    pub target_partition_count: usize,
}

/// Relabel an axis and re-split, preserving the grid sum invariant.
///
/// One unit of work concatenates the blocks into a whole table along the
/// orthogonal axis, assigns `old_labels`, relabels to `new_labels` with
/// null fill, and splits the result back into `target_partition_count`
/// blocks along the reindexed axis.
pub fn reindex(substrate: &Substrate, request: ReindexRequest) -> Vec<Partition> {
    let n = request.target_partition_count;
    let axis = request.axis;
    debug!(?axis, target = n, "reindex partitions");

    let parent = substrate.submit(async move {
        let blocks = resolve_all(&request.partitions).await?;
        let mut table = Table::concat(
            &blocks.iter().map(|b| b.as_table()).collect_vec(),
            axis.flip(),
        );
        match axis {
            Axis::Rows => table.set_row_labels(request.old_labels),
            Axis::Cols => table.set_col_labels(request.old_labels),
        }
        let table = table.reindex(axis, &request.new_labels);
        Ok(split_local(table, axis, n)
            .into_iter()
            .map(BlockData::Table)
            .collect_vec())
    });
    substrate.scatter(&parent, n)
}
