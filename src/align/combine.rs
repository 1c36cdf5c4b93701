use std::sync::Arc;

use itertools::Itertools;
use tracing::debug;

use crate::partition::{split_local, BlockData, Partition};
use crate::substrate::{resolve_all, Handle, Substrate};
use crate::table::Table;
use crate::types::{Axis, Label};

/// A binary operation over two whole (materialized) tables.
pub type CombineFn = Arc<dyn Fn(&Table, &Table) -> Table + Send + Sync>;

/// Both sides of a co-partitioned binary operation, left first.
#[derive(Clone)]
pub struct CombineRequest {
    pub left: Vec<Partition>,
    pub right: Vec<Partition>,
    /// Column labels to reattach to the assembled left side.
    pub left_columns: Vec<Label>,
    /// Column labels to reattach to the assembled right side.
    pub right_columns: Vec<Label>,
    /// Row labels for the left side; when given, the result's row labels
    /// are handed back so the caller can recover global row identity.
    pub left_index: Option<Vec<Label>>,
}

/// Result of [`combine`]: as many row partitions as the left side had,
/// plus the combined row labels when a left index was supplied.
pub struct CombineOutput {
    pub partitions: Vec<Partition>,
    pub index: Option<Handle<Vec<Label>>>,
}

/// Apply a binary operation to two already co-partitioned sides.
///
/// One unit of work assembles each side into a whole table along the row
/// axis, reattaches the supplied labels, applies `func(left, right)`, and
/// re-splits the result into exactly as many row partitions as the left
/// side originally had.
///
/// Precondition (caller's responsibility, unchecked): both sides share
/// identical row-partition boundaries. Violating it does not raise an
/// error; it silently produces misaligned data.
pub fn combine(substrate: &Substrate, func: CombineFn, request: CombineRequest) -> CombineOutput {
    let num_partitions = request.left.len();
    let want_index = request.left_index.is_some();
    debug!(num_partitions, want_index, "co-partition combine");

    let parent: Handle<(Vec<Table>, Vec<Label>)> = substrate.submit(async move {
        let left_blocks = resolve_all(&request.left).await?;
        let right_blocks = resolve_all(&request.right).await?;

        let mut left = Table::concat(
            &left_blocks.iter().map(|b| b.as_table()).collect_vec(),
            Axis::Rows,
        );
        left.set_col_labels(request.left_columns);
        match request.left_index {
            Some(index) => left.set_row_labels(index),
            None => left.reset_row_labels(),
        }

        let mut right = Table::concat(
            &right_blocks.iter().map(|b| b.as_table()).collect_vec(),
            Axis::Rows,
        );
        right.set_col_labels(request.right_columns);
        right.reset_row_labels();

        let combined = func(&left, &right);
        let index = combined.row_labels().to_vec();
        Ok((split_local(combined, Axis::Rows, num_partitions), index))
    });

    let partitions = (0..num_partitions)
        .map(|i| {
            substrate.derive(&parent, move |(blocks, _): &(Vec<Table>, Vec<Label>)| {
                BlockData::Table(blocks[i].clone())
            })
        })
        .collect();
    let index = want_index.then(|| {
        substrate.derive(&parent, |(_, index): &(Vec<Table>, Vec<Label>)| index.clone())
    });

    CombineOutput { partitions, index }
}
