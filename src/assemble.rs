//! Whole-axis assembly of blocks, with memoized dispatch.
//!
//! Stitching the blocks of one row or column partition back into a full
//! strip is issued repetitively by columnar operations, so both directions
//! go through a [`MemoizingDispatcher`] keyed by the input handle ids.

use itertools::Itertools;

use crate::cache::MemoizingDispatcher;
use crate::partition::{BlockData, Partition};
use crate::substrate::Substrate;
use crate::table::Table;
use crate::types::Axis;

/// Memoized assembly of block sequences into whole-axis strips.
///
/// Keys are the input handle ids, i.e. handle identity, not the values
/// behind the handles. Identical handle sequences assemble at most once.
#[derive(Default)]
pub struct Assembler {
    rows: MemoizingDispatcher<Vec<u64>, BlockData>,
    cols: MemoizingDispatcher<Vec<u64>, BlockData>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenate the column blocks of one row partition into a full row
    /// strip with dense labels on both axes.
    pub fn assemble_row(&self, substrate: &Substrate, blocks: &[Partition]) -> Partition {
        let key = blocks.iter().map(Partition::id).collect_vec();
        self.rows
            .submit(key, || dispatch_concat(substrate, blocks, Axis::Cols))
    }

    /// Concatenate the row blocks of one column partition into a full
    /// column strip. An empty input yields an empty table.
    pub fn assemble_col(&self, substrate: &Substrate, blocks: &[Partition]) -> Partition {
        let key = blocks.iter().map(Partition::id).collect_vec();
        self.cols
            .submit(key, || dispatch_concat(substrate, blocks, Axis::Rows))
    }
}

fn dispatch_concat(substrate: &Substrate, blocks: &[Partition], axis: Axis) -> Partition {
    let blocks = blocks.to_vec();
    substrate.submit(async move {
        let resolved = crate::substrate::resolve_all(&blocks).await?;
        let tables = resolved.iter().map(|b| b.as_table()).collect_vec();
        let mut strip = Table::concat(&tables, axis);
        strip.reset_row_labels();
        strip.reset_col_labels();
        Ok(BlockData::Table(strip))
    })
}
