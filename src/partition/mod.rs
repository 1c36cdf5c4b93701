//! Partitions, coordinate metadata, and the block grid.

mod coordinate;
mod grid;
mod partitioner;

pub use coordinate::{Coord, CoordinateFrame};
pub use grid::BlockGrid;
pub use partitioner::{
    build_coordinate_frame, concat_labels, measure_lengths, measure_widths, split, split_local,
    to_table, SplitSpec,
};

use crate::substrate::Handle;
use crate::table::Table;
use crate::types::DataValue;

/// The payload behind a partition handle.
///
/// Almost always a table; per-partition aggregation can leave a scalar
/// behind, which shape introspection must tolerate.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockData {
    Table(Table),
    Scalar(DataValue),
}

impl BlockData {
    /// The table payload.
    ///
    /// Panics on a scalar payload; inside a dispatched task the panic
    /// surfaces when the caller resolves the handle.
    pub fn as_table(&self) -> &Table {
        match self {
            BlockData::Table(t) => t,
            BlockData::Scalar(v) => panic!("partition holds a scalar ({v}), not a table"),
        }
    }

    pub fn table(&self) -> Option<&Table> {
        match self {
            BlockData::Table(t) => Some(t),
            BlockData::Scalar(_) => None,
        }
    }

    /// Row count; 0 for a degenerate (scalar) payload.
    pub fn num_rows(&self) -> usize {
        self.table().map_or(0, Table::num_rows)
    }

    /// Column count; 0 for a degenerate (scalar) payload.
    pub fn num_cols(&self) -> usize {
        self.table().map_or(0, Table::num_cols)
    }
}

impl From<Table> for BlockData {
    fn from(t: Table) -> Self {
        BlockData::Table(t)
    }
}

/// An immutable, substrate-owned handle to a rectangular sub-table.
pub type Partition = Handle<BlockData>;
