//! Cell-level extraction and copy-on-write updates against a block grid.

use tracing::debug;

use crate::partition::{BlockData, BlockGrid, CoordinateFrame, Partition};
use crate::substrate::Substrate;
use crate::types::DataValue;

/// Build a new grid from a coordinate selection over an existing one.
///
/// The frames may reorder, repeat, or narrow the original axes. Cell
/// `(i, j)` of the result is produced by one extraction dispatched against
/// the original partition addressed by the i-th selected row and the j-th
/// selected column, so the result is a `rows x cols` grid of single-cell
/// partitions.
///
/// This is knowingly naive: one unit of work per selected cell, O(rows x
/// cols) round trips. Callers needing efficient bulk extraction must batch
/// at a higher layer.
pub fn mask_blocks(
    substrate: &Substrate,
    grid: &BlockGrid,
    row_frame: &CoordinateFrame,
    col_frame: &CoordinateFrame,
) -> BlockGrid {
    let mut cells = Vec::with_capacity(row_frame.len() * col_frame.len());
    for (_, row_coord) in row_frame.iter() {
        for (_, col_coord) in col_frame.iter() {
            let block = grid.cell(row_coord.partition, col_coord.partition).clone();
            cells.push(substrate.submit(async move {
                let block = block.resolve().await?;
                let table = block
                    .as_table()
                    .select_rows(&[row_coord.offset])
                    .select_cols(&[col_coord.offset]);
                Ok(BlockData::Table(table))
            }));
        }
    }
    debug!(
        rows = row_frame.len(),
        cols = col_frame.len(),
        "masked block grid"
    );
    BlockGrid::from_cells(cells, row_frame.len(), col_frame.len())
}

/// Copy the block and write `value` at the cross of the given positions.
///
/// The source partition is immutable; the update produces a new partition.
pub fn write_cell(
    substrate: &Substrate,
    partition: &Partition,
    rows: Vec<usize>,
    cols: Vec<usize>,
    value: DataValue,
) -> Partition {
    let partition = partition.clone();
    substrate.submit(async move {
        let block = partition.resolve().await?;
        Ok(BlockData::Table(block.as_table().with_values(
            &rows,
            &cols,
            &value,
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{build_coordinate_frame, measure_lengths, split, SplitSpec};
    use crate::table::Table;
    use crate::types::{Axis, Label};

    fn grid_and_frames(substrate: &Substrate) -> (BlockGrid, CoordinateFrame, CoordinateFrame) {
        let table = Table::from_columns(
            (0..4).map(|c| (0..6).map(|r| DataValue::Int32(r * 10 + c)).collect()),
        );
        let row_labels = table.row_labels().to_vec();
        let col_labels = table.col_labels().to_vec();
        let parts = split(substrate, table, Axis::Rows, SplitSpec::Count(3));
        let grid = BlockGrid::from_partitions(substrate, &parts, Axis::Rows, 2);
        let row_frame = build_coordinate_frame(&[2, 2, 2], row_labels);
        let col_frame = build_coordinate_frame(&[2, 2], col_labels);
        (grid, row_frame, col_frame)
    }

    #[tokio::test]
    async fn masks_reordered_and_repeated_selections() {
        let substrate = Substrate::new();
        let (grid, row_frame, col_frame) = grid_and_frames(&substrate);

        let rows = row_frame
            .select(&[Label::Int(5), Label::Int(0), Label::Int(0)])
            .unwrap();
        let cols = col_frame.select(&[Label::Int(3), Label::Int(1)]).unwrap();
        let masked = mask_blocks(&substrate, &grid, &rows, &cols);
        assert_eq!(masked.num_row_parts(), 3);
        assert_eq!(masked.num_col_parts(), 2);

        let expect = [[53, 51], [3, 1], [3, 1]];
        for (i, j, cell) in masked.iter_cells() {
            let block = cell.resolve().await.unwrap();
            assert_eq!(block.as_table().value(0, 0), &DataValue::Int32(expect[i][j]));
        }
    }

    #[tokio::test]
    async fn empty_selection_is_empty_grid() {
        let substrate = Substrate::new();
        let (grid, row_frame, col_frame) = grid_and_frames(&substrate);
        let none = row_frame.select(&[]).unwrap();
        let masked = mask_blocks(&substrate, &grid, &none, &col_frame);
        assert!(masked.is_empty());
        assert_eq!(masked.num_row_parts(), 0);
    }

    #[tokio::test]
    async fn write_cell_is_copy_on_write() {
        let substrate = Substrate::new();
        let table = Table::from_columns(vec![vec![DataValue::Int32(1), DataValue::Int32(2)]]);
        let parts = split(&substrate, table, Axis::Rows, SplitSpec::Count(1));
        let written = write_cell(&substrate, &parts[0], vec![1], vec![0], DataValue::Int32(9));

        assert_eq!(measure_lengths(&[written.clone()]).await.unwrap(), vec![2]);
        let new_block = written.resolve().await.unwrap();
        assert_eq!(new_block.as_table().value(1, 0), &DataValue::Int32(9));
        let old_block = parts[0].resolve().await.unwrap();
        assert_eq!(old_block.as_table().value(1, 0), &DataValue::Int32(2));
    }
}
