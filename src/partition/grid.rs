use itertools::Itertools;
use tracing::debug;

use super::{measure_lengths, measure_widths, split_local, BlockData, CoordinateFrame, Partition};
use crate::substrate::Substrate;
use crate::types::Axis;
use crate::Error;

/// The 2-D arrangement of partitions making up one logical table.
///
/// Cells are addressed by (row-partition, column-partition); cell `(i, j)`
/// is the unique partition holding the rows of row-partition `i` and the
/// columns of column-partition `j`. Stored row-major.
#[derive(Debug, Clone)]
pub struct BlockGrid {
    cells: Vec<Partition>,
    num_row_parts: usize,
    num_col_parts: usize,
}

impl BlockGrid {
    /// Build a grid from rows of cells. All rows must have equal width.
    pub fn new(rows: Vec<Vec<Partition>>) -> Result<Self, Error> {
        let num_col_parts = rows.first().map_or(0, Vec::len);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != num_col_parts {
                return Err(Error::RaggedGrid {
                    row: i,
                    expected: num_col_parts,
                    actual: row.len(),
                });
            }
        }
        Ok(BlockGrid {
            num_row_parts: rows.len(),
            num_col_parts,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub(crate) fn from_cells(
        cells: Vec<Partition>,
        num_row_parts: usize,
        num_col_parts: usize,
    ) -> Self {
        assert_eq!(cells.len(), num_row_parts * num_col_parts);
        BlockGrid {
            cells,
            num_row_parts,
            num_col_parts,
        }
    }

    /// Build a grid by splitting whole-axis partitions into blocks.
    ///
    /// `axis` names the axis along which `partitions` already divide the
    /// table: row partitions are each split into `target` column blocks,
    /// column partitions into `target` row blocks (the grid comes out
    /// transposed in the latter case). One unit of work is dispatched per
    /// input partition; no handle is resolved here.
    pub fn from_partitions(
        substrate: &Substrate,
        partitions: &[Partition],
        axis: Axis,
        target: usize,
    ) -> Self {
        assert!(target >= 1, "target block count must be positive");
        let stripes = partitions
            .iter()
            .map(|part| {
                let part = part.clone();
                let parent = substrate.submit(async move {
                    let block = part.resolve().await?;
                    Ok(split_local(block.as_table().clone(), axis.flip(), target)
                        .into_iter()
                        .map(BlockData::Table)
                        .collect_vec())
                });
                substrate.scatter(&parent, target)
            })
            .collect_vec();
        debug!(?axis, stripes = stripes.len(), target, "built block grid");

        match axis {
            Axis::Rows => BlockGrid {
                num_row_parts: stripes.len(),
                num_col_parts: target,
                cells: stripes.into_iter().flatten().collect(),
            },
            Axis::Cols => {
                // Column partitions build the grid transposed.
                let num_col_parts = stripes.len();
                let mut cells = Vec::with_capacity(num_col_parts * target);
                for i in 0..target {
                    for stripe in &stripes {
                        cells.push(stripe[i].clone());
                    }
                }
                BlockGrid {
                    num_row_parts: target,
                    num_col_parts,
                    cells,
                }
            }
        }
    }

    pub fn num_row_parts(&self) -> usize {
        self.num_row_parts
    }

    pub fn num_col_parts(&self) -> usize {
        self.num_col_parts
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, row_part: usize, col_part: usize) -> &Partition {
        assert!(row_part < self.num_row_parts && col_part < self.num_col_parts);
        &self.cells[row_part * self.num_col_parts + col_part]
    }

    pub fn row(&self, row_part: usize) -> &[Partition] {
        let start = row_part * self.num_col_parts;
        &self.cells[start..start + self.num_col_parts]
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, &Partition)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, p)| (i / self.num_col_parts, i % self.num_col_parts, p))
    }

    /// Opt-in check that the coordinate frames describe this grid: frame
    /// partition indices stay in bounds and frame totals equal the extents
    /// measured from the first column / first row of cells.
    ///
    /// Resolves handles, so this is a debugging aid; the production
    /// contract leaves alignment preconditions unchecked.
    pub async fn check_frames(
        &self,
        row_frame: &CoordinateFrame,
        col_frame: &CoordinateFrame,
    ) -> Result<(), Error> {
        if self.is_empty() {
            return match (row_frame.is_empty(), col_frame.is_empty()) {
                (true, true) => Ok(()),
                (false, _) => Err(Error::FrameMismatch {
                    axis: Axis::Rows,
                    expected: 0,
                    actual: row_frame.len(),
                }),
                (_, false) => Err(Error::FrameMismatch {
                    axis: Axis::Cols,
                    expected: 0,
                    actual: col_frame.len(),
                }),
            };
        }
        if row_frame.max_partition().is_some_and(|p| p >= self.num_row_parts) {
            return Err(Error::FrameMismatch {
                axis: Axis::Rows,
                expected: self.num_row_parts,
                actual: row_frame.max_partition().unwrap_or(0) + 1,
            });
        }
        if col_frame.max_partition().is_some_and(|p| p >= self.num_col_parts) {
            return Err(Error::FrameMismatch {
                axis: Axis::Cols,
                expected: self.num_col_parts,
                actual: col_frame.max_partition().unwrap_or(0) + 1,
            });
        }

        let first_col = (0..self.num_row_parts)
            .map(|i| self.cell(i, 0).clone())
            .collect_vec();
        let total_rows: usize = measure_lengths(&first_col).await?.iter().sum();
        if total_rows != row_frame.len() {
            return Err(Error::FrameMismatch {
                axis: Axis::Rows,
                expected: total_rows,
                actual: row_frame.len(),
            });
        }

        let total_cols: usize = measure_widths(self.row(0)).await?.iter().sum();
        if total_cols != col_frame.len() {
            return Err(Error::FrameMismatch {
                axis: Axis::Cols,
                expected: total_cols,
                actual: col_frame.len(),
            });
        }
        Ok(())
    }
}
