//! The table primitive consumed by the coordination layer.
//!
//! This is the external collaborator of the crate: a rectangular matrix of
//! scalar values with labeled axes. Only the operations the coordination
//! layer relies on are provided: positional slicing, concatenation along an
//! axis, label assignment, shape introspection, and relabeling with null
//! fill.

use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::types::{Axis, DataValue, Label};

pub type Column = Vec<DataValue>;

/// A column-major table of scalar values with row and column labels.
///
/// A table is a plain value. Handing it to the execution substrate produces
/// an immutable partition; every "write" here returns a new table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: SmallVec<[Column; 16]>,
    row_labels: Vec<Label>,
    col_labels: Vec<Label>,
}

impl Table {
    /// Build a table from columns, with dense integer labels on both axes.
    pub fn from_columns(columns: impl IntoIterator<Item = Column>) -> Self {
        let columns: SmallVec<[Column; 16]> = columns.into_iter().collect();
        let num_rows = columns.first().map_or(0, |c| c.len());
        assert!(
            columns.iter().all(|c| c.len() == num_rows),
            "all columns must have the same length"
        );
        Table {
            row_labels: Label::range(num_rows),
            col_labels: Label::range(columns.len()),
            columns,
        }
    }

    pub fn new(
        columns: impl IntoIterator<Item = Column>,
        row_labels: Vec<Label>,
        col_labels: Vec<Label>,
    ) -> Self {
        let mut table = Self::from_columns(columns);
        table.set_row_labels(row_labels);
        table.set_col_labels(col_labels);
        table
    }

    /// An all-null block of the given shape.
    pub fn nan_block(num_rows: usize, num_cols: usize) -> Self {
        Self::from_columns(vec![vec![DataValue::Null; num_rows]; num_cols])
    }

    /// A zero-row table that still carries the given column labels.
    pub fn empty_with_columns(col_labels: Vec<Label>) -> Self {
        Table {
            columns: col_labels.iter().map(|_| Vec::new()).collect(),
            row_labels: Vec::new(),
            col_labels,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.row_labels.len()
    }

    pub fn num_cols(&self) -> usize {
        self.columns.len()
    }

    /// Extent along the given axis.
    pub fn extent(&self, axis: Axis) -> usize {
        match axis {
            Axis::Rows => self.num_rows(),
            Axis::Cols => self.num_cols(),
        }
    }

    pub fn value(&self, row: usize, col: usize) -> &DataValue {
        &self.columns[col][row]
    }

    pub fn column(&self, col: usize) -> &[DataValue] {
        &self.columns[col]
    }

    pub fn row(&self, row: usize) -> Vec<DataValue> {
        self.columns.iter().map(|c| c[row].clone()).collect()
    }

    pub fn row_labels(&self) -> &[Label] {
        &self.row_labels
    }

    pub fn col_labels(&self) -> &[Label] {
        &self.col_labels
    }

    pub fn set_row_labels(&mut self, labels: Vec<Label>) {
        assert_eq!(
            labels.len(),
            self.num_rows(),
            "row label count must match row count"
        );
        self.row_labels = labels;
    }

    pub fn set_col_labels(&mut self, labels: Vec<Label>) {
        assert_eq!(
            labels.len(),
            self.num_cols(),
            "column label count must match column count"
        );
        self.col_labels = labels;
    }

    /// Reset row labels to a dense `0..num_rows` range.
    pub fn reset_row_labels(&mut self) {
        self.row_labels = Label::range(self.num_rows());
    }

    /// Reset column labels to a dense `0..num_cols` range.
    pub fn reset_col_labels(&mut self) {
        self.col_labels = Label::range(self.num_cols());
    }

    /// Positional row slice, labels included.
    pub fn slice_rows(&self, range: Range<usize>) -> Table {
        Table {
            columns: self.columns.iter().map(|c| c[range.clone()].to_vec()).collect(),
            row_labels: self.row_labels[range].to_vec(),
            col_labels: self.col_labels.clone(),
        }
    }

    /// Positional column slice, labels included.
    pub fn slice_cols(&self, range: Range<usize>) -> Table {
        Table {
            columns: self.columns[range.clone()].iter().cloned().collect(),
            row_labels: self.row_labels.clone(),
            col_labels: self.col_labels[range].to_vec(),
        }
    }

    /// Positional row selection. Positions may repeat or reorder.
    pub fn select_rows(&self, positions: &[usize]) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| positions.iter().map(|&p| c[p].clone()).collect())
                .collect(),
            row_labels: positions.iter().map(|&p| self.row_labels[p].clone()).collect(),
            col_labels: self.col_labels.clone(),
        }
    }

    /// Positional column selection. Positions may repeat or reorder.
    pub fn select_cols(&self, positions: &[usize]) -> Table {
        Table {
            columns: positions.iter().map(|&p| self.columns[p].clone()).collect(),
            row_labels: self.row_labels.clone(),
            col_labels: positions.iter().map(|&p| self.col_labels[p].clone()).collect(),
        }
    }

    /// Concatenate tables along an axis.
    ///
    /// Along rows: column counts must match, column labels come from the
    /// first table, row labels are concatenated. Along columns: row counts
    /// must match, row labels come from the first table, column labels are
    /// concatenated. An empty input yields an empty table.
    pub fn concat(tables: &[&Table], axis: Axis) -> Table {
        let Some((first, rest)) = tables.split_first() else {
            return Table::default();
        };
        match axis {
            Axis::Rows => {
                let mut columns = first.columns.clone();
                let mut row_labels = first.row_labels.clone();
                for t in rest {
                    assert_eq!(
                        t.num_cols(),
                        columns.len(),
                        "column count mismatch in row concat"
                    );
                    for (dst, src) in columns.iter_mut().zip(&t.columns) {
                        dst.extend(src.iter().cloned());
                    }
                    row_labels.extend(t.row_labels.iter().cloned());
                }
                Table {
                    columns,
                    row_labels,
                    col_labels: first.col_labels.clone(),
                }
            }
            Axis::Cols => {
                let mut columns = first.columns.clone();
                let mut col_labels = first.col_labels.clone();
                for t in rest {
                    assert_eq!(
                        t.num_rows(),
                        first.num_rows(),
                        "row count mismatch in column concat"
                    );
                    columns.extend(t.columns.iter().cloned());
                    col_labels.extend(t.col_labels.iter().cloned());
                }
                Table {
                    columns,
                    row_labels: first.row_labels.clone(),
                    col_labels,
                }
            }
        }
    }

    /// Relabel an axis. Labels present in `new_labels` but absent here
    /// become null-filled rows/columns; labels absent from `new_labels` are
    /// dropped. Duplicate source labels resolve to their first occurrence.
    pub fn reindex(&self, axis: Axis, new_labels: &[Label]) -> Table {
        match axis {
            Axis::Rows => {
                let pos = first_positions(&self.row_labels);
                Table {
                    columns: self
                        .columns
                        .iter()
                        .map(|c| {
                            new_labels
                                .iter()
                                .map(|l| match pos.get(l) {
                                    Some(&p) => c[p].clone(),
                                    None => DataValue::Null,
                                })
                                .collect()
                        })
                        .collect(),
                    row_labels: new_labels.to_vec(),
                    col_labels: self.col_labels.clone(),
                }
            }
            Axis::Cols => {
                let pos = first_positions(&self.col_labels);
                Table {
                    columns: new_labels
                        .iter()
                        .map(|l| match pos.get(l) {
                            Some(&p) => self.columns[p].clone(),
                            None => vec![DataValue::Null; self.num_rows()],
                        })
                        .collect(),
                    row_labels: self.row_labels.clone(),
                    col_labels: new_labels.to_vec(),
                }
            }
        }
    }

    /// Copy-on-write assignment of `value` to the cross of the given
    /// positions. The receiver is untouched.
    pub fn with_values(&self, rows: &[usize], cols: &[usize], value: &DataValue) -> Table {
        let mut out = self.clone();
        for &c in cols {
            for &r in rows {
                out.columns[c][r] = value.clone();
            }
        }
        out
    }

    /// Elementwise combination of two same-shaped tables. Labels of the
    /// receiver are kept.
    pub fn zip_with(
        &self,
        other: &Table,
        f: impl Fn(&DataValue, &DataValue) -> DataValue,
    ) -> Table {
        assert_eq!(self.num_rows(), other.num_rows(), "shape mismatch in zip");
        assert_eq!(self.num_cols(), other.num_cols(), "shape mismatch in zip");
        Table {
            columns: self
                .columns
                .iter()
                .zip(&other.columns)
                .map(|(a, b)| a.iter().zip(b).map(|(x, y)| f(x, y)).collect())
                .collect(),
            row_labels: self.row_labels.clone(),
            col_labels: self.col_labels.clone(),
        }
    }
}

fn first_positions(labels: &[Label]) -> HashMap<&Label, usize> {
    let mut pos = HashMap::with_capacity(labels.len());
    for (i, l) in labels.iter().enumerate() {
        pos.entry(l).or_insert(i);
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_table(cols: &[&[i32]]) -> Table {
        Table::from_columns(
            cols.iter()
                .map(|c| c.iter().map(|&v| DataValue::Int32(v)).collect()),
        )
    }

    #[test]
    fn slice_and_select() {
        let t = int_table(&[&[1, 2, 3, 4], &[5, 6, 7, 8]]);
        let s = t.slice_rows(1..3);
        assert_eq!(s.num_rows(), 2);
        assert_eq!(s.value(0, 0), &DataValue::Int32(2));
        assert_eq!(s.row_labels(), &[Label::Int(1), Label::Int(2)]);

        let p = t.select_rows(&[3, 0, 0]);
        assert_eq!(p.column(1), &[
            DataValue::Int32(8),
            DataValue::Int32(5),
            DataValue::Int32(5)
        ]);
    }

    #[test]
    fn concat_rows_restores_values() {
        let t = int_table(&[&[1, 2, 3, 4], &[5, 6, 7, 8]]);
        let a = t.slice_rows(0..2);
        let b = t.slice_rows(2..4);
        let back = Table::concat(&[&a, &b], Axis::Rows);
        assert_eq!(back.column(0), t.column(0));
        assert_eq!(back.column(1), t.column(1));
    }

    #[test]
    fn concat_empty_is_empty() {
        let t = Table::concat(&[], Axis::Rows);
        assert_eq!(t.num_rows(), 0);
        assert_eq!(t.num_cols(), 0);
    }

    #[test]
    fn reindex_fills_and_drops() {
        let mut t = int_table(&[&[1, 2]]);
        t.set_row_labels(vec!["a".into(), "b".into()]);
        let r = t.reindex(Axis::Rows, &["b".into(), "c".into()]);
        assert_eq!(r.column(0), &[DataValue::Int32(2), DataValue::Null]);
        assert_eq!(r.row_labels(), &[Label::from("b"), Label::from("c")]);
    }

    #[test]
    fn with_values_does_not_touch_source() {
        let t = int_table(&[&[1, 2]]);
        let w = t.with_values(&[0], &[0], &DataValue::Int32(9));
        assert_eq!(t.value(0, 0), &DataValue::Int32(1));
        assert_eq!(w.value(0, 0), &DataValue::Int32(9));
    }

    #[test]
    fn empty_with_columns_keeps_labels() {
        let t = Table::empty_with_columns(vec!["x".into(), "y".into()]);
        assert_eq!(t.num_rows(), 0);
        assert_eq!(t.num_cols(), 2);
        assert_eq!(t.col_labels(), &[Label::from("x"), Label::from("y")]);
    }
}
