//! Coordination layer for a logical table physically split into a 2-D grid
//! of independently computed, immutable partitions.
//!
//! Table-wide operations become embarrassingly parallel per-partition
//! computations plus a thin metadata layer that preserves global row and
//! column addressing across the split:
//!
//! - [`partition`]: splitting tables into near-equal blocks, the
//!   (partition, offset) coordinate metadata, and the [`BlockGrid`] of
//!   partition handles.
//! - [`dispatch`]: mapping a function across partitions.
//! - [`extract`]: coordinate-selection masking of a grid.
//! - [`align`]: the protocols that prepare two partitioned tables, or one
//!   table against a new index, for combination.
//! - [`cache`]: LRU cache, memoized dispatch, and the null-block pool.
//! - [`substrate`]: the async execution substrate handing out future-like
//!   handles.
//! - [`table`]: the pluggable table primitive the partitions hold.
//!
//! Partitions are immutable and share no state, so dispatch across a grid
//! has no ordering requirement between distinct partitions; order only
//! matters within the slices of a single logical operation.
//!
//! [`BlockGrid`]: partition::BlockGrid

#![deny(unused_must_use)]

pub mod align;
pub mod assemble;
pub mod cache;
pub mod dispatch;
pub mod extract;
pub mod partition;
pub mod substrate;
pub mod table;
pub mod types;

use crate::substrate::TaskError;
use crate::types::Axis;

/// The error type of the coordination layer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("task error: {0}")]
    Task(#[from] TaskError),
    #[error("extra argument list has {actual} entries, expected one per partition ({expected})")]
    ArgListLength { expected: usize, actual: usize },
    #[error("grid row {row} has {actual} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{axis:?} frame covers {actual} positions but partitions hold {expected}")]
    FrameMismatch {
        axis: Axis,
        expected: usize,
        actual: usize,
    },
}
