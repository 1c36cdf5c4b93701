use std::collections::HashMap;

use parking_lot::Mutex;

use crate::partition::{BlockData, Partition};
use crate::substrate::Substrate;
use crate::table::Table;

/// Cache of all-null filler blocks, keyed by shape.
///
/// Explicitly owned by the coordination layer rather than process-global.
/// A block is uploaded once per shape on first request and never evicted.
#[derive(Default)]
pub struct NanBlockPool {
    blocks: Mutex<HashMap<(usize, usize), Partition>>,
}

impl NanBlockPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of an all-null block of the given shape, with rows and
    /// columns swapped first if `transpose` is set.
    pub fn get_or_create(
        &self,
        substrate: &Substrate,
        num_rows: usize,
        num_cols: usize,
        transpose: bool,
    ) -> Partition {
        let shape = if transpose {
            (num_cols, num_rows)
        } else {
            (num_rows, num_cols)
        };
        self.blocks
            .lock()
            .entry(shape)
            .or_insert_with(|| {
                substrate.upload(BlockData::Table(Table::nan_block(shape.0, shape.1)))
            })
            .clone()
    }
}
