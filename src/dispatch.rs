//! Map-partitions dispatch: apply a function across a list of partitions.

use std::sync::Arc;

use crate::partition::{BlockData, Partition};
use crate::substrate::Substrate;
use crate::Error;

/// A per-partition computation.
pub type BlockFn = Arc<dyn Fn(&BlockData) -> BlockData + Send + Sync>;

/// A per-partition computation with one extra argument.
pub type BlockFnWith<E> = Arc<dyn Fn(&BlockData, &E) -> BlockData + Send + Sync>;

/// Dispatch `func` once per partition.
///
/// Result order matches input order and partition boundaries are never
/// changed by this operation.
pub fn map_partitions(
    substrate: &Substrate,
    func: BlockFn,
    partitions: &[Partition],
) -> Vec<Partition> {
    partitions
        .iter()
        .map(|part| {
            let func = func.clone();
            let part = part.clone();
            substrate.submit(async move {
                let block = part.resolve().await?;
                Ok(func(&block))
            })
        })
        .collect()
}

/// Dispatch `func(partition, extra)` with positional pairing.
///
/// `extras` must have exactly one entry per partition; a mismatch is
/// rejected before any unit of work is dispatched. Several extra-argument
/// lists are expressed by making `E` a tuple.
pub fn map_partitions_with<E>(
    substrate: &Substrate,
    func: BlockFnWith<E>,
    partitions: &[Partition],
    extras: Vec<E>,
) -> Result<Vec<Partition>, Error>
where
    E: Send + Sync + 'static,
{
    if extras.len() != partitions.len() {
        return Err(Error::ArgListLength {
            expected: partitions.len(),
            actual: extras.len(),
        });
    }
    Ok(partitions
        .iter()
        .zip(extras)
        .map(|(part, extra)| {
            let func = func.clone();
            let part = part.clone();
            substrate.submit(async move {
                let block = part.resolve().await?;
                Ok(func(&block, &extra))
            })
        })
        .collect())
}
