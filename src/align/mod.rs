//! Alignment protocols that prepare partitioned tables for combination.
//!
//! Three protocols, all dispatched as single units of work that re-split
//! their result: co-partition combine for binary operations, reindex for
//! join/concat preparation, and partition-length matching for merge.
//!
//! The identity preconditions of these protocols (already co-partitioned,
//! already identical index) are deliberately unchecked in production:
//! checking would materialize data eagerly and defeat the async model.
//! Violating them silently yields misaligned data.
//! [`BlockGrid::check_frames`] is the opt-in debugging assertion.
//!
//! [`BlockGrid::check_frames`]: crate::partition::BlockGrid::check_frames

mod combine;
mod matching;
mod reindex;

pub use combine::{combine, CombineFn, CombineOutput, CombineRequest};
pub use matching::match_partitioning;
pub use reindex::{reindex, ReindexRequest};
