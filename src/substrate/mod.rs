//! The execution substrate: async dispatch of units of work.
//!
//! A [`Substrate`] turns a computation into a [`Handle`] without blocking.
//! Handles are cheap to clone, compare by identity, and resolve to a shared
//! `Arc` of the result. A failure inside a dispatched unit of work (a panic
//! in the task) stays invisible until a caller resolves the handle; this
//! layer neither retries nor interprets it.

use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{self, BoxFuture, Shared};
use futures::FutureExt;
use tracing::trace;

/// The error type of a dispatched unit of work.
///
/// Cloneable so that every clone of a handle observes the same failure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("task panicked: {0}")]
    Panic(String),
    #[error("task canceled before completion")]
    Canceled,
}

pub type TaskResult<T> = Result<T, TaskError>;

type SharedTask<T> = Shared<BoxFuture<'static, TaskResult<Arc<T>>>>;

/// A future-like handle to a substrate-owned value.
///
/// Equality and hashing go by handle identity, not by the value behind it.
pub struct Handle<T> {
    id: u64,
    task: SharedTask<T>,
}

impl<T> Handle<T> {
    /// Process-unique id of this handle.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Block (asynchronously) until the value is materialized.
    pub async fn resolve(&self) -> TaskResult<Arc<T>> {
        self.task.clone().await
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Handle {
            id: self.id,
            task: self.task.clone(),
        }
    }
}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.id);
    }
}

impl<T> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handle#{}", self.id)
    }
}

/// Dispatches units of work onto the tokio runtime and hands out ids.
///
/// Explicitly constructed and owned by the caller; there is no ambient
/// process-global substrate.
#[derive(Default)]
pub struct Substrate {
    next_id: AtomicU64,
}

impl Substrate {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Submit a unit of work for async execution. Returns immediately.
    ///
    /// Must be called within a tokio runtime. There is no cancellation or
    /// timeout: once dispatched, the task runs to completion.
    pub fn submit<T, F>(&self, task: F) -> Handle<T>
    where
        T: Send + Sync + 'static,
        F: Future<Output = TaskResult<T>> + Send + 'static,
    {
        let id = self.issue_id();
        trace!(id, "submit task");
        let join = tokio::spawn(task);
        let task = async move {
            match join.await {
                Ok(Ok(v)) => Ok(Arc::new(v)),
                Ok(Err(e)) => Err(e),
                Err(e) if e.is_panic() => Err(TaskError::Panic(e.to_string())),
                Err(_) => Err(TaskError::Canceled),
            }
        }
        .boxed()
        .shared();
        Handle { id, task }
    }

    /// Put a local value into substrate-managed storage.
    pub fn upload<T>(&self, value: T) -> Handle<T>
    where
        T: Send + Sync + 'static,
    {
        let id = self.issue_id();
        trace!(id, "upload value");
        Handle {
            id,
            task: future::ready(Ok(Arc::new(value))).boxed().shared(),
        }
    }

    /// A handle projecting a view of another handle's value.
    ///
    /// The projection runs inline when the child is first resolved; an
    /// upstream failure propagates to the child.
    pub fn derive<T, U, F>(&self, parent: &Handle<T>, f: F) -> Handle<U>
    where
        T: Send + Sync + 'static,
        U: Send + Sync + 'static,
        F: FnOnce(&T) -> U + Send + 'static,
    {
        let id = self.issue_id();
        let parent = parent.clone();
        let task = async move {
            let value = parent.resolve().await?;
            Ok(Arc::new(f(&value)))
        }
        .boxed()
        .shared();
        Handle { id, task }
    }

    /// Split a handle to a sequence of `n` values into `n` element handles.
    ///
    /// The counterpart of a multi-return dispatch: one task computes all
    /// slots, each child handle projects one of them.
    pub fn scatter<T>(&self, parent: &Handle<Vec<T>>, n: usize) -> Vec<Handle<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        (0..n)
            .map(|i| self.derive(parent, move |items: &Vec<T>| items[i].clone()))
            .collect()
    }
}

/// Materialize a batch of handles, preserving order.
pub async fn resolve_all<T>(handles: &[Handle<T>]) -> TaskResult<Vec<Arc<T>>> {
    future::try_join_all(handles.iter().map(Handle::resolve)).await
}
