//! The per-item operation capability
//!
//! The engine is generic over one capability: an async function from a text
//! item to a tagged result. Concrete probes implement [`ItemProcessor`];
//! closures are adapted with [`process_fn`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Per-item failure, stored as data in the item's result slot
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemError {
    /// The operation did not finish within its own time limit
    #[error("timeout")]
    Timeout,

    /// The operation observed cancellation and gave up
    #[error("cancelled")]
    Cancelled,

    /// Transport-level failure
    #[error("{0}")]
    Network(String),

    /// The operation ran but its output could not be interpreted
    #[error("{0}")]
    Decode(String),

    /// Any other failure
    #[error("{0}")]
    Failed(String),
}

impl ItemError {
    pub fn failed(message: impl Into<String>) -> Self {
        ItemError::Failed(message.into())
    }
}

/// Tagged value held by one result slot: a success value or an error, never both
pub type ItemResult<V> = std::result::Result<V, ItemError>;

/// An async per-item operation.
///
/// Implementations are expected to honour `cancel` themselves and to return
/// within a bounded time of their own choosing. Failures are returned as
/// [`ItemError`] values and never abort the run.
#[async_trait]
pub trait ItemProcessor: Send + Sync {
    /// Success value of one item
    type Output: Send;

    async fn process(&self, item: &str, cancel: &CancellationToken) -> ItemResult<Self::Output>;
}

/// [`ItemProcessor`] backed by a closure
#[derive(Clone)]
pub struct ProcessFn<F> {
    f: F,
}

/// Adapt a closure `(item, cancel) -> future` into an [`ItemProcessor`]
pub fn process_fn<F, Fut, V>(f: F) -> ProcessFn<F>
where
    F: Fn(String, CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = ItemResult<V>> + Send,
{
    ProcessFn { f }
}

#[async_trait]
impl<F, Fut, V> ItemProcessor for ProcessFn<F>
where
    F: Fn(String, CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = ItemResult<V>> + Send,
    V: Send,
{
    type Output = V;

    async fn process(&self, item: &str, cancel: &CancellationToken) -> ItemResult<V> {
        (self.f)(item.to_string(), cancel.clone()).await
    }
}
