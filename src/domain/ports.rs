use async_trait::async_trait;

use super::errors::StoreError;
use super::order::Order;

/// Durable home of order aggregates.
pub trait OrderRepository: Send + Sync + 'static {
    /// Writes the whole aggregate in one transaction. A duplicate `order_uid`
    /// fails with [`StoreError::Conflict`] and leaves the stored copy untouched.
    fn persist(&self, order: &Order) -> Result<(), StoreError>;

    /// Rebuilds the aggregate. A missing delivery or payment row yields the
    /// default sub-record rather than an error.
    fn fetch(&self, order_uid: &str) -> Result<Order, StoreError>;

    /// Up to `limit` of the most recently created orders, oldest first.
    fn recent(&self, limit: usize) -> Result<Vec<Order>, StoreError>;
}

/// One record read off the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMessage {
    pub key: Option<Vec<u8>>,
    pub payload: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to read message: {0}")]
pub struct SourceError(pub String);

/// A stream of order messages. Reading advances the cursor: a returned
/// message is never redelivered by the source.
#[async_trait]
pub trait MessageSource: Send {
    /// Blocks until a message is available. `Ok(None)` means the stream has
    /// ended and no further messages will arrive.
    async fn next_message(&mut self) -> Result<Option<StreamMessage>, SourceError>;
}
