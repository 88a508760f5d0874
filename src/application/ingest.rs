//! Consumption loop: stream -> decode -> validate -> persist -> cache.
//!
//! Each message either ends up cached or is discarded at the first stage
//! that rejects it. Discards are logged and never stop the loop, and a
//! discarded message is not retried.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;

use crate::cache::OrderCache;
use crate::codec::{self, DecodeError};
use crate::domain::errors::{StoreError, ValidationError};
use crate::domain::ports::{MessageSource, OrderRepository, StreamMessage};
use crate::domain::validation::validate_order;

/// Why a message was dropped, tagged by the stage that dropped it.
#[derive(Debug, Error)]
pub enum Discard {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("order {order_uid} rejected: {error}")]
    Invalid {
        order_uid: String,
        error: ValidationError,
    },
    #[error("order {order_uid} not persisted: {error}")]
    Persist { order_uid: String, error: StoreError },
}

#[derive(Debug)]
pub enum Outcome {
    Cached { order_uid: String },
    Discarded(Discard),
}

impl Outcome {
    pub fn is_cached(&self) -> bool {
        matches!(self, Outcome::Cached { .. })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub received: u64,
    pub cached: u64,
    pub discarded: u64,
    pub read_errors: u64,
}

/// Pause after a failed read before asking the source again.
pub const READ_RETRY_DELAY: Duration = Duration::from_secs(1);

pub struct IngestPipeline<R, S> {
    stages: Stages<R>,
    source: S,
    retry_delay: Duration,
}

/// Everything after the read. Kept apart from the source so processing only
/// borrows shared state.
struct Stages<R> {
    repo: Arc<R>,
    cache: Arc<OrderCache>,
}

impl<R, S> IngestPipeline<R, S>
where
    R: OrderRepository,
    S: MessageSource,
{
    pub fn new(repo: Arc<R>, cache: Arc<OrderCache>, source: S) -> Self {
        Self {
            stages: Stages { repo, cache },
            source,
            retry_delay: READ_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Consumes until `shutdown` flips to `true`, its sender is dropped, or
    /// the source ends. The signal is checked before every read; a message
    /// already being processed is finished first.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> IngestSummary {
        let mut summary = IngestSummary::default();

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            let next = tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                next = self.source.next_message() => next,
            };

            let msg = match next {
                Ok(Some(msg)) => msg,
                Ok(None) => {
                    log::info!("Order stream ended");
                    break;
                }
                Err(e) => {
                    summary.read_errors += 1;
                    log::error!("{}", e);
                    tokio::select! {
                        changed = shutdown.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                        _ = tokio::time::sleep(self.retry_delay) => {}
                    }
                    continue;
                }
            };

            summary.received += 1;
            match self.stages.process(msg).await {
                Outcome::Cached { order_uid } => {
                    summary.cached += 1;
                    log::info!("Order {} processed successfully", order_uid);
                }
                Outcome::Discarded(reason) => {
                    summary.discarded += 1;
                    log::warn!("Discarding message: {}", reason);
                }
            }
        }

        log::info!(
            "Shutting down order consumer ({} received, {} cached, {} discarded)",
            summary.received,
            summary.cached,
            summary.discarded
        );
        summary
    }

    /// Runs one message through every stage.
    pub async fn process(&self, msg: StreamMessage) -> Outcome {
        self.stages.process(msg).await
    }
}

impl<R: OrderRepository> Stages<R> {
    async fn process(&self, msg: StreamMessage) -> Outcome {
        let order = match codec::decode_order(&msg.payload) {
            Ok(order) => order,
            Err(e) => return Outcome::Discarded(e.into()),
        };
        log::info!("Received order: {}", order.order_uid);

        if let Some(key) = msg.key.as_deref() {
            if key != order.order_uid.as_bytes() {
                log::warn!(
                    "Message key {:?} does not match order_uid {}",
                    String::from_utf8_lossy(key),
                    order.order_uid
                );
            }
        }

        if let Err(error) = validate_order(&order) {
            return Outcome::Discarded(Discard::Invalid {
                order_uid: order.order_uid,
                error,
            });
        }

        let order_uid = order.order_uid.clone();
        let repo = Arc::clone(&self.repo);
        let persisted = tokio::task::spawn_blocking(move || {
            let result = repo.persist(&order);
            result.map(|()| order)
        })
        .await
        .unwrap_or_else(|e| Err(StoreError::Internal(e.to_string())));

        match persisted {
            Ok(order) => {
                self.cache.add(order_uid.clone(), Arc::new(order));
                Outcome::Cached { order_uid }
            }
            Err(error) => Outcome::Discarded(Discard::Persist { order_uid, error }),
        }
    }
}
