use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::error::KafkaError;
use rdkafka::message::Message;

use crate::config::KafkaConfig;
use crate::domain::ports::{MessageSource, SourceError, StreamMessage};

/// Consumer-group reader over the orders topic.
///
/// Offsets are stored as soon as a message is handed out and committed in the
/// background, so a message is never redelivered once it has been read.
pub struct KafkaSource {
    consumer: StreamConsumer,
}

impl KafkaSource {
    pub fn new(cfg: &KafkaConfig) -> Result<Self, KafkaError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &cfg.brokers)
            .set("group.id", &cfg.group_id)
            .set("enable.auto.commit", "true")
            .set("enable.auto.offset.store", "true")
            .set("auto.offset.reset", "earliest")
            .create()?;
        consumer.subscribe(&[cfg.topic.as_str()])?;
        log::info!(
            "Kafka consumer subscribed to {} on {} (group {})",
            cfg.topic,
            cfg.brokers,
            cfg.group_id
        );
        Ok(Self { consumer })
    }
}

#[async_trait]
impl MessageSource for KafkaSource {
    async fn next_message(&mut self) -> Result<Option<StreamMessage>, SourceError> {
        let msg = self
            .consumer
            .recv()
            .await
            .map_err(|e| SourceError(e.to_string()))?;
        Ok(Some(StreamMessage {
            key: msg.key().map(<[u8]>::to_vec),
            payload: msg.payload().map(<[u8]>::to_vec).unwrap_or_default(),
        }))
    }
}
