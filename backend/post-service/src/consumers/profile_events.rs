/// Profile-events consumer
///
/// Long-lived task that consumes `{ownerId, displayName, avatarRef}`
/// events (at-least-once, unordered) and converges every live post of the
/// owner to the new snapshot with one set-based update. The offset is
/// committed only after the repair commits, or after the event lands on
/// the dead-letter topic; a crash before either point causes redelivery.
///
/// Events carry no version stamp, so the repair is an unconditional
/// last-write-wins overwrite. Replaying an identical event any number of
/// times converges to the same state; a reordered redelivery of an older
/// event can regress the snapshot until the next profile change.
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::Utc;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::KafkaConfig;
use crate::db::PostStore;
use crate::models::ProfileChangedEvent;

const MAX_RETRIES: u32 = 3;
const RETRY_BASE_BACKOFF_MS: u64 = 100;

pub struct ProfileEventsConsumer {
    consumer: StreamConsumer,
    dlq_producer: FutureProducer,
    store: Arc<dyn PostStore>,
    topic: String,
    dlq_topic: String,
}

impl ProfileEventsConsumer {
    pub fn new(config: &KafkaConfig, store: Arc<dyn PostStore>) -> Result<Self> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("auto.offset.reset", "earliest")
            .set("enable.auto.commit", "false")
            .set("session.timeout.ms", "6000")
            .set("heartbeat.interval.ms", "2000")
            .create()
            .map_err(|e| anyhow!("failed to create Kafka consumer: {e}"))?;

        consumer
            .subscribe(&[&config.profile_events_topic])
            .map_err(|e| anyhow!("failed to subscribe to {}: {e}", config.profile_events_topic))?;

        let dlq_producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| anyhow!("failed to create DLQ producer: {e}"))?;

        Ok(Self {
            consumer,
            dlq_producer,
            store,
            topic: config.profile_events_topic.clone(),
            dlq_topic: config.dlq_topic.clone(),
        })
    }

    /// Consume until a shutdown signal arrives. Cancellation happens only
    /// at event boundaries, never mid-update: an in-flight repair
    /// finishes (and commits its offset) before the loop exits.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        info!(topic = %self.topic, "profile events consumer started");

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("profile events consumer shutting down");
                    return Ok(());
                }
                received = self.consumer.recv() => {
                    match received {
                        Ok(msg) => {
                            // Undecodable payloads are parked on the DLQ like
                            // any other poison message; the offset moves only
                            // once the parked record is durable.
                            let payload = match decode_payload(msg.payload()) {
                                Ok(p) => p.to_owned(),
                                Err((reason, rendition)) => {
                                    warn!("undecodable event payload: {reason}");
                                    match self.send_to_dlq(&rendition, &reason).await {
                                        Ok(()) => {
                                            if let Err(e) = self
                                                .consumer
                                                .commit_message(&msg, CommitMode::Async)
                                            {
                                                warn!("offset commit failed: {e}");
                                            }
                                        }
                                        Err(dlq_err) => {
                                            error!("DLQ publish failed, event will be redelivered: {dlq_err}");
                                        }
                                    }
                                    continue;
                                }
                            };

                            match self.handle_payload(&payload).await {
                                Ok(()) => {
                                    if let Err(e) =
                                        self.consumer.commit_message(&msg, CommitMode::Async)
                                    {
                                        warn!("offset commit failed: {e}");
                                    }
                                }
                                Err(e) => {
                                    error!("profile event processing failed: {e}");
                                    // Commit only once the event is parked on
                                    // the DLQ; otherwise leave the offset so
                                    // the broker redelivers.
                                    match self.send_to_dlq(&payload, &e.to_string()).await {
                                        Ok(()) => {
                                            if let Err(e) = self
                                                .consumer
                                                .commit_message(&msg, CommitMode::Async)
                                            {
                                                warn!("offset commit failed: {e}");
                                            }
                                        }
                                        Err(dlq_err) => {
                                            error!("DLQ publish failed, event will be redelivered: {dlq_err}");
                                        }
                                    }
                                }
                            }
                        }
                        Err(e) => {
                            error!("Kafka consumer error: {e}");
                            tokio::time::sleep(Duration::from_secs(5)).await;
                        }
                    }
                }
            }
        }
    }

    /// Parse and apply one event with bounded retries. Malformed payloads
    /// fail immediately; transient store errors back off exponentially.
    async fn handle_payload(&self, payload: &str) -> Result<()> {
        let event: ProfileChangedEvent = serde_json::from_str(payload)
            .map_err(|e| anyhow!("malformed profile event: {e}"))?;

        let mut last_err = None;
        for attempt in 0..=MAX_RETRIES {
            match self.apply(&event).await {
                Ok(repaired) => {
                    info!(
                        owner_id = %event.owner_id,
                        repaired,
                        "denormalized profile repaired"
                    );
                    return Ok(());
                }
                Err(e) => {
                    if attempt < MAX_RETRIES {
                        let backoff =
                            Duration::from_millis(RETRY_BASE_BACKOFF_MS * 2_u64.pow(attempt));
                        warn!(
                            owner_id = %event.owner_id,
                            attempt = attempt + 1,
                            backoff_ms = backoff.as_millis() as u64,
                            "repair failed, retrying: {e}"
                        );
                        tokio::time::sleep(backoff).await;
                    }
                    last_err = Some(e);
                }
            }
        }

        Err(anyhow!(
            "repair for owner {} exhausted {MAX_RETRIES} retries: {}",
            event.owner_id,
            last_err.map(|e| e.to_string()).unwrap_or_default()
        ))
    }

    async fn apply(&self, event: &ProfileChangedEvent) -> Result<u64> {
        let repaired = self
            .store
            .repair_owner_profile(
                event.owner_id,
                &event.display_name,
                &event.avatar_ref,
                Utc::now().timestamp(),
            )
            .await
            .map_err(|e| anyhow!("bulk repair failed: {e}"))?;

        Ok(repaired)
    }

    async fn send_to_dlq(&self, original_payload: &str, reason: &str) -> Result<()> {
        let dlq_event = json!({
            "originalPayload": original_payload,
            "reason": reason,
            "failedAt": Utc::now().to_rfc3339(),
        })
        .to_string();

        let key = format!("dlq-{}", Uuid::new_v4());
        self.dlq_producer
            .send(
                FutureRecord::to(&self.dlq_topic)
                    .key(&key)
                    .payload(&dlq_event),
                Duration::from_secs(5),
            )
            .await
            .map_err(|(e, _)| anyhow!("DLQ send failed: {e}"))?;

        info!(key, topic = %self.dlq_topic, "event parked on dead-letter topic");
        Ok(())
    }
}

/// Decode a raw message payload for parsing. Failures yield the reason
/// plus a lossy rendition of the bytes for the dead-letter record.
fn decode_payload(raw: Option<&[u8]>) -> std::result::Result<&str, (String, String)> {
    match raw {
        Some(bytes) => std::str::from_utf8(bytes).map_err(|e| {
            (
                format!("non-UTF-8 payload: {e}"),
                String::from_utf8_lossy(bytes).into_owned(),
            )
        }),
        None => Err(("empty payload".to_string(), String::new())),
    }
}
