//! # Event publication contract (C9)
//!
//! Grounded in `Plawn-r2e/r2e-events-rabbitmq`: `lapin` is the AMQP client
//! used for exactly this producer role. Per the §9 redesign flag
//! ("interface with one method `Publish(topic, key, payload)`; concrete bus
//! driver injected at composition"), [`Publisher`] is the single seam every
//! service depends on; [`LapinPublisher`] is the concrete driver and
//! [`NullPublisher`] a test double that records calls instead of dialing a
//! broker.

use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, ExchangeDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Connection, ConnectionProperties, ExchangeKind};
use serde_json::Value;
use std::sync::Mutex;

/// A published message: producer-owned, consumed only by named subscribers
/// per spec §3.3.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publishes `payload` to `topic` keyed by `key` (the producing
    /// entity's stable id, per the topic table in spec §6.2).
    async fn publish(&self, topic: &str, key: &str, payload: &Value) -> Result<(), String>;
}

/// Single topic exchange; `key` becomes the AMQP routing key so subscribers
/// can bind on the entity id when they need to.
const EXCHANGE: &str = "payment-gateway.events";

/// `lapin`-backed publisher. One channel is opened per publish call: these
/// services are low-QPS control-plane traffic (registration, card lifecycle,
/// password reset), not a hot path, so channel reuse is not worth the extra
/// state.
pub struct LapinPublisher {
    connection: Connection,
}

impl LapinPublisher {
    pub async fn connect(amqp_url: &str) -> Result<Self, lapin::Error> {
        let connection = Connection::connect(amqp_url, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        channel
            .exchange_declare(
                EXCHANGE,
                ExchangeKind::Topic,
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl Publisher for LapinPublisher {
    async fn publish(&self, topic: &str, key: &str, payload: &Value) -> Result<(), String> {
        let channel = self
            .connection
            .create_channel()
            .await
            .map_err(|e| e.to_string())?;
        let body = serde_json::to_vec(payload).map_err(|e| e.to_string())?;
        let routing_key = format!("{topic}.{key}");
        channel
            .basic_publish(
                EXCHANGE,
                &routing_key,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default().with_delivery_mode(2),
            )
            .await
            .map_err(|e| e.to_string())?
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Test double: records every call instead of dialing a broker.
#[derive(Default)]
pub struct NullPublisher {
    pub published: Mutex<Vec<(String, String, Value)>>,
}

impl NullPublisher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Publisher for NullPublisher {
    async fn publish(&self, topic: &str, key: &str, payload: &Value) -> Result<(), String> {
        self.published
            .lock()
            .expect("lock poisoned")
            .push((topic.to_string(), key.to_string(), payload.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn null_publisher_records_calls() {
        let publisher = NullPublisher::new();
        publisher
            .publish("email-service-topic-auth-register", "user-1", &json!({"email": "a@b.c"}))
            .await
            .unwrap();
        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "email-service-topic-auth-register");
        assert_eq!(published[0].1, "user-1");
    }
}
