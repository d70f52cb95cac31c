//! RabbitMQ consumer implementation.
//!
//! Subscribes to the durable `property_events` queue and applies each
//! event to the index through the service façade. Prefetch is one, so a
//! consumer instance processes messages serially; throughput scales by
//! running more replicas against the same queue.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicQosOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{Channel, Connection, ConnectionProperties};
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

use crate::consumer::messages::PropertyEvent;
use crate::errors::{ConsumerError, ServiceError};
use crate::service::SearchService;

/// The queue carrying property lifecycle events.
pub const PROPERTY_EVENTS_QUEUE: &str = "property_events";

/// Consumer tag registered with the broker.
const CONSUMER_TAG: &str = "property-search";

/// Per-message processing deadline, propagated to the service.
const MESSAGE_DEADLINE: Duration = Duration::from_secs(30);

/// AMQP reply code used on graceful close.
const REPLY_SUCCESS: u16 = 200;

/// RabbitMQ consumer for property events.
pub struct RabbitMqConsumer {
    connection: Connection,
    channel: Channel,
    queue_name: String,
    service: Arc<SearchService>,
}

impl RabbitMqConsumer {
    /// Connect to the broker and declare the queue.
    ///
    /// The queue is declared durable, non-exclusive, and not auto-deleted.
    /// A declaration failure fails startup.
    pub async fn connect(
        rabbitmq_url: &str,
        queue_name: &str,
        service: Arc<SearchService>,
    ) -> Result<Self, ConsumerError> {
        info!(url = %rabbitmq_url, "connecting to RabbitMQ");

        let connection =
            Connection::connect(rabbitmq_url, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;

        channel
            .queue_declare(
                queue_name,
                QueueDeclareOptions {
                    durable: true,
                    exclusive: false,
                    auto_delete: false,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        info!(queue = %queue_name, "queue declared");

        Ok(Self {
            connection,
            channel,
            queue_name: queue_name.to_string(),
            service,
        })
    }

    /// Consume messages until the shutdown signal fires.
    ///
    /// The in-flight message always settles before the loop exits: message
    /// handling completes inline between stream polls.
    #[instrument(skip(self, shutdown))]
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) -> Result<(), ConsumerError> {
        // One unacked message at a time per consumer instance.
        self.channel
            .basic_qos(1, BasicQosOptions::default())
            .await?;

        let mut consumer = self
            .channel
            .basic_consume(
                &self.queue_name,
                CONSUMER_TAG,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;

        info!(queue = %self.queue_name, "consuming property events");

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("consumer received shutdown signal");
                    break;
                }
                delivery = consumer.next() => {
                    match delivery {
                        Some(Ok(delivery)) => self.process_delivery(delivery).await,
                        Some(Err(e)) => {
                            error!(error = %e, "broker delivery error");
                        }
                        None => {
                            info!("broker stream ended");
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Decode, dispatch, and settle one delivery.
    ///
    /// Settlement policy: malformed events are nacked without requeue;
    /// everything else is acked, including handler failures, which are
    /// logged instead of retried.
    async fn process_delivery(&self, delivery: lapin::message::Delivery) {
        let event = match PropertyEvent::decode(&delivery.data) {
            Ok(event) => event,
            Err(e) => {
                error!(error = %e, "rejecting undecodable event");
                if let Err(nack_err) = delivery
                    .nack(BasicNackOptions {
                        requeue: false,
                        ..Default::default()
                    })
                    .await
                {
                    error!(error = %nack_err, "failed to nack message");
                }
                return;
            }
        };

        debug!(operation = %event.operation, id = %event.property_id, "dispatching event");

        let handled = tokio::time::timeout(MESSAGE_DEADLINE, self.dispatch(&event)).await;

        match handled {
            Ok(Ok(())) => {
                debug!(operation = %event.operation, id = %event.property_id, "event processed");
            }
            Ok(Err(e)) => {
                // Logged and acked: no in-process retry, no dead-letter queue.
                error!(
                    operation = %event.operation,
                    id = %event.property_id,
                    error = %e,
                    "event processing failed"
                );
            }
            Err(_) => {
                error!(
                    operation = %event.operation,
                    id = %event.property_id,
                    deadline_secs = MESSAGE_DEADLINE.as_secs(),
                    "event processing timed out"
                );
            }
        }

        if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
            error!(error = %e, "failed to ack message");
        }
    }

    /// Route an event to the matching service operation.
    async fn dispatch(&self, event: &PropertyEvent) -> Result<(), ServiceError> {
        match event.operation.as_str() {
            "create" => self.service.on_create(&event.property_id).await,
            "update" => self.service.on_update(&event.property_id).await,
            "delete" => self.service.on_delete(&event.property_id).await,
            other => {
                warn!(operation = %other, id = %event.property_id, "ignoring unknown operation");
                Ok(())
            }
        }
    }

    /// Close the channel, then the connection.
    pub async fn close(&self) {
        if let Err(e) = self.channel.close(REPLY_SUCCESS, "shutting down").await {
            warn!(error = %e, "error closing broker channel");
        }
        if let Err(e) = self.connection.close(REPLY_SUCCESS, "shutting down").await {
            warn!(error = %e, "error closing broker connection");
        }
        info!("broker connections closed");
    }
}
