//! RabbitMQ consumer for property lifecycle events.

mod messages;
mod rabbitmq;

pub use messages::PropertyEvent;
pub use rabbitmq::{RabbitMqConsumer, PROPERTY_EVENTS_QUEUE};
