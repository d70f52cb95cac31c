//! Message types for the consumer.

use serde::Deserialize;

use crate::errors::ConsumerError;

/// A property lifecycle event as published on the broker.
///
/// Any other fields in the payload are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PropertyEvent {
    /// The operation to apply: `create`, `update`, or `delete`. Unknown
    /// operations are acknowledged and ignored for forward compatibility.
    #[serde(default)]
    pub operation: String,

    /// The affected property's id.
    #[serde(default, rename = "propertyId")]
    pub property_id: String,
}

impl PropertyEvent {
    /// Decode a broker payload.
    ///
    /// Malformed JSON and events missing `operation` or `propertyId` are
    /// decode errors; the consumer rejects those without requeueing.
    pub fn decode(payload: &[u8]) -> Result<Self, ConsumerError> {
        let event: PropertyEvent = serde_json::from_slice(payload)
            .map_err(|e| ConsumerError::decode(e.to_string()))?;

        if event.operation.is_empty() {
            return Err(ConsumerError::decode("event has empty operation"));
        }
        if event.property_id.is_empty() {
            return Err(ConsumerError::decode("event has empty propertyId"));
        }

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_event() {
        let event =
            PropertyEvent::decode(br#"{"operation":"create","propertyId":"p1"}"#).unwrap();
        assert_eq!(event.operation, "create");
        assert_eq!(event.property_id, "p1");
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let event = PropertyEvent::decode(
            br#"{"operation":"update","propertyId":"p1","timestamp":12345,"source":"api"}"#,
        )
        .unwrap();
        assert_eq!(event.operation, "update");
    }

    #[test]
    fn test_decode_malformed_json() {
        assert!(PropertyEvent::decode(b"{not json").is_err());
    }

    #[test]
    fn test_decode_missing_operation() {
        assert!(PropertyEvent::decode(br#"{"propertyId":"p1"}"#).is_err());
    }

    #[test]
    fn test_decode_missing_property_id() {
        assert!(PropertyEvent::decode(br#"{"operation":"delete"}"#).is_err());
    }

    #[test]
    fn test_decode_unknown_operation_is_not_a_decode_error() {
        // Unknown operations pass decoding; the dispatcher acks and skips them.
        let event =
            PropertyEvent::decode(br#"{"operation":"archive","propertyId":"p1"}"#).unwrap();
        assert_eq!(event.operation, "archive");
    }
}
