use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ProtocolError, ProtocolResult};
use crate::message::MAX_MESSAGE_SIZE;

/// JSON codec for RPC request and response bodies.
pub struct JsonCodec;

impl JsonCodec {
    /// Decode a request body. An empty body decodes as `{}` so every field
    /// takes its default.
    pub fn decode<T: DeserializeOwned>(data: &[u8]) -> ProtocolResult<T> {
        if data.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: data.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        let data = if data.iter().all(u8::is_ascii_whitespace) {
            b"{}".as_slice()
        } else {
            data
        };
        serde_json::from_slice(data).map_err(|e| ProtocolError::Deserialization(e.to_string()))
    }

    /// Encode a response body.
    pub fn encode<T: Serialize>(msg: &T) -> ProtocolResult<Vec<u8>> {
        serde_json::to_vec(msg).map_err(|e| ProtocolError::Serialization(e.to_string()))
    }
}
