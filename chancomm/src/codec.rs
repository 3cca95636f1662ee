//! Payload serialization for channel values.
//!
//! Channel slots carry values type-erased as bytes so one matching table can
//! serve every payload type; [`JsonCodec`] is the single codec this crate
//! ships. Encode on `set`, decode on `get`.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CommError;

/// JSON codec for channel payloads.
///
/// # Example
///
/// ```rust
/// use chancomm::JsonCodec;
///
/// let bytes = JsonCodec::encode(&42i32).unwrap();
/// let value: i32 = JsonCodec::decode(&bytes).unwrap();
/// assert_eq!(value, 42);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a value to bytes.
    pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CommError> {
        Ok(serde_json::to_vec(value)?)
    }

    /// Decode a value from bytes.
    pub fn decode<T: DeserializeOwned>(buf: &[u8]) -> Result<T, CommError> {
        Ok(serde_json::from_slice(buf)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        seq: u32,
        body: String,
    }

    #[test]
    fn roundtrip_scalar() {
        let bytes = JsonCodec::encode(&7i32).unwrap();
        let value: i32 = JsonCodec::decode(&bytes).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn roundtrip_struct() {
        let msg = Payload {
            seq: 3,
            body: "hello".to_string(),
        };
        let bytes = JsonCodec::encode(&msg).unwrap();
        let decoded: Payload = JsonCodec::decode(&bytes).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn decode_type_mismatch_is_error() {
        let bytes = JsonCodec::encode(&"not a number").unwrap();
        let result: Result<i32, _> = JsonCodec::decode(&bytes);
        assert!(matches!(result, Err(CommError::Codec(_))));
    }
}
