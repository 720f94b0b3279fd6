//! JSON codec using `serde_json`.
//!
//! Wraps envelope encode/decode behind a marker struct with static
//! methods. This keeps the wire format decision in one place; the
//! dispatcher never calls `serde_json` directly for whole envelopes.
//!
//! # Example
//!
//! ```
//! use jsonwire::codec::JsonCodec;
//!
//! let encoded = JsonCodec::encode(&"hello").unwrap();
//! let decoded: String = JsonCodec::decode(&encoded).unwrap();
//! assert_eq!(decoded, "hello");
//! ```

use crate::error::Result;

/// JSON codec for wire envelopes.
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a value to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    /// Decode JSON bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be deserialized to type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct TestStruct {
        id: u32,
        name: String,
        active: bool,
    }

    #[test]
    fn test_encode_decode_struct() {
        let original = TestStruct {
            id: 42,
            name: "test".to_string(),
            active: true,
        };

        let encoded = JsonCodec::encode(&original).unwrap();
        let decoded: TestStruct = JsonCodec::decode(&encoded).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_encode_decode_primitives() {
        let s = "hello world";
        let encoded = JsonCodec::encode(&s).unwrap();
        let decoded: String = JsonCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, s);

        let n: i64 = 12345;
        let encoded = JsonCodec::encode(&n).unwrap();
        let decoded: i64 = JsonCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, n);

        let b = true;
        let encoded = JsonCodec::encode(&b).unwrap();
        let decoded: bool = JsonCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, b);
    }

    #[test]
    fn test_encode_decode_option() {
        let some_val: Option<i32> = Some(42);
        let encoded = JsonCodec::encode(&some_val).unwrap();
        let decoded: Option<i32> = JsonCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, some_val);

        let none_val: Option<i32> = None;
        let encoded = JsonCodec::encode(&none_val).unwrap();
        assert_eq!(encoded, b"null");
        let decoded: Option<i32> = JsonCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, none_val);
    }

    #[test]
    fn test_decode_error_on_invalid_data() {
        let invalid = b"not valid json";
        let result: Result<TestStruct> = JsonCodec::decode(invalid);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_error_on_wrong_shape() {
        // Valid JSON, wrong target type.
        let result: Result<TestStruct> = JsonCodec::decode(b"[1,2,3]");
        assert!(result.is_err());
    }
}
