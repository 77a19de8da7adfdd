//! The boundary between caller values and the strings a store persists.
//!
//! A store only ever holds text. Anything else has to pass through
//! [`StoreValue`], which is implemented for three shapes of value:
//!
//! - textual values (`str`, `String`) are stored as they are
//! - byte sequences (`[u8]`, `Vec<u8>`) are stored when they are UTF-8
//! - anything [`Serialize`] is stored as compact JSON through [`Json`]

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarshalError {
    #[error("bytes are not valid UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait StoreValue {
    fn encode(&self) -> Result<String, MarshalError>;
}

/// Marks a value to be stored as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl StoreValue for str {
    fn encode(&self) -> Result<String, MarshalError> {
        Ok(self.to_string())
    }
}

impl StoreValue for String {
    fn encode(&self) -> Result<String, MarshalError> {
        Ok(self.clone())
    }
}

impl StoreValue for [u8] {
    fn encode(&self) -> Result<String, MarshalError> {
        Ok(std::str::from_utf8(self)?.to_string())
    }
}

impl StoreValue for Vec<u8> {
    fn encode(&self) -> Result<String, MarshalError> {
        self.as_slice().encode()
    }
}

impl<T: Serialize> StoreValue for Json<T> {
    fn encode(&self) -> Result<String, MarshalError> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

pub fn decode_json<T: DeserializeOwned>(stored: &str) -> Result<T, MarshalError> {
    Ok(serde_json::from_str(stored)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Block {
        height: u64,
        hash: String,
    }

    #[test]
    fn text_is_stored_verbatim() {
        assert_eq!("hello".encode().unwrap(), "hello");
        assert_eq!(String::from("it's").encode().unwrap(), "it's");
    }

    #[test]
    fn bytes_must_be_utf8() {
        assert_eq!(b"abc".to_vec().encode().unwrap(), "abc");
        assert!(matches!(
            vec![0xffu8, 0xfe].encode(),
            Err(MarshalError::NotUtf8(_))
        ));
    }

    #[test]
    fn json_is_compact() {
        let block = Block {
            height: 7,
            hash: "00ab".to_string(),
        };
        let stored = Json(&block).encode().unwrap();

        assert_eq!(stored, r#"{"height":7,"hash":"00ab"}"#);
        assert_eq!(decode_json::<Block>(&stored).unwrap(), block);
    }
}
