use prost::Message;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const PROTOBUF_CONTENT_TYPE: &str = "application/protobuf";

/// Wire encoding negotiated from the request's `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Json,
    Protobuf,
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid JSON message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid protobuf message: {0}")]
    Protobuf(#[from] prost::DecodeError),
}

impl Codec {
    /// Substring match, so `application/json; charset=utf-8` still picks JSON.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        if content_type.contains("json") {
            Some(Codec::Json)
        } else if content_type.contains("protobuf") {
            Some(Codec::Protobuf)
        } else {
            None
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Codec::Json => JSON_CONTENT_TYPE,
            Codec::Protobuf => PROTOBUF_CONTENT_TYPE,
        }
    }

    pub fn decode<M>(self, body: &[u8]) -> Result<M, CodecError>
    where
        M: Message + Default + DeserializeOwned,
    {
        match self {
            Codec::Json => Ok(serde_json::from_slice(body)?),
            Codec::Protobuf => Ok(M::decode(body)?),
        }
    }

    pub fn encode<M>(self, message: &M) -> Result<Vec<u8>, CodecError>
    where
        M: Message + Serialize,
    {
        match self {
            Codec::Json => Ok(serde_json::to_vec(message)?),
            Codec::Protobuf => Ok(message.encode_to_vec()),
        }
    }
}
