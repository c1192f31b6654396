//! Building success and error responses.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::{header, HeaderValue, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
    codec::{Codec, JSON_CONTENT_TYPE},
    context::Context,
    error::Failure,
};

const FALLBACK_MSG: &str = "There was an error but it could not be serialized into JSON";
const NON_TWIRP_MSG: &str = "Internal non-Twirp Error";

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorBodyCode>,
    pub msg:  String,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

/// Twirp errors carry their wire code; other failures carry the HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorBodyCode {
    Status(u16),
    Code(String),
}

pub(crate) fn error_body(failure: &Failure, ctx: &Context) -> (StatusCode, ErrorBody) {
    let (status, mut body) = match failure {
        Failure::Twirp(err) => {
            let meta = err
                .meta()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            (
                err.status_code(),
                ErrorBody {
                    kind: err.code().name().to_string(),
                    code: Some(ErrorBodyCode::Code(err.code().as_str().to_string())),
                    msg: err.msg().to_string(),
                    meta,
                },
            )
        }
        Failure::Raw(raw) => {
            let mut meta = BTreeMap::new();
            meta.insert("raw_error".to_string(), raw.clone());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    kind: "Internal".to_string(),
                    code: Some(ErrorBodyCode::Status(500)),
                    msg: NON_TWIRP_MSG.to_string(),
                    meta,
                },
            )
        }
    };

    for (k, v) in ctx.iter() {
        body.meta.insert(k.to_string(), v.to_string());
    }

    (status, body)
}

/// Renders `failure` as a JSON error response. If `serialize` fails, a
/// second body naming both failures is sent with status 500 instead.
pub(crate) fn render_error<F>(failure: &Failure, ctx: &Context, serialize: F) -> Response<Bytes>
where
    F: FnOnce(&ErrorBody) -> Result<Vec<u8>, serde_json::Error>,
{
    let (status, body) = error_body(failure, ctx);

    match serialize(&body) {
        Ok(bytes) => build(status, JSON_CONTENT_TYPE, bytes),
        Err(handling_error) => {
            let mut meta = BTreeMap::new();
            meta.insert("original_error".to_string(), failure.to_string());
            meta.insert("handling_error".to_string(), handling_error.to_string());
            let fallback = ErrorBody {
                kind: "Internal".to_string(),
                code: None,
                msg: FALLBACK_MSG.to_string(),
                meta,
            };
            let bytes = serde_json::to_vec(&fallback).unwrap_or_else(|_| {
                format!(r#"{{"type":"Internal","msg":"{}","meta":{{}}}}"#, FALLBACK_MSG).into_bytes()
            });
            build(StatusCode::INTERNAL_SERVER_ERROR, JSON_CONTENT_TYPE, bytes)
        }
    }
}

pub(crate) fn render_success(codec: Codec, body: Vec<u8>) -> Response<Bytes> {
    build(StatusCode::OK, codec.content_type(), body)
}

fn build(status: StatusCode, content_type: &'static str, body: Vec<u8>) -> Response<Bytes> {
    let mut response = Response::new(Bytes::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Short description of a response for the request context.
pub(crate) fn describe(response: &Response<Bytes>) -> String {
    format!("<Response {} bytes [{}]>", response.body().len(), response.status())
}
