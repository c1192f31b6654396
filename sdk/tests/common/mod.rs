#![allow(dead_code)]

use bytes::Bytes;
use http::{header, Request, Response};
use serde::{Deserialize, Serialize};
use twirp_srv::{Endpoint, ErrorBody, ServerHooks, TwirpError, TwirpServer};

pub const PACKAGE: &str = "twitch.twirp.example";
pub const SERVICE: &str = "twitch.twirp.example.Haberdasher";

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct Size {
    #[prost(int32, tag = "1")]
    pub inches: i32,
}

impl prost::Name for Size {
    const NAME: &'static str = "Size";
    const PACKAGE: &'static str = PACKAGE;
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct Hat {
    #[prost(int32, tag = "1")]
    pub inches: i32,
    #[prost(string, tag = "2")]
    pub color: String,
    #[prost(string, tag = "3")]
    pub name: String,
}

impl prost::Name for Hat {
    const NAME: &'static str = "Hat";
    const PACKAGE: &'static str = PACKAGE;
}

pub fn make_hat(size: Size) -> Result<Hat, TwirpError> {
    if size.inches <= 0 {
        return Err(TwirpError::invalid_argument("I can't make a hat that small!")
            .with_meta("argument", "inches"));
    }
    if size.inches == 13 {
        panic!("unlucky size");
    }
    Ok(Hat {
        inches: size.inches,
        color:  "purple".to_string(),
        name:   "bowler".to_string(),
    })
}

pub fn haberdasher(hooks: ServerHooks) -> TwirpServer {
    let endpoints = vec![
        Endpoint::new(
            "MakeHat",
            "twitch.twirp.example.Size",
            "twitch.twirp.example.Hat",
            make_hat,
        ),
        // Declares Hat but answers with a Size.
        Endpoint::new(
            "MakeWrongThing",
            "twitch.twirp.example.Size",
            "twitch.twirp.example.Hat",
            |size: Size| -> Result<Size, TwirpError> { Ok(size) },
        ),
    ];
    TwirpServer::new(PACKAGE, SERVICE, endpoints, hooks)
}

pub fn post(path: &str, content_type: &str, body: impl Into<Vec<u8>>) -> Request<Vec<u8>> {
    Request::post(path)
        .header(header::CONTENT_TYPE, content_type)
        .body(body.into())
        .expect("valid request")
}

pub fn error_body(response: &Response<Bytes>) -> ErrorBody {
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    serde_json::from_slice(response.body()).expect("error body is JSON")
}
