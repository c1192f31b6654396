//! Messages of `example.echo`, laid out the way `prost-build` would emit them
//! with type names and serde derives enabled, plus the Twirp binding
//! generated from `echo.json`.

use serde::{Deserialize, Serialize};

pub const PACKAGE: &str = "example.echo";

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct PingRequest {
    #[prost(string, tag = "1")]
    pub message: String,
}

impl prost::Name for PingRequest {
    const NAME: &'static str = "PingRequest";
    const PACKAGE: &'static str = PACKAGE;
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct PingResponse {
    #[prost(string, tag = "1")]
    pub message: String,
    #[prost(uint32, tag = "2")]
    pub length: u32,
}

impl prost::Name for PingResponse {
    const NAME: &'static str = "PingResponse";
    const PACKAGE: &'static str = PACKAGE;
}

include!("echo_twirp.rs");
