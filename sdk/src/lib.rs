//! twirp-srv
//!
//! Runtime support for the Twirp server bindings produced by
//! `twirp-srv-compiler`. Generated code builds a [`TwirpServer`] out of one
//! [`Endpoint`] per RPC method; the server does the rest:
//!
//! - only `POST /twirp/{package.Service}/{Method}` is routed,
//! - `Content-Type` containing `json` selects JSON, `protobuf` selects the
//!   binary encoding,
//! - failures become a JSON body `{"type", "code", "msg", "meta"}` with the
//!   HTTP status of the [`ErrorCode`],
//! - [`ServerHooks`] observe every stage of a request.
//!
//! Messages must implement `prost::Message` and `prost::Name` (see
//! `prost_build::Config::enable_type_names`) and serde's `Serialize` /
//! `Deserialize` (e.g. through `type_attribute`).
//!
//! The JSON codec is whatever those serde impls produce. Plain derives do not
//! follow the protobuf JSON mapping: enums are numbers, 64-bit integers are
//! JSON numbers rather than strings, and field names are the Rust (snake_case)
//! names instead of the names declared in the `.proto`. For the canonical
//! mapping generate the serde impls with `pbjson-build`, calling
//! `preserve_proto_field_names()` to keep the declared names on the wire.
//!
//! `google.protobuf.Empty` is served through [`Empty`]. Other well-known
//! types need serde support too, e.g. from `pbjson-types`.
//!
//! The server consumes `http::Request`s and produces `http::Response`s; it
//! does not own a listener, so any HTTP stack can drive it.

mod codec;
pub mod context;
mod empty;
mod endpoint;
mod error;
mod hooks;
mod response;
mod server;

pub use codec::{Codec, CodecError, JSON_CONTENT_TYPE, PROTOBUF_CONTENT_TYPE};
pub use context::Context;
pub use empty::Empty;
pub use endpoint::Endpoint;
pub use error::{status_for, ErrorCode, TwirpError};
pub use hooks::{Hook, HookStage, ServerHooks};
pub use response::{ErrorBody, ErrorBodyCode};
pub use server::TwirpServer;

pub use bytes;
pub use http;
