//! Service descriptors consumed by the twirp-srv compiler.
//!
//! A [`Schema`] is the already-parsed view of one `.proto` file: its package,
//! the services it declares and the comments `protoc` attached to them. It is
//! built once from a `FileDescriptorProto` (or a JSON dump of the same model)
//! and only ever read afterwards.
//!
//! ```
//! use twirp_srv_schema::*;
//!
//! let schema = Schema {
//!     source_file: "echo.proto".to_owned(),
//!     package:     Some("example.echo".to_owned()),
//!     services:    vec![ServiceDescriptor::new("Echo", vec![
//!         MethodDescriptor::new("Ping", ".example.echo.PingRequest", ".example.echo.PingResponse"),
//!     ])],
//!     comments:    CommentTable::default(),
//! };
//!
//! assert_eq!(schema.package(), "example.echo");
//! assert_eq!(schema.services[0].methods[0].name, "Ping");
//! ```

pub mod comments;
pub mod descriptor;
pub mod error;
pub mod load;

pub use comments::*;
pub use descriptor::*;
pub use error::SchemaError;
pub use load::{load_descriptor_set, load_json};

/// `FileDescriptorProto.service`
pub const FILE_SERVICE_FIELD: i32 = 6;
/// `ServiceDescriptorProto.method`
pub const SERVICE_METHOD_FIELD: i32 = 2;
