use thiserror::Error;
use twirp_srv_schema::SchemaError;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Empty identifier {0:?}")]
    EmptyIdentifier(String),

    #[error("Invalid identifier {0:?}")]
    InvalidIdentifier(String),

    #[error("{0} has no serde support in prost-types; map it with an extern path, e.g. .google.protobuf=::pbjson_types")]
    WellKnownType(String),

    #[error("Method \"{service}.{method}\" is streaming; only unary methods are supported")]
    StreamingUnsupported {
        service: String,
        method:  String,
    },
}
