use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Descriptor decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Descriptor JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Descriptor is missing a name for {what}")]
    MissingName {
        what: String,
    },
}
