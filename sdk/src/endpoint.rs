use std::{
    fmt,
    panic::{catch_unwind, AssertUnwindSafe},
};

use prost::{Message, Name};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    codec::Codec,
    error::{panic_message, Failure, TwirpError},
};

type Handler = dyn Fn(Codec, &[u8]) -> Result<Vec<u8>, Failure> + Send + Sync;

/// One RPC method of a service: its name, declared message types and the
/// type-erased decode → dispatch → encode pipeline.
pub struct Endpoint {
    name:        String,
    input_type:  String,
    output_type: String,
    handler:     Box<Handler>,
}

impl Endpoint {
    /// Binds `handler` to the method `name`.
    ///
    /// `input_type` and `output_type` are the fully qualified message names
    /// declared in the schema. Whatever the handler returns is checked
    /// against `output_type` before it is encoded; a mismatch is an
    /// `Internal` error.
    pub fn new<I, O, F>(name: &str, input_type: &str, output_type: &str, handler: F) -> Self
    where
        I: Message + Default + DeserializeOwned + 'static,
        O: Name + Serialize + 'static,
        F: Fn(I) -> Result<O, TwirpError> + Send + Sync + 'static,
    {
        let expected = output_type.to_string();

        let pipeline = move |codec: Codec, body: &[u8]| -> Result<Vec<u8>, Failure> {
            let input: I = codec
                .decode(body)
                .map_err(|e| Failure::Raw(e.to_string()))?;

            let output = match catch_unwind(AssertUnwindSafe(|| handler(input))) {
                Ok(result) => result?,
                Err(payload) => return Err(Failure::Raw(panic_message(payload.as_ref()))),
            };

            let actual = O::full_name();
            if actual != expected {
                return Err(TwirpError::internal(format!(
                    "bad service response type {}, expecting: {}",
                    actual, expected
                ))
                .into());
            }

            codec.encode(&output).map_err(|e| Failure::Raw(e.to_string()))
        };

        Self {
            name:        name.to_string(),
            input_type:  input_type.to_string(),
            output_type: output_type.to_string(),
            handler:     Box::new(pipeline),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_type(&self) -> &str {
        &self.input_type
    }

    pub fn output_type(&self) -> &str {
        &self.output_type
    }

    pub(crate) fn call(&self, codec: Codec, body: &[u8]) -> Result<Vec<u8>, Failure> {
        (self.handler)(codec, body)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.name)
            .field("input_type", &self.input_type)
            .field("output_type", &self.output_type)
            .finish_non_exhaustive()
    }
}
