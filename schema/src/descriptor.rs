use serde::{Deserialize, Serialize};

use crate::comments::CommentTable;

/// One `.proto` file's worth of services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub source_file: String,
    #[serde(default)]
    pub package:     Option<String>,
    #[serde(default)]
    pub services:    Vec<ServiceDescriptor>,
    #[serde(default)]
    pub comments:    CommentTable,
}

impl Schema {
    /// The dotted package, or `""` when the file declares none.
    pub fn package(&self) -> &str {
        self.package.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name:    String,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl ServiceDescriptor {
    pub fn new(name: &str, methods: Vec<MethodDescriptor>) -> Self {
        Self {
            name: name.to_owned(),
            methods,
        }
    }
}

/// A unary or streaming RPC. Input and output types are fully qualified
/// message names in descriptor form, i.e. with a leading `.`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name:             String,
    pub input_type:       String,
    pub output_type:      String,
    #[serde(default)]
    pub client_streaming: bool,
    #[serde(default)]
    pub server_streaming: bool,
}

impl MethodDescriptor {
    pub fn new(name: &str, input_type: &str, output_type: &str) -> Self {
        Self {
            name:             name.to_owned(),
            input_type:       input_type.to_owned(),
            output_type:      output_type.to_owned(),
            client_streaming: false,
            server_streaming: false,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.client_streaming || self.server_streaming
    }
}
