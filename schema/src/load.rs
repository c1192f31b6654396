use prost::Message;
use prost_types::{FileDescriptorProto, FileDescriptorSet};

use crate::{
    comments::{CommentTable, Comments, Location},
    descriptor::{MethodDescriptor, Schema, ServiceDescriptor},
    error::SchemaError,
};

/// Decode a protobuf-encoded `FileDescriptorSet` into one `Schema` per file,
/// in the order the set lists them.
pub fn load_descriptor_set(buffer: &[u8]) -> Result<Vec<Schema>, SchemaError> {
    let set = FileDescriptorSet::decode(buffer)?;
    set.file.iter().map(Schema::from_file_descriptor).collect()
}

/// Read a `Schema` from its JSON form.
pub fn load_json(text: &str) -> Result<Schema, SchemaError> {
    Ok(serde_json::from_str(text)?)
}

impl Schema {
    pub fn from_file_descriptor(file: &FileDescriptorProto) -> Result<Self, SchemaError> {
        let source_file = file
            .name
            .clone()
            .ok_or_else(|| SchemaError::MissingName { what: "file".to_string() })?;

        let mut services = Vec::with_capacity(file.service.len());
        for (i, svc) in file.service.iter().enumerate() {
            let name = svc.name.clone().ok_or_else(|| SchemaError::MissingName {
                what: format!("service #{} in {}", i, source_file),
            })?;

            let mut methods = Vec::with_capacity(svc.method.len());
            for (j, m) in svc.method.iter().enumerate() {
                let method_name = m.name.clone().ok_or_else(|| SchemaError::MissingName {
                    what: format!("method #{} of {}", j, name),
                })?;
                methods.push(MethodDescriptor {
                    name:             method_name,
                    input_type:       m.input_type.clone().unwrap_or_default(),
                    output_type:      m.output_type.clone().unwrap_or_default(),
                    client_streaming: m.client_streaming.unwrap_or(false),
                    server_streaming: m.server_streaming.unwrap_or(false),
                });
            }

            services.push(ServiceDescriptor { name, methods });
        }

        // Only locations that carry some comment are worth keeping
        let mut locations = Vec::new();
        if let Some(sci) = &file.source_code_info {
            for loc in &sci.location {
                let comments = Comments {
                    leading:          loc.leading_comments.clone(),
                    trailing:         loc.trailing_comments.clone(),
                    leading_detached: loc.leading_detached_comments.clone(),
                };
                if comments != Comments::default() {
                    locations.push(Location {
                        path: loc.path.clone(),
                        comments,
                    });
                }
            }
        }

        Ok(Schema {
            source_file,
            package: file.package.clone().filter(|p| !p.is_empty()),
            services,
            comments: CommentTable::new(locations),
        })
    }
}
