use serde::Serialize;
use tracing::debug;
use twirp_srv_schema::Schema;

use crate::{
    adapter::{MethodRef, ServiceRef},
    config::GenOptions,
    error::GenError,
    type_path::rust_type_path,
    utils::{
        camelize, escape_rust_keyword, last_segment, reformat_comment, underscore,
        validate_full_name, validate_identifier,
    },
};

/// Everything the emitter needs to know about one service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceView {
    pub name:            String,
    pub camel_name:      String,
    pub qualified_name:  String,
    pub package_name:    String,
    pub leading_comment: String,
    pub methods:         Vec<MethodView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodView {
    pub name:            String,
    pub rust_name:       String,
    pub input_arg:       String,
    pub input_type:      String,
    pub output_type:     String,
    pub input_path:      String,
    pub output_path:     String,
    pub leading_comment: String,
}

impl ServiceView {
    pub fn comments(&self, prefix: &str) -> String {
        reformat_comment(&self.leading_comment, prefix)
    }
}

impl MethodView {
    pub fn comments(&self, prefix: &str) -> String {
        reformat_comment(&self.leading_comment, prefix)
    }
}

/// Builds one view per declared service, in declaration order.
pub fn build_services(schema: &Schema, options: &GenOptions) -> Result<Vec<ServiceView>, GenError> {
    ServiceRef::all(schema)
        .map(|service| build_service(service, options))
        .collect()
}

fn build_service(service: ServiceRef<'_>, options: &GenOptions) -> Result<ServiceView, GenError> {
    validate_identifier(service.name())?;
    if let Some(pkg) = &service.schema().package {
        validate_full_name(pkg)?;
    }

    let view = ServiceView {
        name:            service.name().to_string(),
        camel_name:      camelize(service.name())?,
        qualified_name:  service.qualified_name(),
        package_name:    service.package_name(),
        leading_comment: service.raw_leading_comment().to_string(),
        methods:         build_methods(service, options)?,
    };

    debug!(service = %view.qualified_name, methods = view.methods.len(), "built service view");
    Ok(view)
}

/// Builds one view per method of `service`, in declaration order.
pub fn build_methods(service: ServiceRef<'_>, options: &GenOptions) -> Result<Vec<MethodView>, GenError> {
    service.methods().map(|m| build_method(m, options)).collect()
}

fn build_method(method: MethodRef<'_>, options: &GenOptions) -> Result<MethodView, GenError> {
    let descriptor = method.descriptor();
    if descriptor.is_streaming() {
        return Err(GenError::StreamingUnsupported {
            service: method.service().qualified_name(),
            method:  method.name().to_string(),
        });
    }

    validate_identifier(method.name())?;
    validate_full_name(method.input_type())?;
    validate_full_name(method.output_type())?;

    let input_type  = strip_leading_dot(method.input_type());
    let output_type = strip_leading_dot(method.output_type());
    let package     = method.service().schema().package();

    Ok(MethodView {
        name:            method.name().to_string(),
        rust_name:       escape_rust_keyword(&underscore(method.name())),
        input_arg:       escape_rust_keyword(&underscore(last_segment(input_type))),
        input_path:      rust_type_path(input_type, package, options)?,
        output_path:     rust_type_path(output_type, package, options)?,
        input_type:      input_type.to_string(),
        output_type:     output_type.to_string(),
        leading_comment: method.raw_leading_comment().to_string(),
    })
}

fn strip_leading_dot(name: &str) -> &str {
    name.strip_prefix('.').unwrap_or(name)
}
