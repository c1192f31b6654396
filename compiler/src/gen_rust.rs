use tracing::debug;
use twirp_srv_schema::Schema;

use crate::{
    config::GenOptions,
    error::GenError,
    types::{build_services, MethodView, ServiceView},
    utils::{doc_comment, quote},
};

/// Compiles every service of `schema` into a Rust source file.
///
/// Fails before emitting anything if any name in the schema is malformed.
pub fn compile_schema_to_rust(schema: &Schema, options: &GenOptions) -> Result<String, GenError> {
    let services = build_services(schema, options)?;
    debug!(file = %schema.source_file, services = services.len(), "emitting twirp bindings");
    Ok(emit(&services, &schema.source_file, options))
}

/// Renders the banner, then an implementation trait, a default
/// implementation and a server type per service.
///
/// The output is meant to sit next to the `prost-build` output for the same
/// package (e.g. through `include!`), so message types are referenced
/// relative to that module and the runtime only through absolute paths.
pub fn emit(services: &[ServiceView], source_filename: &str, options: &GenOptions) -> String {
    let rt = options.runtime();
    let mut rust_code: Vec<String> = Vec::new();

    rust_code.push(format!(
        "// Code generated by protoc-gen-twirp_rust_srv {}, DO NOT EDIT.",
        options.version
    ));
    rust_code.push(format!("// source: {}", source_filename));
    rust_code.push("".to_string());

    for service in services {
        rust_code.push(generate_impl_trait(service, rt));
        rust_code.push(generate_unimplemented(service));
        rust_code.push(generate_server(service, rt));
    }

    let mut out = rust_code.join("\n");
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// The trait callers implement. Every method defaults to `Unimplemented`.
fn generate_impl_trait(service: &ServiceView, rt: &str) -> String {
    let mut lines = Vec::new();

    let comments = doc_comment(&service.leading_comment, "/// ");
    if comments.is_empty() {
        lines.push(format!("/// Implementation of the `{}` service.", service.name));
        lines.push("///".to_string());
        lines.push("/// Methods that are not overridden fail with `Unimplemented`.".to_string());
    } else {
        lines.push(comments);
    }
    lines.push(format!(
        "pub trait {}Impl: ::std::marker::Send + ::std::marker::Sync + 'static {{",
        service.camel_name
    ));

    for (i, method) in service.methods.iter().enumerate() {
        if i > 0 {
            lines.push("".to_string());
        }
        lines.push(generate_default_method(method, rt));
    }

    lines.push("}".to_string());
    lines.push("".to_string());
    lines.join("\n")
}

fn generate_default_method(method: &MethodView, rt: &str) -> String {
    let mut lines = Vec::new();

    let comments = doc_comment(&method.leading_comment, "    /// ");
    if !comments.is_empty() {
        lines.push(comments);
    }
    lines.push(format!(
        "    fn {}(&self, {}: {}) -> ::std::result::Result<{}, {}::TwirpError> {{",
        method.rust_name, method.input_arg, method.input_path, method.output_path, rt
    ));
    lines.push(format!("        let _ = {};", method.input_arg));
    lines.push(format!(
        "        ::std::result::Result::Err({}::TwirpError::unimplemented({}))",
        rt,
        quote(&format!("{} is unimplemented", method.name))
    ));
    lines.push("    }".to_string());
    lines.join("\n")
}

fn generate_unimplemented(service: &ServiceView) -> String {
    [
        format!(
            "/// Answers every `{}` method with `Unimplemented`.",
            service.name
        ),
        "#[derive(Debug, Clone, Copy, Default)]".to_string(),
        format!("pub struct Unimplemented{};", service.camel_name),
        "".to_string(),
        format!(
            "impl {}Impl for Unimplemented{} {{}}",
            service.camel_name, service.camel_name
        ),
        "".to_string(),
    ]
    .join("\n")
}

/// The server type: binds an implementation to the routes of the service.
fn generate_server(service: &ServiceView, rt: &str) -> String {
    let camel = &service.camel_name;
    let mut lines = Vec::new();

    lines.push(format!("/// Twirp server for the `{}` service.", service.name));
    lines.push("///".to_string());
    lines.push(format!(
        "/// Serves `POST /twirp/{}/{{Method}}` with JSON or protobuf bodies.",
        service.qualified_name
    ));
    lines.push(format!("pub struct {}Server {{", camel));
    lines.push(format!("    inner: {}::TwirpServer,", rt));
    lines.push("}".to_string());
    lines.push("".to_string());

    lines.push(format!("impl {}Server {{", camel));
    lines.push(format!(
        "    pub const PACKAGE_NAME: &'static str = {};",
        quote(&service.package_name)
    ));
    lines.push(format!(
        "    pub const SERVICE_NAME: &'static str = {};",
        quote(&service.qualified_name)
    ));
    lines.push("".to_string());
    lines.push(format!(
        "    /// Creates a server for the `{}` service backed by `service`.",
        service.name
    ));
    lines.push(format!("    pub fn new<T: {}Impl>(service: T) -> Self {{", camel));
    lines.push(format!(
        "        Self::with_hooks(service, {}::ServerHooks::default())",
        rt
    ));
    lines.push("    }".to_string());
    lines.push("".to_string());
    lines.push("    /// Like [`Self::new`], firing `hooks` at each request stage.".to_string());
    lines.push(format!(
        "    pub fn with_hooks<T: {}Impl>(service: T, hooks: {}::ServerHooks) -> Self {{",
        camel, rt
    ));

    if service.methods.is_empty() {
        lines.push("        let _ = service;".to_string());
        lines.push(format!(
            "        let endpoints: ::std::vec::Vec<{}::Endpoint> = ::std::vec::Vec::new();",
            rt
        ));
    } else {
        lines.push("        let service = ::std::sync::Arc::new(service);".to_string());
        lines.push(format!(
            "        let endpoints: ::std::vec::Vec<{}::Endpoint> = ::std::vec![",
            rt
        ));
        for method in &service.methods {
            lines.push(generate_endpoint(method, rt));
        }
        lines.push("        ];".to_string());
    }

    lines.push("        Self {".to_string());
    lines.push(format!(
        "            inner: {}::TwirpServer::new(Self::PACKAGE_NAME, Self::SERVICE_NAME, endpoints, hooks),",
        rt
    ));
    lines.push("        }".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());
    lines.push("".to_string());

    lines.push(format!("impl ::std::ops::Deref for {}Server {{", camel));
    lines.push(format!("    type Target = {}::TwirpServer;", rt));
    lines.push("".to_string());
    lines.push("    fn deref(&self) -> &Self::Target {".to_string());
    lines.push("        &self.inner".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());
    lines.push("".to_string());

    lines.join("\n")
}

fn generate_endpoint(method: &MethodView, rt: &str) -> String {
    [
        "            {".to_string(),
        "                let service = ::std::sync::Arc::clone(&service);".to_string(),
        format!("                {}::Endpoint::new(", rt),
        format!("                    {},", quote(&method.name)),
        format!("                    {},", quote(&method.input_type)),
        format!("                    {},", quote(&method.output_type)),
        format!(
            "                    move |request: {}| -> ::std::result::Result<{}, {}::TwirpError> {{ service.{}(request) }},",
            method.input_path, method.output_path, rt, method.rust_name
        ),
        "                )".to_string(),
        "            },".to_string(),
    ]
    .join("\n")
}
