use serde::Serialize;

/// Knobs for a generation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenOptions {
    /// Printed in the banner of every generated file.
    pub version:       String,
    /// Path generated code uses to reach the runtime crate.
    pub runtime_crate: String,
    /// `(proto prefix, rust path)` pairs, e.g. `(".google.protobuf", "::pbjson_types")`.
    /// Checked before any other resolution.
    pub extern_paths:  Vec<(String, String)>,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            version:       format!("v{}", env!("CARGO_PKG_VERSION")),
            runtime_crate: "::twirp_srv".to_string(),
            extern_paths:  Vec::new(),
        }
    }
}

impl GenOptions {
    /// `runtime_crate` without a trailing `::`.
    pub fn runtime(&self) -> &str {
        self.runtime_crate.trim_end_matches("::")
    }

    pub fn extern_path(mut self, proto_path: &str, rust_path: &str) -> Self {
        self.extern_paths.push((proto_path.to_string(), rust_path.to_string()));
        self
    }
}
