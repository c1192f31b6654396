//! twirp-srv-compiler
//!
//! This crate implements:
//!  1) Identifier normalization (`camelize` / `underscore`) and validation,
//!  2) A read-only adapter over service descriptors and their comments,
//!  3) The template model (`build_services` → `ServiceView` / `MethodView`),
//!  4) Rust code generation (`compile_schema_to_rust` → `String`),
//!  5) Error types (`GenError`) and generation options (`GenOptions`).

pub mod adapter;
pub mod config;
pub mod error;
pub mod gen_rust;
pub mod type_path;
pub mod types;
pub mod utils;

pub use config::GenOptions;
pub use error::GenError;
pub use gen_rust::{compile_schema_to_rust, emit};
pub use types::{build_methods, build_services, MethodView, ServiceView};
