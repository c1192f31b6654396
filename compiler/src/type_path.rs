//! Maps fully qualified message names onto Rust paths, following the module
//! layout `prost-build` produces (one module per package segment, nested
//! messages in a snake_case module named after their parent). Names go
//! through `heck` exactly as `prost-build` does, so `HTTPRequest` is
//! `HttpRequest` and the parent module of `URLInfo.Part` is `url_info`.

use heck::{ToSnakeCase, ToUpperCamelCase};

use crate::{config::GenOptions, error::GenError, utils::raw_rust_ident};

const WELL_KNOWN_PACKAGE: &str = "google.protobuf";
const EMPTY: &str = "google.protobuf.Empty";

/// Resolves `full_name` (no leading dot) as seen from code living in the
/// module of `package`.
///
/// Extern paths win. After that `google.protobuf.Empty` is the runtime's
/// `Empty`, and any other `google.protobuf` type is an error: `prost-types`
/// messages cannot go through the JSON codec.
pub fn rust_type_path(
    full_name: &str,
    package: &str,
    options: &GenOptions,
) -> Result<String, GenError> {
    if let Some(path) = resolve_extern(full_name, &options.extern_paths)? {
        return Ok(path);
    }

    if full_name == EMPTY {
        return Ok(format!("{}::Empty", options.runtime()));
    }
    if package != WELL_KNOWN_PACKAGE
        && full_name.starts_with(WELL_KNOWN_PACKAGE)
        && full_name[WELL_KNOWN_PACKAGE.len()..].starts_with('.')
    {
        return Err(GenError::WellKnownType(full_name.to_string()));
    }

    let segments: Vec<&str> = full_name.split('.').collect();
    let (type_name, modules) = match segments.split_last() {
        Some((last, rest)) if !last.is_empty() => (*last, rest),
        _ => return Err(GenError::EmptyIdentifier(full_name.to_string())),
    };

    let package_segments: Vec<&str> = if package.is_empty() {
        Vec::new()
    } else {
        package.split('.').collect()
    };

    let common = package_segments
        .iter()
        .zip(modules.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut path: Vec<String> = Vec::new();
    for _ in common..package_segments.len() {
        path.push("super".to_string());
    }
    for module in &modules[common..] {
        path.push(module_ident(module));
    }
    path.push(type_ident(type_name));

    Ok(path.join("::"))
}

fn module_ident(name: &str) -> String {
    raw_rust_ident(&name.to_snake_case())
}

fn type_ident(name: &str) -> String {
    let ident = name.to_upper_camel_case();
    if ident == "Self" {
        return "Self_".to_string();
    }
    ident
}

fn resolve_extern(
    full_name: &str,
    extern_paths: &[(String, String)],
) -> Result<Option<String>, GenError> {
    let dotted = format!(".{}", full_name);

    let best = extern_paths
        .iter()
        .filter(|(proto, _)| {
            let proto = proto.trim_end_matches('.');
            dotted == proto || dotted.starts_with(&format!("{}.", proto))
        })
        .max_by_key(|(proto, _)| proto.len());

    let Some((proto, rust)) = best else {
        return Ok(None);
    };

    let rest = dotted[proto.trim_end_matches('.').len()..].trim_start_matches('.');
    if rest.is_empty() {
        return Ok(Some(rust.clone()));
    }

    let segments: Vec<&str> = rest.split('.').collect();
    let mut path = vec![rust.trim_end_matches("::").to_string()];
    match segments.split_last() {
        Some((last, modules)) if !last.is_empty() => {
            for module in modules {
                path.push(module_ident(module));
            }
            path.push(type_ident(last));
        }
        _ => return Err(GenError::EmptyIdentifier(full_name.to_string())),
    }
    Ok(Some(path.join("::")))
}
