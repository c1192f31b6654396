use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use twirp_srv_compiler::{build_services, compile_schema_to_rust, GenError, GenOptions};
use twirp_srv_schema::{load_descriptor_set, load_json, Schema};

#[derive(Parser)]
#[command(name = "twirp-srv-gen")]
#[command(about = "Generate Twirp server bindings from protobuf service descriptors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate `{file}_twirp.rs` for every file that declares a service
    Generate {
        /// A `FileDescriptorSet` (`protoc --include_source_info --descriptor_set_out`),
        /// or a `.json` descriptor model
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory (if omitted, prints to stdout)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Only generate for these source files (repeatable)
        #[arg(short, long)]
        file: Vec<String>,

        /// Path generated code uses to reach the runtime crate
        #[arg(long, default_value = "::twirp_srv")]
        runtime_crate: String,

        /// Map a protobuf package to a Rust path, e.g. `.google.protobuf=::pbjson_types`
        #[arg(long, value_parser = parse_extern_path)]
        extern_path: Vec<(String, String)>,
    },

    /// Print the template model built for each file as JSON
    Inspect {
        /// A `FileDescriptorSet` or a `.json` descriptor model
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn parse_extern_path(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((proto, rust)) if !proto.is_empty() && !rust.is_empty() => {
            Ok((proto.to_string(), rust.to_string()))
        }
        _ => Err(format!("expected PROTO_PATH=RUST_PATH, got {:?}", arg)),
    }
}

fn load_schemas(input: &Path) -> Result<Vec<Schema>, GenError> {
    if input.extension().is_some_and(|ext| ext == "json") {
        let text = fs::read_to_string(input)?;
        Ok(vec![load_json(&text)?])
    } else {
        let data = fs::read(input)?;
        Ok(load_descriptor_set(&data)?)
    }
}

/// `dir/name.proto` → `dir/name_twirp.rs`
fn output_name(source_file: &str) -> PathBuf {
    let mut path = PathBuf::from(source_file);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.set_file_name(format!("{}_twirp.rs", stem));
    path
}

fn main() -> Result<(), GenError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate {
            input,
            out_dir,
            file,
            runtime_crate,
            extern_path,
        } => {
            let mut options = GenOptions {
                runtime_crate: runtime_crate.clone(),
                ..GenOptions::default()
            };
            for (proto, rust) in extern_path {
                options = options.extern_path(proto, rust);
            }

            let schemas = load_schemas(input)?;
            for wanted in file {
                if !schemas.iter().any(|s| &s.source_file == wanted) {
                    warn!(file = %wanted, "requested file is not in the descriptor set");
                }
            }

            for schema in &schemas {
                if !file.is_empty() && !file.contains(&schema.source_file) {
                    continue;
                }
                if schema.services.is_empty() {
                    info!(file = %schema.source_file, "no services, skipping");
                    continue;
                }

                let rust_code = compile_schema_to_rust(schema, &options)?;
                match out_dir {
                    Some(dir) => {
                        let out_path = dir.join(output_name(&schema.source_file));
                        if let Some(parent) = out_path.parent() {
                            fs::create_dir_all(parent)?;
                        }
                        fs::write(&out_path, &rust_code)?;
                        println!("Generated {} → {}", schema.source_file, out_path.display());
                    }
                    None => print!("{}", rust_code),
                }
            }
            Ok(())
        }

        Commands::Inspect { input } => {
            let options = GenOptions::default();
            for schema in load_schemas(input)? {
                let services = build_services(&schema, &options)?;
                let json = serde_json::json!({
                    "source_file": schema.source_file,
                    "package":     schema.package,
                    "services":    services,
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extern_path_argument() {
        assert_eq!(
            parse_extern_path(".google.protobuf=::pbjson_types"),
            Ok((".google.protobuf".to_string(), "::pbjson_types".to_string()))
        );
        assert!(parse_extern_path(".foo").is_err());
        assert!(parse_extern_path("=::foo").is_err());
    }

    #[test]
    fn output_names() {
        assert_eq!(output_name("echo.proto"), PathBuf::from("echo_twirp.rs"));
        assert_eq!(
            output_name("twitch/haberdasher.proto"),
            PathBuf::from("twitch/haberdasher_twirp.rs")
        );
    }
}
