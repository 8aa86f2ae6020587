//! protoc-gen-yaml - Summarize Protocol Buffer schemas as YAML
//!
//! Invoked by `protoc --yaml_out=<dir>` with no arguments, this reads a
//! `CodeGeneratorRequest` from stdin and writes a `CodeGeneratorResponse` to
//! stdout. With `--descriptor-set` it runs offline against a
//! `FileDescriptorSet` and writes the YAML files itself.

use anyhow::{Context, Result};
use clap::Parser;
use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;
use prost_types::FileDescriptorSet;
use protoyaml_core::{generate, respond, Error, GeneratedFile, VERSION};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, trace, Level};
use tracing_subscriber::EnvFilter;

/// protoc plugin that writes a YAML summary of each schema's messages and services
#[derive(Parser, Debug)]
#[command(name = "protoc-gen-yaml")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read a FileDescriptorSet (from `protoc -o`) instead of a plugin request on stdin
    #[arg(long, value_name = "FILE")]
    descriptor_set: Option<PathBuf>,

    /// Schema file to generate; repeat for several (default: every file in the set)
    #[arg(long = "file", value_name = "NAME", requires = "descriptor_set")]
    files: Vec<String>,

    /// Plugin parameter, as given before the colon in --yaml_out
    #[arg(long, value_name = "PARAM", requires = "descriptor_set")]
    param: Option<String>,

    /// Output directory for generated .yaml files
    #[arg(short, long, default_value = ".", requires = "descriptor_set")]
    output: PathBuf,

    /// Dry run - don't write files, just show what would be generated
    #[arg(long, requires = "descriptor_set")]
    dry_run: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout carries the plugin response
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    debug!("protoc-gen-yaml {}", VERSION);

    match cli.descriptor_set {
        Some(ref path) => run_offline(&cli, path),
        None => run_plugin(),
    }
}

/// Handle one request/response exchange with the host compiler
fn run_plugin() -> Result<()> {
    let mut input = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut input)
        .context("Failed to read CodeGeneratorRequest from stdin")?;
    trace!("Read {} bytes from stdin", input.len());

    let request = CodeGeneratorRequest::decode(input.as_slice())
        .map_err(Error::from)
        .context("Failed to parse CodeGeneratorRequest; run protoc-gen-yaml as a protoc plugin")?;

    let response = respond(&request);

    io::stdout()
        .lock()
        .write_all(&response.encode_to_vec())
        .context("Failed to write CodeGeneratorResponse to stdout")?;

    Ok(())
}

/// Generate from a descriptor set on disk
fn run_offline(cli: &Cli, descriptor_set: &Path) -> Result<()> {
    let data = fs::read(descriptor_set).map_err(|e| Error::file_read(descriptor_set, e))?;
    let set = FileDescriptorSet::decode(data.as_slice())
        .map_err(Error::from)
        .with_context(|| format!("Failed to parse descriptor set: {}", descriptor_set.display()))?;

    let request = request_from_set(set, &cli.files, cli.param.clone());
    let files = generate(&request)?;

    for file in &files {
        let output_path = output_path(&cli.output, file)?;
        if cli.dry_run {
            println!("Would write: {}", output_path.display());
            if cli.verbose > 0 {
                println!("---");
                print!("{}", file.content);
                println!("---");
            }
        } else {
            write_generated_file(&output_path, &file.content)?;
            println!("Wrote {}", output_path.display());
        }
    }

    info!("Generated {} file(s) from {}", files.len(), descriptor_set.display());
    Ok(())
}

/// Build the request protoc would send for the selected files of a descriptor set
fn request_from_set(
    set: FileDescriptorSet,
    files: &[String],
    parameter: Option<String>,
) -> CodeGeneratorRequest {
    let file_to_generate = if files.is_empty() {
        set.file.iter().map(|f| f.name().to_string()).collect()
    } else {
        files.to_vec()
    };

    CodeGeneratorRequest {
        file_to_generate,
        parameter,
        proto_file: set.file,
        ..Default::default()
    }
}

/// Resolve a generated name under the output directory
fn output_path(output_dir: &Path, file: &GeneratedFile) -> Result<PathBuf> {
    let relative = Path::new(&file.name);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(Error::path_traversal(relative).into());
    }
    Ok(output_dir.join(relative))
}

/// Write a generated file to disk, creating parent directories
fn write_generated_file(output_path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::directory_create(parent, e))?;
    }

    fs::write(output_path, content).map_err(|e| Error::file_write(output_path, e))?;

    Ok(())
}
