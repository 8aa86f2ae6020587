//! # protoyaml-core
//!
//! A library for summarizing Protocol Buffer schemas as YAML.
//!
//! This crate provides the core functionality for:
//! - Selecting the schema files a `protoc` plugin request asks for
//! - Flattening nested message trees and service lists into plain records
//! - Serializing those records to a YAML sidecar file per schema
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`model`]: The records written to the output document
//! - [`flatten`]: Descriptor tree to flat record conversion
//! - [`emit`]: Document encoding and output files
//! - [`plugin`]: `CodeGeneratorRequest` / `CodeGeneratorResponse` handling
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use prost::Message;
//! use prost_types::compiler::CodeGeneratorRequest;
//! use std::io::{Read, Write};
//!
//! let mut input = Vec::new();
//! std::io::stdin().read_to_end(&mut input)?;
//!
//! let request = CodeGeneratorRequest::decode(input.as_slice())?;
//! let response = protoyaml_core::respond(&request);
//!
//! std::io::stdout().write_all(&response.encode_to_vec())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Extensibility
//!
//! [`Encoder`] controls how a flattened [`Document`] becomes file contents.
//! [`Generator::with_encoder`] swaps it out.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod emit;
pub mod error;
pub mod flatten;
pub mod model;
pub mod plugin;

// Re-export primary types for convenience
pub use emit::{DocumentStats, Encoder, GeneratedFile, YamlEncoder};
pub use error::{Error, Result};
pub use flatten::flatten_file;
pub use model::{Document, Field, Message, Method, Service};
pub use plugin::{generate, respond, select_files, Generator, GeneratorConfig, PathMode};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
