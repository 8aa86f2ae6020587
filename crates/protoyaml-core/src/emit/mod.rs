//! Document serialization.
//!
//! The [`Encoder`] trait turns a [`Document`] into file contents. The plugin
//! uses [`YamlEncoder`]; other formats can be plugged in by implementing the
//! trait.

mod stats;

use crate::error::{Error, Result};
use crate::model::Document;

pub use stats::DocumentStats;

/// Trait for encoding a flattened document to text
pub trait Encoder {
    /// File extension appended to the output prefix, including the dot
    fn extension(&self) -> &'static str;

    /// Serialize a document; `file` names the schema file for error reporting
    fn encode(&self, file: &str, document: &Document) -> Result<String>;
}

/// Encodes documents as YAML
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlEncoder;

impl Encoder for YamlEncoder {
    fn extension(&self) -> &'static str {
        ".yaml"
    }

    fn encode(&self, file: &str, document: &Document) -> Result<String> {
        serde_yaml::to_string(document).map_err(|e| Error::serialize(file, e))
    }
}

/// A generated output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the host's output directory
    pub name: String,
    /// File contents
    pub content: String,
}

impl GeneratedFile {
    /// Encodes `document` into a file named `prefix` plus the encoder's extension
    pub fn encode(
        encoder: &impl Encoder,
        source: &str,
        prefix: &str,
        document: &Document,
    ) -> Result<Self> {
        Ok(Self {
            name: format!("{}{}", prefix, encoder.extension()),
            content: encoder.encode(source, document)?,
        })
    }
}
