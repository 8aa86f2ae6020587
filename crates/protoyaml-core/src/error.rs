//! Error types for the protoyaml-core library.
//!
//! Every failure is fatal for the whole plugin run: the host compiler gets
//! either a complete set of generated files or a single error message.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for protoyaml operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all protoyaml operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The YAML encoder rejected a document
    #[error("failed to serialize YAML for '{file}': {source}")]
    Serialize {
        /// Schema file whose document failed to serialize
        file: String,
        /// Underlying encoder error
        #[source]
        source: serde_yaml::Error,
    },

    /// A file was selected for generation but has no descriptor in the request
    #[error("no descriptor for generated file: {name}")]
    MissingDescriptor {
        /// Name listed in `file_to_generate`
        name: String,
    },

    /// A plugin parameter could not be understood
    #[error("invalid plugin parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The offending `key=value` entry
        parameter: String,
        /// Why it was rejected
        reason: String,
    },

    /// A generated file name does not live under the configured module
    #[error("generated file '{name}' does not have expected prefix '{module}'")]
    ModulePrefix {
        /// Generated file name before stripping
        name: String,
        /// The `module=` parameter value
        module: String,
    },

    /// Generated file name would escape the output directory
    #[error("path traversal detected: '{path}' would escape output directory")]
    PathTraversal {
        /// The offending generated name
        path: PathBuf,
    },

    /// Failed to decode a CodeGeneratorRequest or FileDescriptorSet
    #[error("failed to decode descriptor input: {0}")]
    RequestDecode(#[from] prost::DecodeError),

    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create output directory
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Path to the directory that failed to create
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a new serialization error
    pub fn serialize(file: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::Serialize {
            file: file.into(),
            source,
        }
    }

    /// Creates a new missing descriptor error
    pub fn missing_descriptor(name: impl Into<String>) -> Self {
        Self::MissingDescriptor { name: name.into() }
    }

    /// Creates a new invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new module prefix error
    pub fn module_prefix(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self::ModulePrefix {
            name: name.into(),
            module: module.into(),
        }
    }

    /// Creates a new path traversal error
    pub fn path_traversal(path: impl Into<PathBuf>) -> Self {
        Self::PathTraversal { path: path.into() }
    }

    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the error was caused by the request rather than the environment
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::MissingDescriptor { .. }
                | Self::InvalidParameter { .. }
                | Self::ModulePrefix { .. }
                | Self::RequestDecode(_)
        )
    }
}
