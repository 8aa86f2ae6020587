//! Plugin parameter parsing.
//!
//! The host passes options after the colon in `--yaml_out=<params>:<dir>` as a
//! single comma-separated string of `key=value` entries.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// How output file names are derived from input file names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathMode {
    /// Place output under the file's Go import path when it has one
    #[default]
    Import,
    /// Place output next to the input file's path
    SourceRelative,
}

impl PathMode {
    /// Returns the parameter spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            PathMode::Import => "import",
            PathMode::SourceRelative => "source_relative",
        }
    }
}

impl TryFrom<&str> for PathMode {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "import" => Ok(PathMode::Import),
            "source_relative" => Ok(PathMode::SourceRelative),
            _ => Err(Error::invalid_parameter(
                format!("paths={}", value),
                "expected 'import' or 'source_relative'",
            )),
        }
    }
}

/// Configuration for a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Output path mode
    pub paths: PathMode,
    /// Module prefix stripped from generated names in import mode
    pub module: Option<String>,
    /// Per-file import path overrides (`M<file>=<path>`)
    pub import_paths: HashMap<String, String>,
}

impl GeneratorConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the request parameter string
    pub fn from_parameter(parameter: &str) -> Result<Self> {
        let mut config = Self::default();

        for entry in parameter.split(',').map(str::trim) {
            if entry.is_empty() {
                continue;
            }
            let (key, value) = entry.split_once('=').unwrap_or((entry, ""));

            match key {
                "paths" => config.paths = PathMode::try_from(value)?,
                "module" => config.module = Some(value.to_string()),
                // Accepted for command-line compatibility; YAML output has no annotations
                "annotate_code" => match value {
                    "" | "true" | "false" => {}
                    _ => {
                        return Err(Error::invalid_parameter(
                            entry,
                            "expected 'true' or 'false'",
                        ))
                    }
                },
                _ if key.len() > 1 && key.starts_with('M') => {
                    config
                        .import_paths
                        .insert(key[1..].to_string(), value.to_string());
                }
                _ => return Err(Error::invalid_parameter(entry, "unknown parameter")),
            }
        }

        if config.module.is_some() && config.paths != PathMode::Import {
            return Err(Error::invalid_parameter(
                format!("paths={}", config.paths.as_str()),
                "cannot use module= with paths=source_relative",
            ));
        }

        Ok(config)
    }

    /// Sets the output path mode
    pub fn paths(mut self, paths: PathMode) -> Self {
        self.paths = paths;
        self
    }

    /// Sets the module prefix
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Overrides the import path of a single proto file
    pub fn import_path(mut self, file: impl Into<String>, path: impl Into<String>) -> Self {
        self.import_paths.insert(file.into(), path.into());
        self
    }
}
