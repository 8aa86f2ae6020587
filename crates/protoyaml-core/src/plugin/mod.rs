//! protoc plugin adapter.
//!
//! Connects the pipeline to the host compiler's request and response types:
//!
//! 1. Select the files listed in `file_to_generate`
//! 2. Flatten each into a [`Document`](crate::model::Document)
//! 3. Encode it and name the output after the file's output prefix
//!
//! A run is all-or-nothing: the first error discards every generated file.

mod params;

use crate::emit::{DocumentStats, Encoder, GeneratedFile, YamlEncoder};
use crate::error::{Error, Result};
use crate::flatten::flatten_file;
use prost_types::compiler::code_generator_response::{self, Feature};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use prost_types::FileDescriptorProto;
use std::collections::HashSet;
use tracing::{debug, error, info, trace, warn};

pub use params::{GeneratorConfig, PathMode};

/// Extensions stripped from schema file names before adding the output extension
const PROTO_EXTENSIONS: &[&str] = &[".proto", ".protodevel"];

/// Returns the descriptors marked for generation, in the order the host sent them
///
/// A descriptor name that appears more than once is selected once, at its
/// first position.
pub fn select_files(request: &CodeGeneratorRequest) -> Result<Vec<&FileDescriptorProto>> {
    let known: HashSet<&str> = request.proto_file.iter().map(|file| file.name()).collect();
    if let Some(missing) = request
        .file_to_generate
        .iter()
        .find(|name| !known.contains(name.as_str()))
    {
        return Err(Error::missing_descriptor(missing.as_str()));
    }

    let wanted: HashSet<&str> = request.file_to_generate.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let selected = request
        .proto_file
        .iter()
        .filter(|file| wanted.contains(file.name()) && seen.insert(file.name()))
        .collect();

    Ok(selected)
}

/// Generates YAML summaries for a request, configured by its `parameter`
pub fn generate(request: &CodeGeneratorRequest) -> Result<Vec<GeneratedFile>> {
    let config = GeneratorConfig::from_parameter(request.parameter())?;
    Generator::new(config).generate(request)
}

/// Runs a request and packs the outcome into a response for the host
///
/// Failures are reported through the response's `error` field with no files.
pub fn respond(request: &CodeGeneratorRequest) -> CodeGeneratorResponse {
    let mut response = CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    };

    match generate(request) {
        Ok(files) => {
            response.file = files
                .into_iter()
                .map(|file| code_generator_response::File {
                    name: Some(file.name),
                    content: Some(file.content),
                    ..Default::default()
                })
                .collect();
        }
        Err(e) => {
            if e.is_request_error() {
                warn!("Rejected request: {}", e);
            } else {
                error!("Generation failed: {}", e);
            }
            response.error = Some(e.to_string());
        }
    }

    response
}

/// Generates one output file per selected schema file
#[derive(Debug, Clone, Default)]
pub struct Generator<E = YamlEncoder> {
    config: GeneratorConfig,
    encoder: E,
}

impl Generator<YamlEncoder> {
    /// Creates a YAML generator with the given config
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            encoder: YamlEncoder,
        }
    }
}

impl<E: Encoder> Generator<E> {
    /// Replaces the output encoder
    pub fn with_encoder<F: Encoder>(self, encoder: F) -> Generator<F> {
        Generator {
            config: self.config,
            encoder,
        }
    }

    /// Returns the active configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates the files for every selected descriptor of a request
    pub fn generate(&self, request: &CodeGeneratorRequest) -> Result<Vec<GeneratedFile>> {
        let selected = select_files(request)?;
        debug!(
            "Selected {} of {} files for generation",
            selected.len(),
            request.proto_file.len()
        );

        let mut totals = DocumentStats::default();
        let mut generated = Vec::with_capacity(selected.len());
        for file in selected {
            let (output, stats) = self.generate_file(file)?;
            totals.add(stats);
            generated.push(output);
        }

        info!("Generated {} files ({})", generated.len(), totals);
        Ok(generated)
    }

    /// Flattens and encodes a single schema file
    pub fn generate_file(
        &self,
        file: &FileDescriptorProto,
    ) -> Result<(GeneratedFile, DocumentStats)> {
        let document = flatten_file(file);
        if document.is_empty() {
            trace!("{} declares no messages or services", file.name());
        }

        let prefix = self.output_prefix(file)?;
        let output = GeneratedFile::encode(&self.encoder, file.name(), &prefix, &document)?;
        let stats = DocumentStats::of(&document);
        debug!("{} -> {} ({})", file.name(), output.name, stats);

        Ok((output, stats))
    }

    /// Returns the output path of a file without extension
    pub fn output_prefix(&self, file: &FileDescriptorProto) -> Result<String> {
        let name = file.name();
        let stem = PROTO_EXTENSIONS
            .iter()
            .find_map(|ext| name.strip_suffix(ext))
            .unwrap_or(name);

        if self.config.paths == PathMode::SourceRelative {
            return Ok(stem.to_string());
        }

        let prefix = match self.import_path(file) {
            Some(import_path) => {
                let base = stem.rsplit('/').next().unwrap_or(stem);
                format!("{}/{}", import_path.trim_end_matches('/'), base)
            }
            None => stem.to_string(),
        };

        match &self.config.module {
            Some(module) => prefix
                .strip_prefix(module.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .map(str::to_string)
                .ok_or_else(|| Error::module_prefix(prefix.as_str(), module.as_str())),
            None => Ok(prefix),
        }
    }

    /// Resolves a file's import path from `M` overrides or its `go_package` option
    fn import_path<'a>(&'a self, file: &'a FileDescriptorProto) -> Option<&'a str> {
        if let Some(path) = self.config.import_paths.get(file.name()) {
            return Some(path.as_str());
        }

        // go_package can be "import/path;package_name" or just "import/path"
        let go_package = file.options.as_ref()?.go_package.as_deref()?;
        let import_path = match go_package.split_once(';') {
            Some((path, _)) => path,
            None => go_package,
        };
        (!import_path.is_empty()).then_some(import_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::tests::{field, message, method, service};
    use crate::model::{Document, Field};
    use pretty_assertions::assert_eq;
    use prost_types::FileOptions;

    fn proto_file(name: &str, package: &str) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some(name.to_string()),
            package: Some(package.to_string()),
            message_type: vec![message("Foo", vec![field("id", 2), field("name", 1)], vec![])],
            service: vec![service(
                "FooService",
                vec![method("GetFoo", &format!(".{}.Foo", package), &format!(".{}.Foo", package))],
            )],
            ..Default::default()
        }
    }

    fn with_go_package(mut file: FileDescriptorProto, go_package: &str) -> FileDescriptorProto {
        file.options = Some(FileOptions {
            go_package: Some(go_package.to_string()),
            ..Default::default()
        });
        file
    }

    fn request(files: Vec<FileDescriptorProto>, generate: &[&str]) -> CodeGeneratorRequest {
        CodeGeneratorRequest {
            file_to_generate: generate.iter().map(|s| s.to_string()).collect(),
            proto_file: files,
            ..Default::default()
        }
    }

    #[test]
    fn test_select_files_follows_host_order() {
        let req = request(
            vec![
                proto_file("dep.proto", "dep"),
                proto_file("a.proto", "a"),
                proto_file("b.proto", "b"),
            ],
            &["b.proto", "a.proto"],
        );

        let names: Vec<&str> = select_files(&req)
            .unwrap()
            .iter()
            .map(|f| f.name())
            .collect();
        assert_eq!(names, vec!["a.proto", "b.proto"]);
    }

    #[test]
    fn test_select_files_duplicate_descriptor_still_needs_every_name() {
        let req = request(
            vec![proto_file("a.proto", "a"), proto_file("a.proto", "a")],
            &["a.proto", "ghost.proto"],
        );

        let err = select_files(&req).unwrap_err();
        assert!(matches!(err, Error::MissingDescriptor { ref name } if name == "ghost.proto"));
        assert!(generate(&req).is_err());
    }

    #[test]
    fn test_select_files_duplicate_descriptor_selected_once() {
        let req = request(
            vec![
                proto_file("a.proto", "a"),
                proto_file("b.proto", "b"),
                proto_file("a.proto", "a"),
            ],
            &["a.proto", "b.proto"],
        );

        let names: Vec<&str> = select_files(&req)
            .unwrap()
            .iter()
            .map(|f| f.name())
            .collect();
        assert_eq!(names, vec!["a.proto", "b.proto"]);

        let files = generate(&req).unwrap();
        let outputs: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(outputs, vec!["a.yaml", "b.yaml"]);
    }

    #[test]
    fn test_select_files_missing_descriptor() {
        let req = request(vec![proto_file("a.proto", "a")], &["a.proto", "ghost.proto"]);

        let err = select_files(&req).unwrap_err();
        assert!(matches!(err, Error::MissingDescriptor { ref name } if name == "ghost.proto"));
    }

    #[test]
    fn test_generation_flag_controls_output() {
        let files = vec![proto_file("acme/foo.proto", "acme")];

        let off = generate(&request(files.clone(), &[])).unwrap();
        assert!(off.is_empty());

        let on = generate(&request(files, &["acme/foo.proto"])).unwrap();
        assert_eq!(on.len(), 1);
        assert_eq!(on[0].name, "acme/foo.yaml");
    }

    #[test]
    fn test_generated_content_round_trips() {
        let req = request(vec![proto_file("foo.proto", "acme")], &["foo.proto"]);
        let files = generate(&req).unwrap();

        let document: Document = serde_yaml::from_str(&files[0].content).unwrap();
        assert_eq!(
            document.messages[0].fields,
            vec![
                Field {
                    name: "name".to_string(),
                    number: 1
                },
                Field {
                    name: "id".to_string(),
                    number: 2
                },
            ]
        );
        assert_eq!(document.services[0].methods[0].input_type, "acme.Foo");
        assert_eq!(document, flatten_file(&proto_file("foo.proto", "acme")));
    }

    #[test]
    fn test_output_prefix_import_mode() {
        let generator = Generator::new(GeneratorConfig::new());

        let plain = proto_file("acme/v1/foo.proto", "acme.v1");
        assert_eq!(generator.output_prefix(&plain).unwrap(), "acme/v1/foo");

        let go = with_go_package(plain.clone(), "example.com/acme/v1;acmev1");
        assert_eq!(
            generator.output_prefix(&go).unwrap(),
            "example.com/acme/v1/foo"
        );

        let go = with_go_package(plain, "example.com/acme/api");
        assert_eq!(
            generator.output_prefix(&go).unwrap(),
            "example.com/acme/api/foo"
        );

        let devel = proto_file("legacy.protodevel", "legacy");
        assert_eq!(generator.output_prefix(&devel).unwrap(), "legacy");
    }

    #[test]
    fn test_output_prefix_source_relative() {
        let generator = Generator::new(GeneratorConfig::new().paths(PathMode::SourceRelative));
        let file = with_go_package(proto_file("acme/v1/foo.proto", "acme.v1"), "example.com/x");

        assert_eq!(generator.output_prefix(&file).unwrap(), "acme/v1/foo");
    }

    #[test]
    fn test_output_prefix_import_override_and_module() {
        let generator = Generator::new(
            GeneratorConfig::new()
                .module("example.com/acme")
                .import_path("acme/v1/foo.proto", "example.com/acme/gen/v1"),
        );

        let file = with_go_package(proto_file("acme/v1/foo.proto", "acme.v1"), "ignored.dev/x");
        assert_eq!(generator.output_prefix(&file).unwrap(), "gen/v1/foo");

        let outside = proto_file("other/bar.proto", "other");
        let err = generator.output_prefix(&outside).unwrap_err();
        assert!(matches!(err, Error::ModulePrefix { .. }));
    }

    /// Writes one line per message name
    struct NameListEncoder;

    impl Encoder for NameListEncoder {
        fn extension(&self) -> &'static str {
            ".names.txt"
        }

        fn encode(&self, _file: &str, document: &Document) -> Result<String> {
            Ok(document
                .messages
                .iter()
                .map(|m| format!("{}\n", m.name))
                .collect())
        }
    }

    #[test]
    fn test_custom_encoder_reaches_generated_file() {
        let generator = Generator::new(GeneratorConfig::new().paths(PathMode::SourceRelative))
            .with_encoder(NameListEncoder);
        assert_eq!(generator.config().paths, PathMode::SourceRelative);

        let mut file = proto_file("acme/foo.proto", "acme");
        file.message_type[0].nested_type = vec![message("Inner", vec![], vec![])];
        let req = request(vec![file], &["acme/foo.proto"]);

        let files = generator.generate(&req).unwrap();
        assert_eq!(
            files,
            vec![GeneratedFile {
                name: "acme/foo.names.txt".to_string(),
                content: "acme.Foo\nacme.Foo.Inner\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_respond_success() {
        let req = request(vec![proto_file("foo.proto", "acme")], &["foo.proto"]);
        let response = respond(&req);

        assert_eq!(response.error, None);
        assert_eq!(response.supported_features, Some(Feature::Proto3Optional as u64));
        assert_eq!(response.file.len(), 1);
        assert_eq!(response.file[0].name(), "foo.yaml");
        assert!(response.file[0].content().contains("name: acme.FooService.GetFoo"));
    }

    #[test]
    fn test_respond_failure_has_no_files() {
        let mut req = request(
            vec![proto_file("a.proto", "a"), proto_file("b.proto", "b")],
            &["a.proto", "b.proto"],
        );
        req.parameter = Some("module=example.com/x".to_string());

        let response = respond(&req);
        assert!(response.file.is_empty());
        assert!(response.error.unwrap().contains("expected prefix"));
        assert_eq!(response.supported_features, Some(Feature::Proto3Optional as u64));
    }

    #[test]
    fn test_respond_bad_parameter() {
        let mut req = request(vec![proto_file("a.proto", "a")], &["a.proto"]);
        req.parameter = Some("plugins=grpc".to_string());

        let response = respond(&req);
        assert!(response.file.is_empty());
        assert!(response.error.unwrap().contains("unknown parameter"));
    }
}
