//! Descriptor flattening.
//!
//! Turns the message tree and service list of one `FileDescriptorProto` into
//! the flat record sequences of a [`Document`].
//!
//! ## Message order
//!
//! Each top-level message is walked depth-first with an explicit stack: the
//! root is pushed, then every popped message is emitted and its nested
//! messages are pushed in declaration order. Because the stack pops the last
//! pushed entry first, siblings come out in reverse declaration order at
//! every nesting level:
//!
//! ```text
//! message Outer { message A {} message B {} }   =>   Outer, Outer.B, Outer.A
//! ```
//!
//! Top-level messages themselves keep their declaration order.

mod name;

use crate::model::{Document, Field, Message, Method, Service};
use prost_types::{DescriptorProto, FileDescriptorProto, ServiceDescriptorProto};
use tracing::trace;

pub use name::{qualify, type_reference};

/// Builds the document for a single schema file
pub fn flatten_file(file: &FileDescriptorProto) -> Document {
    let messages = flatten_messages(file.package(), &file.message_type);
    let services = collect_services(file.package(), &file.service);
    trace!(
        "Flattened {}: {} messages, {} services",
        file.name(),
        messages.len(),
        services.len()
    );
    Document::new(messages, services)
}

/// Returns the fields of a message sorted ascending by number
pub fn collect_fields(message: &DescriptorProto) -> Vec<Field> {
    let mut fields: Vec<Field> = message
        .field
        .iter()
        .map(|field| Field {
            name: field.name().to_string(),
            number: field.number(),
        })
        .collect();
    fields.sort_by_key(|field| field.number);
    fields
}

/// Flattens top-level messages and everything nested in them
///
/// `package` is the scope the top-level names are qualified with.
pub fn flatten_messages(package: &str, messages: &[DescriptorProto]) -> Vec<Message> {
    let mut flat = Vec::new();

    for root in messages {
        let mut stack = vec![(qualify(package, root.name()), root)];

        while let Some((full_name, message)) = stack.pop() {
            stack.extend(
                message
                    .nested_type
                    .iter()
                    .map(|nested| (qualify(&full_name, nested.name()), nested)),
            );
            flat.push(Message {
                fields: collect_fields(message),
                name: full_name,
            });
        }
    }

    flat
}

/// Collects services and their methods in declaration order
pub fn collect_services(package: &str, services: &[ServiceDescriptorProto]) -> Vec<Service> {
    services
        .iter()
        .map(|service| {
            let full_name = qualify(package, service.name());
            let methods = service
                .method
                .iter()
                .map(|method| Method {
                    name: qualify(&full_name, method.name()),
                    input_type: type_reference(method.input_type()).to_string(),
                    output_type: type_reference(method.output_type()).to_string(),
                })
                .collect();
            Service {
                name: full_name,
                methods,
            }
        })
        .collect()
}
