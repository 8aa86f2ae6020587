//! Plain records written to the YAML summary.
//!
//! These mirror the emitted document one to one: field order in each struct is
//! the key order in the output, and every sequence keeps the order it was
//! built in.

use serde::{Deserialize, Serialize};

/// A message field: its name and wire tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name as declared
    pub name: String,
    /// Field number
    pub number: i32,
}

/// A message with its fields sorted by number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Fully-qualified message name, without a leading dot
    pub name: String,
    /// Fields in ascending number order
    pub fields: Vec<Field>,
}

/// An RPC method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Fully-qualified method name (`pkg.Service.Method`)
    pub name: String,
    /// Fully-qualified request message name
    pub input_type: String,
    /// Fully-qualified response message name
    pub output_type: String,
}

/// A service with its methods in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Fully-qualified service name
    pub name: String,
    /// Methods in declaration order
    pub methods: Vec<Method>,
}

/// The top-level document generated for one schema file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Every message in the file, nested ones included, flattened
    pub messages: Vec<Message>,
    /// Services in declaration order
    pub services: Vec<Service>,
}

impl Document {
    /// Creates a document from already flattened records
    pub fn new(messages: Vec<Message>, services: Vec<Service>) -> Self {
        Self { messages, services }
    }

    /// Returns true if the file declared neither messages nor services
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.services.is_empty()
    }
}
