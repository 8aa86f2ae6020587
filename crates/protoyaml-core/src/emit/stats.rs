//! Counters describing a generated document.

use crate::model::Document;
use std::fmt;

/// Summary counts for a flattened document
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DocumentStats {
    /// Number of messages, nested ones included
    pub message_count: usize,
    /// Number of fields across all messages
    pub field_count: usize,
    /// Number of services
    pub service_count: usize,
    /// Number of methods across all services
    pub method_count: usize,
}

impl DocumentStats {
    /// Counts the records in a document
    pub fn of(document: &Document) -> Self {
        Self {
            message_count: document.messages.len(),
            field_count: document.messages.iter().map(|m| m.fields.len()).sum(),
            service_count: document.services.len(),
            method_count: document.services.iter().map(|s| s.methods.len()).sum(),
        }
    }

    /// Adds another document's counts to this one
    pub fn add(&mut self, other: DocumentStats) {
        self.message_count += other.message_count;
        self.field_count += other.field_count;
        self.service_count += other.service_count;
        self.method_count += other.method_count;
    }
}

impl fmt::Display for DocumentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} messages, {} fields, {} services, {} methods",
            self.message_count, self.field_count, self.service_count, self.method_count
        )
    }
}
