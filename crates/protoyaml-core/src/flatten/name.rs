//! Fully-qualified name helpers.

/// Joins a scope and a simple name with a dot.
///
/// An empty scope (a file without a `package`) yields the bare name.
pub fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

/// Converts a descriptor type reference (`.pkg.Msg`) to a full name (`pkg.Msg`).
///
/// References without a leading dot are returned unchanged.
pub fn type_reference(type_name: &str) -> &str {
    type_name.strip_prefix('.').unwrap_or(type_name)
}
