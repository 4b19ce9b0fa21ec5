//! Field schema models.
//!
//! This module defines the closed set of value types a workflow can
//! declare for its input and output fields, plus the `FieldSchema`
//! name/type pair derived once per workflow at controller construction.

use serde::{Deserialize, Serialize};

/// The closed set of value types a declared field can carry.
///
/// Every tag maps to a widget pair (see `rb-core`'s widget mapper) and
/// a coercion rule, including `Unknown`, which degrades to plain text.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TypeTag {
    /// Plain text.
    String,

    /// Whole number.
    Integer,

    /// Fractional number.
    Float,

    /// True/false flag.
    Boolean,

    /// Calendar date (YYYY-MM-DD).
    Date,

    /// List of strings, edited as a JSON array.
    StringList,

    /// Free-form key/value mapping, edited as a JSON object.
    ObjectMap,

    /// Nested typed record, edited as a JSON object (input only).
    StructuredRecord,

    /// Opaque row-record payload, presented in a data grid (output only).
    OpaqueTabular,

    /// Opaque figure payload, passed through to the chart element
    /// unformatted (output only).
    OpaqueFigure,

    /// URL, presented as an image binding (output only).
    Url,

    /// Anything the workflow author did not (or could not) type.
    Unknown,
}

impl TypeTag {
    /// Every tag in the set, in declaration order. Used by totality tests.
    pub const ALL: [TypeTag; 12] = [
        TypeTag::String,
        TypeTag::Integer,
        TypeTag::Float,
        TypeTag::Boolean,
        TypeTag::Date,
        TypeTag::StringList,
        TypeTag::ObjectMap,
        TypeTag::StructuredRecord,
        TypeTag::OpaqueTabular,
        TypeTag::OpaqueFigure,
        TypeTag::Url,
        TypeTag::Unknown,
    ];
}

/// A declared name/type pair describing one input or output slot.
///
/// Immutable once derived; the controller introspects these exactly
/// once per workflow instance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    /// Field name as declared by the workflow author.
    pub name: String,

    /// Declared value type.
    pub value_type: TypeTag,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, value_type: TypeTag) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_every_tag() {
        // A duplicate in ALL would make the set smaller than the array.
        let unique: std::collections::HashSet<_> = TypeTag::ALL.iter().collect();
        assert_eq!(unique.len(), TypeTag::ALL.len());
    }

    #[test]
    fn test_type_tag_serializes_camel_case() {
        let json = serde_json::to_string(&TypeTag::OpaqueTabular).unwrap();
        assert_eq!(json, "\"opaqueTabular\"");

        let back: TypeTag = serde_json::from_str("\"stringList\"").unwrap();
        assert_eq!(back, TypeTag::StringList);
    }

    #[test]
    fn test_field_schema_round_trip() {
        let field = FieldSchema::new("query", TypeTag::String);
        let json = serde_json::to_string(&field).unwrap();
        let back: FieldSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
    }
}
