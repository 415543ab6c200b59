//! XML wire format of the gateway.
//!
//! The gateway speaks a small, schema-less XML dialect: hyphenated element
//! names, an optional `type` attribute on leaves and arrays, and `nil="true"`
//! for explicit nulls. [`decode`] turns a document into a [`Document`] tree and
//! [`encode`] goes the other way.
//!
//! [`Document`]: crate::domain::document::Document

mod decoder;
mod encoder;

pub use decoder::decode;
pub use encoder::encode;

/// Tag used for every child of an encoded array.
pub const ARRAY_ITEM: &str = "item";

/// Value of the `type` attribute that governs how an element is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Integer,
    Boolean,
    DateTime,
    Decimal,
    Array,
}

impl TypeTag {
    /// Unknown tags yield `None` and the element is decoded as if untyped.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "datetime" => Some(Self::DateTime),
            "decimal" => Some(Self::Decimal),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
            Self::Decimal => "decimal",
            Self::Array => "array",
        }
    }
}

/// Wire element name to in-memory key: `created-at` becomes `created_at`.
pub fn key_name(wire: &str) -> String {
    wire.replace('-', "_")
}

/// In-memory key to wire element name: `created_at` becomes `created-at`.
pub fn wire_name(key: &str) -> String {
    key.replace('_', "-")
}

/// Whether `name` can be written as an element name.
///
/// Letters, digits, `_` and `-`; must not be empty or start with a digit or
/// hyphen.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
