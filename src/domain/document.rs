use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Wire format of `datetime`-tagged values. Always UTC.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub type Mapping = BTreeMap<String, Document>;

/// The generic tree exchanged with the gateway's XML format.
///
/// This is the only dynamically shaped type in the crate. Resource records
/// are mapped out of it at the codec boundary (see `domain::record`).
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    String(String),
    Integer(i64),
    Boolean(bool),
    Decimal(Decimal),
    /// A UTC timestamp; no offset is stored.
    DateTime(NaiveDateTime),
    Null,
    Sequence(Vec<Document>),
    Mapping(Mapping),
}

impl Document {
    pub fn mapping() -> Self {
        Document::Mapping(Mapping::new())
    }

    /// Builds a mapping from `(key, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Document>,
        I: IntoIterator<Item = (K, V)>,
    {
        Document::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Looks up `key` when this is a mapping.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Document::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Document]> {
        match self {
            Document::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Document::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Document::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Document::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Document::Null)
    }

    /// Textual form of a scalar, as written on the wire or into a form field.
    ///
    /// Returns `None` for sequences and mappings.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Document::String(s) => Some(s.clone()),
            Document::Integer(i) => Some(i.to_string()),
            Document::Boolean(b) => Some(b.to_string()),
            Document::Decimal(d) => Some(d.to_string()),
            Document::DateTime(dt) => Some(dt.format(DATETIME_FORMAT).to_string()),
            Document::Null => Some(String::new()),
            Document::Sequence(_) | Document::Mapping(_) => None,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::mapping()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scalar_text() {
            Some(text) => f.write_str(&text),
            None => match serde_json::to_string(self) {
                Ok(json) => f.write_str(&json),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Document::String(value.to_string())
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Document::String(value)
    }
}

impl From<i64> for Document {
    fn from(value: i64) -> Self {
        Document::Integer(value)
    }
}

impl From<bool> for Document {
    fn from(value: bool) -> Self {
        Document::Boolean(value)
    }
}

impl From<Decimal> for Document {
    fn from(value: Decimal) -> Self {
        Document::Decimal(value)
    }
}

impl From<NaiveDateTime> for Document {
    fn from(value: NaiveDateTime) -> Self {
        Document::DateTime(value)
    }
}

impl From<Vec<Document>> for Document {
    fn from(value: Vec<Document>) -> Self {
        Document::Sequence(value)
    }
}

impl From<Mapping> for Document {
    fn from(value: Mapping) -> Self {
        Document::Mapping(value)
    }
}

impl From<serde_json::Value> for Document {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Document::Null,
            Value::Bool(b) => Document::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Document::Integer(i),
                None => Decimal::from_str(&n.to_string())
                    .map(Document::Decimal)
                    .unwrap_or_else(|_| Document::String(n.to_string())),
            },
            Value::String(s) => Document::String(s),
            Value::Array(items) => Document::Sequence(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                Document::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Document::String(s) => serializer.serialize_str(s),
            Document::Integer(i) => serializer.serialize_i64(*i),
            Document::Boolean(b) => serializer.serialize_bool(*b),
            Document::Decimal(d) => Serialize::serialize(d, serializer),
            Document::DateTime(dt) => {
                serializer.serialize_str(&dt.format(DATETIME_FORMAT).to_string())
            }
            Document::Null => serializer.serialize_unit(),
            Document::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Document::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
