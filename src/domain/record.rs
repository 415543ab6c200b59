use super::document::{DATETIME_FORMAT, Document, Mapping};
use crate::error::{GatewayError, Result};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Typed view over one mapping of a decoded response.
///
/// Used by the record `TryFrom<&Document>` impls to pull fields out of the
/// generic tree with a uniform error message.
pub(crate) struct Fields<'a> {
    kind: &'static str,
    mapping: &'a Mapping,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(kind: &'static str, document: &'a Document) -> Result<Self> {
        let mapping = document
            .as_mapping()
            .ok_or_else(|| GatewayError::Parse(format!("{kind}: expected a mapping")))?;
        Ok(Self { kind, mapping })
    }

    fn get(&self, key: &str) -> Option<&'a Document> {
        self.mapping.get(key).filter(|v| !v.is_null())
    }

    fn missing(&self, key: &str) -> GatewayError {
        GatewayError::Parse(format!("{}: missing field {key}", self.kind))
    }

    pub(crate) fn string(&self, key: &str) -> Result<String> {
        self.opt_string(key).ok_or_else(|| self.missing(key))
    }

    /// Scalar text of `key`; `None` when absent or nil.
    pub(crate) fn opt_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Document::scalar_text)
    }

    pub(crate) fn datetime(&self, key: &str) -> Result<NaiveDateTime> {
        self.opt_datetime(key)?.ok_or_else(|| self.missing(key))
    }

    /// Raw subtree of `key`, left generic; an empty mapping when absent.
    pub(crate) fn document(&self, key: &str) -> Document {
        self.get(key).cloned().unwrap_or_default()
    }

    pub(crate) fn opt_datetime(&self, key: &str) -> Result<Option<NaiveDateTime>> {
        match self.get(key) {
            None => Ok(None),
            Some(Document::DateTime(dt)) => Ok(Some(*dt)),
            Some(Document::String(s)) if s.is_empty() => Ok(None),
            Some(Document::String(s)) => NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                .map(Some)
                .map_err(|e| GatewayError::Parse(format!("{}.{key}: {e}", self.kind))),
            Some(_) => Err(GatewayError::Parse(format!(
                "{}.{key}: expected a datetime",
                self.kind
            ))),
        }
    }

    pub(crate) fn decimal(&self, key: &str) -> Result<Decimal> {
        match self.get(key) {
            None => Err(self.missing(key)),
            Some(Document::Decimal(d)) => Ok(*d),
            Some(Document::Integer(i)) => Ok(Decimal::from(*i)),
            Some(Document::String(s)) => Decimal::from_str(s.trim())
                .map_err(|e| GatewayError::Parse(format!("{}.{key}: {e}", self.kind))),
            Some(_) => Err(GatewayError::Parse(format!(
                "{}.{key}: expected a decimal",
                self.kind
            ))),
        }
    }

    pub(crate) fn nested<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: for<'d> TryFrom<&'d Document, Error = GatewayError>,
    {
        self.get(key).map(T::try_from).transpose()
    }

    /// Decodes an array field; a missing or empty field is an empty list.
    pub(crate) fn list<T>(&self, key: &str) -> Result<Vec<T>>
    where
        T: for<'d> TryFrom<&'d Document, Error = GatewayError>,
    {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Document::Sequence(items)) => items.iter().map(T::try_from).collect(),
            Some(Document::String(s)) if s.is_empty() => Ok(Vec::new()),
            Some(_) => Err(GatewayError::Parse(format!(
                "{}.{key}: expected a list",
                self.kind
            ))),
        }
    }

    /// Flat string map, e.g. custom fields.
    pub(crate) fn string_map(&self, key: &str) -> BTreeMap<String, String> {
        self.get(key)
            .and_then(Document::as_mapping)
            .map(|m| {
                m.iter()
                    .filter_map(|(k, v)| v.scalar_text().map(|text| (k.clone(), text)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_required_and_optional_strings() {
        let doc = Document::from_pairs([
            ("id", Document::from("abc")),
            ("fax", Document::Null),
            ("count", Document::Integer(2)),
        ]);
        let fields = Fields::new("thing", &doc).unwrap();
        assert_eq!(fields.string("id").unwrap(), "abc");
        assert_eq!(fields.opt_string("count").as_deref(), Some("2"));
        assert_eq!(fields.opt_string("fax"), None);
        let err = fields.string("fax").unwrap_err();
        assert_eq!(err.to_string(), "parse error: thing: missing field fax");
    }

    #[test]
    fn test_decimal_from_string_or_tag() {
        let doc = Document::from_pairs([
            ("a", Document::from("10.50")),
            ("b", Document::Decimal(dec!(1.25))),
            ("c", Document::from("ten")),
        ]);
        let fields = Fields::new("thing", &doc).unwrap();
        assert_eq!(fields.decimal("a").unwrap(), dec!(10.50));
        assert_eq!(fields.decimal("b").unwrap(), dec!(1.25));
        assert!(fields.decimal("c").is_err());
        assert!(fields.decimal("d").is_err());
    }

    #[test]
    fn test_datetime_from_string() {
        let doc = Document::from_pairs([("at", "2009-10-28T10:19:49Z"), ("empty", "")]);
        let fields = Fields::new("thing", &doc).unwrap();
        assert!(fields.opt_datetime("at").unwrap().is_some());
        assert!(fields.opt_datetime("empty").unwrap().is_none());
        assert!(fields.opt_datetime("missing").unwrap().is_none());
    }

    #[test]
    fn test_rejects_non_mapping() {
        assert!(Fields::new("thing", &Document::from("x")).is_err());
    }
}
