use super::document::Document;
use crate::error::{GatewayError, Result};
use std::collections::BTreeSet;

/// Placeholder that accepts any key at its level, e.g. under `custom_fields`.
pub const ANY_KEY: &str = "_any_key_";

/// One entry of the set of params a gateway call accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureKey {
    Field(&'static str),
    Nested(&'static str, Vec<SignatureKey>),
}

impl SignatureKey {
    pub fn field(name: &'static str) -> Self {
        Self::Field(name)
    }

    pub fn fields(names: &[&'static str]) -> Vec<Self> {
        names.iter().copied().map(Self::Field).collect()
    }

    pub fn nested(name: &'static str, keys: Vec<SignatureKey>) -> Self {
        Self::Nested(name, keys)
    }
}

/// Rejects params with keys the call does not accept.
///
/// Keys are compared in their flattened `parent[child]` form; the error lists
/// every offending key, sorted.
pub fn verify_keys(params: &Document, signature: &[SignatureKey]) -> Result<()> {
    let mut allowed = BTreeSet::new();
    allowed_paths(&mut allowed, None, signature);

    let mut given = Vec::new();
    if let Some(mapping) = params.as_mapping() {
        for (key, value) in mapping {
            param_paths(&mut given, key.clone(), value);
        }
    }

    let invalid: Vec<String> = given
        .into_iter()
        .filter(|path| !allowed.contains(path) && !allowed.contains(&wildcard(path)))
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(GatewayError::Argument(format!(
            "invalid keys: {}",
            invalid.join(", ")
        )))
    }
}

fn join(parent: Option<&str>, key: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}[{key}]"),
        None => key.to_string(),
    }
}

fn allowed_paths(out: &mut BTreeSet<String>, parent: Option<&str>, keys: &[SignatureKey]) {
    for key in keys {
        match key {
            SignatureKey::Field(name) => {
                out.insert(join(parent, name));
            }
            SignatureKey::Nested(name, children) => {
                let path = join(parent, name);
                allowed_paths(out, Some(&path), children);
            }
        }
    }
}

fn param_paths(out: &mut Vec<String>, path: String, value: &Document) {
    match value {
        Document::Mapping(children) if !children.is_empty() => {
            for (key, child) in children {
                param_paths(out, format!("{path}[{key}]"), child);
            }
        }
        _ => out.push(path),
    }
}

/// `a[b][c]` becomes `a[b][_any_key_]`; a top-level key becomes `_any_key_`.
fn wildcard(path: &str) -> String {
    match path.rfind('[') {
        Some(idx) => format!("{}[{ANY_KEY}]", &path[..idx]),
        None => ANY_KEY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature() -> Vec<SignatureKey> {
        vec![
            SignatureKey::field("amount"),
            SignatureKey::nested(
                "customer",
                SignatureKey::fields(&["first_name", "last_name"]),
            ),
            SignatureKey::nested("custom_fields", vec![SignatureKey::field(ANY_KEY)]),
        ]
    }

    #[test]
    fn test_accepts_known_keys() {
        let params = Document::from_pairs([
            ("amount", Document::from("10.00")),
            ("customer", Document::from_pairs([("first_name", "Dan")])),
            ("custom_fields", Document::from_pairs([("store_me", "x")])),
        ]);
        assert!(verify_keys(&params, &signature()).is_ok());
    }

    #[test]
    fn test_rejects_unknown_keys_sorted() {
        let params = Document::from_pairs([
            ("zebra", Document::from("1")),
            ("customer", Document::from_pairs([("email", "a@b.c")])),
            ("amount", Document::from("1")),
        ]);
        let err = verify_keys(&params, &signature()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "argument error: invalid keys: customer[email], zebra"
        );
    }

    #[test]
    fn test_wildcard_only_applies_at_its_level() {
        let params = Document::from_pairs([(
            "custom_fields",
            Document::from_pairs([("a", Document::from_pairs([("b", "c")]))]),
        )]);
        assert!(verify_keys(&params, &signature()).is_err());
    }

    #[test]
    fn test_wildcard_path() {
        assert_eq!(wildcard("a[b][c]"), "a[b][_any_key_]");
        assert_eq!(wildcard("a"), "_any_key_");
    }
}
