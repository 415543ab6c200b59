use super::{ARRAY_ITEM, TypeTag, is_valid_name};
use crate::domain::document::{Document, Mapping};
use crate::error::{GatewayError, Result};
use quick_xml::escape::escape;

/// Encodes a single-key mapping [`Document`] as gateway XML; the key
/// becomes the root element.
///
/// Keys are written as given. Only strings, mappings and sequences survive a
/// decode unchanged; other scalars are written as plain text without a type
/// tag and come back as strings, and `Null` comes back as `""`.
pub fn encode(document: &Document) -> Result<String> {
    let mapping = document.as_mapping().ok_or_else(|| {
        GatewayError::Argument("top-level document must be a mapping".to_string())
    })?;
    if mapping.len() != 1 {
        return Err(GatewayError::Argument(format!(
            "top-level mapping must have exactly one key, found {}",
            mapping.len()
        )));
    }
    let mut xml = String::new();
    write_mapping(&mut xml, mapping)?;
    Ok(xml)
}

fn write_mapping(out: &mut String, mapping: &Mapping) -> Result<()> {
    for (key, value) in mapping {
        write_element(out, key, value)?;
    }
    Ok(())
}

fn write_element(out: &mut String, name: &str, value: &Document) -> Result<()> {
    if !is_valid_name(name) {
        return Err(GatewayError::Argument(format!(
            "invalid element name {name:?}"
        )));
    }

    match value {
        Document::Sequence(items) => {
            out.push_str(&format!("<{name} type=\"{}\">", TypeTag::Array.as_str()));
            for item in items {
                write_element(out, ARRAY_ITEM, item)?;
            }
        }
        Document::Mapping(mapping) => {
            out.push_str(&format!("<{name}>"));
            write_mapping(out, mapping)?;
        }
        scalar => {
            out.push_str(&format!("<{name}>"));
            if let Some(text) = scalar.scalar_text() {
                out.push_str(&escape(text.as_str()));
            }
        }
    }
    out.push_str(&format!("</{name}>"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::xml::decode;

    fn round_trip(document: &Document) -> Document {
        decode(&encode(document).unwrap()).unwrap()
    }

    #[test]
    fn test_encode_simple() {
        let doc = Document::from_pairs([("a", "b")]);
        assert_eq!(encode(&doc).unwrap(), "<a>b</a>");
        assert_eq!(round_trip(&doc), doc);
    }

    #[test]
    fn test_encode_nested() {
        let doc = Document::from_pairs([("container", Document::from_pairs([("item", "val")]))]);
        assert_eq!(encode(&doc).unwrap(), "<container><item>val</item></container>");
        assert_eq!(round_trip(&doc), doc);
    }

    #[test]
    fn test_encode_array() {
        let doc = Document::from_pairs([(
            "container",
            Document::from_pairs([(
                "elements",
                Document::Sequence(vec!["val1".into(), "val2".into(), "val3".into()]),
            )]),
        )]);
        assert_eq!(
            encode(&doc).unwrap(),
            "<container><elements type=\"array\"><item>val1</item><item>val2</item><item>val3</item></elements></container>"
        );
        assert_eq!(round_trip(&doc), doc);
    }

    #[test]
    fn test_encode_array_of_mappings() {
        let doc = Document::from_pairs([(
            "container",
            Document::from_pairs([(
                "elements",
                Document::Sequence(vec![
                    Document::from_pairs([("val", "val1")]),
                    Document::from_pairs([("val", "val2")]),
                ]),
            )]),
        )]);
        assert_eq!(round_trip(&doc), doc);
    }

    #[test]
    fn test_encode_retains_underscores() {
        let doc = Document::from_pairs([(
            "container",
            Document::from_pairs([("my_element", "val")]),
        )]);
        assert_eq!(round_trip(&doc), doc);
    }

    #[test]
    fn test_encode_escapes_text() {
        let doc = Document::from_pairs([("note", "<b> & \"quoted\" 'single'")]);
        let xml = encode(&doc).unwrap();
        assert!(!xml.contains("<b>"));
        assert_eq!(round_trip(&doc), doc);
    }

    #[test]
    fn test_encode_other_scalars_come_back_as_strings() {
        let doc = Document::from_pairs([(
            "root",
            Document::from_pairs([
                ("count", Document::Integer(3)),
                ("flag", Document::Boolean(true)),
                ("nothing", Document::Null),
            ]),
        )]);
        let expected = Document::from_pairs([(
            "root",
            Document::from_pairs([("count", "3"), ("flag", "true"), ("nothing", "")]),
        )]);
        assert_eq!(round_trip(&doc), expected);
    }

    #[test]
    fn test_encode_rejects_non_mapping() {
        assert!(matches!(
            encode(&Document::from("x")),
            Err(GatewayError::Argument(_))
        ));
    }

    #[test]
    fn test_encode_rejects_several_roots() {
        let doc = Document::from_pairs([("a", "x"), ("b", "y")]);
        assert!(matches!(encode(&doc), Err(GatewayError::Argument(_))));
        assert!(matches!(
            encode(&Document::mapping()),
            Err(GatewayError::Argument(_))
        ));
    }

    #[test]
    fn test_encode_rejects_invalid_names() {
        let doc = Document::from_pairs([("bad name", "x")]);
        assert!(matches!(encode(&doc), Err(GatewayError::Argument(_))));
    }
}
