use super::document::Document;
use std::collections::BTreeMap;

/// One validation failure reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub attribute: String,
    pub code: String,
    pub message: String,
}

/// Validation failures of a rejected request, scoped the way the params
/// were nested.
///
/// Each level has its own errors plus one child collection per nested object:
/// the errors for `customer[credit_card][number]` live under
/// `for_object("customer").for_object("credit_card")`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
    nested: BTreeMap<String, ValidationErrors>,
}

static EMPTY: ValidationErrors = ValidationErrors {
    errors: Vec::new(),
    nested: BTreeMap::new(),
};

impl ValidationErrors {
    /// Builds the collection from the `errors` element of an
    /// `api_error_response`.
    pub fn new(document: &Document) -> Self {
        let Some(mapping) = document.as_mapping() else {
            return Self::default();
        };

        let mut collection = Self::default();
        for (key, value) in mapping {
            match (key.as_str(), value) {
                ("errors", Document::Sequence(items)) => {
                    collection.errors = items.iter().filter_map(parse_error).collect();
                }
                (_, Document::Mapping(_)) => {
                    collection.nested.insert(key.clone(), Self::new(value));
                }
                _ => {}
            }
        }
        collection
    }

    /// Errors scoped under `key`; empty when there are none.
    pub fn for_object(&self, key: &str) -> &ValidationErrors {
        self.nested.get(key).unwrap_or(&EMPTY)
    }

    /// Errors at this level only.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Errors at this level for one attribute.
    pub fn on(&self, attribute: &str) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.attribute == attribute)
            .collect()
    }

    /// Errors at this level and every level below it.
    pub fn deep_errors(&self) -> Vec<&ValidationError> {
        let mut all: Vec<&ValidationError> = self.errors.iter().collect();
        for child in self.nested.values() {
            all.extend(child.deep_errors());
        }
        all
    }

    pub fn size(&self) -> usize {
        self.errors.len() + self.nested.values().map(Self::size).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

fn parse_error(item: &Document) -> Option<ValidationError> {
    let text = |key: &str| {
        item.get(key)
            .and_then(Document::scalar_text)
            .unwrap_or_default()
    };
    item.as_mapping()?;
    Some(ValidationError {
        attribute: text("attribute"),
        code: text("code"),
        message: text("message"),
    })
}
