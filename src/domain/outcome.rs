use super::document::Document;
use super::validation::ValidationErrors;

/// Validation failure returned by the gateway in an `api_error_response`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResult {
    pub message: String,
    pub errors: ValidationErrors,
    /// Params echoed back by the gateway, minus anything sensitive.
    pub params: Document,
}

impl ErrorResult {
    pub fn new(response: &Document) -> Self {
        Self {
            message: response
                .get("message")
                .and_then(Document::scalar_text)
                .unwrap_or_default(),
            errors: response
                .get("errors")
                .map(ValidationErrors::new)
                .unwrap_or_default(),
            params: response.get("params").cloned().unwrap_or_default(),
        }
    }
}

/// Result of a gateway call that can fail validation.
///
/// Transport and protocol failures are `Err(GatewayError)`; a request the
/// gateway understood but refused is `Ok(Outcome::Failure(..))`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure(ErrorResult),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ErrorResult> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::xml::decode;

    #[test]
    fn test_error_result_from_api_error_response() {
        let xml = r#"
        <api-error-response>
          <message>Email is an invalid format.</message>
          <errors>
            <errors type="array"/>
            <customer>
              <errors type="array">
                <error>
                  <code>81604</code>
                  <attribute>email</attribute>
                  <message>Email is an invalid format.</message>
                </error>
              </errors>
            </customer>
          </errors>
          <params><customer><email>invalid</email></customer></params>
        </api-error-response>
        "#;
        let doc = decode(xml).unwrap();
        let result = ErrorResult::new(doc.get("api_error_response").unwrap());

        assert_eq!(result.message, "Email is an invalid format.");
        assert_eq!(result.errors.size(), 1);
        let on_email = result.errors.for_object("customer").on("email");
        assert_eq!(on_email[0].code, "81604");
        assert_eq!(
            result.params.get("customer").and_then(|c| c.get("email")),
            Some(&Document::from("invalid"))
        );
    }

    #[test]
    fn test_outcome_accessors() {
        let ok: Outcome<u32> = Outcome::Success(1);
        assert!(ok.is_success());
        assert_eq!(ok.clone().map(|v| v + 1).into_success(), Some(2));
        assert!(ok.failure().is_none());

        let failed: Outcome<u32> = Outcome::Failure(ErrorResult::new(&Document::mapping()));
        assert!(!failed.is_success());
        assert!(failed.success().is_none());
        assert_eq!(failed.failure().map(|f| f.errors.size()), Some(0));
    }
}
