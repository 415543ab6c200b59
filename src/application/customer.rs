use super::gateway::{Gateway, id_segment, not_found_as, outcome, wrap};
use crate::domain::customer::Customer;
use crate::domain::document::Document;
use crate::domain::outcome::Outcome;
use crate::domain::signature::verify_keys;
use crate::error::{GatewayError, Result};

const CUSTOMER: &str = "customer";

/// Customer operations against the vault.
pub struct CustomerGateway<'a> {
    gateway: &'a Gateway,
}

impl<'a> CustomerGateway<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Creates a customer. Unknown param keys are rejected before any request
    /// is sent.
    pub async fn create(&self, params: &Document) -> Result<Outcome<Customer>> {
        verify_keys(params, &Customer::create_signature())?;
        let body = wrap(CUSTOMER, params)?;
        let response = self.gateway.post("/customers", &body).await?;
        outcome(&response, CUSTOMER)
    }

    pub async fn find(&self, id: &str) -> Result<Customer> {
        let path = format!("/customers/{}", id_segment(CUSTOMER, id)?);
        let response = self
            .gateway
            .get(&path)
            .await
            .map_err(not_found_as(CUSTOMER, id))?;
        let record = response
            .get(CUSTOMER)
            .ok_or_else(|| GatewayError::Unexpected("response has no customer".to_string()))?;
        Customer::try_from(record)
    }

    pub async fn update(&self, id: &str, params: &Document) -> Result<Outcome<Customer>> {
        verify_keys(params, &Customer::update_signature())?;
        let path = format!("/customers/{}", id_segment(CUSTOMER, id)?);
        let body = wrap(CUSTOMER, params)?;
        let response = self.gateway.put(&path, &body).await?;
        outcome(&response, CUSTOMER)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = format!("/customers/{}", id_segment(CUSTOMER, id)?);
        self.gateway
            .delete(&path)
            .await
            .map_err(not_found_as(CUSTOMER, id))
    }

    /// Form action for creating a customer through a transparent redirect.
    pub fn transparent_redirect_create_url(&self) -> String {
        self.gateway
            .transparent_redirect()
            .url("/customers/all/create_via_transparent_redirect_request")
    }

    /// Form action for updating a customer through a transparent redirect.
    pub fn transparent_redirect_update_url(&self) -> String {
        self.gateway
            .transparent_redirect()
            .url("/customers/all/update_via_transparent_redirect_request")
    }

    /// Validates the redirect-back query string and confirms the request it
    /// refers to.
    pub async fn confirm_transparent_redirect(&self, query: &str) -> Result<Outcome<Customer>> {
        let result = self
            .gateway
            .transparent_redirect()
            .parse_and_validate_query_string(query)?;
        let id = result
            .id()
            .ok_or_else(|| GatewayError::Unexpected("redirect query string has no id".to_string()))?;
        let body = Document::from_pairs([("id", id)]);
        let response = self
            .gateway
            .post("/customers/all/confirm_transparent_redirect_request", &body)
            .await?;
        outcome(&response, CUSTOMER)
    }
}
