use super::gateway::{Gateway, id_segment, not_found_as, outcome, wrap};
use crate::domain::document::Document;
use crate::domain::outcome::Outcome;
use crate::domain::signature::verify_keys;
use crate::domain::transaction::{Transaction, TransactionType};
use crate::error::{GatewayError, Result};

const TRANSACTION: &str = "transaction";

pub struct TransactionGateway<'a> {
    gateway: &'a Gateway,
}

impl<'a> TransactionGateway<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Charges the given card, token or customer.
    pub async fn sale(&self, params: &Document) -> Result<Outcome<Transaction>> {
        self.create(TransactionType::Sale, params).await
    }

    /// Refunds money to the given card, token or customer.
    pub async fn credit(&self, params: &Document) -> Result<Outcome<Transaction>> {
        self.create(TransactionType::Credit, params).await
    }

    async fn create(
        &self,
        kind: TransactionType,
        params: &Document,
    ) -> Result<Outcome<Transaction>> {
        let mut fields = params
            .as_mapping()
            .cloned()
            .ok_or_else(|| GatewayError::Argument("transaction params must be a mapping".to_string()))?;
        fields.insert("type".to_string(), Document::from(kind.as_str()));
        let params = Document::from(fields);

        verify_keys(&params, &Transaction::create_signature())?;
        let body = wrap(TRANSACTION, &params)?;
        let response = self.gateway.post("/transactions", &body).await?;
        outcome(&response, TRANSACTION)
    }

    pub async fn find(&self, id: &str) -> Result<Transaction> {
        let path = format!("/transactions/{}", id_segment(TRANSACTION, id)?);
        let response = self
            .gateway
            .get(&path)
            .await
            .map_err(not_found_as(TRANSACTION, id))?;
        let record = response.get(TRANSACTION).ok_or_else(|| {
            GatewayError::Unexpected("response has no transaction".to_string())
        })?;
        Transaction::try_from(record)
    }

    pub fn transparent_redirect_create_url(&self) -> String {
        self.gateway
            .transparent_redirect()
            .url("/transactions/all/create_via_transparent_redirect_request")
    }

    pub async fn confirm_transparent_redirect(
        &self,
        query: &str,
    ) -> Result<Outcome<Transaction>> {
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
            .post("/transactions/all/confirm_transparent_redirect_request", &body)
            .await?;
        outcome(&response, TRANSACTION)
    }
}
