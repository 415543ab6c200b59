use super::gateway::{Gateway, id_segment, not_found_as, outcome, wrap};
use crate::domain::credit_card::CreditCard;
use crate::domain::document::Document;
use crate::domain::outcome::Outcome;
use crate::domain::signature::verify_keys;
use crate::error::{GatewayError, Result};

const CREDIT_CARD: &str = "credit_card";

/// Operations on cards stored in the vault, addressed by token.
pub struct CreditCardGateway<'a> {
    gateway: &'a Gateway,
}

impl<'a> CreditCardGateway<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn create(&self, params: &Document) -> Result<Outcome<CreditCard>> {
        verify_keys(params, &CreditCard::create_signature())?;
        let body = wrap(CREDIT_CARD, params)?;
        let response = self.gateway.post("/payment_methods", &body).await?;
        outcome(&response, CREDIT_CARD)
    }

    pub async fn find(&self, token: &str) -> Result<CreditCard> {
        let path = format!("/payment_methods/{}", id_segment("payment method", token)?);
        let response = self
            .gateway
            .get(&path)
            .await
            .map_err(not_found_as("payment method", token))?;
        let record = response.get(CREDIT_CARD).ok_or_else(|| {
            GatewayError::Unexpected("response has no credit_card".to_string())
        })?;
        CreditCard::try_from(record)
    }
}
