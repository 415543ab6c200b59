use super::address::Address;
use super::document::Document;
use super::record::Fields;
use super::signature::SignatureKey;
use crate::error::{GatewayError, Result};
use chrono::NaiveDateTime;

/// A card stored in the vault, or the card details echoed on a transaction.
///
/// The gateway never returns the full number, only `bin` and `last_4`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CreditCard {
    pub token: Option<String>,
    pub bin: Option<String>,
    pub last_4: Option<String>,
    pub cardholder_name: Option<String>,
    pub expiration_month: Option<String>,
    pub expiration_year: Option<String>,
    pub customer_id: Option<String>,
    pub billing_address: Option<Address>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl CreditCard {
    /// `MM/YYYY`, when both parts are known.
    pub fn expiration_date(&self) -> Option<String> {
        match (&self.expiration_month, &self.expiration_year) {
            (Some(month), Some(year)) => Some(format!("{month}/{year}")),
            _ => None,
        }
    }

    pub fn masked_number(&self) -> Option<String> {
        match (&self.bin, &self.last_4) {
            (Some(bin), Some(last_4)) => Some(format!("{bin}******{last_4}")),
            _ => None,
        }
    }

    /// Keys accepted by the card create call.
    pub fn create_signature() -> Vec<SignatureKey> {
        let mut keys = Self::nested_signature();
        keys.push(SignatureKey::field("customer_id"));
        keys
    }

    /// Keys accepted when a card is nested under a customer or transaction.
    pub fn nested_signature() -> Vec<SignatureKey> {
        let mut keys = SignatureKey::fields(&[
            "cardholder_name",
            "cvv",
            "expiration_date",
            "expiration_month",
            "expiration_year",
            "number",
            "token",
        ]);
        keys.push(SignatureKey::nested("billing_address", Address::signature()));
        keys.push(SignatureKey::nested(
            "options",
            SignatureKey::fields(&["make_default", "verify_card"]),
        ));
        keys
    }
}

impl TryFrom<&Document> for CreditCard {
    type Error = GatewayError;

    fn try_from(document: &Document) -> Result<Self> {
        let f = Fields::new("credit_card", document)?;
        Ok(Self {
            token: f.opt_string("token"),
            bin: f.opt_string("bin"),
            last_4: f.opt_string("last_4"),
            cardholder_name: f.opt_string("cardholder_name"),
            expiration_month: f.opt_string("expiration_month"),
            expiration_year: f.opt_string("expiration_year"),
            customer_id: f.opt_string("customer_id"),
            billing_address: f.nested("billing_address")?,
            created_at: f.opt_datetime("created_at")?,
            updated_at: f.opt_datetime("updated_at")?,
        })
    }
}
