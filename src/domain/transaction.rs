use super::address::Address;
use super::credit_card::CreditCard;
use super::customer::Customer;
use super::document::Document;
use super::record::Fields;
use super::signature::{ANY_KEY, SignatureKey};
use crate::error::{GatewayError, Result};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TransactionType {
    Sale,
    Credit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Credit => "credit",
        }
    }
}

impl FromStr for TransactionType {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sale" => Ok(Self::Sale),
            "credit" => Ok(Self::Credit),
            other => Err(GatewayError::Parse(format!(
                "unknown transaction type {other:?}"
            ))),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Transaction {
    pub id: String,
    pub r#type: TransactionType,
    pub amount: Decimal,
    pub status: Option<String>,
    pub order_id: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub customer_details: Option<Customer>,
    pub credit_card_details: Option<CreditCard>,
    pub billing_details: Option<Address>,
    pub shipping_details: Option<Address>,
    pub custom_fields: BTreeMap<String, String>,
}

impl Transaction {
    /// Keys accepted by sale and credit. `type` is set by the gateway call.
    pub fn create_signature() -> Vec<SignatureKey> {
        let mut keys = SignatureKey::fields(&[
            "amount",
            "customer_id",
            "order_id",
            "payment_method_token",
            "type",
        ]);
        keys.push(SignatureKey::nested(
            "credit_card",
            SignatureKey::fields(&["token", "cvv", "expiration_date", "number"]),
        ));
        keys.push(SignatureKey::nested("customer", Customer::detail_signature()));
        keys.push(SignatureKey::nested("billing", Address::signature()));
        keys.push(SignatureKey::nested("shipping", Address::signature()));
        keys.push(SignatureKey::nested(
            "options",
            SignatureKey::fields(&[
                "store_in_vault",
                "submit_for_settlement",
                "add_billing_address_to_payment_method",
                "store_shipping_address_in_vault",
            ]),
        ));
        keys.push(SignatureKey::nested(
            "custom_fields",
            vec![SignatureKey::field(ANY_KEY)],
        ));
        keys
    }
}

impl TryFrom<&Document> for Transaction {
    type Error = GatewayError;

    fn try_from(document: &Document) -> Result<Self> {
        let f = Fields::new("transaction", document)?;
        Ok(Self {
            id: f.string("id")?,
            r#type: f.string("type")?.parse()?,
            amount: f.decimal("amount")?,
            status: f.opt_string("status"),
            order_id: f.opt_string("order_id"),
            created_at: f.opt_datetime("created_at")?,
            updated_at: f.opt_datetime("updated_at")?,
            customer_details: f.nested("customer")?,
            credit_card_details: f.nested("credit_card")?,
            billing_details: f.nested("billing")?,
            shipping_details: f.nested("shipping")?,
            custom_fields: f.string_map("custom_fields"),
        })
    }
}
