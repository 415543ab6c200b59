use super::credit_card::CreditCard;
use super::document::Document;
use super::record::Fields;
use super::signature::{ANY_KEY, SignatureKey};
use crate::error::{GatewayError, Result};
use chrono::NaiveDateTime;

/// A customer record from the vault.
///
/// `id` is only absent for the customer details echoed on a transaction that
/// was not stored in the vault.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Customer {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub website: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub credit_cards: Vec<CreditCard>,
}

impl Customer {
    pub fn create_signature() -> Vec<SignatureKey> {
        let mut keys = Self::detail_signature();
        keys.push(SignatureKey::nested(
            "credit_card",
            CreditCard::nested_signature(),
        ));
        keys.push(SignatureKey::nested(
            "custom_fields",
            vec![SignatureKey::field(ANY_KEY)],
        ));
        keys
    }

    pub fn update_signature() -> Vec<SignatureKey> {
        Self::create_signature()
    }

    /// Plain customer fields, also accepted under `transaction[customer]`.
    pub fn detail_signature() -> Vec<SignatureKey> {
        SignatureKey::fields(&[
            "company",
            "email",
            "fax",
            "first_name",
            "id",
            "last_name",
            "phone",
            "website",
        ])
    }
}

impl TryFrom<&Document> for Customer {
    type Error = GatewayError;

    fn try_from(document: &Document) -> Result<Self> {
        let f = Fields::new("customer", document)?;
        Ok(Self {
            id: f.opt_string("id"),
            first_name: f.opt_string("first_name"),
            last_name: f.opt_string("last_name"),
            company: f.opt_string("company"),
            email: f.opt_string("email"),
            phone: f.opt_string("phone"),
            fax: f.opt_string("fax"),
            website: f.opt_string("website"),
            created_at: f.opt_datetime("created_at")?,
            updated_at: f.opt_datetime("updated_at")?,
            credit_cards: f.list("credit_cards")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::xml::decode;

    #[test]
    fn test_from_decoded_xml() {
        let xml = r#"
        <customer>
          <id>c1</id>
          <first-name>Dan</first-name>
          <last-name>Smith</last-name>
          <email>dan@example.com</email>
          <fax nil="true"/>
          <created-at type="datetime">2010-01-02T03:04:05Z</created-at>
          <credit-cards type="array">
            <credit-card><token>t1</token></credit-card>
            <credit-card><token>t2</token></credit-card>
          </credit-cards>
        </customer>
        "#;
        let doc = decode(xml).unwrap();
        let customer = Customer::try_from(doc.get("customer").unwrap()).unwrap();
        assert_eq!(customer.id.as_deref(), Some("c1"));
        assert_eq!(customer.first_name.as_deref(), Some("Dan"));
        assert_eq!(customer.fax, None);
        assert_eq!(customer.credit_cards.len(), 2);
        assert_eq!(customer.credit_cards[1].token.as_deref(), Some("t2"));
    }

    #[test]
    fn test_no_cards_is_empty_list() {
        let doc = decode("<customer><id>c1</id></customer>").unwrap();
        let customer = Customer::try_from(doc.get("customer").unwrap()).unwrap();
        assert!(customer.credit_cards.is_empty());
    }
}
