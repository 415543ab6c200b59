use super::document::Document;
use super::record::Fields;
use super::signature::SignatureKey;
use crate::error::{GatewayError, Result};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Address {
    pub id: Option<String>,
    pub customer_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub street_address: Option<String>,
    pub extended_address: Option<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country_name: Option<String>,
}

impl Address {
    /// Keys accepted wherever an address is nested in request params.
    pub fn signature() -> Vec<SignatureKey> {
        SignatureKey::fields(&[
            "company",
            "country_name",
            "extended_address",
            "first_name",
            "last_name",
            "locality",
            "postal_code",
            "region",
            "street_address",
        ])
    }
}

impl TryFrom<&Document> for Address {
    type Error = GatewayError;

    fn try_from(document: &Document) -> Result<Self> {
        let f = Fields::new("address", document)?;
        Ok(Self {
            id: f.opt_string("id"),
            customer_id: f.opt_string("customer_id"),
            first_name: f.opt_string("first_name"),
            last_name: f.opt_string("last_name"),
            company: f.opt_string("company"),
            street_address: f.opt_string("street_address"),
            extended_address: f.opt_string("extended_address"),
            locality: f.opt_string("locality"),
            region: f.opt_string("region"),
            postal_code: f.opt_string("postal_code"),
            country_name: f.opt_string("country_name"),
        })
    }
}
