use crate::config::Configuration;
use crate::domain::document::Document;
use crate::error::{GatewayError, Result};
use crate::infrastructure::crypto::HmacSigner;
use chrono::{NaiveDateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// API version announced in every transparent-redirect payload.
pub const API_VERSION: &str = "2";

/// Name of the form field carrying the token.
pub const TR_DATA_FIELD: &str = "tr_data";

const TIME_FORMAT: &str = "%Y%m%d%H%M%S";
const HASH_PARAM: &str = "hash";

/// Flattens nested params into form field names.
///
/// `{"customer": {"first_name": "Dan"}}` becomes `customer[first_name]=Dan`.
/// Scalars use their textual form and `Null` becomes an empty value.
/// Sequences have no form encoding and are rejected.
pub fn flatten(params: &Document) -> Result<BTreeMap<String, String>> {
    let mapping = params.as_mapping().ok_or_else(|| {
        GatewayError::Argument("transparent redirect params must be a mapping".to_string())
    })?;
    let mut flat = BTreeMap::new();
    for (key, value) in mapping {
        flatten_into(&mut flat, key.clone(), value)?;
    }
    Ok(flat)
}

fn flatten_into(flat: &mut BTreeMap<String, String>, name: String, value: &Document) -> Result<()> {
    match value {
        Document::Mapping(children) => {
            for (key, child) in children {
                flatten_into(flat, format!("{name}[{key}]"), child)?;
            }
        }
        Document::Sequence(_) => {
            return Err(GatewayError::Argument(format!(
                "{name}: lists cannot be sent through a transparent redirect"
            )));
        }
        scalar => {
            flat.insert(name, scalar.scalar_text().unwrap_or_default());
        }
    }
    Ok(())
}

/// URL-form encodes `fields` in key order.
pub fn form_encode(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn form_decode(raw: &str) -> Result<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(|s| s.into_owned())
        .map_err(|e| GatewayError::Parse(format!("query string is not valid UTF-8: {e}")))
}

/// Parameters of a verified redirect-back query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectQuery {
    params: BTreeMap<String, String>,
}

impl RedirectQuery {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Id of the resource the gateway created or updated.
    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    pub fn http_status(&self) -> Option<u16> {
        self.get("http_status").and_then(|s| s.parse().ok())
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn into_params(self) -> BTreeMap<String, String> {
        self.params
    }
}

/// Issues signed `tr_data` tokens and validates the gateway's redirect-back
/// query strings.
///
/// Holds no state between calls apart from the shared configuration and the
/// signer derived from it.
#[derive(Debug, Clone)]
pub struct TransparentRedirect {
    config: Arc<Configuration>,
    signer: HmacSigner,
}

impl TransparentRedirect {
    pub fn new(config: Arc<Configuration>) -> Result<Self> {
        let signer = HmacSigner::new(config.private_key())?;
        Ok(Self { config, signer })
    }

    /// Builds the `signature|payload` token for a form posted straight to the
    /// gateway, stamped with the current UTC time.
    pub fn tr_data(&self, params: &Document, redirect_url: &str) -> Result<String> {
        self.tr_data_at(params, redirect_url, Utc::now().naive_utc())
    }

    /// Same as [`tr_data`](Self::tr_data) with an explicit issue time.
    pub fn tr_data_at(
        &self,
        params: &Document,
        redirect_url: &str,
        issued_at: NaiveDateTime,
    ) -> Result<String> {
        let mut fields = flatten(params)?;
        fields.insert("redirect_url".to_string(), redirect_url.to_string());
        fields.insert("time".to_string(), issued_at.format(TIME_FORMAT).to_string());
        fields.insert("api_version".to_string(), API_VERSION.to_string());
        fields.insert("public_key".to_string(), self.config.public_key.clone());

        let payload = form_encode(&fields);
        let signature = self.signer.sign(&payload);
        debug!(fields = fields.len(), "issued transparent redirect token");
        Ok(format!("{signature}|{payload}"))
    }

    /// Verifies the query string the gateway appended to the redirect URL and
    /// maps its `http_status` onto an outcome.
    ///
    /// The signature covers every parameter except `hash`, in the order they
    /// appear; a query with no `hash` or more than one is forged. The status
    /// is only looked at once the signature checks out.
    pub fn parse_and_validate_query_string(&self, query: &str) -> Result<RedirectQuery> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let segments: Vec<&str> = query.split('&').filter(|s| !s.is_empty()).collect();

        let mut hashes = Vec::new();
        let mut signed = Vec::with_capacity(segments.len());
        for &segment in &segments {
            match segment.split_once('=') {
                Some((HASH_PARAM, value)) => hashes.push(value),
                _ => signed.push(segment),
            }
        }
        let content = signed.join("&");

        // Exactly one hash; a repeated one is never what the gateway sends.
        let verified = match hashes.as_slice() {
            [hash] => self.signer.verify(&content, hash),
            _ => false,
        };
        if !verified {
            warn!("rejected transparent redirect query string with a bad signature");
            return Err(GatewayError::ForgedQueryString);
        }

        let mut params = BTreeMap::new();
        for segment in segments {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            params.insert(form_decode(key)?, form_decode(value)?);
        }
        let result = RedirectQuery { params };

        match result.http_status() {
            Some(200..=299) => Ok(result),
            Some(status) => Err(GatewayError::from_status(status).unwrap_or_else(|| {
                GatewayError::Unexpected(format!("unexpected http status {status}"))
            })),
            None => Err(GatewayError::Unexpected(
                "redirect query string has no valid http_status".to_string(),
            )),
        }
    }

    /// Absolute URL of a gateway path under the merchant's base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_merchant_url(), path)
    }
}
