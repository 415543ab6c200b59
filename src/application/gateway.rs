use super::credit_card::CreditCardGateway;
use super::customer::CustomerGateway;
use super::transaction::TransactionGateway;
use super::transparent_redirect::{API_VERSION, TransparentRedirect};
use super::webhook_notification::WebhookNotifications;
use crate::config::Configuration;
use crate::domain::document::Document;
use crate::domain::outcome::{ErrorResult, Outcome};
use crate::domain::ports::{HttpMethod, HttpRequest, HttpTransportBox};
use crate::error::{GatewayError, Result};
use crate::interfaces::xml;
use base64::Engine;
use std::sync::Arc;
use tracing::debug;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const XML_CONTENT_TYPE: &str = "application/xml";

/// Entry point of the client.
///
/// `Gateway` owns the transport and the shared configuration and hands out
/// short-lived per-resource gateways. Each call encodes its params with the
/// XML codec, performs exactly one HTTP request and decodes the answer.
pub struct Gateway {
    config: Arc<Configuration>,
    http: HttpTransportBox,
    transparent_redirect: TransparentRedirect,
    webhook_notifications: WebhookNotifications,
}

impl Gateway {
    /// Creates a new `Gateway`.
    ///
    /// # Arguments
    ///
    /// * `config` - Merchant configuration, fixed for the gateway's lifetime.
    /// * `http` - Transport used for every request.
    pub fn new(config: Configuration, http: HttpTransportBox) -> Result<Self> {
        let config = Arc::new(config);
        let transparent_redirect = TransparentRedirect::new(Arc::clone(&config))?;
        let webhook_notifications = WebhookNotifications::new(Arc::clone(&config))?;
        Ok(Self {
            config,
            http,
            transparent_redirect,
            webhook_notifications,
        })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn transparent_redirect(&self) -> &TransparentRedirect {
        &self.transparent_redirect
    }

    pub fn webhook_notifications(&self) -> &WebhookNotifications {
        &self.webhook_notifications
    }

    pub fn customer(&self) -> CustomerGateway<'_> {
        CustomerGateway::new(self)
    }

    pub fn credit_card(&self) -> CreditCardGateway<'_> {
        CreditCardGateway::new(self)
    }

    pub fn transaction(&self) -> TransactionGateway<'_> {
        TransactionGateway::new(self)
    }

    pub(crate) async fn get(&self, path: &str) -> Result<Document> {
        self.request(HttpMethod::Get, path, None).await
    }

    pub(crate) async fn post(&self, path: &str, body: &Document) -> Result<Document> {
        self.request(HttpMethod::Post, path, Some(body)).await
    }

    pub(crate) async fn put(&self, path: &str, body: &Document) -> Result<Document> {
        self.request(HttpMethod::Put, path, Some(body)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.request(HttpMethod::Delete, path, None).await.map(|_| ())
    }

    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Document>,
    ) -> Result<Document> {
        let body = match body {
            Some(document) => Some(format!("{XML_DECLARATION}{}", xml::encode(document)?)),
            None => None,
        };
        let request = HttpRequest {
            method,
            url: format!("{}{}", self.config.base_merchant_url(), path),
            headers: self.headers(),
            body,
        };

        debug!(%method, path, "sending gateway request");
        let response = self.http.send(request).await?;
        debug!(%method, path, status = response.status, "gateway responded");

        if let Some(err) = GatewayError::from_status(response.status) {
            return Err(err);
        }
        if response.body.trim().is_empty() {
            return Ok(Document::mapping());
        }
        xml::decode(&response.body)
    }

    fn headers(&self) -> Vec<(String, String)> {
        let credentials = format!("{}:{}", self.config.public_key, self.config.private_key());
        let authorization = base64::engine::general_purpose::STANDARD.encode(credentials);
        vec![
            ("Accept".to_string(), XML_CONTENT_TYPE.to_string()),
            ("Content-Type".to_string(), XML_CONTENT_TYPE.to_string()),
            ("X-ApiVersion".to_string(), API_VERSION.to_string()),
            (
                "User-Agent".to_string(),
                format!("paygate-rust/{}", env!("CARGO_PKG_VERSION")),
            ),
            ("Authorization".to_string(), format!("Basic {authorization}")),
        ]
    }
}

/// Maps a decoded response onto the record under `key`, or onto the
/// validation failure the gateway sent instead.
pub(crate) fn outcome<T>(response: &Document, key: &str) -> Result<Outcome<T>>
where
    T: for<'d> TryFrom<&'d Document, Error = GatewayError>,
{
    if let Some(record) = response.get(key) {
        return Ok(Outcome::Success(T::try_from(record)?));
    }
    if let Some(error) = response.get("api_error_response") {
        return Ok(Outcome::Failure(ErrorResult::new(error)));
    }
    Err(GatewayError::Unexpected(format!(
        "response has neither {key} nor api_error_response"
    )))
}

/// Wraps caller params under the resource's root key.
pub(crate) fn wrap(key: &str, params: &Document) -> Result<Document> {
    if params.as_mapping().is_none() {
        return Err(GatewayError::Argument(format!(
            "{key} params must be a mapping"
        )));
    }
    Ok(Document::from_pairs([(key, params.clone())]))
}

/// Path segment for a caller-supplied id; blank ids never reach the gateway.
pub(crate) fn id_segment(kind: &str, id: &str) -> Result<String> {
    if id.trim().is_empty() {
        return Err(GatewayError::NotFound(format!("{kind} id is blank")));
    }
    Ok(urlencoding::encode(id).into_owned())
}

/// Re-labels a bare not-found with the resource that was looked up.
pub(crate) fn not_found_as(kind: &str, id: &str) -> impl FnOnce(GatewayError) -> GatewayError {
    let message = format!("{kind} with id {id} not found");
    move |err| match err {
        GatewayError::NotFound(_) => GatewayError::NotFound(message),
        other => other,
    }
}
