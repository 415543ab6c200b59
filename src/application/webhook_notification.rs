use crate::config::Configuration;
use crate::domain::webhook_notification::WebhookNotification;
use crate::error::{GatewayError, Result};
use crate::infrastructure::crypto::HmacSigner;
use crate::interfaces::xml;
use base64::Engine;
use std::sync::Arc;
use tracing::{debug, warn};

const NOTIFICATION: &str = "notification";

/// Verifies and decodes webhook deliveries.
///
/// The gateway posts a `bt_signature` of the form `public_key|hex_hmac` and a
/// base64 `bt_payload` holding a `<notification>` document. The HMAC covers
/// the payload exactly as received.
#[derive(Debug, Clone)]
pub struct WebhookNotifications {
    config: Arc<Configuration>,
    signer: HmacSigner,
}

impl WebhookNotifications {
    pub fn new(config: Arc<Configuration>) -> Result<Self> {
        let signer = HmacSigner::new(config.private_key())?;
        Ok(Self { config, signer })
    }

    pub fn parse(&self, signature: &str, payload: &str) -> Result<WebhookNotification> {
        self.validate_signature(signature, payload)?;

        let compact: String = payload.split_ascii_whitespace().collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|e| GatewayError::Parse(format!("webhook payload is not base64: {e}")))?;
        let xml = String::from_utf8(bytes)
            .map_err(|e| GatewayError::Parse(format!("webhook payload is not UTF-8: {e}")))?;

        let document = xml::decode(&xml)?;
        let record = document.get(NOTIFICATION).ok_or_else(|| {
            GatewayError::Parse("webhook payload has no notification".to_string())
        })?;
        let notification = WebhookNotification::try_from(record)?;
        debug!(kind = %notification.kind, "parsed webhook notification");
        Ok(notification)
    }

    /// Answer to the gateway's endpoint verification challenge.
    pub fn verify(&self, challenge: &str) -> String {
        format!("{}|{}", self.config.public_key, self.signer.sign(challenge))
    }

    fn validate_signature(&self, signature: &str, payload: &str) -> Result<()> {
        let (public_key, hash) = signature.split_once('|').ok_or_else(|| {
            GatewayError::InvalidSignature("expected public_key|signature".to_string())
        })?;
        if public_key != self.config.public_key {
            warn!("rejected webhook signed for another public key");
            return Err(GatewayError::InvalidSignature(
                "no matching public key".to_string(),
            ));
        }
        if !self.signer.verify(payload, hash) {
            warn!("rejected webhook with a bad signature");
            return Err(GatewayError::InvalidSignature(
                "signature does not match payload".to_string(),
            ));
        }
        Ok(())
    }
}
