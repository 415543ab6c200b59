use super::document::Document;
use super::record::Fields;
use crate::error::{GatewayError, Result};
use chrono::NaiveDateTime;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookKind {
    SubscriptionPastDue,
    /// Kinds this client does not model yet, kept verbatim.
    Other(String),
}

impl WebhookKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::SubscriptionPastDue => "subscription_past_due",
            Self::Other(kind) => kind,
        }
    }
}

impl From<&str> for WebhookKind {
    fn from(kind: &str) -> Self {
        match kind {
            "subscription_past_due" => Self::SubscriptionPastDue,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for WebhookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event pushed by the gateway to the merchant's webhook endpoint.
///
/// `subject` stays a generic tree: its shape depends on `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookNotification {
    pub kind: WebhookKind,
    pub timestamp: NaiveDateTime,
    pub subject: Document,
}

impl WebhookNotification {
    /// The subscription the event is about, if any.
    pub fn subscription(&self) -> Option<&Document> {
        self.subject.get("subscription")
    }
}

impl TryFrom<&Document> for WebhookNotification {
    type Error = GatewayError;

    fn try_from(document: &Document) -> Result<Self> {
        let f = Fields::new("notification", document)?;
        Ok(Self {
            kind: WebhookKind::from(f.string("kind")?.as_str()),
            timestamp: f.datetime("timestamp")?,
            subject: f.document("subject"),
        })
    }
}
