use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// Malformed XML, an unparsable typed scalar, or a response that does not
    /// map onto the expected record.
    #[error("parse error: {0}")]
    Parse(String),
    /// The redirect query string was not signed with our private key.
    #[error("forged query string")]
    ForgedQueryString,
    /// A webhook signature that does not match this merchant's keys.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
    #[error("authentication error")]
    Authentication,
    #[error("authorization error")]
    Authorization,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("server error")]
    Server,
    #[error("gateway is down for maintenance")]
    DownForMaintenance,
    #[error("unexpected error: {0}")]
    Unexpected(String),
    #[error("argument error: {0}")]
    Argument(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl GatewayError {
    /// Maps a gateway HTTP status onto an error kind.
    ///
    /// Returns `None` for statuses the caller should treat as a readable
    /// response: any 2xx, and 422 (validation failure body).
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 | 422 => None,
            401 => Some(Self::Authentication),
            403 => Some(Self::Authorization),
            404 => Some(Self::NotFound(String::new())),
            500 => Some(Self::Server),
            503 => Some(Self::DownForMaintenance),
            other => Some(Self::Unexpected(format!("unexpected http status {other}"))),
        }
    }
}

impl From<quick_xml::Error> for GatewayError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for GatewayError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Parse(err.to_string())
    }
}
