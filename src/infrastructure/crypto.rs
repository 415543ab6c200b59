use crate::error::{GatewayError, Result};
use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};
use std::fmt;

type HmacSha1 = Hmac<Sha1>;

/// Keyed MAC used to sign transparent-redirect payloads and to check the
/// gateway's redirect-back query strings.
///
/// The gateway keys HMAC-SHA1 with the SHA-1 digest of the merchant's private
/// key and exchanges signatures as lowercase hex.
#[derive(Clone)]
pub struct HmacSigner {
    mac: HmacSha1,
}

impl HmacSigner {
    pub fn new(private_key: &str) -> Result<Self> {
        let key = Sha1::digest(private_key.as_bytes());
        let mac = HmacSha1::new_from_slice(&key)
            .map_err(|e| GatewayError::Configuration(format!("invalid signing key: {e}")))?;
        Ok(Self { mac })
    }

    /// Hex-encoded signature of `data`.
    pub fn sign(&self, data: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(data.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Checks a lowercase hex `signature` against `data` in constant time.
    pub fn verify(&self, data: &str, signature: &str) -> bool {
        if !signature.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return false;
        }
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(data.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSigner").finish_non_exhaustive()
    }
}

/// Shorthand for a one-off signature.
pub fn hmac_hash(private_key: &str, data: &str) -> Result<String> {
    Ok(HmacSigner::new(private_key)?.sign(data))
}
