//! Merchant configuration.
//!
//! A [`Configuration`] is built once at startup and then shared read-only
//! (typically behind an `Arc`) by the gateway and the transparent-redirect
//! helpers.

use crate::error::{GatewayError, Result};
use std::fmt;
use std::str::FromStr;

pub const ENV_ENVIRONMENT: &str = "PAYGATE_ENVIRONMENT";
pub const ENV_MERCHANT_ID: &str = "PAYGATE_MERCHANT_ID";
pub const ENV_PUBLIC_KEY: &str = "PAYGATE_PUBLIC_KEY";
pub const ENV_PRIVATE_KEY: &str = "PAYGATE_PRIVATE_KEY";
pub const ENV_GATEWAY_PORT: &str = "GATEWAY_PORT";

const DEVELOPMENT_PORT: u16 = 3000;
const SSL_PORT: u16 = 443;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Sandbox,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(GatewayError::Configuration(format!(
                "unknown environment {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    pub environment: Environment,
    pub merchant_id: String,
    pub public_key: String,
    private_key: String,
    /// Overrides the development port (3000 by default).
    pub port_override: Option<u16>,
}

impl Configuration {
    pub fn new(
        environment: Environment,
        merchant_id: impl Into<String>,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            environment,
            merchant_id: merchant_id.into(),
            public_key: public_key.into(),
            private_key: private_key.into(),
            port_override: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port_override = Some(port);
        self
    }

    /// Reads the configuration from `PAYGATE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from any variable source.
    ///
    /// The environment defaults to development; merchant id and both keys are
    /// required. `GATEWAY_PORT` must be a valid port when present.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| GatewayError::Configuration(format!("{name} is not set")))
        };

        let environment = match lookup(ENV_ENVIRONMENT) {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };
        let mut config = Self::new(
            environment,
            required(ENV_MERCHANT_ID)?,
            required(ENV_PUBLIC_KEY)?,
            required(ENV_PRIVATE_KEY)?,
        );
        if let Some(port) = lookup(ENV_GATEWAY_PORT) {
            let port = port.parse::<u16>().map_err(|e| {
                GatewayError::Configuration(format!("{ENV_GATEWAY_PORT}={port:?}: {e}"))
            })?;
            config = config.with_port(port);
        }
        Ok(config)
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn is_ssl(&self) -> bool {
        self.environment != Environment::Development
    }

    pub fn protocol(&self) -> &'static str {
        if self.is_ssl() { "https://" } else { "http://" }
    }

    pub fn server(&self) -> &'static str {
        match self.environment {
            Environment::Development => "localhost",
            Environment::Sandbox => "sandbox.braintreegateway.com",
            Environment::Production => "www.braintreegateway.com",
        }
    }

    pub fn port(&self) -> u16 {
        match self.environment {
            Environment::Development => self.port_override.unwrap_or(DEVELOPMENT_PORT),
            Environment::Sandbox | Environment::Production => SSL_PORT,
        }
    }

    pub fn server_and_port(&self) -> String {
        format!("{}:{}", self.server(), self.port())
    }

    pub fn base_merchant_path(&self) -> String {
        format!("/merchants/{}", self.merchant_id)
    }

    pub fn base_merchant_url(&self) -> String {
        format!(
            "{}{}{}",
            self.protocol(),
            self.server_and_port(),
            self.base_merchant_path()
        )
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("environment", &self.environment)
            .field("merchant_id", &self.merchant_id)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("port_override", &self.port_override)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_development_urls() {
        let config = Configuration::new(Environment::Development, "merchant", "pub", "priv");
        assert!(!config.is_ssl());
        assert_eq!(config.server_and_port(), "localhost:3000");
        assert_eq!(
            config.base_merchant_url(),
            "http://localhost:3000/merchants/merchant"
        );
        assert_eq!(config.with_port(4000).port(), 4000);
    }

    #[test]
    fn test_production_urls_ignore_port_override() {
        let config =
            Configuration::new(Environment::Production, "m", "pub", "priv").with_port(4000);
        assert!(config.is_ssl());
        assert_eq!(
            config.base_merchant_url(),
            "https://www.braintreegateway.com:443/merchants/m"
        );
    }

    #[test]
    fn test_from_lookup() {
        let env = vars(&[
            (ENV_ENVIRONMENT, "Sandbox"),
            (ENV_MERCHANT_ID, "m"),
            (ENV_PUBLIC_KEY, "pub"),
            (ENV_PRIVATE_KEY, "priv"),
        ]);
        let config = Configuration::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.environment, Environment::Sandbox);
        assert_eq!(config.private_key(), "priv");
    }

    #[test]
    fn test_from_lookup_missing_key() {
        let env = vars(&[(ENV_MERCHANT_ID, "m"), (ENV_PUBLIC_KEY, "pub")]);
        let err = Configuration::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains(ENV_PRIVATE_KEY));
    }

    #[test]
    fn test_from_lookup_gateway_port() {
        let mut env = vars(&[
            (ENV_MERCHANT_ID, "m"),
            (ENV_PUBLIC_KEY, "pub"),
            (ENV_PRIVATE_KEY, "priv"),
            (ENV_GATEWAY_PORT, "3001"),
        ]);
        let config = Configuration::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.port(), 3001);

        env.insert(ENV_GATEWAY_PORT.to_string(), "not-a-port".to_string());
        assert!(matches!(
            Configuration::from_lookup(|k| env.get(k).cloned()),
            Err(GatewayError::Configuration(_))
        ));
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let config = Configuration::new(Environment::Development, "m", "pub", "s3cret");
        assert!(!format!("{config:?}").contains("s3cret"));
    }
}
