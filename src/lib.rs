pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;

pub use application::gateway::Gateway;
pub use application::transparent_redirect::{RedirectQuery, TransparentRedirect};
pub use application::webhook_notification::WebhookNotifications;
pub use config::{Configuration, Environment};
pub use domain::document::Document;
pub use error::{GatewayError, Result};
pub use interfaces::xml::{decode, encode};
