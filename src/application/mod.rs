//! Application layer: the transparent-redirect token protocol and the
//! resource gateways built on the XML codec and the transport port.
//!
//! [`gateway::Gateway`] is the entry point. It hands out per-resource
//! gateways that borrow it, so one configured client serves every call.

pub mod credit_card;
pub mod customer;
pub mod gateway;
pub mod transaction;
pub mod transparent_redirect;
pub mod webhook_notification;
