//! Gateway data model: the generic document tree, the typed records mapped
//! out of it, and the transport port.

pub mod address;
pub mod credit_card;
pub mod customer;
pub mod document;
pub mod outcome;
pub mod ports;
mod record;
pub mod signature;
pub mod transaction;
pub mod validation;
pub mod webhook_notification;
