//! Wire formats spoken with the gateway.

pub mod xml;
