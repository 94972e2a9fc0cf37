//! Payment-gateway adapters.
//!
//! `AsaasGateway` talks to the real gateway; `MockPaymentGateway` backs the
//! test suite. Both share the HMAC signature scheme in `signature`.

mod asaas;
mod mock;
mod signature;

pub use asaas::{AsaasConfig, AsaasGateway};
pub use mock::MockPaymentGateway;
pub use signature::{compute_signature, hex_encode, verify_signature};
