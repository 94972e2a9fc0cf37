//! Commission Engine - Marketplace commission ledger and payout reconciliation.
//!
//! Computes per-order marketplace commission, accumulates it per seller,
//! batches it into periodic payouts, and keeps payout state consistent under
//! duplicated payment-gateway notifications.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
