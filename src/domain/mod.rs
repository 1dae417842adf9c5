//! Domain types and the ports the ledger engine depends on.

pub mod audit;
pub mod money;
pub mod payment;
pub mod ports;
pub mod registration;
