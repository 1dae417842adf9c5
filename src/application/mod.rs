//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `LedgerEngine`, the single entry point for every
//! ledger mutation, plus the validated input structs it accepts.

pub mod inputs;
pub mod ledger;
