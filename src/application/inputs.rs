//! Validated per-operation inputs.
//!
//! Each mutating operation gets one explicit parse-and-validate step before
//! any domain logic runs; raw payloads never reach the engine.

use crate::domain::money::Amount;
use crate::domain::payment::PaymentStatus;
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct AddPaymentInput {
    pub actor: String,
    pub registration_id: u32,
    pub amount: Amount,
    pub method: String,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub status: PaymentStatus,
}

impl AddPaymentInput {
    /// Validates a raw payload into an input. Rejects on the first invalid
    /// field; `amount` must be strictly positive.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        actor: impl Into<String>,
        registration_id: u32,
        amount: Decimal,
        method: impl Into<String>,
        reference: Option<String>,
        note: Option<String>,
        occurred_at: DateTime<Utc>,
        status: PaymentStatus,
    ) -> Result<Self> {
        let method = method.into();
        if method.trim().is_empty() {
            return Err(LedgerError::Validation(
                "payment method must not be empty".to_string(),
            ));
        }
        Ok(Self {
            actor: actor.into(),
            registration_id,
            amount: Amount::new(amount)?,
            method,
            reference,
            note,
            occurred_at,
            status,
        })
    }
}

#[derive(Debug, Clone)]
pub struct VoidPaymentInput {
    pub actor: String,
    pub payment_id: u64,
    pub reason: String,
}

impl VoidPaymentInput {
    pub fn new(actor: impl Into<String>, payment_id: u64, reason: impl Into<String>) -> Result<Self> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(LedgerError::Validation(
                "void reason must not be empty".to_string(),
            ));
        }
        Ok(Self {
            actor: actor.into(),
            payment_id,
            reason,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ApproveSlipInput {
    pub actor: String,
    pub registration_id: u32,
    pub slip_index: usize,
    /// Admin-confirmed figure; need not match anything printed on the
    /// evidence.
    pub amount: Amount,
}

impl ApproveSlipInput {
    pub fn new(
        actor: impl Into<String>,
        registration_id: u32,
        slip_index: usize,
        amount: Decimal,
    ) -> Result<Self> {
        Ok(Self {
            actor: actor.into(),
            registration_id,
            slip_index,
            amount: Amount::new(amount)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DeclineSlipInput {
    pub actor: String,
    pub registration_id: u32,
    pub slip_index: usize,
}

impl DeclineSlipInput {
    pub fn new(actor: impl Into<String>, registration_id: u32, slip_index: usize) -> Self {
        Self {
            actor: actor.into(),
            registration_id,
            slip_index,
        }
    }
}
