use super::audit::AuditEntry;
use super::payment::{NewPayment, PaymentEntry};
use super::registration::{PaymentSlip, Registration, SlipStatus};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::io;

/// Access to registrations and their denormalized paid cache.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn get(&self, id: u32) -> Result<Option<Registration>>;
    async fn is_deleted(&self, id: u32) -> Result<bool>;
    async fn set_paid_amount(&self, id: u32, paid: Decimal) -> Result<()>;
}

/// The append-mostly ledger row collection.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Persists a new row and assigns its id.
    async fn create(&self, payment: NewPayment) -> Result<PaymentEntry>;
    async fn get(&self, id: u64) -> Result<Option<PaymentEntry>>;
    /// Applies the `Active -> Void` transition. Callers check the current
    /// status first; the store only records the transition.
    async fn mark_void(&self, id: u64, reason: &str, at: DateTime<Utc>) -> Result<PaymentEntry>;
    async fn find_by_reference(
        &self,
        registration_id: u32,
        reference: &str,
    ) -> Result<Option<PaymentEntry>>;
    async fn find_by_registration(&self, registration_id: u32) -> Result<Vec<PaymentEntry>>;
    /// Sum of `amount` over active rows; the reconciler's sole input.
    async fn sum_active(&self, registration_id: u32) -> Result<Decimal>;
    /// Highest assigned sequence number, 0 when no rows exist.
    async fn max_sequence(&self, registration_id: u32) -> Result<u32>;
}

/// The ordered slip evidence embedded under a registration.
#[async_trait]
pub trait SlipStore: Send + Sync {
    async fn slips(&self, registration_id: u32) -> Result<Vec<PaymentSlip>>;
    async fn set_status(
        &self,
        registration_id: u32,
        index: usize,
        status: SlipStatus,
        at: DateTime<Utc>,
    ) -> Result<()>;
}

/// External audit trail collaborator.
///
/// Sink failures must never abort the business operation that produced the
/// entry; the engine logs them and moves on.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> io::Result<()>;
}

pub type RegistrationStoreBox = Box<dyn RegistrationStore>;
pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type SlipStoreBox = Box<dyn SlipStore>;
pub type AuditSinkBox = Box<dyn AuditSink>;
