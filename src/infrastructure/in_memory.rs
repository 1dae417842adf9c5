use crate::domain::payment::{NewPayment, PaymentEntry, PaymentStatus};
use crate::domain::ports::{PaymentStore, RegistrationStore, SlipStore};
use crate::domain::registration::{PaymentSlip, Registration, SlipStatus};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

fn missing_registration(id: u32) -> LedgerError {
    LedgerError::RegistrationNotFound(id)
}

/// A thread-safe in-memory registration store.
///
/// Serves both the `RegistrationStore` and `SlipStore` ports from one map,
/// since slips live embedded under their registration. `Clone` shares the
/// underlying state. The inherent `insert`/`push_slip`/`set_deleted` helpers
/// stand in for the external portal that owns registration CRUD.
#[derive(Default, Clone)]
pub struct InMemoryRegistrationStore {
    registrations: Arc<RwLock<HashMap<u32, Registration>>>,
}

impl InMemoryRegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, registration: Registration) {
        let mut registrations = self.registrations.write().await;
        registrations.insert(registration.id, registration);
    }

    pub async fn push_slip(&self, registration_id: u32, slip: PaymentSlip) {
        let mut registrations = self.registrations.write().await;
        if let Some(registration) = registrations.get_mut(&registration_id) {
            registration.slips.push(slip);
        }
    }

    pub async fn set_deleted(&self, registration_id: u32, deleted: bool) {
        let mut registrations = self.registrations.write().await;
        if let Some(registration) = registrations.get_mut(&registration_id) {
            registration.deleted = deleted;
        }
    }

    /// All registrations in id order, for reporting.
    pub async fn all(&self) -> Vec<Registration> {
        let registrations = self.registrations.read().await;
        let mut rows: Vec<Registration> = registrations.values().cloned().collect();
        rows.sort_by_key(|r| r.id);
        rows
    }
}

#[async_trait]
impl RegistrationStore for InMemoryRegistrationStore {
    async fn get(&self, id: u32) -> Result<Option<Registration>> {
        let registrations = self.registrations.read().await;
        Ok(registrations.get(&id).cloned())
    }

    async fn is_deleted(&self, id: u32) -> Result<bool> {
        let registrations = self.registrations.read().await;
        Ok(registrations.get(&id).is_some_and(|r| r.deleted))
    }

    async fn set_paid_amount(&self, id: u32, paid: Decimal) -> Result<()> {
        let mut registrations = self.registrations.write().await;
        let registration = registrations.get_mut(&id).ok_or(missing_registration(id))?;
        registration.paid_amount = paid;
        Ok(())
    }
}

#[async_trait]
impl SlipStore for InMemoryRegistrationStore {
    async fn slips(&self, registration_id: u32) -> Result<Vec<PaymentSlip>> {
        let registrations = self.registrations.read().await;
        let registration = registrations
            .get(&registration_id)
            .ok_or(missing_registration(registration_id))?;
        Ok(registration.slips.clone())
    }

    async fn set_status(
        &self,
        registration_id: u32,
        index: usize,
        status: SlipStatus,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let mut registrations = self.registrations.write().await;
        let registration = registrations
            .get_mut(&registration_id)
            .ok_or(missing_registration(registration_id))?;
        let slip = registration
            .slips
            .get_mut(index)
            .ok_or(LedgerError::SlipNotFound {
                registration: registration_id,
                index,
            })?;
        slip.status = status;
        match status {
            SlipStatus::Approved => slip.approved_at = Some(at),
            SlipStatus::Declined => slip.declined_at = Some(at),
            SlipStatus::Pending => {}
        }
        Ok(())
    }
}

/// A thread-safe in-memory payment ledger.
///
/// Ids come from an atomic counter, mimicking a database sequence. Rows are
/// never removed; voiding only flips the status.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<u64, PaymentEntry>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn create(&self, payment: NewPayment) -> Result<PaymentEntry> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let entry = PaymentEntry {
            id,
            registration_id: payment.registration_id,
            sequence_no: payment.sequence_no,
            amount: payment.amount,
            method: payment.method,
            reference: payment.reference,
            note: payment.note,
            occurred_at: payment.occurred_at,
            status: payment.status,
            void_reason: None,
            voided_at: None,
        };
        let mut payments = self.payments.write().await;
        payments.insert(id, entry.clone());
        Ok(entry)
    }

    async fn get(&self, id: u64) -> Result<Option<PaymentEntry>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&id).cloned())
    }

    async fn mark_void(&self, id: u64, reason: &str, at: DateTime<Utc>) -> Result<PaymentEntry> {
        let mut payments = self.payments.write().await;
        let entry = payments.get_mut(&id).ok_or(LedgerError::PaymentNotFound(id))?;
        entry.status = PaymentStatus::Void;
        entry.void_reason = Some(reason.to_string());
        entry.voided_at = Some(at);
        Ok(entry.clone())
    }

    async fn find_by_reference(
        &self,
        registration_id: u32,
        reference: &str,
    ) -> Result<Option<PaymentEntry>> {
        let payments = self.payments.read().await;
        Ok(payments
            .values()
            .find(|p| {
                p.registration_id == registration_id && p.reference.as_deref() == Some(reference)
            })
            .cloned())
    }

    async fn find_by_registration(&self, registration_id: u32) -> Result<Vec<PaymentEntry>> {
        let payments = self.payments.read().await;
        let mut rows: Vec<PaymentEntry> = payments
            .values()
            .filter(|p| p.registration_id == registration_id)
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.sequence_no);
        Ok(rows)
    }

    async fn sum_active(&self, registration_id: u32) -> Result<Decimal> {
        let payments = self.payments.read().await;
        Ok(payments
            .values()
            .filter(|p| p.registration_id == registration_id && p.is_active())
            .map(|p| p.amount.value())
            .sum())
    }

    async fn max_sequence(&self, registration_id: u32) -> Result<u32> {
        let payments = self.payments.read().await;
        Ok(payments
            .values()
            .filter(|p| p.registration_id == registration_id)
            .map(|p| p.sequence_no)
            .max()
            .unwrap_or(0))
    }
}
