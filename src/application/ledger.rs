use crate::application::inputs::{
    AddPaymentInput, ApproveSlipInput, DeclineSlipInput, VoidPaymentInput,
};
use crate::domain::audit::{AuditEntry, AuditOutcome};
use crate::domain::payment::{NewPayment, PaymentEntry, PaymentStatus};
use crate::domain::ports::{AuditSinkBox, PaymentStoreBox, RegistrationStoreBox, SlipStoreBox};
use crate::domain::registration::{BalanceSummary, PaymentSlip, SlipStatus};
use crate::error::{LedgerError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The payment ledger & reconciliation engine.
///
/// `LedgerEngine` owns the storage ports and serializes every mutation of a
/// registration behind a per-registration lock. The locked section is the
/// atomicity unit: sequence allocation, the row write and the balance
/// reconciliation all happen inside it, so two concurrent mutations of the
/// same registration can never interleave.
///
/// Every mutating operation reports exactly one audit entry to the sink,
/// success or not. Snapshots are read before the attempt and after it, and a
/// failing sink never affects the business result.
pub struct LedgerEngine {
    registrations: RegistrationStoreBox,
    payments: PaymentStoreBox,
    slips: SlipStoreBox,
    audit: AuditSinkBox,
    locks: Mutex<HashMap<u32, Arc<Mutex<()>>>>,
}

impl LedgerEngine {
    pub fn new(
        registrations: RegistrationStoreBox,
        payments: PaymentStoreBox,
        slips: SlipStoreBox,
        audit: AuditSinkBox,
    ) -> Self {
        Self {
            registrations,
            payments,
            slips,
            audit,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Records a manual payment against a registration.
    ///
    /// Allocates the next sequence number, inserts the row and reconciles the
    /// paid cache under the registration's lock. Rejected when the
    /// registration is missing or soft-deleted.
    pub async fn add_payment(&self, input: AddPaymentInput) -> Result<PaymentEntry> {
        let before = self.registration_snapshot(input.registration_id).await;
        let result = self.add_payment_inner(&input).await;
        let after = self.registration_snapshot(input.registration_id).await;

        let subject = format!("registration:{}", input.registration_id);
        let audit = match &result {
            Ok(payment) => AuditEntry::new(
                &input.actor,
                "payment.add",
                AuditOutcome::Success,
                &subject,
                format!(
                    "added payment #{} of {} via {}",
                    payment.sequence_no, payment.amount, payment.method
                ),
            )
            .with_before(wrap_registration(before))
            .with_after(wrap_registration_and_payment(after, payment)),
            Err(err) => AuditEntry::new(
                &input.actor,
                "payment.add",
                outcome_for(err),
                &subject,
                "add payment rejected",
            )
            .with_before(wrap_registration(before))
            .with_meta(json!({ "error": err.to_string() })),
        };
        self.record_audit(audit).await;
        result
    }

    async fn add_payment_inner(&self, input: &AddPaymentInput) -> Result<PaymentEntry> {
        if self
            .registrations
            .get(input.registration_id)
            .await?
            .is_none()
        {
            return Err(LedgerError::RegistrationNotFound(input.registration_id));
        }
        if self.registrations.is_deleted(input.registration_id).await? {
            return Err(LedgerError::Validation(format!(
                "registration {} is deleted; payments are frozen",
                input.registration_id
            )));
        }

        let lock = self.lock_for(input.registration_id).await;
        let _guard = lock.lock().await;

        let sequence_no = self.next_sequence_no(input.registration_id).await?;
        let payment = self
            .payments
            .create(NewPayment {
                registration_id: input.registration_id,
                sequence_no,
                amount: input.amount,
                method: input.method.clone(),
                reference: input.reference.clone(),
                note: input.note.clone(),
                occurred_at: input.occurred_at,
                status: input.status,
            })
            .await?;
        let paid = self.resync_paid_amount(input.registration_id).await?;
        tracing::debug!(
            registration = input.registration_id,
            sequence = sequence_no,
            %paid,
            "payment recorded"
        );
        Ok(payment)
    }

    /// Logically reverses a payment entry.
    ///
    /// The row is kept forever; only its status flips. A second void attempt
    /// on the same entry fails with `AlreadyVoided` rather than succeeding
    /// silently.
    pub async fn void_payment(&self, input: VoidPaymentInput) -> Result<PaymentEntry> {
        let payment_before = self.payment_snapshot(input.payment_id).await;
        let registration_id = payment_before
            .as_ref()
            .and_then(|p| p.get("registration_id"))
            .and_then(Value::as_u64)
            .map(|id| id as u32);
        let registration_before = match registration_id {
            Some(id) => self.registration_snapshot(id).await,
            None => None,
        };

        let result = self.void_payment_inner(&input).await;

        let registration_after = match registration_id {
            Some(id) => self.registration_snapshot(id).await,
            None => None,
        };
        let subject = format!("payment:{}", input.payment_id);
        let audit = match &result {
            Ok(payment) => AuditEntry::new(
                &input.actor,
                "payment.void",
                AuditOutcome::Success,
                &subject,
                format!("voided payment of {}: {}", payment.amount, input.reason),
            )
            .with_before(wrap_payment_and_registration(
                payment_before,
                registration_before,
            ))
            .with_after(wrap_payment_and_registration(
                serde_json::to_value(payment).ok(),
                registration_after,
            )),
            Err(err) => AuditEntry::new(
                &input.actor,
                "payment.void",
                outcome_for(err),
                &subject,
                "void payment rejected",
            )
            .with_before(wrap_payment_and_registration(
                payment_before,
                registration_before,
            ))
            .with_meta(json!({ "error": err.to_string(), "reason": input.reason })),
        };
        self.record_audit(audit).await;
        result
    }

    async fn void_payment_inner(&self, input: &VoidPaymentInput) -> Result<PaymentEntry> {
        let payment = self
            .payments
            .get(input.payment_id)
            .await?
            .ok_or(LedgerError::PaymentNotFound(input.payment_id))?;

        let lock = self.lock_for(payment.registration_id).await;
        let _guard = lock.lock().await;

        // Re-read under the lock; a concurrent void may have won the race.
        let payment = self
            .payments
            .get(input.payment_id)
            .await?
            .ok_or(LedgerError::PaymentNotFound(input.payment_id))?;
        if payment.status == PaymentStatus::Void {
            return Err(LedgerError::AlreadyVoided(input.payment_id));
        }

        let voided = self
            .payments
            .mark_void(input.payment_id, &input.reason, Utc::now())
            .await?;
        let paid = self.resync_paid_amount(payment.registration_id).await?;
        tracing::debug!(
            registration = payment.registration_id,
            payment = input.payment_id,
            %paid,
            "payment voided"
        );
        Ok(voided)
    }

    /// Converts a pending slip into exactly one ledger entry.
    ///
    /// Two independent guards protect against double conversion: the slip
    /// must still be pending, and no entry may already carry the slip's id as
    /// its reference. Both are re-checked under the registration lock.
    pub async fn approve_slip(&self, input: ApproveSlipInput) -> Result<PaymentEntry> {
        let before = self.registration_snapshot(input.registration_id).await;
        let result = self.approve_slip_inner(&input).await;
        let after = self.registration_snapshot(input.registration_id).await;

        let subject = format!(
            "registration:{}/slip:{}",
            input.registration_id, input.slip_index
        );
        let audit = match &result {
            Ok(payment) => AuditEntry::new(
                &input.actor,
                "slip.approve",
                AuditOutcome::Success,
                &subject,
                format!("approved slip as payment of {}", payment.amount),
            )
            .with_before(wrap_registration(before))
            .with_after(wrap_registration_and_payment(after, payment)),
            Err(err) => AuditEntry::new(
                &input.actor,
                "slip.approve",
                outcome_for(err),
                &subject,
                "approve slip rejected",
            )
            .with_before(wrap_registration(before))
            .with_meta(json!({ "error": err.to_string() })),
        };
        self.record_audit(audit).await;
        result
    }

    async fn approve_slip_inner(&self, input: &ApproveSlipInput) -> Result<PaymentEntry> {
        if self
            .registrations
            .get(input.registration_id)
            .await?
            .is_none()
        {
            return Err(LedgerError::RegistrationNotFound(input.registration_id));
        }
        if self.registrations.is_deleted(input.registration_id).await? {
            return Err(LedgerError::Validation(format!(
                "registration {} is deleted; payments are frozen",
                input.registration_id
            )));
        }
        // Cheap-fail outside the lock, then re-check inside it.
        self.check_slip_convertible(input.registration_id, input.slip_index)
            .await?;

        let lock = self.lock_for(input.registration_id).await;
        let _guard = lock.lock().await;

        let slip = self
            .check_slip_convertible(input.registration_id, input.slip_index)
            .await?;

        let now = Utc::now();
        self.slips
            .set_status(
                input.registration_id,
                input.slip_index,
                SlipStatus::Approved,
                now,
            )
            .await?;
        let sequence_no = self.next_sequence_no(input.registration_id).await?;
        let payment = self
            .payments
            .create(NewPayment {
                registration_id: input.registration_id,
                sequence_no,
                amount: input.amount,
                method: "slip".to_string(),
                reference: Some(slip.id.clone()),
                note: Some(slip.url.clone()),
                occurred_at: now,
                status: PaymentStatus::Active,
            })
            .await?;
        let paid = self.resync_paid_amount(input.registration_id).await?;
        tracing::debug!(
            registration = input.registration_id,
            slip = %slip.id,
            %paid,
            "slip approved"
        );
        Ok(payment)
    }

    /// Rejects a pending slip. Declining never touches money: no entry is
    /// created and the paid cache is left alone.
    pub async fn decline_slip(&self, input: DeclineSlipInput) -> Result<()> {
        let before = self.registration_snapshot(input.registration_id).await;
        let result = self.decline_slip_inner(&input).await;
        let after = self.registration_snapshot(input.registration_id).await;

        let subject = format!(
            "registration:{}/slip:{}",
            input.registration_id, input.slip_index
        );
        let audit = match &result {
            Ok(()) => AuditEntry::new(
                &input.actor,
                "slip.decline",
                AuditOutcome::Success,
                &subject,
                "declined slip",
            )
            .with_before(wrap_registration(before))
            .with_after(wrap_registration(after)),
            Err(err) => AuditEntry::new(
                &input.actor,
                "slip.decline",
                outcome_for(err),
                &subject,
                "decline slip rejected",
            )
            .with_before(wrap_registration(before))
            .with_meta(json!({ "error": err.to_string() })),
        };
        self.record_audit(audit).await;
        result
    }

    async fn decline_slip_inner(&self, input: &DeclineSlipInput) -> Result<()> {
        if self
            .registrations
            .get(input.registration_id)
            .await?
            .is_none()
        {
            return Err(LedgerError::RegistrationNotFound(input.registration_id));
        }

        let lock = self.lock_for(input.registration_id).await;
        let _guard = lock.lock().await;

        let slip = self
            .slip_at(input.registration_id, input.slip_index)
            .await?;
        if slip.status.is_resolved() {
            return Err(LedgerError::AlreadyResolved {
                registration: input.registration_id,
                index: input.slip_index,
                status: slip.status.to_string(),
            });
        }

        self.slips
            .set_status(
                input.registration_id,
                input.slip_index,
                SlipStatus::Declined,
                Utc::now(),
            )
            .await
    }

    /// Read-only balance view; exempt from audit recording.
    pub async fn balance(&self, registration_id: u32) -> Result<BalanceSummary> {
        let registration = self
            .registrations
            .get(registration_id)
            .await?
            .ok_or(LedgerError::RegistrationNotFound(registration_id))?;
        Ok(BalanceSummary {
            registration_id: registration.id,
            full_amount: registration.full_amount,
            paid_amount: registration.paid_amount,
            outstanding: registration.outstanding(),
        })
    }

    /// Read-only ledger listing in sequence order; exempt from audit
    /// recording.
    pub async fn payments(&self, registration_id: u32) -> Result<Vec<PaymentEntry>> {
        self.payments.find_by_registration(registration_id).await
    }

    /// `1 + max(sequence_no)` for the registration; must run under the
    /// registration lock together with the insert that consumes it.
    async fn next_sequence_no(&self, registration_id: u32) -> Result<u32> {
        Ok(self.payments.max_sequence(registration_id).await? + 1)
    }

    /// Full recomputation of the paid cache from active rows. Deliberately
    /// not an incremental delta, so any historical drift heals on the next
    /// write.
    async fn resync_paid_amount(&self, registration_id: u32) -> Result<Decimal> {
        let paid = self.payments.sum_active(registration_id).await?;
        self.registrations
            .set_paid_amount(registration_id, paid)
            .await?;
        Ok(paid)
    }

    async fn slip_at(&self, registration_id: u32, index: usize) -> Result<PaymentSlip> {
        let slips = self.slips.slips(registration_id).await?;
        slips
            .into_iter()
            .nth(index)
            .ok_or(LedgerError::SlipNotFound {
                registration: registration_id,
                index,
            })
    }

    /// The two double-conversion guards: the slip must be pending, and no
    /// entry may already reference it. The former catches workflow misuse,
    /// the latter catches slip/ledger drift.
    async fn check_slip_convertible(
        &self,
        registration_id: u32,
        index: usize,
    ) -> Result<PaymentSlip> {
        let slip = self.slip_at(registration_id, index).await?;
        if slip.status.is_resolved() {
            return Err(LedgerError::AlreadyResolved {
                registration: registration_id,
                index,
                status: slip.status.to_string(),
            });
        }
        if self
            .payments
            .find_by_reference(registration_id, &slip.id)
            .await?
            .is_some()
        {
            return Err(LedgerError::DuplicateConversion {
                registration: registration_id,
                reference: slip.id,
            });
        }
        Ok(slip)
    }

    async fn lock_for(&self, registration_id: u32) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(registration_id).or_default().clone()
    }

    async fn registration_snapshot(&self, registration_id: u32) -> Option<Value> {
        match self.registrations.get(registration_id).await {
            Ok(Some(registration)) => serde_json::to_value(&registration).ok(),
            _ => None,
        }
    }

    async fn payment_snapshot(&self, payment_id: u64) -> Option<Value> {
        match self.payments.get(payment_id).await {
            Ok(Some(payment)) => serde_json::to_value(&payment).ok(),
            _ => None,
        }
    }

    async fn record_audit(&self, entry: AuditEntry) {
        if let Err(err) = self.audit.record(entry).await {
            // Best-effort side channel: a failing sink must not mask or roll
            // back the committed business result.
            tracing::warn!(error = %err, "audit sink failed");
        }
    }
}

fn outcome_for(err: &LedgerError) -> AuditOutcome {
    match err {
        LedgerError::AlreadyVoided(_)
        | LedgerError::AlreadyResolved { .. }
        | LedgerError::DuplicateConversion { .. } => AuditOutcome::Blocked,
        _ => AuditOutcome::Failure,
    }
}

fn wrap_registration(registration: Option<Value>) -> Option<Value> {
    registration.map(|r| json!({ "registration": r }))
}

fn wrap_registration_and_payment(
    registration: Option<Value>,
    payment: &PaymentEntry,
) -> Option<Value> {
    Some(json!({
        "registration": registration,
        "payment": serde_json::to_value(payment).ok(),
    }))
}

fn wrap_payment_and_registration(
    payment: Option<Value>,
    registration: Option<Value>,
) -> Option<Value> {
    if payment.is_none() && registration.is_none() {
        return None;
    }
    Some(json!({ "payment": payment, "registration": registration }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::SlipStore;
    use crate::domain::registration::{PaymentSlip, Registration};
    use crate::infrastructure::audit_log::InMemoryAuditLog;
    use crate::infrastructure::in_memory::{InMemoryPaymentStore, InMemoryRegistrationStore};
    use rust_decimal_macros::dec;

    async fn engine_with_registration(full_amount: Decimal) -> (LedgerEngine, InMemoryAuditLog) {
        let registrations = InMemoryRegistrationStore::new();
        registrations.insert(Registration::new(1, full_amount)).await;
        let audit = InMemoryAuditLog::new();
        let engine = LedgerEngine::new(
            Box::new(registrations.clone()),
            Box::new(InMemoryPaymentStore::new()),
            Box::new(registrations),
            Box::new(audit.clone()),
        );
        (engine, audit)
    }

    fn add_input(amount: Decimal) -> AddPaymentInput {
        AddPaymentInput::new(
            "admin",
            1,
            amount,
            "cash",
            None,
            None,
            Utc::now(),
            PaymentStatus::Active,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_add_then_void_reconciles_balance() {
        let (engine, _audit) = engine_with_registration(dec!(1000)).await;

        let first = engine.add_payment(add_input(dec!(400))).await.unwrap();
        assert_eq!(first.sequence_no, 1);
        assert_eq!(engine.balance(1).await.unwrap().paid_amount, dec!(400));

        let second = engine.add_payment(add_input(dec!(600))).await.unwrap();
        assert_eq!(second.sequence_no, 2);
        assert_eq!(engine.balance(1).await.unwrap().paid_amount, dec!(1000));

        engine
            .void_payment(VoidPaymentInput::new("admin", first.id, "entered twice").unwrap())
            .await
            .unwrap();
        let summary = engine.balance(1).await.unwrap();
        assert_eq!(summary.paid_amount, dec!(600));
        assert_eq!(summary.outstanding, dec!(400));
    }

    #[tokio::test]
    async fn test_double_void_is_rejected() {
        let (engine, _audit) = engine_with_registration(dec!(500)).await;
        let payment = engine.add_payment(add_input(dec!(100))).await.unwrap();

        engine
            .void_payment(VoidPaymentInput::new("admin", payment.id, "duplicate").unwrap())
            .await
            .unwrap();
        let err = engine
            .void_payment(VoidPaymentInput::new("admin", payment.id, "duplicate").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyVoided(id) if id == payment.id));
        assert_eq!(engine.balance(1).await.unwrap().paid_amount, dec!(0));
    }

    #[tokio::test]
    async fn test_void_missing_payment_is_not_found() {
        let (engine, _audit) = engine_with_registration(dec!(500)).await;
        let err = engine
            .void_payment(VoidPaymentInput::new("admin", 99, "oops").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::PaymentNotFound(99)));
    }

    #[tokio::test]
    async fn test_add_against_deleted_registration_is_rejected() {
        let registrations = InMemoryRegistrationStore::new();
        registrations.insert(Registration::new(1, dec!(100))).await;
        registrations.set_deleted(1, true).await;
        let engine = LedgerEngine::new(
            Box::new(registrations.clone()),
            Box::new(InMemoryPaymentStore::new()),
            Box::new(registrations),
            Box::new(InMemoryAuditLog::new()),
        );

        let err = engine.add_payment(add_input(dec!(50))).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(engine.payments(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pre_voided_entry_never_counts() {
        let (engine, _audit) = engine_with_registration(dec!(1000)).await;
        let mut input = add_input(dec!(300));
        input.status = PaymentStatus::Void;

        let payment = engine.add_payment(input).await.unwrap();
        assert_eq!(payment.status, PaymentStatus::Void);
        assert!(payment.void_reason.is_none());
        assert_eq!(engine.balance(1).await.unwrap().paid_amount, dec!(0));
    }

    #[tokio::test]
    async fn test_approve_slip_exactly_once() {
        let registrations = InMemoryRegistrationStore::new();
        registrations.insert(Registration::new(2, dec!(1000))).await;
        registrations
            .push_slip(
                2,
                PaymentSlip::pending("slip_1", "https://files/slip_1.png", Utc::now()),
            )
            .await;
        let engine = LedgerEngine::new(
            Box::new(registrations.clone()),
            Box::new(InMemoryPaymentStore::new()),
            Box::new(registrations.clone()),
            Box::new(InMemoryAuditLog::new()),
        );

        let payment = engine
            .approve_slip(ApproveSlipInput::new("admin", 2, 0, dec!(250)).unwrap())
            .await
            .unwrap();
        assert_eq!(payment.reference.as_deref(), Some("slip_1"));
        assert_eq!(payment.status, PaymentStatus::Active);
        assert_eq!(engine.balance(2).await.unwrap().paid_amount, dec!(250));

        let err = engine
            .approve_slip(ApproveSlipInput::new("admin", 2, 0, dec!(250)).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyResolved { .. }));
        assert_eq!(engine.balance(2).await.unwrap().paid_amount, dec!(250));
        assert_eq!(engine.payments(2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_conversion_guard_catches_drift() {
        // Slip still pending but a payment already references it: the second
        // guard must trip even though the first one passes.
        let registrations = InMemoryRegistrationStore::new();
        registrations.insert(Registration::new(1, dec!(1000))).await;
        registrations
            .push_slip(
                1,
                PaymentSlip::pending("slip_9", "https://files/slip_9.png", Utc::now()),
            )
            .await;
        let engine = LedgerEngine::new(
            Box::new(registrations.clone()),
            Box::new(InMemoryPaymentStore::new()),
            Box::new(registrations.clone()),
            Box::new(InMemoryAuditLog::new()),
        );

        let mut input = add_input(dec!(100));
        input.reference = Some("slip_9".to_string());
        engine.add_payment(input).await.unwrap();

        let err = engine
            .approve_slip(ApproveSlipInput::new("admin", 1, 0, dec!(100)).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::DuplicateConversion { ref reference, .. } if reference == "slip_9"
        ));
        // The slip must not have been mutated.
        let slips = registrations.slips(1).await.unwrap();
        assert_eq!(slips[0].status, SlipStatus::Pending);
    }

    #[tokio::test]
    async fn test_decline_does_not_touch_money() {
        let registrations = InMemoryRegistrationStore::new();
        registrations.insert(Registration::new(1, dec!(1000))).await;
        registrations
            .push_slip(
                1,
                PaymentSlip::pending("slip_1", "https://files/slip_1.png", Utc::now()),
            )
            .await;
        let engine = LedgerEngine::new(
            Box::new(registrations.clone()),
            Box::new(InMemoryPaymentStore::new()),
            Box::new(registrations.clone()),
            Box::new(InMemoryAuditLog::new()),
        );

        engine
            .decline_slip(DeclineSlipInput::new("admin", 1, 0))
            .await
            .unwrap();
        let slips = registrations.slips(1).await.unwrap();
        assert_eq!(slips[0].status, SlipStatus::Declined);
        assert!(slips[0].declined_at.is_some());
        assert_eq!(engine.balance(1).await.unwrap().paid_amount, dec!(0));
        assert!(engine.payments(1).await.unwrap().is_empty());

        let err = engine
            .decline_slip(DeclineSlipInput::new("admin", 1, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyResolved { .. }));
    }

    #[tokio::test]
    async fn test_slip_index_out_of_bounds() {
        let (engine, _audit) = engine_with_registration(dec!(1000)).await;
        let err = engine
            .approve_slip(ApproveSlipInput::new("admin", 1, 3, dec!(10)).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::SlipNotFound { index: 3, .. }));
    }

    #[tokio::test]
    async fn test_every_attempt_is_audited() {
        let (engine, audit) = engine_with_registration(dec!(1000)).await;

        let payment = engine.add_payment(add_input(dec!(100))).await.unwrap();
        engine
            .void_payment(VoidPaymentInput::new("admin", payment.id, "typo").unwrap())
            .await
            .unwrap();
        // Blocked attempt.
        let _ = engine
            .void_payment(VoidPaymentInput::new("admin", payment.id, "typo").unwrap())
            .await;
        // Failed attempt.
        let _ = engine
            .void_payment(VoidPaymentInput::new("admin", 404, "gone").unwrap())
            .await;

        let entries = audit.entries().await;
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].outcome, AuditOutcome::Success);
        assert_eq!(entries[1].outcome, AuditOutcome::Success);
        assert_eq!(entries[2].outcome, AuditOutcome::Blocked);
        assert_eq!(entries[3].outcome, AuditOutcome::Failure);
        assert!(entries[3].meta.is_some());
        // Before-snapshots are captured even for failures.
        assert!(entries[2].before.is_some());
    }

    #[tokio::test]
    async fn test_sequence_numbers_survive_voids() {
        let (engine, _audit) = engine_with_registration(dec!(1000)).await;
        let first = engine.add_payment(add_input(dec!(100))).await.unwrap();
        engine
            .void_payment(VoidPaymentInput::new("admin", first.id, "redo").unwrap())
            .await
            .unwrap();

        // Voided rows still occupy their ordinal.
        let second = engine.add_payment(add_input(dec!(100))).await.unwrap();
        assert_eq!(second.sequence_no, 2);
    }
}
