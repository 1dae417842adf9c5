use chrono::Utc;
use payledger::application::inputs::AddPaymentInput;
use payledger::application::ledger::LedgerEngine;
use payledger::domain::payment::PaymentStatus;
use payledger::domain::registration::{PaymentSlip, Registration};
use payledger::infrastructure::audit_log::InMemoryAuditLog;
use payledger::infrastructure::in_memory::{InMemoryPaymentStore, InMemoryRegistrationStore};
use rust_decimal::Decimal;

pub struct Fixture {
    pub engine: LedgerEngine,
    pub registrations: InMemoryRegistrationStore,
    pub audit: InMemoryAuditLog,
}

/// Builds an engine over fresh in-memory stores with one registration seeded.
pub async fn fixture_with_registration(id: u32, full_amount: Decimal) -> Fixture {
    let registrations = InMemoryRegistrationStore::new();
    registrations
        .insert(Registration::new(id, full_amount))
        .await;
    let audit = InMemoryAuditLog::new();
    let engine = LedgerEngine::new(
        Box::new(registrations.clone()),
        Box::new(InMemoryPaymentStore::new()),
        Box::new(registrations.clone()),
        Box::new(audit.clone()),
    );
    Fixture {
        engine,
        registrations,
        audit,
    }
}

pub async fn with_pending_slip(fixture: &Fixture, registration_id: u32, slip_id: &str) {
    fixture
        .registrations
        .push_slip(
            registration_id,
            PaymentSlip::pending(
                slip_id,
                format!("https://files/{slip_id}.png"),
                Utc::now(),
            ),
        )
        .await;
}

pub fn cash_payment(registration_id: u32, amount: Decimal) -> AddPaymentInput {
    AddPaymentInput::new(
        "admin",
        registration_id,
        amount,
        "cash",
        None,
        None,
        Utc::now(),
        PaymentStatus::Active,
    )
    .unwrap()
}
