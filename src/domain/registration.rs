use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum SlipStatus {
    Pending,
    Approved,
    Declined,
}

impl SlipStatus {
    pub fn is_resolved(&self) -> bool {
        *self != Self::Pending
    }
}

impl std::fmt::Display for SlipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Declined => write!(f, "declined"),
        }
    }
}

/// Externally uploaded proof of payment, embedded under a registration.
///
/// A slip leaves `Pending` exactly once. An approved slip corresponds to
/// exactly one ledger entry whose `reference` equals the slip id.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentSlip {
    /// Assigned at upload time by the external upload collaborator.
    pub id: String,
    /// Pointer to stored evidence, opaque to the ledger.
    pub url: String,
    pub status: SlipStatus,
    pub uploaded_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub declined_at: Option<DateTime<Utc>>,
}

impl PaymentSlip {
    pub fn pending(id: impl Into<String>, url: impl Into<String>, uploaded_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            status: SlipStatus::Pending,
            uploaded_at,
            approved_at: None,
            declined_at: None,
        }
    }
}

/// A student's financial account: the fee owed, the reconciled paid cache,
/// and the ordered slip evidence attached to it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Registration {
    pub id: u32,
    pub full_amount: Decimal,
    /// Denormalized cache; equals the sum of active entry amounts at the end
    /// of every mutating operation.
    pub paid_amount: Decimal,
    pub slips: Vec<PaymentSlip>,
    /// Soft-delete flag owned by the admin CRUD layer; the ledger only
    /// refuses to write against it.
    pub deleted: bool,
}

impl Registration {
    pub fn new(id: u32, full_amount: Decimal) -> Self {
        Self {
            id,
            full_amount,
            paid_amount: Decimal::ZERO,
            slips: Vec::new(),
            deleted: false,
        }
    }

    pub fn outstanding(&self) -> Decimal {
        self.full_amount - self.paid_amount
    }
}

/// Read-only balance view returned by the engine.
#[derive(Debug, Serialize, PartialEq, Clone, Copy)]
pub struct BalanceSummary {
    pub registration_id: u32,
    pub full_amount: Decimal,
    pub paid_amount: Decimal,
    pub outstanding: Decimal,
}
