use super::money::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Active,
    Void,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Void => write!(f, "void"),
        }
    }
}

/// One row in the payment ledger.
///
/// Rows are append-only: the single permitted mutation is the one-way
/// `Active -> Void` transition, which sets `void_reason` and `voided_at` and
/// keeps the row forever for audit purposes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentEntry {
    pub id: u64,
    pub registration_id: u32,
    /// Creation ordinal, unique and strictly increasing per registration.
    pub sequence_no: u32,
    pub amount: Amount,
    pub method: String,
    pub reference: Option<String>,
    pub note: Option<String>,
    /// Caller-supplied; may be backdated.
    pub occurred_at: DateTime<Utc>,
    pub status: PaymentStatus,
    pub void_reason: Option<String>,
    pub voided_at: Option<DateTime<Utc>>,
}

impl PaymentEntry {
    pub fn is_active(&self) -> bool {
        self.status == PaymentStatus::Active
    }
}

/// A ledger row before the store has assigned its id.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub registration_id: u32,
    pub sequence_no: u32,
    pub amount: Amount,
    pub method: String,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub status: PaymentStatus,
}
