use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    Success,
    Failure,
    /// A guard rejected the attempt before any mutation (double void,
    /// re-approval of a resolved slip, duplicate slip conversion).
    Blocked,
}

/// One before/after record describing a ledger operation attempt.
///
/// Produced for every mutating attempt regardless of outcome and handed to
/// the external audit sink; the ledger never stores these itself.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct AuditEntry {
    pub actor: String,
    pub category: String,
    pub action: String,
    pub outcome: AuditOutcome,
    /// What the operation targeted, e.g. `registration:7` or `payment:42`.
    pub subject: String,
    pub message: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
    /// Error text and other operation context on non-success outcomes.
    pub meta: Option<Value>,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        actor: impl Into<String>,
        action: impl Into<String>,
        outcome: AuditOutcome,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            category: "payments".to_string(),
            action: action.into(),
            outcome,
            subject: subject.into(),
            message: message.into(),
            before: None,
            after: None,
            meta: None,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_before(mut self, before: Option<Value>) -> Self {
        self.before = before;
        self
    }

    pub fn with_after(mut self, after: Option<Value>) -> Self {
        self.after = after;
        self
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}
