use crate::domain::audit::AuditEntry;
use crate::domain::ports::AuditSink;
use async_trait::async_trait;
use std::io;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-memory audit sink.
///
/// Appends entries in arrival order and exposes them for inspection. Stands
/// in for the portal's activity-log service in the binary and in tests.
#[derive(Default, Clone)]
pub struct InMemoryAuditLog {
    entries: Arc<RwLock<Vec<AuditEntry>>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<AuditEntry> {
        let entries = self.entries.read().await;
        entries.clone()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditLog {
    async fn record(&self, entry: AuditEntry) -> io::Result<()> {
        let mut entries = self.entries.write().await;
        entries.push(entry);
        Ok(())
    }
}

/// A sink that always fails, for exercising the best-effort contract.
#[derive(Default, Clone)]
pub struct FailingAuditSink;

#[async_trait]
impl AuditSink for FailingAuditSink {
    async fn record(&self, _entry: AuditEntry) -> io::Result<()> {
        Err(io::Error::other("audit sink unavailable"))
    }
}
