pub mod audit_log;
pub mod in_memory;
