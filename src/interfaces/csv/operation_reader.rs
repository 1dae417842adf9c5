use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    /// Seeds a registration (stands in for portal intake).
    Register,
    /// Attaches a pending slip (stands in for the upload collaborator).
    Upload,
    Add,
    Void,
    Approve,
    Decline,
}

/// One admin operation row from a batch file.
///
/// All fields except `op` are optional at parse time; each operation
/// validates the fields it needs when applied.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct OperationRecord {
    pub op: OpKind,
    pub registration: Option<u32>,
    pub payment: Option<u64>,
    pub slip: Option<usize>,
    pub amount: Option<Decimal>,
    pub method: Option<String>,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub reason: Option<String>,
}

/// Reads admin operations from a CSV source.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths,
/// yielding `Result<OperationRecord>` lazily so large batches stream.
pub struct OperationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OperationReader<R> {
    /// Creates a new `OperationReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn operations(self) -> impl Iterator<Item = Result<OperationRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}
