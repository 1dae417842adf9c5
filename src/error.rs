use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors produced by ledger operations.
///
/// Validation and state-machine violations are detected before any write;
/// `Storage` wraps adapter failures surfaced after the surrounding operation
/// rolled back.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Registration {0} not found")]
    RegistrationNotFound(u32),
    #[error("Payment {0} not found")]
    PaymentNotFound(u64),
    #[error("Registration {registration} has no slip at index {index}")]
    SlipNotFound { registration: u32, index: usize },
    #[error("Payment {0} is already voided")]
    AlreadyVoided(u64),
    #[error("Slip {index} on registration {registration} is already {status}")]
    AlreadyResolved {
        registration: u32,
        index: usize,
        status: String,
    },
    #[error("Registration {registration} already has a payment for slip {reference}")]
    DuplicateConversion {
        registration: u32,
        reference: String,
    },
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
