use chrono::Utc;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payledger::application::inputs::{
    AddPaymentInput, ApproveSlipInput, DeclineSlipInput, VoidPaymentInput,
};
use payledger::application::ledger::LedgerEngine;
use payledger::domain::payment::PaymentStatus;
use payledger::domain::registration::{PaymentSlip, Registration};
use payledger::error::LedgerError;
use payledger::infrastructure::audit_log::InMemoryAuditLog;
use payledger::infrastructure::in_memory::{InMemoryPaymentStore, InMemoryRegistrationStore};
use payledger::interfaces::csv::balance_writer::BalanceWriter;
use payledger::interfaces::csv::operation_reader::{OpKind, OperationReader, OperationRecord};
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input operations CSV file
    input: PathBuf,

    /// Actor name recorded in the audit trail
    #[arg(long, default_value = "admin")]
    actor: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let registrations = InMemoryRegistrationStore::new();
    let engine = LedgerEngine::new(
        Box::new(registrations.clone()),
        Box::new(InMemoryPaymentStore::new()),
        Box::new(registrations.clone()),
        Box::new(InMemoryAuditLog::new()),
    );

    // Replay operations
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OperationReader::new(file);
    for record in reader.operations() {
        match record {
            Ok(record) => {
                if let Err(e) = apply(&engine, &registrations, &cli.actor, record).await {
                    eprintln!("Error applying operation: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading operation: {}", e);
            }
        }
    }

    // Report final balances
    let mut summaries = Vec::new();
    for registration in registrations.all().await {
        summaries.push(engine.balance(registration.id).await.into_diagnostic()?);
    }

    let stdout = io::stdout();
    let mut writer = BalanceWriter::new(stdout.lock());
    writer.write_summaries(summaries).into_diagnostic()?;

    Ok(())
}

fn require<T>(value: Option<T>, field: &str) -> std::result::Result<T, LedgerError> {
    value.ok_or_else(|| LedgerError::Validation(format!("missing required field `{field}`")))
}

async fn apply(
    engine: &LedgerEngine,
    registrations: &InMemoryRegistrationStore,
    actor: &str,
    record: OperationRecord,
) -> std::result::Result<(), LedgerError> {
    match record.op {
        // `register` and `upload` stand in for the external portal that owns
        // registration CRUD and slip uploads; everything else goes through
        // the engine.
        OpKind::Register => {
            let id = require(record.registration, "registration")?;
            let full_amount = require(record.amount, "amount")?;
            registrations
                .insert(Registration::new(id, full_amount))
                .await;
        }
        OpKind::Upload => {
            let id = require(record.registration, "registration")?;
            let slip_id = require(record.reference, "reference")?;
            let url = record.note.unwrap_or_default();
            registrations
                .push_slip(id, PaymentSlip::pending(slip_id, url, Utc::now()))
                .await;
        }
        OpKind::Add => {
            let input = AddPaymentInput::new(
                actor,
                require(record.registration, "registration")?,
                require(record.amount, "amount")?,
                record.method.unwrap_or_else(|| "cash".to_string()),
                record.reference,
                record.note,
                Utc::now(),
                PaymentStatus::Active,
            )?;
            engine.add_payment(input).await?;
        }
        OpKind::Void => {
            let input = VoidPaymentInput::new(
                actor,
                require(record.payment, "payment")?,
                require(record.reason, "reason")?,
            )?;
            engine.void_payment(input).await?;
        }
        OpKind::Approve => {
            let input = ApproveSlipInput::new(
                actor,
                require(record.registration, "registration")?,
                require(record.slip, "slip")?,
                require(record.amount, "amount")?,
            )?;
            engine.approve_slip(input).await?;
        }
        OpKind::Decline => {
            let input = DeclineSlipInput::new(
                actor,
                require(record.registration, "registration")?,
                require(record.slip, "slip")?,
            );
            engine.decline_slip(input).await?;
        }
    }
    Ok(())
}
