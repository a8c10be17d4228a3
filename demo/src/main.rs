//! Custodia Audit Ledger — Demo CLI
//!
//! Walks the ledger end to end with sample records-management activity:
//! appending through the single writer, verifying the chain, tampering
//! with a copy to show detection, checkpointing, reporting, and exporting
//! the JSON bundle.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- chain
//!   cargo run -p demo -- tamper
//!   cargo run -p demo -- report
//!   cargo run -p demo -- export

use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use custodia_chain::{
    detect_tampering, export_chain, verify_chain, verify_checkpoint, CheckpointService,
    InMemoryRecordStore, LedgerWriter, RecordStore,
};
use custodia_contracts::{ActionKind, AuditRecord, EntryBuilder, LedgerResult, Severity};
use custodia_query::{build_report, filter_records, RecordFilter};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Custodia — tamper-evident audit ledger demo.
///
/// Each subcommand exercises one part of the ledger core against the same
/// sample chain of records-management activity.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Custodia audit ledger demo",
    long_about = "Builds a sample SHA-256 hash chain of records-management actions,\n\
                  then demonstrates verification, tamper detection, checkpointing,\n\
                  activity reporting, and JSON export."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every demonstration in sequence.
    RunAll,
    /// Append a sample chain and verify it.
    Chain,
    /// Tamper with a stored record and show cascading detection.
    Tamper,
    /// Checkpoint the chain and verify from the anchor.
    Checkpoint,
    /// Filter records and print the activity report.
    Report,
    /// Print the JSON export bundle.
    Export,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::Chain => run_chain(),
        Command::Tamper => run_tamper(),
        Command::Checkpoint => run_checkpoint(),
        Command::Report => run_report(),
        Command::Export => run_export(),
    };

    match result {
        Ok(()) => {
            println!("All selected demonstrations completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_all() -> LedgerResult<()> {
    run_chain()?;
    run_tamper()?;
    run_checkpoint()?;
    run_report()?;
    run_export()?;
    Ok(())
}

// ── Sample data ───────────────────────────────────────────────────────────────

/// Append a day of sample records-management activity and return the chain.
fn build_sample_chain() -> LedgerResult<Vec<AuditRecord>> {
    let store = Arc::new(InMemoryRecordStore::new());
    let writer = LedgerWriter::new(store.clone())?;

    writer.append(EntryBuilder::new(ActionKind::Login, "alice").build()?)?;
    writer.append(
        EntryBuilder::new(ActionKind::ResourceCreate, "alice")
            .actor_role("clerk")
            .resource("trip/2026-044")
            .detail("origin", "Tallinn")
            .detail("destination", "Riga")
            .detail("distance_km", 308)
            .build()?,
    )?;
    writer.append(
        EntryBuilder::new(ActionKind::ResourceUpdate, "bob")
            .actor_role("manager")
            .resource("trip/2026-044")
            .detail("field", "cost_total")
            .detail("old", 87)
            .detail("new", 92)
            .build()?,
    )?;
    writer.append(
        EntryBuilder::new(ActionKind::LoginFailed, "mallory")
            .severity(Severity::Error)
            .failed("bad password")
            .build()?,
    )?;
    writer.append(
        EntryBuilder::new(ActionKind::ResourceApprove, "bob")
            .actor_role("manager")
            .resource("trip/2026-044")
            .build()?,
    )?;
    writer.append(
        EntryBuilder::new(ActionKind::ResourceExport, "carol")
            .actor_role("auditor")
            .resource("report/2026-q2")
            .detail("format", "csv")
            .build()?,
    )?;

    store.read_all()
}

// ── Demonstrations ────────────────────────────────────────────────────────────

fn run_chain() -> LedgerResult<()> {
    println!("[chain] appending sample activity through the single writer");
    let records = build_sample_chain()?;

    for record in &records {
        println!(
            "  #{} {:<17} {:<8} {}…",
            record.sequence,
            record.entry.action,
            record.entry.actor_id,
            &record.current_hash[..16]
        );
    }

    let report = verify_chain(&records);
    println!(
        "[chain] {} records, valid = {}",
        records.len(),
        report.is_valid
    );
    println!();
    Ok(())
}

fn run_tamper() -> LedgerResult<()> {
    println!("[tamper] editing record #2's details in a storage copy");
    let mut records = build_sample_chain()?;
    records[1]
        .entry
        .details
        .insert("distance_km".to_string(), 9999.into());

    let detection = detect_tampering(&records);
    println!("[tamper] tampered = {}", detection.tampered);
    for suspect in &detection.suspicious_records {
        println!("  index {} (entry {}):", suspect.index, suspect.record_id);
        for issue in &suspect.issues {
            println!("    - {}", issue);
        }
    }
    println!();
    Ok(())
}

fn run_checkpoint() -> LedgerResult<()> {
    println!("[checkpoint] anchoring after record 4, verifying the rest");
    let records = build_sample_chain()?;

    let service = CheckpointService::new();
    let cp = service.create(&records[..4], Utc::now())?;
    println!(
        "  checkpoint: count={} last_sequence={} hash={}… self-check={}",
        cp.record_count,
        cp.last_sequence,
        &cp.checkpoint_hash[..16],
        verify_checkpoint(&cp)
    );

    let suffix_report = custodia_chain::verify_from_checkpoint(&cp, &records[4..]);
    println!(
        "  suffix of {} records from anchor: valid = {}",
        records.len() - 4,
        suffix_report.is_valid
    );
    println!();
    Ok(())
}

fn run_report() -> LedgerResult<()> {
    println!("[report] filtering and aggregating the sample chain");
    let records = build_sample_chain()?;

    let trip_changes = filter_records(&records, &RecordFilter::new().by_resource("trip/"));
    println!("  records touching trip resources: {}", trip_changes.len());

    let now = Utc::now();
    let report = build_report(&records, now - Duration::hours(1), now);
    println!("  total in window:  {}", report.total);
    println!("  by action:        {:?}", report.by_action);
    println!("  by severity:      {:?}", report.by_severity);
    println!("  failure rate:     {:.1}%", report.failure_rate);
    println!();
    Ok(())
}

fn run_export() -> LedgerResult<()> {
    println!("[export] producing the JSON bundle");
    let records = build_sample_chain()?;
    let bundle = export_chain(&records);

    let json = serde_json::to_string_pretty(&bundle).map_err(|e| {
        custodia_contracts::LedgerError::Persistence {
            reason: format!("bundle serialization failed: {}", e),
        }
    })?;
    println!("{}", json);
    println!();
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Custodia — Tamper-Evident Audit Ledger");
    println!("======================================");
    println!();
    println!("Ledger guarantees demonstrated here:");
    println!("  [1] Every sensitive action becomes an immutable, sequenced record");
    println!("  [2] Each record embeds the SHA-256 hash of its predecessor");
    println!("  [3] Editing any stored byte breaks verification at that record");
    println!("      and at the link that follows it");
    println!("  [4] Checkpoints anchor fast re-verification of recent records");
    println!();
}
