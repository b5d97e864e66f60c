use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use chrono::SecondsFormat;
use colored::Colorize;
use pcl_ledger::{document, Block, InMemoryLedger, LedgerReader, Verification};
use tracing::info;

use crate::cli::*;
use crate::config::CliConfig;
use crate::receipt;
use crate::session::{self, Ending, NAME_FIELD};

/// Exit status of a command that ran to completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Success,
    VerificationFailed,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ExitCode::SUCCESS,
            Status::VerificationFailed => ExitCode::from(2),
        }
    }
}

/// Resolved configuration shared by every command.
struct Env {
    config: CliConfig,
    ledger_path: PathBuf,
    format: OutputFormat,
}

pub fn run_command(cli: Cli) -> anyhow::Result<Status> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let ctx = Env {
        ledger_path: cli.ledger.unwrap_or_else(|| config.ledger_path.clone()),
        config,
        format: cli.format,
    };

    match cli.command {
        Command::Add(_) => cmd_add(&ctx),
        Command::Verify(_) => cmd_verify(&ctx),
        Command::Log(args) => cmd_log(&ctx, args),
        Command::Show(args) => cmd_show(&ctx, args),
        Command::Receipt(args) => cmd_receipt(&ctx, args),
    }
}

/// Load the ledger document into a ledger, refusing one that fails audit.
fn open_ledger(ctx: &Env) -> anyhow::Result<InMemoryLedger> {
    let blocks = document::load_or_empty(&ctx.ledger_path)
        .with_context(|| format!("loading {}", ctx.ledger_path.display()))?;
    let ledger = InMemoryLedger::restore(ctx.config.ledger.clone(), blocks)
        .with_context(|| format!("restoring {}", ctx.ledger_path.display()))?;
    let blocks = ledger.block_count()?;
    info!(path = %ctx.ledger_path.display(), blocks, "ledger opened");
    Ok(ledger)
}

fn cmd_add(ctx: &Env) -> anyhow::Result<Status> {
    let ledger = open_ledger(ctx)?;
    let stdin = io::stdin();
    let outcome = session::run_session(
        &ledger,
        &ctx.config.ledger.key_field,
        stdin.lock(),
        io::stdout(),
    );

    // Accepted blocks are kept even if the session ends abnormally.
    let blocks = ledger.snapshot()?;
    document::save(&ctx.ledger_path, &blocks)
        .with_context(|| format!("saving {}", ctx.ledger_path.display()))?;
    info!(path = %ctx.ledger_path.display(), blocks = blocks.len(), "ledger saved");

    match outcome? {
        Ending::PrintChain => {
            println!(
                "\nBlockchain after adding new blocks: {}",
                document::to_json(&blocks)?
            );
        }
        Ending::Receipt => write_receipt(ctx, &blocks, &ctx.config.receipt_path)?,
    }
    Ok(Status::Success)
}

fn cmd_verify(ctx: &Env) -> anyhow::Result<Status> {
    let blocks = document::load(&ctx.ledger_path)
        .with_context(|| format!("loading {}", ctx.ledger_path.display()))?;
    let verification = Verification::of(&blocks);

    // Chain links can be intact while records still break the schema or repeat a key.
    let admission = match verification {
        Verification::Valid => InMemoryLedger::restore(ctx.config.ledger.clone(), blocks.clone())
            .err()
            .map(|e| e.to_string()),
        Verification::Invalid { .. } => None,
    };

    match ctx.format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "blocks": blocks.len(),
                "chain": verification,
                "records": admission.as_deref().unwrap_or("ok"),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => match (&verification, &admission) {
            (Verification::Valid, None) => {
                println!("{} Ledger integrity verified", "✓".green().bold());
                println!("  Blocks: {}", blocks.len().to_string().bold());
                println!("  Hash chain: {}", "valid".green());
                println!("  Indices: {}", "gapless".green());
                println!("  Keys: {}", "unique".green());
            }
            (Verification::Valid, Some(reason)) => {
                println!("{} Ledger records rejected", "✗".red().bold());
                println!("  Hash chain: {}", "valid".green());
                println!("  Records: {}", reason.red());
            }
            (Verification::Invalid { index, violation }, _) => {
                println!("{} Ledger integrity check failed", "✗".red().bold());
                println!("  Block: {}", index.to_string().yellow());
                println!("  Violation: {}", violation.to_string().red());
            }
        },
    }

    if verification.is_valid() && admission.is_none() {
        Ok(Status::Success)
    } else {
        Ok(Status::VerificationFailed)
    }
}

fn cmd_log(ctx: &Env, args: LogArgs) -> anyhow::Result<Status> {
    let blocks = document::load_or_empty(&ctx.ledger_path)?;
    let shown: Vec<&Block> = blocks.iter().rev().take(args.limit).collect();

    if let OutputFormat::Json = ctx.format {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(Status::Success);
    }
    if shown.is_empty() {
        println!("Ledger is empty.");
        return Ok(Status::Success);
    }

    let key_field = ctx.config.ledger.key_field.as_str();
    for block in shown {
        let record = block.record();
        let key = record.text(key_field).unwrap_or("-");
        let name = record.text(NAME_FIELD).unwrap_or("");
        if args.oneline {
            println!(
                "{} {} {} {}",
                format!("#{}", block.index).yellow(),
                block.digest.short_hex().dimmed(),
                key.bold(),
                name
            );
        } else {
            println!(
                "{}  {}",
                format!("#{}", block.index).yellow().bold(),
                block.digest.to_hex().dimmed()
            );
            println!("  Key: {}  Name: {}", key.bold(), name);
            println!(
                "  Time: {}",
                block.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
            );
            let previous = block
                .previous_digest
                .map(|d| d.short_hex())
                .unwrap_or_else(|| pcl_types::GENESIS_SENTINEL.into());
            println!("  Previous: {}", previous.dimmed());
        }
    }
    Ok(Status::Success)
}

fn cmd_show(ctx: &Env, args: ShowArgs) -> anyhow::Result<Status> {
    let blocks = document::load_or_empty(&ctx.ledger_path)?;
    let block = args
        .index
        .checked_sub(1)
        .and_then(|offset| blocks.get(offset as usize))
        .with_context(|| format!("no block at index {}", args.index))?;

    match ctx.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(block)?),
        OutputFormat::Text => {
            println!("Block {}", format!("#{}", block.index).yellow().bold());
            println!("  Hash: {}", block.digest.to_hex());
            println!(
                "  Previous: {}",
                pcl_types::digest::link_to_string(block.previous_digest.as_ref())
            );
            println!(
                "  Timestamp: {}",
                block.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
            );
            for (name, value) in block.record().iter() {
                println!("  {}: {}", name.bold(), value);
            }
            let intact = block.expected_digest() == block.digest;
            let status = if intact { "matches".green() } else { "MISMATCH".red() };
            println!("  Digest: {status}");
        }
    }
    Ok(Status::Success)
}

fn cmd_receipt(ctx: &Env, args: ReceiptArgs) -> anyhow::Result<Status> {
    let ledger = open_ledger(ctx)?;
    let blocks = ledger.snapshot()?;
    let output = args.output.unwrap_or_else(|| ctx.config.receipt_path.clone());
    write_receipt(ctx, &blocks, &output)?;
    Ok(Status::Success)
}

fn write_receipt(ctx: &Env, blocks: &[Block], path: &Path) -> anyhow::Result<()> {
    let text = receipt::render(blocks, &ctx.config.ledger.key_field);
    fs::write(path, text).with_context(|| format!("writing receipt {}", path.display()))?;
    println!("Receipt saved as {}", path.display().to_string().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pcl_ledger::LedgerWriter;
    use pcl_types::Record;

    use super::*;

    fn seed(path: &Path) -> Vec<Block> {
        let ledger = InMemoryLedger::default();
        for (id, name) in [("123456", "Smartphone"), ("42", "Laptop")] {
            ledger
                .submit(
                    Record::new()
                        .with("productID", id)
                        .with("productName", name)
                        .with("description", "")
                        .with("price", 10.0),
                )
                .unwrap();
        }
        let blocks = ledger.snapshot().unwrap();
        document::save(path, &blocks).unwrap();
        blocks
    }

    fn run(args: &[&str]) -> anyhow::Result<Status> {
        run_command(Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn verify_accepts_intact_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        seed(&path);

        let status = run(&["pcl", "verify", "--ledger", path.to_str().unwrap()]).unwrap();
        assert_eq!(status, Status::Success);
    }

    #[test]
    fn verify_flags_tampered_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let mut blocks = seed(&path);
        blocks[1].data.product.insert("price", 0.01);
        document::save(&path, &blocks).unwrap();

        let status = run(&["pcl", "verify", "--ledger", path.to_str().unwrap()]).unwrap();
        assert_eq!(status, Status::VerificationFailed);
    }

    #[test]
    fn verify_flags_schema_violations_under_new_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let config = dir.path().join("pcl.toml");
        seed(&path);
        fs::write(&config, "[ledger]\nrequired_fields = [\"productID\", \"sku\"]\n").unwrap();

        let status = run(&[
            "pcl",
            "--config",
            config.to_str().unwrap(),
            "verify",
            "--ledger",
            path.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(status, Status::VerificationFailed);
    }

    #[test]
    fn verify_missing_ledger_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(run(&["pcl", "verify", "--ledger", path.to_str().unwrap()]).is_err());
    }

    #[test]
    fn receipt_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let out = dir.path().join("receipt.txt");
        seed(&path);

        run(&[
            "pcl",
            "receipt",
            "--ledger",
            path.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ])
        .unwrap();

        let text = fs::read_to_string(&out).unwrap();
        assert!(text.contains("Product #2"));
        assert!(text.contains("Laptop"));
    }

    #[test]
    fn receipt_refuses_tampered_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let mut blocks = seed(&path);
        blocks[0].index = 9;
        document::save(&path, &blocks).unwrap();

        let err = run(&[
            "pcl",
            "receipt",
            "--ledger",
            path.to_str().unwrap(),
            "--output",
            dir.path().join("r.txt").to_str().unwrap(),
        ])
        .unwrap_err();
        assert!(format!("{err:#}").contains("IndexGap"));
    }

    #[test]
    fn show_out_of_range_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        seed(&path);

        assert!(run(&["pcl", "show", "3", "--ledger", path.to_str().unwrap()]).is_err());
        assert!(run(&["pcl", "show", "0", "--ledger", path.to_str().unwrap()]).is_err());
        assert_eq!(
            run(&["pcl", "show", "2", "--ledger", path.to_str().unwrap()]).unwrap(),
            Status::Success
        );
    }

    #[test]
    fn log_handles_missing_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let status = run(&["pcl", "log", "--ledger", path.to_str().unwrap()]).unwrap();
        assert_eq!(status, Status::Success);
    }
}
