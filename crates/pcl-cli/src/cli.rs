use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pcl",
    about = "Product Chain Ledger: hash-chained product records",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Ledger document to operate on (overrides the configured path)
    #[arg(short, long, global = true)]
    pub ledger: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Interactively add products to the ledger
    Add(AddArgs),
    /// Verify hash chain integrity
    Verify(VerifyArgs),
    /// Show block history
    Log(LogArgs),
    /// Show a specific block
    Show(ShowArgs),
    /// Render a receipt for all stored products
    Receipt(ReceiptArgs),
}

#[derive(Args)]
pub struct AddArgs {}

#[derive(Args)]
pub struct VerifyArgs {}

#[derive(Args)]
pub struct LogArgs {
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// 1-based block index
    pub index: u64,
}

#[derive(Args)]
pub struct ReceiptArgs {
    /// Output file (defaults to the configured receipt path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
