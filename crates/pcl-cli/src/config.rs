use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use pcl_ledger::LedgerConfig;
use serde::{Deserialize, Serialize};

/// Settings read from the `--config` TOML file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Ledger document used when `--ledger` is not given.
    pub ledger_path: PathBuf,
    /// Receipt file used when `receipt --output` is not given.
    pub receipt_path: PathBuf,
    /// Record schema enforced on submission.
    pub ledger: LedgerConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from("pcl-ledger.json"),
            receipt_path: PathBuf::from("Combined_Products_Receipt.txt"),
            ledger: LedgerConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load from `path`, or fall back to defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
