use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use pcl_types::Record;
use tracing::{debug, warn};

use crate::block::Block;
use crate::builder::ChainBuilder;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::traits::{LedgerReader, LedgerWriter};
use crate::validation::RecordValidator;
use crate::verification::Verification;

/// In-memory ledger: the owner of the block sequence.
///
/// All submissions serialize on the write lock, which is held across
/// validation and append. Readers share the read lock and always observe a
/// fully appended chain.
#[derive(Debug)]
pub struct InMemoryLedger {
    config: LedgerConfig,
    inner: RwLock<Vec<Block>>,
}

impl InMemoryLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(Vec::new()),
        }
    }

    /// Create a ledger whose first block holds `genesis`.
    pub fn with_genesis(config: LedgerConfig, genesis: Record) -> Result<Self, LedgerError> {
        let ledger = Self::new(config);
        ledger.submit(genesis)?;
        Ok(ledger)
    }

    /// Rebuild a ledger from previously exported blocks.
    ///
    /// The chain is audited first; a corrupted or tampered sequence, a
    /// malformed record, or a repeated key is refused rather than repaired.
    pub fn restore(config: LedgerConfig, blocks: Vec<Block>) -> Result<Self, LedgerError> {
        if let Verification::Invalid { index, violation } = Verification::of(&blocks) {
            warn!(index, %violation, "refusing to restore corrupted chain");
            return Err(LedgerError::IntegrityViolation { index, violation });
        }

        let validator = RecordValidator::new(&config);
        let mut keys = HashSet::with_capacity(blocks.len());
        for block in &blocks {
            let key = validator.validate_fields(block.record())?;
            if !keys.insert(key) {
                return Err(LedgerError::DuplicateKey {
                    key: key.to_string(),
                });
            }
        }

        debug!(blocks = blocks.len(), "ledger restored");
        Ok(Self {
            config,
            inner: RwLock::new(blocks),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Block>>, LedgerError> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Block>>, LedgerError> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl LedgerWriter for InMemoryLedger {
    fn submit(&self, record: Record) -> Result<Block, LedgerError> {
        let mut blocks = self.write()?;

        if let Err(err) = RecordValidator::new(&self.config).validate(&record, &blocks) {
            warn!(error = %err, "submission rejected");
            return Err(err);
        }

        let block = ChainBuilder::append(&mut blocks, record, Utc::now());
        debug!(index = block.index, digest = %block.digest.short_hex(), "block appended");
        Ok(block)
    }
}

impl LedgerReader for InMemoryLedger {
    fn snapshot(&self) -> Result<Vec<Block>, LedgerError> {
        Ok(self.read()?.clone())
    }

    fn verify(&self) -> Result<Verification, LedgerError> {
        let blocks = self.read()?;
        let verification = Verification::of(&blocks);
        if let Verification::Invalid { index, violation } = verification {
            warn!(index, %violation, "chain verification failed");
        }
        Ok(verification)
    }

    fn head(&self) -> Result<Option<Block>, LedgerError> {
        Ok(self.read()?.last().cloned())
    }

    fn get(&self, index: u64) -> Result<Option<Block>, LedgerError> {
        let blocks = self.read()?;
        let Some(offset) = index.checked_sub(1) else {
            return Ok(None);
        };
        Ok(blocks.get(offset as usize).cloned())
    }

    fn find_by_key(&self, key: &str) -> Result<Option<Block>, LedgerError> {
        let key_field = self.config.key_field.as_str();
        Ok(self
            .read()?
            .iter()
            .find(|block| block.record().text(key_field) == Some(key))
            .cloned())
    }

    fn block_count(&self) -> Result<u64, LedgerError> {
        Ok(self.read()?.len() as u64)
    }
}
