use pcl_types::Record;

use crate::block::Block;
use crate::error::LedgerError;
use crate::verification::Verification;

/// Write boundary: the single admission point of the ledger.
pub trait LedgerWriter: Send + Sync {
    /// Validate and append a record as one indivisible step.
    ///
    /// On any error the ledger is left unchanged.
    fn submit(&self, record: Record) -> Result<Block, LedgerError>;
}

/// Read boundary for audits, exports, and lookups.
pub trait LedgerReader: Send + Sync {
    /// Owned, ordered copy of every block.
    fn snapshot(&self) -> Result<Vec<Block>, LedgerError>;

    /// Audit the full chain.
    fn verify(&self) -> Result<Verification, LedgerError>;

    fn head(&self) -> Result<Option<Block>, LedgerError>;

    /// Block at a 1-based index.
    fn get(&self, index: u64) -> Result<Option<Block>, LedgerError>;

    /// Block whose record carries the given unique key.
    fn find_by_key(&self, key: &str) -> Result<Option<Block>, LedgerError>;

    fn block_count(&self) -> Result<u64, LedgerError>;
}
