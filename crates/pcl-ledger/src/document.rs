//! JSON document form of a ledger.
//!
//! A document is a pretty-printed JSON array of blocks:
//!
//! ```text
//! [
//!   {
//!     "index": 1,
//!     "timestamp": "2024-09-17T10:00:00Z",
//!     "data": { "product": { "productID": "123456", ... } },
//!     "previousHash": "0",
//!     "hash": "<64 hex chars>"
//!   }
//! ]
//! ```

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::block::Block;
use crate::error::LedgerError;

pub fn to_json(blocks: &[Block]) -> Result<String, LedgerError> {
    serde_json::to_string_pretty(blocks).map_err(|e| LedgerError::Serialization(e.to_string()))
}

pub fn from_json(text: &str) -> Result<Vec<Block>, LedgerError> {
    serde_json::from_str(text).map_err(|e| LedgerError::Serialization(e.to_string()))
}

/// Write a document, replacing any existing file atomically.
pub fn save(path: &Path, blocks: &[Block]) -> Result<(), LedgerError> {
    let json = to_json(blocks)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| LedgerError::Io(e.error.to_string()))?;

    debug!(path = %path.display(), blocks = blocks.len(), "ledger document saved");
    Ok(())
}

/// Read a document. The blocks are returned as stored, unverified.
pub fn load(path: &Path) -> Result<Vec<Block>, LedgerError> {
    let text = fs::read_to_string(path)?;
    let blocks = from_json(&text)?;
    debug!(path = %path.display(), blocks = blocks.len(), "ledger document loaded");
    Ok(blocks)
}

/// Like [`load`], but a missing file yields an empty ledger.
pub fn load_or_empty(path: &Path) -> Result<Vec<Block>, LedgerError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    load(path)
}
