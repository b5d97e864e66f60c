//! Append-only, hash-chained product ledger.
//!
//! This crate is the heart of PCL. It provides:
//! - `Block` with a frozen canonical serialization and SHA-256 linkage
//! - `RecordValidator` (uniqueness and field checks) and `ChainBuilder`
//! - `InMemoryLedger`, which serializes submissions behind one lock
//! - `Verification`, a first-class audit of the full chain
//! - JSON document save/load

pub mod block;
pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod memory;
pub mod traits;
pub mod validation;
pub mod verification;

pub use block::{canonical_bytes, compute_digest, Block, BlockData};
pub use builder::ChainBuilder;
pub use config::LedgerConfig;
pub use error::LedgerError;
pub use memory::InMemoryLedger;
pub use pcl_crypto::Violation;
pub use traits::{LedgerReader, LedgerWriter};
pub use validation::RecordValidator;
pub use verification::Verification;
