//! Cryptographic primitives for the Product Chain Ledger.
//!
//! Provides domain-separated SHA-256 hashing and hash chain verification.
//! All crypto operations wrap established libraries; no custom cryptography.

pub mod chain;
pub mod hasher;

pub use chain::{ChainError, ChainLink, HashChainVerifier, Violation};
pub use hasher::ContentHasher;
