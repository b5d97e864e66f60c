//! Foundation types for the Product Chain Ledger (PCL).
//!
//! Every other PCL crate depends on `pcl-types`.
//!
//! # Key Types
//!
//! - [`Record`] — Ordered map of named scalar fields committed by a block
//! - [`FieldValue`] — Text, integer, or floating-point scalar
//! - [`Digest`] — SHA-256 output, hex on the wire

pub mod digest;
pub mod error;
pub mod record;

pub use digest::{Digest, GENESIS_SENTINEL};
pub use error::TypeError;
pub use record::{FieldValue, Record};
