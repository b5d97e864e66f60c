use pcl_crypto::{HashChainVerifier, Violation};
use serde::{Deserialize, Serialize};

use crate::block::Block;

/// Outcome of auditing a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Verification {
    Valid,
    /// First violation found, at the 1-based block position `index`.
    Invalid { index: u64, violation: Violation },
}

impl Verification {
    /// Audit a block sequence.
    pub fn of(blocks: &[Block]) -> Self {
        match HashChainVerifier::verify_chain(blocks) {
            Ok(()) => Self::Valid,
            Err(err) => Self::Invalid {
                index: err.index,
                violation: err.violation,
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}
