use std::fmt;

use pcl_types::Digest;
use serde::{Deserialize, Serialize};

use crate::hasher::ContentHasher;

/// Trait for entries that participate in a hash chain.
pub trait ChainLink {
    /// Stored 1-based position of the entry.
    fn index(&self) -> u64;
    /// The entry's own stored digest.
    fn digest(&self) -> Digest;
    /// The stored digest of the preceding entry (`None` for genesis).
    fn previous_digest(&self) -> Option<Digest>;
    /// Canonical bytes the digest is computed over.
    fn payload_bytes(&self) -> Vec<u8>;
}

/// Kind of integrity violation found while walking a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Violation {
    /// Stored digest differs from the digest recomputed from the payload.
    DigestMismatch,
    /// Previous digest does not match the prior entry's digest.
    LinkBroken,
    /// Stored index is not the entry's 1-based position.
    IndexGap,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DigestMismatch => write!(f, "DigestMismatch"),
            Self::LinkBroken => write!(f, "LinkBroken"),
            Self::IndexGap => write!(f, "IndexGap"),
        }
    }
}

/// First violation found by [`HashChainVerifier::verify_chain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{violation} at block {index}")]
pub struct ChainError {
    /// 1-based position of the offending entry.
    pub index: u64,
    pub violation: Violation,
}

/// Hash chain integrity verifier.
///
/// Walks the chain front to back holding only the previous entry, so memory
/// use does not grow with chain length. Per entry the checks run in a fixed
/// order and the first failure wins:
///
/// 1. stored index equals the 1-based position
/// 2. previous digest equals the prior entry's digest (genesis: `None`)
/// 3. stored digest equals the digest recomputed from the payload
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Verify a chain of entries.
    pub fn verify_chain<T: ChainLink>(entries: &[T]) -> Result<(), ChainError> {
        let mut previous: Option<&T> = None;

        for (offset, entry) in entries.iter().enumerate() {
            let position = offset as u64 + 1;

            if entry.index() != position {
                return Err(ChainError {
                    index: position,
                    violation: Violation::IndexGap,
                });
            }

            let expected_prev = previous.map(|p| p.digest());
            if entry.previous_digest() != expected_prev {
                return Err(ChainError {
                    index: position,
                    violation: Violation::LinkBroken,
                });
            }

            if !Self::verify_entry(entry) {
                return Err(ChainError {
                    index: position,
                    violation: Violation::DigestMismatch,
                });
            }

            previous = Some(entry);
        }

        Ok(())
    }

    /// Recompute one entry's digest and compare it with the stored one.
    pub fn verify_entry(entry: &impl ChainLink) -> bool {
        ContentHasher::BLOCK.verify(&entry.payload_bytes(), &entry.digest())
    }

    /// Compute the digest for a payload.
    pub fn compute_digest(payload: &[u8]) -> Digest {
        ContentHasher::BLOCK.hash(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test entry whose payload embeds its link, like a real block.
    struct TestEntry {
        index: u64,
        digest: Digest,
        prev: Option<Digest>,
        body: Vec<u8>,
    }

    impl ChainLink for TestEntry {
        fn index(&self) -> u64 {
            self.index
        }
        fn digest(&self) -> Digest {
            self.digest
        }
        fn previous_digest(&self) -> Option<Digest> {
            self.prev
        }
        fn payload_bytes(&self) -> Vec<u8> {
            let mut payload = self.body.clone();
            if let Some(prev) = self.prev {
                payload.extend_from_slice(prev.as_bytes());
            }
            payload
        }
    }

    fn build_chain(count: usize) -> Vec<TestEntry> {
        let mut chain: Vec<TestEntry> = Vec::new();

        for i in 0..count {
            let mut entry = TestEntry {
                index: i as u64 + 1,
                digest: Digest::from_hash([0; 32]),
                prev: chain.last().map(|e| e.digest),
                body: format!("entry-{i}").into_bytes(),
            };
            entry.digest = HashChainVerifier::compute_digest(&entry.payload_bytes());
            chain.push(entry);
        }

        chain
    }

    #[test]
    fn empty_chain_is_valid() {
        let chain: Vec<TestEntry> = vec![];
        assert!(HashChainVerifier::verify_chain(&chain).is_ok());
    }

    #[test]
    fn multi_entry_chain_is_valid() {
        let chain = build_chain(10);
        assert!(HashChainVerifier::verify_chain(&chain).is_ok());
    }

    #[test]
    fn genesis_with_previous_digest_is_broken_link() {
        let mut chain = build_chain(1);
        chain[0].prev = Some(Digest::from_hash([1; 32]));
        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        assert_eq!(
            err,
            ChainError {
                index: 1,
                violation: Violation::LinkBroken
            }
        );
    }

    #[test]
    fn broken_link_detected() {
        let mut chain = build_chain(3);
        chain[2].prev = Some(Digest::from_hash([99; 32]));
        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        assert_eq!(err.index, 3);
        assert_eq!(err.violation, Violation::LinkBroken);
    }

    #[test]
    fn tampered_payload_detected() {
        let mut chain = build_chain(3);
        chain[1].body = b"tampered".to_vec();
        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(err.violation, Violation::DigestMismatch);
    }

    #[test]
    fn renumbered_index_detected() {
        let mut chain = build_chain(3);
        chain[1].index = 5;
        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(err.violation, Violation::IndexGap);
    }

    #[test]
    fn removed_entry_reports_index_gap_first() {
        let mut chain = build_chain(4);
        chain.remove(1);
        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(err.violation, Violation::IndexGap);
    }

    #[test]
    fn error_display() {
        let err = ChainError {
            index: 4,
            violation: Violation::DigestMismatch,
        };
        assert_eq!(err.to_string(), "DigestMismatch at block 4");
    }
}
