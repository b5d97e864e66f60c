use pcl_types::Digest;
use sha2::{Digest as _, Sha256};

/// Domain-separated SHA-256 content hasher.
///
/// Each hasher carries a domain tag (e.g., `"pcl-block-v1"`) that is
/// prepended, followed by `:`, to every hash computation. Changing the tag
/// changes every digest.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for block digests.
    pub const BLOCK: Self = Self {
        domain: "pcl-block-v1",
    };

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        Digest::from_hash(hasher.finalize().into())
    }

    /// Verify that data produces the expected digest.
    pub fn verify(&self, data: &[u8], expected: &Digest) -> bool {
        self.hash(data) == *expected
    }
}
