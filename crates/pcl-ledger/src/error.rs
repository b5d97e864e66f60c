use pcl_crypto::{ChainError, Violation};

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("a record with key {key:?} already exists")]
    DuplicateKey { key: String },

    #[error("integrity violation at block {index}: {violation}")]
    IntegrityViolation { index: u64, violation: Violation },

    #[error("ledger lock poisoned")]
    LockPoisoned,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),
}

impl LedgerError {
    pub(crate) fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the caller can correct its input and resubmit.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidField { .. } | Self::DuplicateKey { .. })
    }
}

impl From<ChainError> for LedgerError {
    fn from(err: ChainError) -> Self {
        Self::IntegrityViolation {
            index: err.index,
            violation: err.violation,
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
