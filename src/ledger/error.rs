use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("cannot open fuel ledger at {}: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("SQLite error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("invalid vehicle name: {0:?}")]
    InvalidVehicleName(String),

    #[error("vehicle {0} already exists")]
    DuplicateVehicle(String),

    #[error("vehicle with id {0} not found")]
    UnknownVehicle(i64),

    #[error("invalid reading: {0}")]
    InvalidReading(String),

    #[error("fuel ledger is closed")]
    Closed,
}

impl LedgerError {
    /// Business-rule rejection: the store is unchanged and the caller should
    /// correct its input rather than treat the store as broken.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidVehicleName(_)
                | LedgerError::DuplicateVehicle(_)
                | LedgerError::UnknownVehicle(_)
                | LedgerError::InvalidReading(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_classified() {
        assert!(LedgerError::DuplicateVehicle("ABC-1234".into()).is_rejection());
        assert!(LedgerError::UnknownVehicle(7).is_rejection());
        assert!(!LedgerError::Closed.is_rejection());
        assert!(!LedgerError::Storage(rusqlite::Error::InvalidQuery).is_rejection());
    }

    #[test]
    fn test_storage_unavailable_mentions_path() {
        let err = LedgerError::StorageUnavailable {
            path: PathBuf::from("/nowhere/fuel.db"),
            source: rusqlite::Error::InvalidQuery.into(),
        };
        assert!(err.to_string().contains("/nowhere/fuel.db"));
    }
}
