use thiserror::Error;

use crate::domain::LedgerError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl AppError {
    /// The underlying ledger rule that rejected the operation.
    pub fn ledger_error(&self) -> &LedgerError {
        match self {
            AppError::Ledger(e) => e,
        }
    }
}
