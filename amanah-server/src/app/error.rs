use thiserror::Error;

use amanah_ledger::{error::LedgerError, AmanahLedgerConfigBuilderError};

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("ApplicationError - Ledger: {0}")]
    Ledger(#[from] LedgerError),
    #[error("ApplicationError - LedgerConfig: {0}")]
    LedgerConfig(#[from] AmanahLedgerConfigBuilderError),
}
