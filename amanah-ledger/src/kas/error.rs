use thiserror::Error;

use super::entity::NewLedgerEntryBuilderError;
use crate::primitives::{LedgerEntryId, LedgerSource};

#[derive(Error, Debug)]
pub enum CashLedgerError {
    #[error("CashLedgerError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("CashLedgerError - Invalid: {0}")]
    Invalid(#[from] NewLedgerEntryBuilderError),
    #[error("CashLedgerError - NotFound: entry '{0}' not found")]
    NotFound(LedgerEntryId),
    #[error("CashLedgerError - OwnedBySource: entry '{0}' was posted by a {1} record and can only be removed through it")]
    OwnedBySource(LedgerEntryId, LedgerSource),
    #[error("CashLedgerError - Unavailable: balance could not be read after {attempts} attempts: {source}")]
    Unavailable {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },
}
