use chrono::NaiveDate;
use thiserror::Error;

use crate::kas::error::CashLedgerError;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("ReportError - CashLedger: {0}")]
    CashLedger(#[from] CashLedgerError),
    #[error("ReportError - InvalidRange: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },
}
