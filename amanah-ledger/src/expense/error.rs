use thiserror::Error;

use super::entity::{ExpenseStatus, NewExpenseBuilderError};
use crate::{kas::error::CashLedgerError, primitives::ExpenseId};

#[derive(Error, Debug)]
pub enum ExpenseError {
    #[error("ExpenseError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("ExpenseError - CashLedger: {0}")]
    CashLedger(#[from] CashLedgerError),
    #[error("ExpenseError - Invalid: {0}")]
    Invalid(#[from] NewExpenseBuilderError),
    #[error("ExpenseError - NotFound: id '{0}' not found")]
    NotFound(ExpenseId),
    #[error("ExpenseError - InvalidTransition: expense '{id}' is {from} and cannot become {to}")]
    InvalidTransition {
        id: ExpenseId,
        from: ExpenseStatus,
        to: ExpenseStatus,
    },
}
