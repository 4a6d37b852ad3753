use thiserror::Error;

use super::{fitrah::NewZakatFitrahBuilderError, mal::NewZakatMalBuilderError};
use crate::{
    kas::error::CashLedgerError,
    primitives::{ZakatFitrahId, ZakatMalId},
};

#[derive(Error, Debug)]
pub enum ZakatError {
    #[error("ZakatError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("ZakatError - CashLedger: {0}")]
    CashLedger(#[from] CashLedgerError),
    #[error("ZakatError - InvalidFitrah: {0}")]
    InvalidFitrah(#[from] NewZakatFitrahBuilderError),
    #[error("ZakatError - InvalidMal: {0}")]
    InvalidMal(#[from] NewZakatMalBuilderError),
    #[error("ZakatError - FitrahNotFound: id '{0}' not found")]
    FitrahNotFound(ZakatFitrahId),
    #[error("ZakatError - MalNotFound: id '{0}' not found")]
    MalNotFound(ZakatMalId),
}
