use thiserror::Error;

use super::entity::{NewQurbanInstallmentBuilderError, NewQurbanSaverBuilderError};
use crate::{
    kas::error::CashLedgerError,
    primitives::{QurbanInstallmentId, QurbanSaverId},
};

#[derive(Error, Debug)]
pub enum QurbanError {
    #[error("QurbanError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("QurbanError - CashLedger: {0}")]
    CashLedger(#[from] CashLedgerError),
    #[error("QurbanError - InvalidSaver: {0}")]
    InvalidSaver(#[from] NewQurbanSaverBuilderError),
    #[error("QurbanError - InvalidInstallment: {0}")]
    InvalidInstallment(#[from] NewQurbanInstallmentBuilderError),
    #[error("QurbanError - SaverNotFound: saver '{0}' not found")]
    SaverNotFound(QurbanSaverId),
    #[error("QurbanError - InstallmentNotFound: installment '{0}' not found")]
    InstallmentNotFound(QurbanInstallmentId),
    #[error("QurbanError - HasInstallments: saver '{0}' still has {1} recorded installments")]
    HasInstallments(QurbanSaverId, i64),
}
