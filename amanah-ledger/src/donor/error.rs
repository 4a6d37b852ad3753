use thiserror::Error;

use super::entity::{NewDonorBuilderError, NewDonorPaymentBuilderError};
use crate::{
    kas::error::CashLedgerError,
    primitives::{DonorId, DonorPaymentId},
};

#[derive(Error, Debug)]
pub enum DonorError {
    #[error("DonorError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("DonorError - CashLedger: {0}")]
    CashLedger(#[from] CashLedgerError),
    #[error("DonorError - InvalidDonor: {0}")]
    InvalidDonor(#[from] NewDonorBuilderError),
    #[error("DonorError - InvalidPayment: {0}")]
    InvalidPayment(#[from] NewDonorPaymentBuilderError),
    #[error("DonorError - InvalidUpdate: {0}")]
    InvalidUpdate(String),
    #[error("DonorError - NotFound: donor '{0}' not found")]
    NotFound(DonorId),
    #[error("DonorError - PaymentNotFound: payment '{0}' not found")]
    PaymentNotFound(DonorPaymentId),
    #[error("DonorError - HasPayments: donor '{0}' still has {1} recorded payments")]
    HasPayments(DonorId, i64),
}
