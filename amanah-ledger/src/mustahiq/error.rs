use thiserror::Error;

use super::entity::NewMustahiqBuilderError;
use crate::primitives::MustahiqId;

#[derive(Error, Debug)]
pub enum MustahiqError {
    #[error("MustahiqError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("MustahiqError - Invalid: {0}")]
    Invalid(#[from] NewMustahiqBuilderError),
    #[error("MustahiqError - InvalidUpdate: {0}")]
    InvalidUpdate(String),
    #[error("MustahiqError - NotFound: id '{0}' not found")]
    NotFound(MustahiqId),
}
