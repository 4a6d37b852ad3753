//! JSON envelopes. Successful responses are `{ "data": ... }`, failures are
//! `{ "error": "..." }` with a status derived from the domain error.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use amanah_ledger::{
    donor::error::DonorError, expense::error::ExpenseError, kas::error::CashLedgerError,
    mustahiq::error::MustahiqError, qurban::error::QurbanError, report::error::ReportError,
    zakat::error::ZakatError,
};

pub struct ApiResponse<T>(pub T);

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(json!({ "data": self.0 })).into_response()
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Logs `detail` and hides it from the caller.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<CashLedgerError> for ApiError {
    fn from(err: CashLedgerError) -> Self {
        use CashLedgerError::*;
        match err {
            Invalid(_) => ApiError::bad_request(err.to_string()),
            NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, err.to_string()),
            OwnedBySource(..) => ApiError::new(StatusCode::CONFLICT, err.to_string()),
            Unavailable { .. } => {
                tracing::error!(error = %err, "ledger unavailable");
                ApiError::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "ledger temporarily unavailable",
                )
            }
            Sqlx(_) => ApiError::internal(err),
        }
    }
}

impl From<ZakatError> for ApiError {
    fn from(err: ZakatError) -> Self {
        use ZakatError::*;
        match err {
            CashLedger(e) => e.into(),
            InvalidFitrah(_) | InvalidMal(_) => ApiError::bad_request(err.to_string()),
            FitrahNotFound(_) | MalNotFound(_) => {
                ApiError::new(StatusCode::NOT_FOUND, err.to_string())
            }
            Sqlx(_) => ApiError::internal(err),
        }
    }
}

impl From<ExpenseError> for ApiError {
    fn from(err: ExpenseError) -> Self {
        use ExpenseError::*;
        match err {
            CashLedger(e) => e.into(),
            Invalid(_) => ApiError::bad_request(err.to_string()),
            NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, err.to_string()),
            InvalidTransition { .. } => ApiError::new(StatusCode::CONFLICT, err.to_string()),
            Sqlx(_) => ApiError::internal(err),
        }
    }
}

impl From<DonorError> for ApiError {
    fn from(err: DonorError) -> Self {
        use DonorError::*;
        match err {
            CashLedger(e) => e.into(),
            InvalidDonor(_) | InvalidPayment(_) | InvalidUpdate(_) => {
                ApiError::bad_request(err.to_string())
            }
            NotFound(_) | PaymentNotFound(_) => {
                ApiError::new(StatusCode::NOT_FOUND, err.to_string())
            }
            HasPayments(..) => ApiError::new(StatusCode::CONFLICT, err.to_string()),
            Sqlx(_) => ApiError::internal(err),
        }
    }
}

impl From<QurbanError> for ApiError {
    fn from(err: QurbanError) -> Self {
        use QurbanError::*;
        match err {
            CashLedger(e) => e.into(),
            InvalidSaver(_) | InvalidInstallment(_) => ApiError::bad_request(err.to_string()),
            SaverNotFound(_) | InstallmentNotFound(_) => {
                ApiError::new(StatusCode::NOT_FOUND, err.to_string())
            }
            HasInstallments(..) => ApiError::new(StatusCode::CONFLICT, err.to_string()),
            Sqlx(_) => ApiError::internal(err),
        }
    }
}

impl From<MustahiqError> for ApiError {
    fn from(err: MustahiqError) -> Self {
        use MustahiqError::*;
        match err {
            Invalid(_) | InvalidUpdate(_) => ApiError::bad_request(err.to_string()),
            NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, err.to_string()),
            Sqlx(_) => ApiError::internal(err),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::CashLedger(e) => e.into(),
            ReportError::InvalidRange { .. } => ApiError::bad_request(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use amanah_ledger::{
        expense::ExpenseStatus, kas::NewLedgerEntry, ExpenseId, LedgerEntryId, LedgerSource,
    };

    use super::*;

    #[test]
    fn validation_failures_are_bad_requests() {
        let err = NewLedgerEntry::builder().build().unwrap_err();
        let api: ApiError = CashLedgerError::from(err).into();
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn nested_ledger_errors_keep_their_status() {
        let err = ZakatError::CashLedger(CashLedgerError::NotFound(LedgerEntryId::from(3)));
        assert_eq!(ApiError::from(err).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn state_conflicts_map_to_409() {
        let err = ExpenseError::InvalidTransition {
            id: ExpenseId::from(1),
            from: ExpenseStatus::Approved,
            to: ExpenseStatus::Rejected,
        };
        assert_eq!(ApiError::from(err).status(), StatusCode::CONFLICT);
        let err = CashLedgerError::OwnedBySource(LedgerEntryId::from(9), LedgerSource::Expense);
        assert_eq!(ApiError::from(err).status(), StatusCode::CONFLICT);
    }

    #[test]
    fn database_failures_hide_details() {
        let api = ApiError::from(MustahiqError::Sqlx(sqlx::Error::RowNotFound));
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message(), "internal server error");
    }

    #[test]
    fn exhausted_retries_are_unavailable() {
        let err = CashLedgerError::Unavailable {
            attempts: 3,
            source: sqlx::Error::PoolTimedOut,
        };
        assert_eq!(
            ApiError::from(err).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
