use axum::Extension;
use chrono::NaiveDate;
use serde::Deserialize;

use amanah_ledger::report::CashReport;

use crate::{
    app::AmanahApp,
    server::{auth::AuthUser, extract::{Query}, response::*},
};

#[derive(Debug, Deserialize)]
pub struct ReportRange {
    from: NaiveDate,
    to: NaiveDate,
}

#[tracing::instrument(name = "amanah_server.reports.cash", skip(app))]
pub async fn cash_report(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Query(range): Query<ReportRange>,
) -> ApiResult<CashReport> {
    Ok(ApiResponse(
        app.ledger()
            .reports()
            .cash_report(user.user_id, range.from, range.to)
            .await?,
    ))
}
