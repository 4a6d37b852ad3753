use axum::Extension;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use amanah_ledger::{
    kas::{error::CashLedgerError, *},
    query::PaginatedQueryArgs,
    CashDirection, LedgerEntryId,
};

use crate::{
    app::AmanahApp,
    server::{auth::AuthUser, extract::{Json, Path, Query}, response::*},
};

const MAX_PAGE_SIZE: usize = 500;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    direction: Option<CashDirection>,
    first: Option<usize>,
    after: Option<String>,
}

#[derive(Serialize)]
pub struct EntryPage {
    entries: Vec<LedgerEntry>,
    has_next_page: bool,
    end_cursor: Option<String>,
}

fn encode_cursor(cursor: &LedgerEntryByDateCursor) -> Result<String, ApiError> {
    use base64::{engine::general_purpose, Engine as _};
    let json = serde_json::to_string(cursor).map_err(ApiError::internal)?;
    Ok(general_purpose::URL_SAFE_NO_PAD.encode(json.as_bytes()))
}

fn decode_cursor(s: &str) -> Result<LedgerEntryByDateCursor, ApiError> {
    use base64::{engine::general_purpose, Engine as _};
    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(s.as_bytes())
        .map_err(|_| ApiError::bad_request("malformed cursor"))?;
    serde_json::from_slice(&bytes).map_err(|_| ApiError::bad_request("malformed cursor"))
}

#[tracing::instrument(name = "amanah_server.kas.list", skip(app))]
pub async fn list(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Query(params): Query<ListParams>,
) -> ApiResult<EntryPage> {
    let after = params.after.as_deref().map(decode_cursor).transpose()?;
    let mut args = PaginatedQueryArgs::<LedgerEntryByDateCursor>::default();
    args.after = after;
    if let Some(first) = params.first {
        args.first = first.clamp(1, MAX_PAGE_SIZE);
    }
    let filter = LedgerEntryFilter {
        from: params.from,
        to: params.to,
        direction: params.direction,
    };
    let page = app.ledger().cash().list(user.user_id, filter, args).await?;
    Ok(ApiResponse(EntryPage {
        entries: page.entities,
        has_next_page: page.has_next_page,
        end_cursor: page.end_cursor.as_ref().map(encode_cursor).transpose()?,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateEntry {
    entry_date: NaiveDate,
    direction: CashDirection,
    category: String,
    #[serde(default)]
    description: String,
    amount: Decimal,
}

#[tracing::instrument(name = "amanah_server.kas.create", skip(app))]
pub async fn create(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Json(body): Json<CreateEntry>,
) -> ApiResult<LedgerEntry> {
    let new_entry = NewLedgerEntry::builder()
        .entry_date(body.entry_date)
        .direction(body.direction)
        .category(body.category)
        .description(body.description)
        .amount(body.amount)
        .recorded_by(user.recorder())
        .build()
        .map_err(CashLedgerError::from)?;
    let entry = app.ledger().cash().append(user.user_id, new_entry).await?;
    Ok(ApiResponse(entry))
}

pub async fn find(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<LedgerEntryId>,
) -> ApiResult<LedgerEntry> {
    Ok(ApiResponse(
        app.ledger().cash().find_by_id(user.user_id, id).await?,
    ))
}

#[tracing::instrument(name = "amanah_server.kas.delete", skip(app))]
pub async fn remove(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<LedgerEntryId>,
) -> ApiResult<LedgerEntry> {
    Ok(ApiResponse(app.ledger().cash().delete(user.user_id, id).await?))
}

pub async fn summary(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
) -> ApiResult<CashSummary> {
    Ok(ApiResponse(app.ledger().cash().summary(user.user_id).await?))
}

pub async fn audit(user: AuthUser, Extension(app): Extension<AmanahApp>) -> ApiResult<ChainAudit> {
    Ok(ApiResponse(app.ledger().cash().audit(user.user_id).await?))
}

#[derive(Serialize)]
pub struct RecomputeResult {
    updated: u64,
}

#[tracing::instrument(name = "amanah_server.kas.recompute", skip(app))]
pub async fn recompute(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
) -> ApiResult<RecomputeResult> {
    let updated = app.ledger().cash().recompute(user.user_id).await?;
    Ok(ApiResponse(RecomputeResult { updated }))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn cursor_survives_the_query_string() {
        let cursor = LedgerEntryByDateCursor {
            entry_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            created_at: Utc::now(),
            id: LedgerEntryId::from(42),
        };
        let encoded = encode_cursor(&cursor).unwrap();
        assert!(!encoded.contains('='));
        let decoded = decode_cursor(&encoded).unwrap();
        assert_eq!(decoded.id, cursor.id);
        assert_eq!(decoded.created_at, cursor.created_at);
    }

    #[test]
    fn garbage_cursor_is_a_bad_request() {
        let err = decode_cursor("%%%").unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
