use axum::Extension;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use amanah_ledger::{
    zakat::{error::ZakatError, *},
    ZakatFitrahId, ZakatMalId,
};

use crate::{
    app::AmanahApp,
    server::{auth::AuthUser, extract::{Json, Path, Query}, response::*},
};

#[derive(Debug, Deserialize)]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct RecordFitrah {
    payer_name: String,
    souls: Option<i32>,
    #[serde(flatten)]
    payment: FitrahPayment,
    payment_date: NaiveDate,
}

#[tracing::instrument(name = "amanah_server.zakat_fitrah.record", skip(app))]
pub async fn record_fitrah(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Json(body): Json<RecordFitrah>,
) -> ApiResult<ZakatFitrah> {
    let mut builder = NewZakatFitrah::builder();
    builder
        .payer_name(body.payer_name)
        .payment(body.payment)
        .payment_date(body.payment_date)
        .recorded_by(user.recorder());
    if let Some(souls) = body.souls {
        builder.souls(souls);
    }
    let new_payment = builder.build().map_err(ZakatError::from)?;
    let record = app
        .ledger()
        .zakat_fitrah()
        .record(user.user_id, new_payment)
        .await?;
    Ok(ApiResponse(record))
}

pub async fn list_fitrah(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Query(range): Query<DateRange>,
) -> ApiResult<Vec<ZakatFitrah>> {
    let records = app
        .ledger()
        .zakat_fitrah()
        .list(user.user_id, range.from, range.to)
        .await?;
    Ok(ApiResponse(records))
}

pub async fn fitrah_summary(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
) -> ApiResult<ZakatFitrahSummary> {
    Ok(ApiResponse(
        app.ledger().zakat_fitrah().summary(user.user_id).await?,
    ))
}

pub async fn find_fitrah(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<ZakatFitrahId>,
) -> ApiResult<ZakatFitrah> {
    Ok(ApiResponse(
        app.ledger().zakat_fitrah().find_by_id(user.user_id, id).await?,
    ))
}

#[tracing::instrument(name = "amanah_server.zakat_fitrah.delete", skip(app))]
pub async fn delete_fitrah(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<ZakatFitrahId>,
) -> ApiResult<ZakatFitrah> {
    Ok(ApiResponse(
        app.ledger().zakat_fitrah().delete(user.user_id, id).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct RecordMal {
    payer_name: String,
    wealth_kind: String,
    wealth_value: Decimal,
    zakat_amount: Option<Decimal>,
    payment_date: NaiveDate,
}

#[tracing::instrument(name = "amanah_server.zakat_mal.record", skip(app))]
pub async fn record_mal(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Json(body): Json<RecordMal>,
) -> ApiResult<ZakatMal> {
    let mut builder = NewZakatMal::builder();
    builder
        .payer_name(body.payer_name)
        .wealth_kind(body.wealth_kind)
        .wealth_value(body.wealth_value)
        .payment_date(body.payment_date)
        .recorded_by(user.recorder());
    if let Some(amount) = body.zakat_amount {
        builder.zakat_amount(amount);
    }
    let new_payment = builder.build().map_err(ZakatError::from)?;
    let record = app
        .ledger()
        .zakat_mal()
        .record(user.user_id, new_payment)
        .await?;
    Ok(ApiResponse(record))
}

pub async fn list_mal(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Query(range): Query<DateRange>,
) -> ApiResult<Vec<ZakatMal>> {
    let records = app
        .ledger()
        .zakat_mal()
        .list(user.user_id, range.from, range.to)
        .await?;
    Ok(ApiResponse(records))
}

pub async fn find_mal(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<ZakatMalId>,
) -> ApiResult<ZakatMal> {
    Ok(ApiResponse(
        app.ledger().zakat_mal().find_by_id(user.user_id, id).await?,
    ))
}

#[tracing::instrument(name = "amanah_server.zakat_mal.delete", skip(app))]
pub async fn delete_mal(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<ZakatMalId>,
) -> ApiResult<ZakatMal> {
    Ok(ApiResponse(
        app.ledger().zakat_mal().delete(user.user_id, id).await?,
    ))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn fitrah_body_carries_a_tagged_payment() {
        let body: RecordFitrah = serde_json::from_str(
            r#"{
                "payer_name": "Keluarga Hasan",
                "souls": 4,
                "payment_kind": "rice",
                "rice_kg": "10",
                "price_per_kg": "15000",
                "payment_date": "2024-04-08"
            }"#,
        )
        .unwrap();
        assert_eq!(body.payment.cash_equivalent(), dec!(150000));
        assert_eq!(body.souls, Some(4));
    }
}
