use axum::Extension;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use amanah_ledger::{
    donor::{error::DonorError, *},
    DonorId, DonorPaymentId,
};

use crate::{
    app::AmanahApp,
    server::{auth::AuthUser, extract::{Json, Path}, response::*},
};

pub async fn list(user: AuthUser, Extension(app): Extension<AmanahApp>) -> ApiResult<Vec<Donor>> {
    Ok(ApiResponse(app.ledger().donors().list(user.user_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateDonor {
    name: String,
    phone: Option<String>,
    address: Option<String>,
    monthly_pledge: Option<Decimal>,
}

#[tracing::instrument(name = "amanah_server.donors.create", skip(app))]
pub async fn create(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Json(body): Json<CreateDonor>,
) -> ApiResult<Donor> {
    let mut builder = NewDonor::builder();
    builder.name(body.name);
    if let Some(phone) = body.phone {
        builder.phone(phone);
    }
    if let Some(address) = body.address {
        builder.address(address);
    }
    if let Some(pledge) = body.monthly_pledge {
        builder.monthly_pledge(pledge);
    }
    let new_donor = builder.build().map_err(DonorError::from)?;
    Ok(ApiResponse(
        app.ledger().donors().create(user.user_id, new_donor).await?,
    ))
}

pub async fn find(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<DonorId>,
) -> ApiResult<Donor> {
    Ok(ApiResponse(
        app.ledger().donors().find_by_id(user.user_id, id).await?,
    ))
}

#[tracing::instrument(name = "amanah_server.donors.update", skip(app))]
pub async fn update(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<DonorId>,
    Json(body): Json<DonorUpdate>,
) -> ApiResult<Donor> {
    Ok(ApiResponse(
        app.ledger().donors().update(user.user_id, id, body).await?,
    ))
}

#[tracing::instrument(name = "amanah_server.donors.delete", skip(app))]
pub async fn remove(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<DonorId>,
) -> ApiResult<Donor> {
    Ok(ApiResponse(
        app.ledger().donors().delete(user.user_id, id).await?,
    ))
}

pub async fn list_payments(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<DonorId>,
) -> ApiResult<Vec<DonorPayment>> {
    let donors = app.ledger().donors();
    donors.find_by_id(user.user_id, id).await?;
    Ok(ApiResponse(
        donors.list_payments(user.user_id, Some(id)).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct RecordPayment {
    payment_date: NaiveDate,
    amount: Decimal,
    #[serde(default)]
    note: String,
}

#[tracing::instrument(name = "amanah_server.donors.record_payment", skip(app))]
pub async fn record_payment(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<DonorId>,
    Json(body): Json<RecordPayment>,
) -> ApiResult<DonorPayment> {
    let new_payment = NewDonorPayment::builder()
        .donor_id(id)
        .payment_date(body.payment_date)
        .amount(body.amount)
        .note(body.note)
        .recorded_by(user.recorder())
        .build()
        .map_err(DonorError::from)?;
    Ok(ApiResponse(
        app.ledger()
            .donors()
            .record_payment(user.user_id, new_payment)
            .await?,
    ))
}

#[tracing::instrument(name = "amanah_server.donors.delete_payment", skip(app))]
pub async fn delete_payment(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<DonorPaymentId>,
) -> ApiResult<DonorPayment> {
    Ok(ApiResponse(
        app.ledger()
            .donors()
            .delete_payment(user.user_id, id)
            .await?,
    ))
}
