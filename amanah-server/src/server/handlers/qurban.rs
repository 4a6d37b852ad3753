use axum::Extension;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use amanah_ledger::{
    qurban::{error::QurbanError, *},
    QurbanInstallmentId, QurbanSaverId,
};

use crate::{
    app::AmanahApp,
    server::{auth::AuthUser, extract::{Json, Path}, response::*},
};

pub async fn list(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
) -> ApiResult<Vec<QurbanSaver>> {
    Ok(ApiResponse(
        app.ledger().qurban().list_savers(user.user_id).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct CreateSaver {
    name: String,
    phone: Option<String>,
    animal_kind: String,
    target_amount: Decimal,
}

#[tracing::instrument(name = "amanah_server.qurban.create_saver", skip(app))]
pub async fn create(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Json(body): Json<CreateSaver>,
) -> ApiResult<QurbanSaver> {
    let mut builder = NewQurbanSaver::builder();
    builder
        .name(body.name)
        .animal_kind(body.animal_kind)
        .target_amount(body.target_amount);
    if let Some(phone) = body.phone {
        builder.phone(phone);
    }
    let new_saver = builder.build().map_err(QurbanError::from)?;
    Ok(ApiResponse(
        app.ledger()
            .qurban()
            .create_saver(user.user_id, new_saver)
            .await?,
    ))
}

#[derive(Serialize)]
pub struct SaverDetail {
    #[serde(flatten)]
    saver: QurbanSaver,
    progress: SavingsProgress,
}

pub async fn find(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<QurbanSaverId>,
) -> ApiResult<SaverDetail> {
    let qurban = app.ledger().qurban();
    let saver = qurban.find_saver(user.user_id, id).await?;
    let progress = qurban.progress(user.user_id, id).await?;
    Ok(ApiResponse(SaverDetail { saver, progress }))
}

#[tracing::instrument(name = "amanah_server.qurban.delete_saver", skip(app))]
pub async fn remove(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<QurbanSaverId>,
) -> ApiResult<QurbanSaver> {
    Ok(ApiResponse(
        app.ledger().qurban().delete_saver(user.user_id, id).await?,
    ))
}

pub async fn list_installments(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<QurbanSaverId>,
) -> ApiResult<Vec<QurbanInstallment>> {
    let qurban = app.ledger().qurban();
    qurban.find_saver(user.user_id, id).await?;
    Ok(ApiResponse(
        qurban.list_installments(user.user_id, id).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct RecordInstallment {
    payment_date: NaiveDate,
    amount: Decimal,
}

#[tracing::instrument(name = "amanah_server.qurban.record_installment", skip(app))]
pub async fn record_installment(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<QurbanSaverId>,
    Json(body): Json<RecordInstallment>,
) -> ApiResult<QurbanInstallment> {
    let new_installment = NewQurbanInstallment::builder()
        .saver_id(id)
        .payment_date(body.payment_date)
        .amount(body.amount)
        .recorded_by(user.recorder())
        .build()
        .map_err(QurbanError::from)?;
    Ok(ApiResponse(
        app.ledger()
            .qurban()
            .record_installment(user.user_id, new_installment)
            .await?,
    ))
}

#[tracing::instrument(name = "amanah_server.qurban.delete_installment", skip(app))]
pub async fn delete_installment(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<QurbanInstallmentId>,
) -> ApiResult<QurbanInstallment> {
    Ok(ApiResponse(
        app.ledger()
            .qurban()
            .delete_installment(user.user_id, id)
            .await?,
    ))
}
