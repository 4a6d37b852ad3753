use axum::Extension;
use serde::Deserialize;

use amanah_ledger::{
    mustahiq::{error::MustahiqError, *},
    MustahiqId,
};

use crate::{
    app::AmanahApp,
    server::{auth::AuthUser, extract::{Json, Path, Query}, response::*},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    asnaf: Option<Asnaf>,
}

pub async fn list(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Mustahiq>> {
    Ok(ApiResponse(
        app.ledger()
            .beneficiaries()
            .list(user.user_id, params.asnaf)
            .await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct CreateMustahiq {
    name: String,
    asnaf: Asnaf,
    address: Option<String>,
    phone: Option<String>,
    #[serde(default)]
    notes: String,
}

#[tracing::instrument(name = "amanah_server.mustahiq.create", skip(app))]
pub async fn create(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Json(body): Json<CreateMustahiq>,
) -> ApiResult<Mustahiq> {
    let mut builder = NewMustahiq::builder();
    builder.name(body.name).asnaf(body.asnaf).notes(body.notes);
    if let Some(address) = body.address {
        builder.address(address);
    }
    if let Some(phone) = body.phone {
        builder.phone(phone);
    }
    let new_mustahiq = builder.build().map_err(MustahiqError::from)?;
    Ok(ApiResponse(
        app.ledger()
            .beneficiaries()
            .create(user.user_id, new_mustahiq)
            .await?,
    ))
}

pub async fn find(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<MustahiqId>,
) -> ApiResult<Mustahiq> {
    Ok(ApiResponse(
        app.ledger()
            .beneficiaries()
            .find_by_id(user.user_id, id)
            .await?,
    ))
}

#[tracing::instrument(name = "amanah_server.mustahiq.update", skip(app))]
pub async fn update(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<MustahiqId>,
    Json(body): Json<MustahiqUpdate>,
) -> ApiResult<Mustahiq> {
    Ok(ApiResponse(
        app.ledger()
            .beneficiaries()
            .update(user.user_id, id, body)
            .await?,
    ))
}

#[tracing::instrument(name = "amanah_server.mustahiq.delete", skip(app))]
pub async fn remove(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<MustahiqId>,
) -> ApiResult<Mustahiq> {
    Ok(ApiResponse(
        app.ledger().beneficiaries().delete(user.user_id, id).await?,
    ))
}
