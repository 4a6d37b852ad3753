use axum::Extension;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use amanah_ledger::{
    expense::{error::ExpenseError, *},
    ExpenseId,
};

use crate::{
    app::AmanahApp,
    server::{auth::AuthUser, extract::{Json, Path, Query}, response::*},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    status: Option<ExpenseStatus>,
}

pub async fn list(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Expense>> {
    Ok(ApiResponse(
        app.ledger()
            .expenses()
            .list(user.user_id, params.status)
            .await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct CreateExpense {
    expense_date: NaiveDate,
    category: String,
    #[serde(default)]
    description: String,
    amount: Decimal,
}

#[tracing::instrument(name = "amanah_server.expenses.create", skip(app))]
pub async fn create(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Json(body): Json<CreateExpense>,
) -> ApiResult<Expense> {
    let new_expense = NewExpense::builder()
        .expense_date(body.expense_date)
        .category(body.category)
        .description(body.description)
        .amount(body.amount)
        .requested_by(user.recorder())
        .build()
        .map_err(ExpenseError::from)?;
    Ok(ApiResponse(
        app.ledger()
            .expenses()
            .create(user.user_id, new_expense)
            .await?,
    ))
}

pub async fn find(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<ExpenseId>,
) -> ApiResult<Expense> {
    Ok(ApiResponse(
        app.ledger().expenses().find_by_id(user.user_id, id).await?,
    ))
}

#[tracing::instrument(name = "amanah_server.expenses.approve", skip(app))]
pub async fn approve(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<ExpenseId>,
) -> ApiResult<Expense> {
    Ok(ApiResponse(
        app.ledger()
            .expenses()
            .approve(user.user_id, id, user.recorder())
            .await?,
    ))
}

#[tracing::instrument(name = "amanah_server.expenses.reject", skip(app))]
pub async fn reject(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<ExpenseId>,
) -> ApiResult<Expense> {
    Ok(ApiResponse(
        app.ledger()
            .expenses()
            .reject(user.user_id, id, user.recorder())
            .await?,
    ))
}

#[tracing::instrument(name = "amanah_server.expenses.delete", skip(app))]
pub async fn remove(
    user: AuthUser,
    Extension(app): Extension<AmanahApp>,
    Path(id): Path<ExpenseId>,
) -> ApiResult<Expense> {
    Ok(ApiResponse(
        app.ledger().expenses().delete(user.user_id, id).await?,
    ))
}
