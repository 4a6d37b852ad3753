mod donor;
mod expense;
mod kas;
mod mustahiq;
mod qurban;
mod report;
mod zakat;

use axum::{
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};

use super::{auth::AuthUser, response::*};

pub(super) fn api_routes() -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/me", get(me))
        .route("/api/kas", get(kas::list).post(kas::create))
        .route("/api/kas/saldo", get(kas::summary))
        .route("/api/kas/audit", get(kas::audit))
        .route("/api/kas/recompute", post(kas::recompute))
        .route("/api/kas/:id", get(kas::find).delete(kas::remove))
        .route("/api/zakat-fitrah", get(zakat::list_fitrah).post(zakat::record_fitrah))
        .route("/api/zakat-fitrah/summary", get(zakat::fitrah_summary))
        .route(
            "/api/zakat-fitrah/:id",
            get(zakat::find_fitrah).delete(zakat::delete_fitrah),
        )
        .route("/api/zakat-mal", get(zakat::list_mal).post(zakat::record_mal))
        .route(
            "/api/zakat-mal/:id",
            get(zakat::find_mal).delete(zakat::delete_mal),
        )
        .route("/api/pengeluaran", get(expense::list).post(expense::create))
        .route(
            "/api/pengeluaran/:id",
            get(expense::find).delete(expense::remove),
        )
        .route("/api/pengeluaran/:id/approve", post(expense::approve))
        .route("/api/pengeluaran/:id/reject", post(expense::reject))
        .route("/api/donatur", get(donor::list).post(donor::create))
        .route(
            "/api/donatur/:id",
            get(donor::find).put(donor::update).delete(donor::remove),
        )
        .route(
            "/api/donatur/:id/pembayaran",
            get(donor::list_payments).post(donor::record_payment),
        )
        .route("/api/pembayaran-donatur/:id", delete(donor::delete_payment))
        .route("/api/qurban", get(qurban::list).post(qurban::create))
        .route("/api/qurban/:id", get(qurban::find).delete(qurban::remove))
        .route(
            "/api/qurban/:id/cicilan",
            get(qurban::list_installments).post(qurban::record_installment),
        )
        .route("/api/cicilan-qurban/:id", delete(qurban::delete_installment))
        .route("/api/mustahiq", get(mustahiq::list).post(mustahiq::create))
        .route(
            "/api/mustahiq/:id",
            get(mustahiq::find)
                .put(mustahiq::update)
                .delete(mustahiq::remove),
        )
        .route("/api/laporan/kas", get(report::cash_report))
}

async fn health() -> ApiResponse<Value> {
    ApiResponse(json!({ "status": "ok" }))
}

async fn me(user: AuthUser) -> ApiResponse<AuthUser> {
    ApiResponse(user)
}
