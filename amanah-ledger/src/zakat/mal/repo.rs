use chrono::NaiveDate;
use sqlx::PgPool;

use super::entity::*;
use crate::{op::DbOp, primitives::*, zakat::error::ZakatError};

const COLUMNS: &str = "id, owner_id, payer_name, wealth_kind, wealth_value, zakat_amount, \
     payment_date, recorded_by, kas_harian_id, created_at";

#[derive(Debug, Clone)]
pub(super) struct ZakatMalRepo {
    pool: PgPool,
}

impl ZakatMalRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn insert(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        new_payment: &NewZakatMal,
    ) -> Result<ZakatMal, ZakatError> {
        let record = sqlx::query_as::<_, ZakatMal>(&format!(
            r#"INSERT INTO zakat_mal
            (owner_id, payer_name, wealth_kind, wealth_value, zakat_amount, payment_date, recorded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}"#
        ))
        .bind(owner)
        .bind(&new_payment.payer_name)
        .bind(&new_payment.wealth_kind)
        .bind(new_payment.wealth_value)
        .bind(new_payment.zakat_due())
        .bind(new_payment.payment_date)
        .bind(&new_payment.recorded_by)
        .fetch_one(op.conn())
        .await?;
        Ok(record)
    }

    pub async fn link_entry(
        &self,
        op: &mut DbOp<'_>,
        id: ZakatMalId,
        entry_id: LedgerEntryId,
    ) -> Result<ZakatMal, ZakatError> {
        let record = sqlx::query_as::<_, ZakatMal>(&format!(
            "UPDATE zakat_mal SET kas_harian_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(entry_id)
        .fetch_one(op.conn())
        .await?;
        Ok(record)
    }

    pub async fn delete(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        id: ZakatMalId,
    ) -> Result<Option<ZakatMal>, ZakatError> {
        let record = sqlx::query_as::<_, ZakatMal>(&format!(
            "DELETE FROM zakat_mal WHERE owner_id = $1 AND id = $2 RETURNING {COLUMNS}"
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(op.conn())
        .await?;
        Ok(record)
    }

    pub async fn find_by_id(
        &self,
        owner: OwnerId,
        id: ZakatMalId,
    ) -> Result<Option<ZakatMal>, ZakatError> {
        let record = sqlx::query_as::<_, ZakatMal>(&format!(
            "SELECT {COLUMNS} FROM zakat_mal WHERE owner_id = $1 AND id = $2"
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    pub async fn list(
        &self,
        owner: OwnerId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<ZakatMal>, ZakatError> {
        let records = sqlx::query_as::<_, ZakatMal>(&format!(
            r#"SELECT {COLUMNS} FROM zakat_mal
            WHERE owner_id = $1
              AND ($2::date IS NULL OR payment_date >= $2)
              AND ($3::date IS NULL OR payment_date <= $3)
            ORDER BY payment_date DESC, id DESC"#
        ))
        .bind(owner)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
