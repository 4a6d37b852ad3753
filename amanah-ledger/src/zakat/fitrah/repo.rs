use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::entity::*;
use crate::{op::DbOp, primitives::*, zakat::error::ZakatError};

const COLUMNS: &str = "id, owner_id, payer_name, souls, payment_kind, amount, rice_kg, \
     price_per_kg, cash_equivalent, payment_date, recorded_by, kas_harian_id, created_at";

#[derive(Debug, Clone)]
pub(super) struct ZakatFitrahRepo {
    pool: PgPool,
}

impl ZakatFitrahRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn insert(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        new_payment: &NewZakatFitrah,
    ) -> Result<ZakatFitrah, ZakatError> {
        let (amount, rice_kg, price_per_kg) = match new_payment.payment {
            FitrahPayment::Cash { amount } => (Some(amount), None, None),
            FitrahPayment::Rice {
                rice_kg,
                price_per_kg,
            } => (None, Some(rice_kg), Some(price_per_kg)),
        };
        let record = sqlx::query_as::<_, ZakatFitrah>(&format!(
            r#"INSERT INTO zakat_fitrah
            (owner_id, payer_name, souls, payment_kind, amount, rice_kg, price_per_kg,
             cash_equivalent, payment_date, recorded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {COLUMNS}"#
        ))
        .bind(owner)
        .bind(&new_payment.payer_name)
        .bind(new_payment.souls)
        .bind(new_payment.payment.kind())
        .bind(amount)
        .bind(rice_kg)
        .bind(price_per_kg)
        .bind(new_payment.payment.cash_equivalent())
        .bind(new_payment.payment_date)
        .bind(&new_payment.recorded_by)
        .fetch_one(op.conn())
        .await?;
        Ok(record)
    }

    pub async fn link_entry(
        &self,
        op: &mut DbOp<'_>,
        id: ZakatFitrahId,
        entry_id: LedgerEntryId,
    ) -> Result<ZakatFitrah, ZakatError> {
        let record = sqlx::query_as::<_, ZakatFitrah>(&format!(
            "UPDATE zakat_fitrah SET kas_harian_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
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
        id: ZakatFitrahId,
    ) -> Result<Option<ZakatFitrah>, ZakatError> {
        let record = sqlx::query_as::<_, ZakatFitrah>(&format!(
            "DELETE FROM zakat_fitrah WHERE owner_id = $1 AND id = $2 RETURNING {COLUMNS}"
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
        id: ZakatFitrahId,
    ) -> Result<Option<ZakatFitrah>, ZakatError> {
        let record = sqlx::query_as::<_, ZakatFitrah>(&format!(
            "SELECT {COLUMNS} FROM zakat_fitrah WHERE owner_id = $1 AND id = $2"
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
    ) -> Result<Vec<ZakatFitrah>, ZakatError> {
        let records = sqlx::query_as::<_, ZakatFitrah>(&format!(
            r#"SELECT {COLUMNS} FROM zakat_fitrah
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

    pub async fn summary(&self, owner: OwnerId) -> Result<ZakatFitrahSummary, ZakatError> {
        let (payers, souls, total_cash, total_rice_kg, total_cash_equivalent): (
            i64,
            i64,
            Decimal,
            Decimal,
            Decimal,
        ) = sqlx::query_as(
            r#"SELECT
              COUNT(*),
              COALESCE(SUM(souls), 0)::BIGINT,
              COALESCE(SUM(amount), 0),
              COALESCE(SUM(rice_kg), 0),
              COALESCE(SUM(cash_equivalent), 0)
            FROM zakat_fitrah
            WHERE owner_id = $1"#,
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(ZakatFitrahSummary {
            payers,
            souls,
            total_cash,
            total_rice_kg,
            total_cash_equivalent,
        })
    }
}
