use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};

use super::{entity::*, error::QurbanError};
use crate::{
    op::{DbOp, RowLock},
    primitives::*,
};

const SAVER_COLUMNS: &str = "id, owner_id, name, phone, animal_kind, target_amount, created_at";
const INSTALLMENT_COLUMNS: &str =
    "id, owner_id, saver_id, payment_date, amount, recorded_by, kas_harian_id, created_at";

#[derive(Debug, Clone)]
pub(super) struct QurbanRepo {
    pool: PgPool,
}

impl QurbanRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn insert_saver(
        &self,
        owner: OwnerId,
        new_saver: &NewQurbanSaver,
    ) -> Result<QurbanSaver, QurbanError> {
        let saver = sqlx::query_as::<_, QurbanSaver>(&format!(
            r#"INSERT INTO tabungan_qurban (owner_id, name, phone, animal_kind, target_amount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SAVER_COLUMNS}"#
        ))
        .bind(owner)
        .bind(&new_saver.name)
        .bind(&new_saver.phone)
        .bind(&new_saver.animal_kind)
        .bind(new_saver.target_amount)
        .fetch_one(&self.pool)
        .await?;
        Ok(saver)
    }

    pub async fn find_saver(
        &self,
        executor: impl PgExecutor<'_>,
        owner: OwnerId,
        id: QurbanSaverId,
    ) -> Result<Option<QurbanSaver>, QurbanError> {
        let saver = sqlx::query_as::<_, QurbanSaver>(&format!(
            "SELECT {SAVER_COLUMNS} FROM tabungan_qurban WHERE owner_id = $1 AND id = $2"
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(saver)
    }

    /// Loads the saver and holds `lock` on its row until `op` ends.
    pub async fn find_saver_locked(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        id: QurbanSaverId,
        lock: RowLock,
    ) -> Result<Option<QurbanSaver>, QurbanError> {
        let saver = sqlx::query_as::<_, QurbanSaver>(&format!(
            "SELECT {SAVER_COLUMNS} FROM tabungan_qurban WHERE owner_id = $1 AND id = $2 {}",
            lock.clause()
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(op.conn())
        .await?;
        Ok(saver)
    }

    pub async fn list_savers(&self, owner: OwnerId) -> Result<Vec<QurbanSaver>, QurbanError> {
        let savers = sqlx::query_as::<_, QurbanSaver>(&format!(
            "SELECT {SAVER_COLUMNS} FROM tabungan_qurban WHERE owner_id = $1 ORDER BY name, id"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(savers)
    }

    pub async fn delete_saver(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        id: QurbanSaverId,
    ) -> Result<Option<QurbanSaver>, QurbanError> {
        let saver = sqlx::query_as::<_, QurbanSaver>(&format!(
            "DELETE FROM tabungan_qurban WHERE owner_id = $1 AND id = $2 RETURNING {SAVER_COLUMNS}"
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(op.conn())
        .await?;
        Ok(saver)
    }

    /// Sum and count of the saver's installments.
    pub async fn paid_so_far(
        &self,
        executor: impl PgExecutor<'_>,
        owner: OwnerId,
        id: QurbanSaverId,
    ) -> Result<(Decimal, i64), QurbanError> {
        let (total, count): (Decimal, i64) = sqlx::query_as(
            r#"SELECT COALESCE(SUM(amount), 0), COUNT(*)
            FROM cicilan_qurban
            WHERE owner_id = $1 AND saver_id = $2"#,
        )
        .bind(owner)
        .bind(id)
        .fetch_one(executor)
        .await?;
        Ok((total, count))
    }

    pub async fn insert_installment(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        new_installment: &NewQurbanInstallment,
    ) -> Result<QurbanInstallment, QurbanError> {
        let installment = sqlx::query_as::<_, QurbanInstallment>(&format!(
            r#"INSERT INTO cicilan_qurban (owner_id, saver_id, payment_date, amount, recorded_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {INSTALLMENT_COLUMNS}"#
        ))
        .bind(owner)
        .bind(new_installment.saver_id)
        .bind(new_installment.payment_date)
        .bind(new_installment.amount)
        .bind(&new_installment.recorded_by)
        .fetch_one(op.conn())
        .await?;
        Ok(installment)
    }

    pub async fn link_installment_entry(
        &self,
        op: &mut DbOp<'_>,
        id: QurbanInstallmentId,
        entry_id: LedgerEntryId,
    ) -> Result<QurbanInstallment, QurbanError> {
        let installment = sqlx::query_as::<_, QurbanInstallment>(&format!(
            "UPDATE cicilan_qurban SET kas_harian_id = $2 WHERE id = $1 RETURNING {INSTALLMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(entry_id)
        .fetch_one(op.conn())
        .await?;
        Ok(installment)
    }

    pub async fn delete_installment(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        id: QurbanInstallmentId,
    ) -> Result<Option<QurbanInstallment>, QurbanError> {
        let installment = sqlx::query_as::<_, QurbanInstallment>(&format!(
            "DELETE FROM cicilan_qurban WHERE owner_id = $1 AND id = $2 RETURNING {INSTALLMENT_COLUMNS}"
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(op.conn())
        .await?;
        Ok(installment)
    }

    pub async fn list_installments(
        &self,
        owner: OwnerId,
        saver_id: QurbanSaverId,
    ) -> Result<Vec<QurbanInstallment>, QurbanError> {
        let installments = sqlx::query_as::<_, QurbanInstallment>(&format!(
            r#"SELECT {INSTALLMENT_COLUMNS} FROM cicilan_qurban
            WHERE owner_id = $1 AND saver_id = $2
            ORDER BY payment_date, id"#
        ))
        .bind(owner)
        .bind(saver_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(installments)
    }
}
