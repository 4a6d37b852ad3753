use sqlx::{PgExecutor, PgPool};

use super::{entity::*, error::DonorError};
use crate::{
    op::{DbOp, RowLock},
    primitives::*,
};

const DONOR_COLUMNS: &str = "id, owner_id, name, phone, address, monthly_pledge, created_at";
const PAYMENT_COLUMNS: &str =
    "id, owner_id, donor_id, payment_date, amount, note, recorded_by, kas_harian_id, created_at";

#[derive(Debug, Clone)]
pub(super) struct DonorRepo {
    pool: PgPool,
}

impl DonorRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn insert(&self, owner: OwnerId, new_donor: &NewDonor) -> Result<Donor, DonorError> {
        let donor = sqlx::query_as::<_, Donor>(&format!(
            r#"INSERT INTO donatur (owner_id, name, phone, address, monthly_pledge)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {DONOR_COLUMNS}"#
        ))
        .bind(owner)
        .bind(&new_donor.name)
        .bind(&new_donor.phone)
        .bind(&new_donor.address)
        .bind(new_donor.monthly_pledge)
        .fetch_one(&self.pool)
        .await?;
        Ok(donor)
    }

    pub async fn update(
        &self,
        owner: OwnerId,
        id: DonorId,
        update: &DonorUpdate,
    ) -> Result<Option<Donor>, DonorError> {
        let donor = sqlx::query_as::<_, Donor>(&format!(
            r#"UPDATE donatur
            SET name = COALESCE($3, name),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                monthly_pledge = COALESCE($6, monthly_pledge)
            WHERE owner_id = $1 AND id = $2
            RETURNING {DONOR_COLUMNS}"#
        ))
        .bind(owner)
        .bind(id)
        .bind(&update.name)
        .bind(&update.phone)
        .bind(&update.address)
        .bind(update.monthly_pledge)
        .fetch_optional(&self.pool)
        .await?;
        Ok(donor)
    }

    pub async fn find_by_id(
        &self,
        executor: impl PgExecutor<'_>,
        owner: OwnerId,
        id: DonorId,
    ) -> Result<Option<Donor>, DonorError> {
        let donor = sqlx::query_as::<_, Donor>(&format!(
            "SELECT {DONOR_COLUMNS} FROM donatur WHERE owner_id = $1 AND id = $2"
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(donor)
    }

    /// Loads the donor and holds `lock` on its row until `op` ends.
    pub async fn find_locked(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        id: DonorId,
        lock: RowLock,
    ) -> Result<Option<Donor>, DonorError> {
        let donor = sqlx::query_as::<_, Donor>(&format!(
            "SELECT {DONOR_COLUMNS} FROM donatur WHERE owner_id = $1 AND id = $2 {}",
            lock.clause()
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(op.conn())
        .await?;
        Ok(donor)
    }

    pub async fn list(&self, owner: OwnerId) -> Result<Vec<Donor>, DonorError> {
        let donors = sqlx::query_as::<_, Donor>(&format!(
            "SELECT {DONOR_COLUMNS} FROM donatur WHERE owner_id = $1 ORDER BY name, id"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(donors)
    }

    pub async fn count_payments(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        id: DonorId,
    ) -> Result<i64, DonorError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM pembayaran_donatur WHERE owner_id = $1 AND donor_id = $2",
        )
        .bind(owner)
        .bind(id)
        .fetch_one(op.conn())
        .await?;
        Ok(count)
    }

    pub async fn delete(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        id: DonorId,
    ) -> Result<Option<Donor>, DonorError> {
        let donor = sqlx::query_as::<_, Donor>(&format!(
            "DELETE FROM donatur WHERE owner_id = $1 AND id = $2 RETURNING {DONOR_COLUMNS}"
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(op.conn())
        .await?;
        Ok(donor)
    }

    pub async fn insert_payment(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        new_payment: &NewDonorPayment,
    ) -> Result<DonorPayment, DonorError> {
        let payment = sqlx::query_as::<_, DonorPayment>(&format!(
            r#"INSERT INTO pembayaran_donatur
            (owner_id, donor_id, payment_date, amount, note, recorded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PAYMENT_COLUMNS}"#
        ))
        .bind(owner)
        .bind(new_payment.donor_id)
        .bind(new_payment.payment_date)
        .bind(new_payment.amount)
        .bind(&new_payment.note)
        .bind(&new_payment.recorded_by)
        .fetch_one(op.conn())
        .await?;
        Ok(payment)
    }

    pub async fn link_payment_entry(
        &self,
        op: &mut DbOp<'_>,
        id: DonorPaymentId,
        entry_id: LedgerEntryId,
    ) -> Result<DonorPayment, DonorError> {
        let payment = sqlx::query_as::<_, DonorPayment>(&format!(
            "UPDATE pembayaran_donatur SET kas_harian_id = $2 WHERE id = $1 RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(entry_id)
        .fetch_one(op.conn())
        .await?;
        Ok(payment)
    }

    pub async fn delete_payment(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        id: DonorPaymentId,
    ) -> Result<Option<DonorPayment>, DonorError> {
        let payment = sqlx::query_as::<_, DonorPayment>(&format!(
            "DELETE FROM pembayaran_donatur WHERE owner_id = $1 AND id = $2 RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(op.conn())
        .await?;
        Ok(payment)
    }

    pub async fn list_payments(
        &self,
        owner: OwnerId,
        donor_id: Option<DonorId>,
    ) -> Result<Vec<DonorPayment>, DonorError> {
        let payments = sqlx::query_as::<_, DonorPayment>(&format!(
            r#"SELECT {PAYMENT_COLUMNS} FROM pembayaran_donatur
            WHERE owner_id = $1 AND ($2::bigint IS NULL OR donor_id = $2)
            ORDER BY payment_date DESC, id DESC"#
        ))
        .bind(owner)
        .bind(donor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }
}
