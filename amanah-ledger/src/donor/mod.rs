//! Donors (`donatur`) and the payments they make. Every payment is posted to
//! the cash ledger as an incoming entry in the same transaction.
mod entity;
pub mod error;
mod repo;

use sqlx::PgPool;
use tracing::instrument;

use crate::{
    kas::{error::CashLedgerError, CashLedger, NewLedgerEntry},
    op::{DbOp, RowLock},
    primitives::*,
};

pub use entity::*;
use error::*;
use repo::*;

pub const DONATION_CATEGORY: &str = "donasi";

#[derive(Clone)]
pub struct Donors {
    repo: DonorRepo,
    cash: CashLedger,
    pool: PgPool,
}

impl Donors {
    pub(crate) fn new(pool: &PgPool, cash: CashLedger) -> Self {
        Self {
            repo: DonorRepo::new(pool),
            cash,
            pool: pool.clone(),
        }
    }

    #[instrument(name = "amanah_ledger.donors.create", skip(self), err)]
    pub async fn create(&self, owner: OwnerId, new_donor: NewDonor) -> Result<Donor, DonorError> {
        self.repo.insert(owner, &new_donor).await
    }

    #[instrument(name = "amanah_ledger.donors.update", skip(self), err)]
    pub async fn update(
        &self,
        owner: OwnerId,
        id: DonorId,
        update: DonorUpdate,
    ) -> Result<Donor, DonorError> {
        update.validate().map_err(DonorError::InvalidUpdate)?;
        self.repo
            .update(owner, id, &update)
            .await?
            .ok_or(DonorError::NotFound(id))
    }

    /// Deletes a donor that has no recorded payments.
    #[instrument(name = "amanah_ledger.donors.delete", skip(self), err)]
    pub async fn delete(&self, owner: OwnerId, id: DonorId) -> Result<Donor, DonorError> {
        let mut op = DbOp::init(&self.pool).await?;
        self.repo
            .find_locked(&mut op, owner, id, RowLock::Update)
            .await?
            .ok_or(DonorError::NotFound(id))?;
        let n_payments = self.repo.count_payments(&mut op, owner, id).await?;
        if n_payments > 0 {
            return Err(DonorError::HasPayments(id, n_payments));
        }
        let donor = self
            .repo
            .delete(&mut op, owner, id)
            .await?
            .ok_or(DonorError::NotFound(id))?;
        op.commit().await?;
        Ok(donor)
    }

    pub async fn find_by_id(&self, owner: OwnerId, id: DonorId) -> Result<Donor, DonorError> {
        self.repo
            .find_by_id(&self.pool, owner, id)
            .await?
            .ok_or(DonorError::NotFound(id))
    }

    #[instrument(name = "amanah_ledger.donors.list", skip(self), err)]
    pub async fn list(&self, owner: OwnerId) -> Result<Vec<Donor>, DonorError> {
        self.repo.list(owner).await
    }

    #[instrument(name = "amanah_ledger.donors.record_payment", skip(self), err)]
    pub async fn record_payment(
        &self,
        owner: OwnerId,
        new_payment: NewDonorPayment,
    ) -> Result<DonorPayment, DonorError> {
        let mut op = DbOp::init(&self.pool).await?;
        let payment = self.record_payment_in_op(&mut op, owner, new_payment).await?;
        op.commit().await?;
        Ok(payment)
    }

    pub async fn record_payment_in_op(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        new_payment: NewDonorPayment,
    ) -> Result<DonorPayment, DonorError> {
        let donor = self
            .repo
            .find_locked(op, owner, new_payment.donor_id, RowLock::Share)
            .await?
            .ok_or(DonorError::NotFound(new_payment.donor_id))?;
        let payment = self.repo.insert_payment(op, owner, &new_payment).await?;
        let description = if new_payment.note.is_empty() {
            format!("Donasi {}", donor.name)
        } else {
            format!("Donasi {} - {}", donor.name, new_payment.note)
        };
        let new_entry = NewLedgerEntry::builder()
            .entry_date(new_payment.payment_date)
            .direction(CashDirection::In)
            .category(DONATION_CATEGORY)
            .description(description)
            .amount(new_payment.amount)
            .recorded_by(new_payment.recorded_by)
            .source(LedgerSource::DonorPayment)
            .build()
            .map_err(CashLedgerError::from)?;
        let entry = self.cash.append_in_op(op, owner, new_entry).await?;
        self.repo.link_payment_entry(op, payment.id, entry.id).await
    }

    /// Deletes a payment together with the ledger entry it posted.
    #[instrument(name = "amanah_ledger.donors.delete_payment", skip(self), err)]
    pub async fn delete_payment(
        &self,
        owner: OwnerId,
        id: DonorPaymentId,
    ) -> Result<DonorPayment, DonorError> {
        let mut op = DbOp::init(&self.pool).await?;
        let payment = self
            .repo
            .delete_payment(&mut op, owner, id)
            .await?
            .ok_or(DonorError::PaymentNotFound(id))?;
        if let Some(entry_id) = payment.kas_harian_id {
            self.cash.remove_in_op(&mut op, owner, entry_id).await?;
        }
        op.commit().await?;
        Ok(payment)
    }

    #[instrument(name = "amanah_ledger.donors.list_payments", skip(self), err)]
    pub async fn list_payments(
        &self,
        owner: OwnerId,
        donor_id: Option<DonorId>,
    ) -> Result<Vec<DonorPayment>, DonorError> {
        self.repo.list_payments(owner, donor_id).await
    }
}
