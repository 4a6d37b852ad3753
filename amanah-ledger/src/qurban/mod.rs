//! Qurban savings: savers (`tabungan_qurban`) pay installments
//! (`cicilan_qurban`) that are held in the mosque's cash book until the
//! animal is bought.
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

pub const QURBAN_CATEGORY: &str = "tabungan_qurban";

#[derive(Clone)]
pub struct QurbanSavings {
    repo: QurbanRepo,
    cash: CashLedger,
    pool: PgPool,
}

impl QurbanSavings {
    pub(crate) fn new(pool: &PgPool, cash: CashLedger) -> Self {
        Self {
            repo: QurbanRepo::new(pool),
            cash,
            pool: pool.clone(),
        }
    }

    #[instrument(name = "amanah_ledger.qurban.create_saver", skip(self), err)]
    pub async fn create_saver(
        &self,
        owner: OwnerId,
        new_saver: NewQurbanSaver,
    ) -> Result<QurbanSaver, QurbanError> {
        self.repo.insert_saver(owner, &new_saver).await
    }

    pub async fn find_saver(
        &self,
        owner: OwnerId,
        id: QurbanSaverId,
    ) -> Result<QurbanSaver, QurbanError> {
        self.repo
            .find_saver(&self.pool, owner, id)
            .await?
            .ok_or(QurbanError::SaverNotFound(id))
    }

    #[instrument(name = "amanah_ledger.qurban.list_savers", skip(self), err)]
    pub async fn list_savers(&self, owner: OwnerId) -> Result<Vec<QurbanSaver>, QurbanError> {
        self.repo.list_savers(owner).await
    }

    /// Deletes a saver that has no recorded installments.
    #[instrument(name = "amanah_ledger.qurban.delete_saver", skip(self), err)]
    pub async fn delete_saver(
        &self,
        owner: OwnerId,
        id: QurbanSaverId,
    ) -> Result<QurbanSaver, QurbanError> {
        let mut op = DbOp::init(&self.pool).await?;
        self.repo
            .find_saver_locked(&mut op, owner, id, RowLock::Update)
            .await?
            .ok_or(QurbanError::SaverNotFound(id))?;
        let (_, n_installments) = self.repo.paid_so_far(op.conn(), owner, id).await?;
        if n_installments > 0 {
            return Err(QurbanError::HasInstallments(id, n_installments));
        }
        let saver = self
            .repo
            .delete_saver(&mut op, owner, id)
            .await?
            .ok_or(QurbanError::SaverNotFound(id))?;
        op.commit().await?;
        Ok(saver)
    }

    #[instrument(name = "amanah_ledger.qurban.progress", skip(self), err)]
    pub async fn progress(
        &self,
        owner: OwnerId,
        id: QurbanSaverId,
    ) -> Result<SavingsProgress, QurbanError> {
        let saver = self.find_saver(owner, id).await?;
        let (total_paid, installments) = self.repo.paid_so_far(&self.pool, owner, id).await?;
        Ok(SavingsProgress::new(&saver, total_paid, installments))
    }

    #[instrument(name = "amanah_ledger.qurban.record_installment", skip(self), err)]
    pub async fn record_installment(
        &self,
        owner: OwnerId,
        new_installment: NewQurbanInstallment,
    ) -> Result<QurbanInstallment, QurbanError> {
        let mut op = DbOp::init(&self.pool).await?;
        let installment = self
            .record_installment_in_op(&mut op, owner, new_installment)
            .await?;
        op.commit().await?;
        Ok(installment)
    }

    pub async fn record_installment_in_op(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        new_installment: NewQurbanInstallment,
    ) -> Result<QurbanInstallment, QurbanError> {
        let saver = self
            .repo
            .find_saver_locked(op, owner, new_installment.saver_id, RowLock::Share)
            .await?
            .ok_or(QurbanError::SaverNotFound(new_installment.saver_id))?;
        let installment = self
            .repo
            .insert_installment(op, owner, &new_installment)
            .await?;
        let new_entry = NewLedgerEntry::builder()
            .entry_date(new_installment.payment_date)
            .direction(CashDirection::In)
            .category(QURBAN_CATEGORY)
            .description(format!(
                "Cicilan qurban {} ({})",
                saver.name, saver.animal_kind
            ))
            .amount(new_installment.amount)
            .recorded_by(new_installment.recorded_by)
            .source(LedgerSource::QurbanInstallment)
            .build()
            .map_err(CashLedgerError::from)?;
        let entry = self.cash.append_in_op(op, owner, new_entry).await?;
        self.repo
            .link_installment_entry(op, installment.id, entry.id)
            .await
    }

    /// Deletes an installment together with the ledger entry it posted.
    #[instrument(name = "amanah_ledger.qurban.delete_installment", skip(self), err)]
    pub async fn delete_installment(
        &self,
        owner: OwnerId,
        id: QurbanInstallmentId,
    ) -> Result<QurbanInstallment, QurbanError> {
        let mut op = DbOp::init(&self.pool).await?;
        let installment = self
            .repo
            .delete_installment(&mut op, owner, id)
            .await?
            .ok_or(QurbanError::InstallmentNotFound(id))?;
        if let Some(entry_id) = installment.kas_harian_id {
            self.cash.remove_in_op(&mut op, owner, entry_id).await?;
        }
        op.commit().await?;
        Ok(installment)
    }

    pub async fn list_installments(
        &self,
        owner: OwnerId,
        saver_id: QurbanSaverId,
    ) -> Result<Vec<QurbanInstallment>, QurbanError> {
        self.repo.list_installments(owner, saver_id).await
    }
}
