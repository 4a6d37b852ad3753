mod entity;
mod repo;

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use super::{error::ZakatError, ZAKAT_FITRAH_CATEGORY};
use crate::{
    kas::{error::CashLedgerError, CashLedger, NewLedgerEntry},
    op::DbOp,
    primitives::*,
};

pub use entity::*;
use repo::*;

/// Service for recording zakat fitrah.
#[derive(Clone)]
pub struct ZakatFitrahPayments {
    repo: ZakatFitrahRepo,
    cash: CashLedger,
    pool: PgPool,
}

impl ZakatFitrahPayments {
    pub(crate) fn new(pool: &PgPool, cash: CashLedger) -> Self {
        Self {
            repo: ZakatFitrahRepo::new(pool),
            cash,
            pool: pool.clone(),
        }
    }

    #[instrument(name = "amanah_ledger.zakat_fitrah.record", skip(self), err)]
    pub async fn record(
        &self,
        owner: OwnerId,
        new_payment: NewZakatFitrah,
    ) -> Result<ZakatFitrah, ZakatError> {
        let mut op = DbOp::init(&self.pool).await?;
        let record = self.record_in_op(&mut op, owner, new_payment).await?;
        op.commit().await?;
        Ok(record)
    }

    /// Inserts the payment, posts its cash equivalent as an incoming ledger
    /// entry and links the two. Nothing is visible unless `op` commits.
    pub async fn record_in_op(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        new_payment: NewZakatFitrah,
    ) -> Result<ZakatFitrah, ZakatError> {
        let record = self.repo.insert(op, owner, &new_payment).await?;
        let description = match new_payment.payment {
            FitrahPayment::Cash { .. } => format!(
                "Zakat fitrah {} ({} jiwa)",
                new_payment.payer_name, new_payment.souls
            ),
            FitrahPayment::Rice { rice_kg, .. } => format!(
                "Zakat fitrah {} ({} jiwa, beras {} kg)",
                new_payment.payer_name, new_payment.souls, rice_kg
            ),
        };
        let new_entry = NewLedgerEntry::builder()
            .entry_date(new_payment.payment_date)
            .direction(CashDirection::In)
            .category(ZAKAT_FITRAH_CATEGORY)
            .description(description)
            .amount(record.cash_equivalent)
            .recorded_by(new_payment.recorded_by)
            .source(LedgerSource::ZakatFitrah)
            .build()
            .map_err(CashLedgerError::from)?;
        let entry = self.cash.append_in_op(op, owner, new_entry).await?;
        self.repo.link_entry(op, record.id, entry.id).await
    }

    /// Deletes the payment together with the ledger entry it posted.
    #[instrument(name = "amanah_ledger.zakat_fitrah.delete", skip(self), err)]
    pub async fn delete(
        &self,
        owner: OwnerId,
        id: ZakatFitrahId,
    ) -> Result<ZakatFitrah, ZakatError> {
        let mut op = DbOp::init(&self.pool).await?;
        let record = self
            .repo
            .delete(&mut op, owner, id)
            .await?
            .ok_or(ZakatError::FitrahNotFound(id))?;
        if let Some(entry_id) = record.kas_harian_id {
            self.cash.remove_in_op(&mut op, owner, entry_id).await?;
        }
        op.commit().await?;
        Ok(record)
    }

    #[instrument(name = "amanah_ledger.zakat_fitrah.find_by_id", skip(self), err)]
    pub async fn find_by_id(
        &self,
        owner: OwnerId,
        id: ZakatFitrahId,
    ) -> Result<ZakatFitrah, ZakatError> {
        self.repo
            .find_by_id(owner, id)
            .await?
            .ok_or(ZakatError::FitrahNotFound(id))
    }

    #[instrument(name = "amanah_ledger.zakat_fitrah.list", skip(self), err)]
    pub async fn list(
        &self,
        owner: OwnerId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<ZakatFitrah>, ZakatError> {
        self.repo.list(owner, from, to).await
    }

    pub async fn summary(&self, owner: OwnerId) -> Result<ZakatFitrahSummary, ZakatError> {
        self.repo.summary(owner).await
    }
}
