mod entity;
mod repo;

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use super::{error::ZakatError, ZAKAT_MAL_CATEGORY};
use crate::{
    kas::{error::CashLedgerError, CashLedger, NewLedgerEntry},
    op::DbOp,
    primitives::*,
};

pub use entity::*;
use repo::*;

/// Service for recording zakat on wealth.
#[derive(Clone)]
pub struct ZakatMalPayments {
    repo: ZakatMalRepo,
    cash: CashLedger,
    pool: PgPool,
}

impl ZakatMalPayments {
    pub(crate) fn new(pool: &PgPool, cash: CashLedger) -> Self {
        Self {
            repo: ZakatMalRepo::new(pool),
            cash,
            pool: pool.clone(),
        }
    }

    #[instrument(name = "amanah_ledger.zakat_mal.record", skip(self), err)]
    pub async fn record(
        &self,
        owner: OwnerId,
        new_payment: NewZakatMal,
    ) -> Result<ZakatMal, ZakatError> {
        let mut op = DbOp::init(&self.pool).await?;
        let record = self.record_in_op(&mut op, owner, new_payment).await?;
        op.commit().await?;
        Ok(record)
    }

    pub async fn record_in_op(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        new_payment: NewZakatMal,
    ) -> Result<ZakatMal, ZakatError> {
        let record = self.repo.insert(op, owner, &new_payment).await?;
        let new_entry = NewLedgerEntry::builder()
            .entry_date(record.payment_date)
            .direction(CashDirection::In)
            .category(ZAKAT_MAL_CATEGORY)
            .description(format!(
                "Zakat mal {} ({})",
                record.payer_name, record.wealth_kind
            ))
            .amount(record.zakat_amount)
            .recorded_by(new_payment.recorded_by)
            .source(LedgerSource::ZakatMal)
            .build()
            .map_err(CashLedgerError::from)?;
        let entry = self.cash.append_in_op(op, owner, new_entry).await?;
        self.repo.link_entry(op, record.id, entry.id).await
    }

    #[instrument(name = "amanah_ledger.zakat_mal.delete", skip(self), err)]
    pub async fn delete(&self, owner: OwnerId, id: ZakatMalId) -> Result<ZakatMal, ZakatError> {
        let mut op = DbOp::init(&self.pool).await?;
        let record = self
            .repo
            .delete(&mut op, owner, id)
            .await?
            .ok_or(ZakatError::MalNotFound(id))?;
        if let Some(entry_id) = record.kas_harian_id {
            self.cash.remove_in_op(&mut op, owner, entry_id).await?;
        }
        op.commit().await?;
        Ok(record)
    }

    pub async fn find_by_id(&self, owner: OwnerId, id: ZakatMalId) -> Result<ZakatMal, ZakatError> {
        self.repo
            .find_by_id(owner, id)
            .await?
            .ok_or(ZakatError::MalNotFound(id))
    }

    #[instrument(name = "amanah_ledger.zakat_mal.list", skip(self), err)]
    pub async fn list(
        &self,
        owner: OwnerId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<ZakatMal>, ZakatError> {
        self.repo.list(owner, from, to).await
    }
}
