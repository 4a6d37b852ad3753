//! The per-owner cash book (`kas_harian`).
//!
//! Every [`LedgerEntry`] caches the owner's running balance immediately before
//! and after it. Ordered by `(entry_date, created_at, id)`, each entry's
//! `balance_before` equals its predecessor's `balance_after` (zero for the
//! first) and `balance_after` is `balance_before` plus or minus `amount`.
//! Appends and deletes of one owner are serialized by a transaction-scoped
//! advisory lock and leave the whole chain consistent when they commit.
pub mod chain;
mod cursor;
mod entity;
pub mod error;
mod repo;
mod retry;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;

use crate::{op::DbOp, primitives::*, query::*};

pub use chain::{ChainAudit, ChainLink};
pub use cursor::*;
pub use entity::*;
use error::*;
use repo::*;
pub use retry::RetryPolicy;

#[derive(Debug, Clone, Serialize)]
pub struct CashSummary {
    pub balance: Decimal,
    pub total_in: Decimal,
    pub total_out: Decimal,
}

/// Service for reading and mutating cash ledgers.
#[derive(Clone)]
pub struct CashLedger {
    repo: CashLedgerRepo,
    retry: RetryPolicy,
}

impl CashLedger {
    pub(crate) fn new(pool: &PgPool, retry: RetryPolicy) -> Self {
        Self {
            repo: CashLedgerRepo::new(pool),
            retry,
        }
    }

    /// The `balance_after` of the owner's chronologically last entry, or zero.
    ///
    /// Transient connection failures are retried with linear backoff; once the
    /// attempts are exhausted the failure is returned, never a made-up zero.
    #[instrument(name = "amanah_ledger.kas.current_balance", skip(self), err)]
    pub async fn current_balance(&self, owner: OwnerId) -> Result<Decimal, CashLedgerError> {
        let mut attempt = 1;
        loop {
            match self.repo.current_balance(self.repo.pool(), owner).await {
                Ok(balance) => return Ok(balance),
                Err(err) if retry::is_transient(&err) && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_after(attempt);
                    tracing::warn!(
                        %owner,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient failure reading balance, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) if retry::is_transient(&err) => {
                    return Err(CashLedgerError::Unavailable {
                        attempts: attempt,
                        source: err,
                    })
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    pub async fn current_balance_in_op(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
    ) -> Result<Decimal, CashLedgerError> {
        Ok(self.repo.current_balance(op.conn(), owner).await?)
    }

    #[instrument(name = "amanah_ledger.kas.append", skip(self), err)]
    pub async fn append(
        &self,
        owner: OwnerId,
        new_entry: NewLedgerEntry,
    ) -> Result<LedgerEntry, CashLedgerError> {
        let mut op = DbOp::init(self.repo.pool()).await?;
        let entry = self.append_in_op(&mut op, owner, new_entry).await?;
        op.commit().await?;
        Ok(entry)
    }

    /// Appends inside a caller-owned operation. The owner's ledger stays locked
    /// until the operation commits or rolls back.
    pub async fn append_in_op(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        new_entry: NewLedgerEntry,
    ) -> Result<LedgerEntry, CashLedgerError> {
        op.lock_owner(owner).await?;
        let created_at = op.now().await?;
        let balance_before = self
            .repo
            .balance_as_of(op.conn(), owner, new_entry.entry_date, created_at)
            .await?;
        let link = ChainLink::following(balance_before, new_entry.direction, new_entry.amount);
        let entry = self
            .repo
            .insert(op, owner, &new_entry, link, created_at)
            .await?;

        if self.repo.has_successors(op, &entry).await? {
            let n_updated = self.repo.recompute(op, owner).await?;
            tracing::debug!(%owner, entry_id = %entry.id, n_updated, "back-dated entry, chain recomputed");
            return self
                .repo
                .find_by_id(op.conn(), owner, entry.id)
                .await?
                .ok_or(CashLedgerError::NotFound(entry.id));
        }
        Ok(entry)
    }

    /// Deletes a manually recorded entry and re-chains the remaining ones.
    #[instrument(name = "amanah_ledger.kas.delete", skip(self), err)]
    pub async fn delete(
        &self,
        owner: OwnerId,
        id: LedgerEntryId,
    ) -> Result<LedgerEntry, CashLedgerError> {
        let mut op = DbOp::init(self.repo.pool()).await?;
        op.lock_owner(owner).await?;
        let entry = self
            .repo
            .find_by_id(op.conn(), owner, id)
            .await?
            .ok_or(CashLedgerError::NotFound(id))?;
        if let Some(source) = entry.source {
            return Err(CashLedgerError::OwnedBySource(id, source));
        }
        let entry = self
            .remove_in_op(&mut op, owner, id)
            .await?
            .ok_or(CashLedgerError::NotFound(id))?;
        op.commit().await?;
        Ok(entry)
    }

    /// Removes an entry regardless of its source and re-chains the owner's
    /// ledger within `op`. Returns `None` when no such entry exists.
    pub(crate) async fn remove_in_op(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        id: LedgerEntryId,
    ) -> Result<Option<LedgerEntry>, CashLedgerError> {
        op.lock_owner(owner).await?;
        let deleted = self.repo.delete(op, owner, id).await?;
        if deleted.is_some() {
            let n_updated = self.repo.recompute(op, owner).await?;
            tracing::debug!(%owner, entry_id = %id, n_updated, "entry removed, chain recomputed");
        }
        Ok(deleted)
    }

    #[instrument(name = "amanah_ledger.kas.find_by_id", skip(self), err)]
    pub async fn find_by_id(
        &self,
        owner: OwnerId,
        id: LedgerEntryId,
    ) -> Result<LedgerEntry, CashLedgerError> {
        self.repo
            .find_by_id(self.repo.pool(), owner, id)
            .await?
            .ok_or(CashLedgerError::NotFound(id))
    }

    #[instrument(name = "amanah_ledger.kas.list", skip(self), err)]
    pub async fn list(
        &self,
        owner: OwnerId,
        filter: LedgerEntryFilter,
        query: PaginatedQueryArgs<LedgerEntryByDateCursor>,
    ) -> Result<PaginatedQueryRet<LedgerEntry, LedgerEntryByDateCursor>, CashLedgerError> {
        self.repo.list(owner, filter, query).await
    }

    /// All entries of `owner` in chain order.
    pub async fn list_chronological(
        &self,
        owner: OwnerId,
    ) -> Result<Vec<LedgerEntry>, CashLedgerError> {
        self.repo.list_chronological(owner).await
    }

    pub(crate) async fn balance_before_date(
        &self,
        owner: OwnerId,
        date: chrono::NaiveDate,
    ) -> Result<Decimal, CashLedgerError> {
        self.repo.balance_before_date(owner, date).await
    }

    pub(crate) async fn list_in_range(
        &self,
        owner: OwnerId,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    ) -> Result<Vec<LedgerEntry>, CashLedgerError> {
        self.repo.list_in_range(owner, from, to).await
    }

    #[instrument(name = "amanah_ledger.kas.summary", skip(self), err)]
    pub async fn summary(&self, owner: OwnerId) -> Result<CashSummary, CashLedgerError> {
        let balance = self.current_balance(owner).await?;
        let (total_in, total_out) = self.repo.totals(owner).await?;
        Ok(CashSummary {
            balance,
            total_in,
            total_out,
        })
    }

    /// Replays the owner's chain and reports entries whose cached balances
    /// disagree with the deltas.
    #[instrument(name = "amanah_ledger.kas.audit", skip(self), err)]
    pub async fn audit(&self, owner: OwnerId) -> Result<ChainAudit, CashLedgerError> {
        let entries = self.repo.list_chronological(owner).await?;
        let audit = chain::audit(&entries);
        if !audit.is_consistent() {
            tracing::warn!(
                %owner,
                n_discrepancies = audit.discrepancies.len(),
                "cash ledger chain is inconsistent"
            );
        }
        Ok(audit)
    }

    /// Rewrites every stale cached balance of the owner. Returns the number of
    /// entries that changed.
    #[instrument(name = "amanah_ledger.kas.recompute", skip(self), err)]
    pub async fn recompute(&self, owner: OwnerId) -> Result<u64, CashLedgerError> {
        let mut op = DbOp::init(self.repo.pool()).await?;
        op.lock_owner(owner).await?;
        let n_updated = self.repo.recompute(&mut op, owner).await?;
        op.commit().await?;
        Ok(n_updated)
    }
}
