//! Mosque expenses (`pengeluaran`).
//!
//! An expense is requested as `pending` and never touches the cash ledger
//! until it is approved. Approval posts exactly one outgoing entry; approving
//! again returns the expense unchanged.
mod entity;
pub mod error;
mod repo;

use sqlx::PgPool;
use tracing::instrument;

use crate::{
    kas::{error::CashLedgerError, CashLedger, NewLedgerEntry},
    op::DbOp,
    primitives::*,
};

pub use entity::*;
use error::*;
use repo::*;

/// Service for requesting and deciding on expenses.
#[derive(Clone)]
pub struct Expenses {
    repo: ExpenseRepo,
    cash: CashLedger,
    pool: PgPool,
}

impl Expenses {
    pub(crate) fn new(pool: &PgPool, cash: CashLedger) -> Self {
        Self {
            repo: ExpenseRepo::new(pool),
            cash,
            pool: pool.clone(),
        }
    }

    #[instrument(name = "amanah_ledger.expenses.create", skip(self), err)]
    pub async fn create(
        &self,
        owner: OwnerId,
        new_expense: NewExpense,
    ) -> Result<Expense, ExpenseError> {
        self.repo.insert(&self.pool, owner, &new_expense).await
    }

    #[instrument(name = "amanah_ledger.expenses.approve", skip(self), err)]
    pub async fn approve(
        &self,
        owner: OwnerId,
        id: ExpenseId,
        approved_by: &str,
    ) -> Result<Expense, ExpenseError> {
        let mut op = DbOp::init(&self.pool).await?;
        let expense = self.approve_in_op(&mut op, owner, id, approved_by).await?;
        op.commit().await?;
        Ok(expense)
    }

    pub async fn approve_in_op(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        id: ExpenseId,
        approved_by: &str,
    ) -> Result<Expense, ExpenseError> {
        let expense = self
            .repo
            .find_for_update(op, owner, id)
            .await?
            .ok_or(ExpenseError::NotFound(id))?;
        match expense.status.transition_to(ExpenseStatus::Approved) {
            Transition::AlreadyDone => return Ok(expense),
            Transition::Forbidden => {
                return Err(ExpenseError::InvalidTransition {
                    id,
                    from: expense.status,
                    to: ExpenseStatus::Approved,
                })
            }
            Transition::Apply => (),
        }

        let description = if expense.description.is_empty() {
            format!("Pengeluaran {}", expense.category)
        } else {
            expense.description.clone()
        };
        let new_entry = NewLedgerEntry::builder()
            .entry_date(expense.expense_date)
            .direction(CashDirection::Out)
            .category(expense.category.clone())
            .description(description)
            .amount(expense.amount)
            .recorded_by(approved_by)
            .source(LedgerSource::Expense)
            .build()
            .map_err(CashLedgerError::from)?;
        let entry = self.cash.append_in_op(op, owner, new_entry).await?;
        self.repo
            .record_decision(op, id, ExpenseStatus::Approved, approved_by, Some(entry.id))
            .await
    }

    #[instrument(name = "amanah_ledger.expenses.reject", skip(self), err)]
    pub async fn reject(
        &self,
        owner: OwnerId,
        id: ExpenseId,
        rejected_by: &str,
    ) -> Result<Expense, ExpenseError> {
        let mut op = DbOp::init(&self.pool).await?;
        let expense = self
            .repo
            .find_for_update(&mut op, owner, id)
            .await?
            .ok_or(ExpenseError::NotFound(id))?;
        let expense = match expense.status.transition_to(ExpenseStatus::Rejected) {
            Transition::AlreadyDone => expense,
            Transition::Forbidden => {
                return Err(ExpenseError::InvalidTransition {
                    id,
                    from: expense.status,
                    to: ExpenseStatus::Rejected,
                })
            }
            Transition::Apply => {
                self.repo
                    .record_decision(&mut op, id, ExpenseStatus::Rejected, rejected_by, None)
                    .await?
            }
        };
        op.commit().await?;
        Ok(expense)
    }

    /// Deletes the expense. An approved expense takes its ledger entry with it.
    #[instrument(name = "amanah_ledger.expenses.delete", skip(self), err)]
    pub async fn delete(&self, owner: OwnerId, id: ExpenseId) -> Result<Expense, ExpenseError> {
        let mut op = DbOp::init(&self.pool).await?;
        let expense = self
            .repo
            .delete(&mut op, owner, id)
            .await?
            .ok_or(ExpenseError::NotFound(id))?;
        if let Some(entry_id) = expense.kas_harian_id {
            self.cash.remove_in_op(&mut op, owner, entry_id).await?;
        }
        op.commit().await?;
        Ok(expense)
    }

    pub async fn find_by_id(&self, owner: OwnerId, id: ExpenseId) -> Result<Expense, ExpenseError> {
        self.repo
            .find_by_id(owner, id)
            .await?
            .ok_or(ExpenseError::NotFound(id))
    }

    #[instrument(name = "amanah_ledger.expenses.list", skip(self), err)]
    pub async fn list(
        &self,
        owner: OwnerId,
        status: Option<ExpenseStatus>,
    ) -> Result<Vec<Expense>, ExpenseError> {
        self.repo.list(owner, status).await
    }
}
