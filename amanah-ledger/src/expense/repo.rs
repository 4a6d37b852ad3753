use sqlx::{PgExecutor, PgPool};

use super::{entity::*, error::ExpenseError};
use crate::{op::DbOp, primitives::*};

const COLUMNS: &str = "id, owner_id, expense_date, category, description, amount, status, \
     requested_by, decided_by, decided_at, kas_harian_id, created_at";

#[derive(Debug, Clone)]
pub(super) struct ExpenseRepo {
    pool: PgPool,
}

impl ExpenseRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn insert(
        &self,
        executor: impl PgExecutor<'_>,
        owner: OwnerId,
        new_expense: &NewExpense,
    ) -> Result<Expense, ExpenseError> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"INSERT INTO pengeluaran
            (owner_id, expense_date, category, description, amount, status, requested_by)
            VALUES ($1, $2, $3, $4, $5, 'pending', $6)
            RETURNING {COLUMNS}"#
        ))
        .bind(owner)
        .bind(new_expense.expense_date)
        .bind(&new_expense.category)
        .bind(&new_expense.description)
        .bind(new_expense.amount)
        .bind(&new_expense.requested_by)
        .fetch_one(executor)
        .await?;
        Ok(expense)
    }

    /// Loads the expense and holds its row lock until `op` ends, so two
    /// concurrent decisions on one expense apply one after the other.
    pub async fn find_for_update(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        id: ExpenseId,
    ) -> Result<Option<Expense>, ExpenseError> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {COLUMNS} FROM pengeluaran WHERE owner_id = $1 AND id = $2 FOR UPDATE"
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(op.conn())
        .await?;
        Ok(expense)
    }

    pub async fn record_decision(
        &self,
        op: &mut DbOp<'_>,
        id: ExpenseId,
        status: ExpenseStatus,
        decided_by: &str,
        entry_id: Option<LedgerEntryId>,
    ) -> Result<Expense, ExpenseError> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"UPDATE pengeluaran
            SET status = $2, decided_by = $3, decided_at = NOW(), kas_harian_id = $4
            WHERE id = $1
            RETURNING {COLUMNS}"#
        ))
        .bind(id)
        .bind(status)
        .bind(decided_by)
        .bind(entry_id)
        .fetch_one(op.conn())
        .await?;
        Ok(expense)
    }

    pub async fn delete(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        id: ExpenseId,
    ) -> Result<Option<Expense>, ExpenseError> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "DELETE FROM pengeluaran WHERE owner_id = $1 AND id = $2 RETURNING {COLUMNS}"
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(op.conn())
        .await?;
        Ok(expense)
    }

    pub async fn find_by_id(
        &self,
        owner: OwnerId,
        id: ExpenseId,
    ) -> Result<Option<Expense>, ExpenseError> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {COLUMNS} FROM pengeluaran WHERE owner_id = $1 AND id = $2"
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(expense)
    }

    pub async fn list(
        &self,
        owner: OwnerId,
        status: Option<ExpenseStatus>,
    ) -> Result<Vec<Expense>, ExpenseError> {
        let expenses = sqlx::query_as::<_, Expense>(&format!(
            r#"SELECT {COLUMNS} FROM pengeluaran
            WHERE owner_id = $1 AND ($2::expense_status IS NULL OR status = $2)
            ORDER BY expense_date DESC, id DESC"#
        ))
        .bind(owner)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(expenses)
    }
}
