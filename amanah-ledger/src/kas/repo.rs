use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use super::{chain::ChainLink, cursor::*, entity::*, error::CashLedgerError};
use crate::{op::DbOp, primitives::*, query::*};

const ENTRY_COLUMNS: &str = "id, owner_id, entry_date, direction, category, description, amount, \
     balance_before, balance_after, recorded_by, source, created_at";

#[derive(Debug, Clone)]
pub(super) struct CashLedgerRepo {
    pool: PgPool,
}

impl CashLedgerRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn current_balance(
        &self,
        executor: impl PgExecutor<'_>,
        owner: OwnerId,
    ) -> Result<Decimal, sqlx::Error> {
        let balance: Option<Decimal> = sqlx::query_scalar(
            r#"SELECT balance_after FROM kas_harian
            WHERE owner_id = $1
            ORDER BY entry_date DESC, created_at DESC, id DESC
            LIMIT 1"#,
        )
        .bind(owner)
        .fetch_optional(executor)
        .await?;
        Ok(balance.unwrap_or(Decimal::ZERO))
    }

    /// Balance right after the last entry that sorts at or before `(date, at)`.
    pub async fn balance_as_of(
        &self,
        executor: impl PgExecutor<'_>,
        owner: OwnerId,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<Decimal, sqlx::Error> {
        let balance: Option<Decimal> = sqlx::query_scalar(
            r#"SELECT balance_after FROM kas_harian
            WHERE owner_id = $1 AND (entry_date, created_at) <= ($2, $3)
            ORDER BY entry_date DESC, created_at DESC, id DESC
            LIMIT 1"#,
        )
        .bind(owner)
        .bind(date)
        .bind(at)
        .fetch_optional(executor)
        .await?;
        Ok(balance.unwrap_or(Decimal::ZERO))
    }

    /// Balance after the last entry dated strictly before `date`.
    pub async fn balance_before_date(
        &self,
        owner: OwnerId,
        date: NaiveDate,
    ) -> Result<Decimal, CashLedgerError> {
        let balance: Option<Decimal> = sqlx::query_scalar(
            r#"SELECT balance_after FROM kas_harian
            WHERE owner_id = $1 AND entry_date < $2
            ORDER BY entry_date DESC, created_at DESC, id DESC
            LIMIT 1"#,
        )
        .bind(owner)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(balance.unwrap_or(Decimal::ZERO))
    }

    #[instrument(level = "trace", name = "amanah_ledger.kas.repo.insert", skip(self, op))]
    pub async fn insert(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        new_entry: &NewLedgerEntry,
        link: ChainLink,
        created_at: DateTime<Utc>,
    ) -> Result<LedgerEntry, CashLedgerError> {
        let entry = sqlx::query_as::<_, LedgerEntry>(&format!(
            r#"INSERT INTO kas_harian
            (owner_id, entry_date, direction, category, description, amount,
             balance_before, balance_after, recorded_by, source, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ENTRY_COLUMNS}"#
        ))
        .bind(owner)
        .bind(new_entry.entry_date)
        .bind(new_entry.direction)
        .bind(&new_entry.category)
        .bind(&new_entry.description)
        .bind(new_entry.amount)
        .bind(link.balance_before)
        .bind(link.balance_after)
        .bind(&new_entry.recorded_by)
        .bind(new_entry.source)
        .bind(created_at)
        .fetch_one(op.conn())
        .await?;
        Ok(entry)
    }

    pub async fn has_successors(
        &self,
        op: &mut DbOp<'_>,
        entry: &LedgerEntry,
    ) -> Result<bool, CashLedgerError> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (
              SELECT 1 FROM kas_harian
              WHERE owner_id = $1 AND (entry_date, created_at, id) > ($2, $3, $4)
            )"#,
        )
        .bind(entry.owner_id)
        .bind(entry.entry_date)
        .bind(entry.created_at)
        .bind(entry.id)
        .fetch_one(op.conn())
        .await?;
        Ok(exists)
    }

    pub async fn find_by_id(
        &self,
        executor: impl PgExecutor<'_>,
        owner: OwnerId,
        id: LedgerEntryId,
    ) -> Result<Option<LedgerEntry>, CashLedgerError> {
        let entry = sqlx::query_as::<_, LedgerEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM kas_harian WHERE owner_id = $1 AND id = $2"
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(entry)
    }

    pub async fn delete(
        &self,
        op: &mut DbOp<'_>,
        owner: OwnerId,
        id: LedgerEntryId,
    ) -> Result<Option<LedgerEntry>, CashLedgerError> {
        let entry = sqlx::query_as::<_, LedgerEntry>(&format!(
            "DELETE FROM kas_harian WHERE owner_id = $1 AND id = $2 RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(op.conn())
        .await?;
        Ok(entry)
    }

    /// Rewrites the cached balances of every entry of `owner` from the deltas,
    /// touching only rows whose stored values are stale.
    #[instrument(level = "trace", name = "amanah_ledger.kas.repo.recompute", skip(self, op))]
    pub async fn recompute(&self, op: &mut DbOp<'_>, owner: OwnerId) -> Result<u64, CashLedgerError> {
        let result = sqlx::query(
            r#"WITH chained AS (
              SELECT
                id,
                SUM(CASE WHEN direction = 'in' THEN amount ELSE -amount END) OVER (
                  ORDER BY entry_date, created_at, id
                  ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW
                ) AS balance_after,
                CASE WHEN direction = 'in' THEN amount ELSE -amount END AS delta
              FROM kas_harian
              WHERE owner_id = $1
            )
            UPDATE kas_harian k
            SET balance_before = c.balance_after - c.delta,
                balance_after = c.balance_after
            FROM chained c
            WHERE k.id = c.id
              AND k.owner_id = $1
              AND (k.balance_before, k.balance_after)
                  IS DISTINCT FROM (c.balance_after - c.delta, c.balance_after)"#,
        )
        .bind(owner)
        .execute(op.conn())
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn list_chronological(
        &self,
        owner: OwnerId,
    ) -> Result<Vec<LedgerEntry>, CashLedgerError> {
        let entries = sqlx::query_as::<_, LedgerEntry>(&format!(
            r#"SELECT {ENTRY_COLUMNS} FROM kas_harian
            WHERE owner_id = $1
            ORDER BY entry_date, created_at, id"#
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn list_in_range(
        &self,
        owner: OwnerId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LedgerEntry>, CashLedgerError> {
        let entries = sqlx::query_as::<_, LedgerEntry>(&format!(
            r#"SELECT {ENTRY_COLUMNS} FROM kas_harian
            WHERE owner_id = $1 AND entry_date BETWEEN $2 AND $3
            ORDER BY entry_date, created_at, id"#
        ))
        .bind(owner)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn list(
        &self,
        owner: OwnerId,
        filter: LedgerEntryFilter,
        query: PaginatedQueryArgs<LedgerEntryByDateCursor>,
    ) -> Result<PaginatedQueryRet<LedgerEntry, LedgerEntryByDateCursor>, CashLedgerError> {
        let after = query.after;
        let mut entries = sqlx::query_as::<_, LedgerEntry>(&format!(
            r#"SELECT {ENTRY_COLUMNS} FROM kas_harian
            WHERE owner_id = $1
              AND ($2::date IS NULL OR entry_date >= $2)
              AND ($3::date IS NULL OR entry_date <= $3)
              AND ($4::cash_direction IS NULL OR direction = $4)
              AND ($5::bigint IS NULL OR (entry_date, created_at, id) < ($6, $7, $5))
            ORDER BY entry_date DESC, created_at DESC, id DESC
            LIMIT $8"#
        ))
        .bind(owner)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.direction)
        .bind(after.as_ref().map(|c| c.id))
        .bind(after.as_ref().map(|c| c.entry_date))
        .bind(after.as_ref().map(|c| c.created_at))
        .bind(query.first as i64 + 1)
        .fetch_all(&self.pool)
        .await?;

        let has_next_page = entries.len() > query.first;
        entries.truncate(query.first);
        let end_cursor = entries.last().map(LedgerEntryByDateCursor::from);
        Ok(PaginatedQueryRet {
            entities: entries,
            has_next_page,
            end_cursor,
        })
    }

    pub async fn totals(&self, owner: OwnerId) -> Result<(Decimal, Decimal), CashLedgerError> {
        let (total_in, total_out): (Decimal, Decimal) = sqlx::query_as(
            r#"SELECT
              COALESCE(SUM(amount) FILTER (WHERE direction = 'in'), 0),
              COALESCE(SUM(amount) FILTER (WHERE direction = 'out'), 0)
            FROM kas_harian
            WHERE owner_id = $1"#,
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok((total_in, total_out))
    }
}
