use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::primitives::OwnerId;

/// Row lock taken by a `SELECT` inside a [`DbOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowLock {
    /// Taken before deleting a parent row.
    Update,
    /// Taken before attaching a child row; concurrent children do not block
    /// each other, only the parent's deletion.
    Share,
}

impl RowLock {
    pub(crate) fn clause(self) -> &'static str {
        match self {
            RowLock::Update => "FOR UPDATE",
            RowLock::Share => "FOR SHARE",
        }
    }
}

/// A unit of work spanning one database transaction.
///
/// Every write that touches the cash ledger runs inside a `DbOp` so that the
/// primary record and its ledger entry commit or roll back together.
pub struct DbOp<'a> {
    tx: Transaction<'a, Postgres>,
}

impl DbOp<'static> {
    pub async fn init(pool: &PgPool) -> Result<Self, sqlx::Error> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }
}

impl<'a> DbOp<'a> {
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    /// Serializes ledger mutations of a single owner until this operation ends.
    pub(crate) async fn lock_owner(&mut self, owner: OwnerId) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext(concat('kas_harian:', $1::text)))")
            .bind(owner)
            .execute(self.conn())
            .await?;
        Ok(())
    }

    /// Database wall-clock time. Read after [`Self::lock_owner`] it orders
    /// entries of one owner by commit, independent of the app server's clock.
    pub(crate) async fn now(&mut self) -> Result<DateTime<Utc>, sqlx::Error> {
        let (now,): (DateTime<Utc>,) = sqlx::query_as("SELECT clock_timestamp()")
            .fetch_one(self.conn())
            .await?;
        Ok(now)
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        self.tx.rollback().await
    }
}
