pub mod config;
pub mod error;

use sqlx::PgPool;

pub use config::*;
use error::*;

use crate::{
    donor::Donors, expense::Expenses, kas::CashLedger, mustahiq::Beneficiaries,
    qurban::QurbanSavings, report::Reports, zakat::*,
};

/// Entry point to every bookkeeping service. Owns the connection pool; the
/// services hold clones of it.
#[derive(Clone)]
pub struct AmanahLedger {
    pool: PgPool,
    cash: CashLedger,
    zakat_fitrah: ZakatFitrahPayments,
    zakat_mal: ZakatMalPayments,
    expenses: Expenses,
    donors: Donors,
    qurban: QurbanSavings,
    beneficiaries: Beneficiaries,
    reports: Reports,
}

impl AmanahLedger {
    pub async fn init(config: AmanahLedgerConfig) -> Result<Self, LedgerError> {
        let pool = match (config.pool, config.pg_con) {
            (Some(pool), None) => pool,
            (None, Some(pg_con)) => {
                let mut pool_opts = sqlx::postgres::PgPoolOptions::new();
                if let Some(max_connections) = config.max_connections {
                    pool_opts = pool_opts.max_connections(max_connections);
                }
                pool_opts.connect(&pg_con).await?
            }
            _ => {
                return Err(LedgerError::ConfigError(
                    "One of pg_con or pool must be set".to_string(),
                ))
            }
        };
        if config.exec_migrations {
            sqlx::migrate!().run(&pool).await?;
        }

        let cash = CashLedger::new(&pool, config.balance_read_retry);
        let zakat_fitrah = ZakatFitrahPayments::new(&pool, cash.clone());
        let zakat_mal = ZakatMalPayments::new(&pool, cash.clone());
        let expenses = Expenses::new(&pool, cash.clone());
        let donors = Donors::new(&pool, cash.clone());
        let qurban = QurbanSavings::new(&pool, cash.clone());
        let beneficiaries = Beneficiaries::new(&pool);
        let reports = Reports::new(cash.clone());
        Ok(Self {
            cash,
            zakat_fitrah,
            zakat_mal,
            expenses,
            donors,
            qurban,
            beneficiaries,
            reports,
            pool,
        })
    }

    pub fn cash(&self) -> &CashLedger {
        &self.cash
    }

    pub fn zakat_fitrah(&self) -> &ZakatFitrahPayments {
        &self.zakat_fitrah
    }

    pub fn zakat_mal(&self) -> &ZakatMalPayments {
        &self.zakat_mal
    }

    pub fn expenses(&self) -> &Expenses {
        &self.expenses
    }

    pub fn donors(&self) -> &Donors {
        &self.donors
    }

    pub fn qurban(&self) -> &QurbanSavings {
        &self.qurban
    }

    pub fn beneficiaries(&self) -> &Beneficiaries {
        &self.beneficiaries
    }

    pub fn reports(&self) -> &Reports {
        &self.reports
    }

    pub async fn begin_op(&self) -> Result<crate::DbOp<'static>, LedgerError> {
        Ok(crate::DbOp::init(&self.pool).await?)
    }

    /// Waits for checked-out connections to return and closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
