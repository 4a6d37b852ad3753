mod config;
mod error;

use sqlx::PgPool;

use amanah_ledger::{AmanahLedger, AmanahLedgerConfig};

pub use config::*;
pub use error::*;

#[derive(Clone)]
pub struct AmanahApp {
    ledger: AmanahLedger,
}

impl AmanahApp {
    pub(crate) async fn run(pool: PgPool, config: AppConfig) -> Result<Self, ApplicationError> {
        let ledger_config = AmanahLedgerConfig::builder()
            .pool(pool)
            .exec_migrations(config.exec_migrations)
            .balance_read_retry(config.balance_read_retry)
            .build()?;
        let ledger = AmanahLedger::init(ledger_config).await?;
        Ok(Self { ledger })
    }

    pub fn ledger(&self) -> &AmanahLedger {
        &self.ledger
    }
}
