#![allow(dead_code)]
use chrono::NaiveDate;
use rand::distr::{Alphanumeric, SampleString};
use rust_decimal::Decimal;

use amanah_ledger::{kas::*, *};

pub async fn init_pool() -> anyhow::Result<sqlx::PgPool> {
    let pg_con = std::env::var("PG_CON").unwrap_or_else(|_| {
        let pg_host = std::env::var("PG_HOST").unwrap_or("localhost".to_string());
        format!("postgres://user:password@{pg_host}:5432/pg")
    });
    let pool = sqlx::PgPool::connect(&pg_con).await?;
    Ok(pool)
}

pub async fn init_ledger_with(config: AmanahLedgerConfigBuilder) -> anyhow::Result<AmanahLedger> {
    let mut config = config;
    let config = config.pool(init_pool().await?).exec_migrations(true).build()?;
    Ok(AmanahLedger::init(config).await?)
}

pub async fn init_ledger() -> anyhow::Result<AmanahLedger> {
    init_ledger_with(AmanahLedgerConfig::builder()).await
}

pub fn random_suffix() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 12)
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
}

pub fn entry(date: NaiveDate, direction: CashDirection, amount: Decimal) -> NewLedgerEntry {
    NewLedgerEntry::builder()
        .entry_date(date)
        .direction(direction)
        .category(match direction {
            CashDirection::In => "infaq",
            CashDirection::Out => "operasional",
        })
        .amount(amount)
        .recorded_by("Bendahara")
        .build()
        .unwrap()
}

/// Every entry of `owner` as `(balance_before, balance_after)` in chain order.
pub async fn chain(ledger: &AmanahLedger, owner: OwnerId) -> anyhow::Result<Vec<(Decimal, Decimal)>> {
    Ok(ledger
        .cash()
        .list_chronological(owner)
        .await?
        .into_iter()
        .map(|e| (e.balance_before, e.balance_after))
        .collect())
}
