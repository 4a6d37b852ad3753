use chrono::{DateTime, NaiveDate, Utc};
use derive_builder::Builder;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::primitives::*;

/// A congregant saving towards a sacrificial animal (`tabungan_qurban`).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QurbanSaver {
    pub id: QurbanSaverId,
    pub owner_id: OwnerId,
    pub name: String,
    pub phone: Option<String>,
    pub animal_kind: String,
    pub target_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct NewQurbanSaver {
    #[builder(setter(into))]
    pub(crate) name: String,
    #[builder(setter(into, strip_option), default)]
    pub(crate) phone: Option<String>,
    #[builder(setter(into))]
    pub(crate) animal_kind: String,
    pub(crate) target_amount: Decimal,
}

impl NewQurbanSaver {
    pub fn builder() -> NewQurbanSaverBuilder {
        NewQurbanSaverBuilder::default()
    }
}

impl NewQurbanSaverBuilder {
    fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("name", self.name.as_ref()),
            ("animal_kind", self.animal_kind.as_ref()),
        ] {
            if value.is_some_and(|v| v.trim().is_empty()) {
                return Err(format!("{field} must not be empty"));
            }
        }
        if let Some(target) = self.target_amount {
            check_positive_money("target_amount", target)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QurbanInstallment {
    pub id: QurbanInstallmentId,
    pub owner_id: OwnerId,
    pub saver_id: QurbanSaverId,
    pub payment_date: NaiveDate,
    pub amount: Decimal,
    pub recorded_by: String,
    pub kas_harian_id: Option<LedgerEntryId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct NewQurbanInstallment {
    pub(crate) saver_id: QurbanSaverId,
    pub(crate) payment_date: NaiveDate,
    pub(crate) amount: Decimal,
    #[builder(setter(into))]
    pub(crate) recorded_by: String,
}

impl NewQurbanInstallment {
    pub fn builder() -> NewQurbanInstallmentBuilder {
        NewQurbanInstallmentBuilder::default()
    }
}

impl NewQurbanInstallmentBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(amount) = self.amount {
            check_positive_money("amount", amount)?;
        }
        if self.recorded_by.as_ref().is_some_and(|r| r.trim().is_empty()) {
            return Err("recorded_by must not be empty".to_string());
        }
        Ok(())
    }
}

/// How far a saver is from their target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavingsProgress {
    pub saver_id: QurbanSaverId,
    pub target_amount: Decimal,
    pub total_paid: Decimal,
    pub remaining: Decimal,
    pub installments: i64,
    pub completed: bool,
}

impl SavingsProgress {
    pub(crate) fn new(saver: &QurbanSaver, total_paid: Decimal, installments: i64) -> Self {
        let remaining = (saver.target_amount - total_paid).max(Decimal::ZERO);
        Self {
            saver_id: saver.id,
            target_amount: saver.target_amount,
            total_paid,
            remaining,
            installments,
            completed: remaining.is_zero(),
        }
    }
}
