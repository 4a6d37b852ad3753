use chrono::{DateTime, NaiveDate, Utc};
use derive_builder::Builder;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::primitives::*;

const MAX_CATEGORY_LEN: usize = 50;
const MAX_RECORDED_BY_LEN: usize = 100;

/// One row of an owner's cash book (`kas_harian`).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LedgerEntry {
    pub id: LedgerEntryId,
    pub owner_id: OwnerId,
    pub entry_date: NaiveDate,
    pub direction: CashDirection,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub recorded_by: String,
    pub source: Option<LedgerSource>,
    pub created_at: DateTime<Utc>,
}

/// Representation of a cash movement that has not been recorded yet.
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct NewLedgerEntry {
    pub(crate) entry_date: NaiveDate,
    pub(crate) direction: CashDirection,
    #[builder(setter(into))]
    pub(crate) category: String,
    #[builder(setter(into), default)]
    pub(crate) description: String,
    pub(crate) amount: Decimal,
    #[builder(setter(into))]
    pub(crate) recorded_by: String,
    #[builder(setter(strip_option), default)]
    pub(crate) source: Option<LedgerSource>,
}

impl NewLedgerEntry {
    pub fn builder() -> NewLedgerEntryBuilder {
        NewLedgerEntryBuilder::default()
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn direction(&self) -> CashDirection {
        self.direction
    }
}

impl NewLedgerEntryBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(amount) = self.amount {
            check_positive_money("amount", amount)?;
        }
        if let Some(category) = self.category.as_ref() {
            if category.trim().is_empty() {
                return Err("category must not be empty".to_string());
            }
            if category.len() > MAX_CATEGORY_LEN {
                return Err(format!(
                    "category must be at most {MAX_CATEGORY_LEN} characters"
                ));
            }
        }
        if let Some(recorded_by) = self.recorded_by.as_ref() {
            if recorded_by.trim().is_empty() {
                return Err("recorded_by must not be empty".to_string());
            }
            if recorded_by.len() > MAX_RECORDED_BY_LEN {
                return Err(format!(
                    "recorded_by must be at most {MAX_RECORDED_BY_LEN} characters"
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn builder(amount: Decimal) -> NewLedgerEntryBuilder {
        let mut builder = NewLedgerEntry::builder();
        builder
            .entry_date(NaiveDate::from_ymd_opt(2024, 4, 10).unwrap())
            .direction(CashDirection::In)
            .category("infaq_jumat")
            .amount(amount)
            .recorded_by("Ahmad");
        builder
    }

    #[test]
    fn accepts_positive_amount() {
        let entry = builder(dec!(150000)).build().unwrap();
        assert_eq!(entry.amount(), dec!(150000));
        assert_eq!(entry.description, "");
        assert!(entry.source.is_none());
    }

    #[test]
    fn rejects_zero_and_negative_amounts() {
        for amount in [dec!(0), dec!(-1), dec!(-0.01)] {
            let err = builder(amount).build().unwrap_err();
            assert!(matches!(err, NewLedgerEntryBuilderError::ValidationError(_)));
        }
    }

    #[test]
    fn rejects_sub_cent_amounts() {
        for amount in [dec!(0.005), dec!(0.004), dec!(10.001)] {
            let err = builder(amount).build().unwrap_err();
            assert!(err.to_string().contains("decimal places"));
        }
        assert!(builder(dec!(10.10)).build().is_ok());
    }

    #[test]
    fn rejects_amounts_beyond_the_column() {
        let err = builder(dec!(10000000000000)).build().unwrap_err();
        assert!(err.to_string().contains("must not exceed"));
    }

    #[test]
    fn rejects_blank_category() {
        let err = builder(dec!(10)).category("  ").build().unwrap_err();
        assert!(err.to_string().contains("category"));
    }

    #[test]
    fn requires_recorded_by() {
        let mut builder = NewLedgerEntry::builder();
        builder
            .entry_date(NaiveDate::from_ymd_opt(2024, 4, 10).unwrap())
            .direction(CashDirection::Out)
            .category("listrik")
            .amount(dec!(10));
        assert!(matches!(
            builder.build(),
            Err(NewLedgerEntryBuilderError::UninitializedField("recorded_by"))
        ));
    }
}
