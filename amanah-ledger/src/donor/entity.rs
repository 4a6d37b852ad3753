use chrono::{DateTime, NaiveDate, Utc};
use derive_builder::Builder;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::primitives::*;

/// A regular contributor (`donatur`) of the mosque.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Donor {
    pub id: DonorId,
    pub owner_id: OwnerId,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub monthly_pledge: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct NewDonor {
    #[builder(setter(into))]
    pub(crate) name: String,
    #[builder(setter(into, strip_option), default)]
    pub(crate) phone: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub(crate) address: Option<String>,
    #[builder(setter(strip_option), default)]
    pub(crate) monthly_pledge: Option<Decimal>,
}

impl NewDonor {
    pub fn builder() -> NewDonorBuilder {
        NewDonorBuilder::default()
    }
}

impl NewDonorBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
            return Err("name must not be empty".to_string());
        }
        if let Some(Some(pledge)) = self.monthly_pledge {
            validate_pledge(pledge)?;
        }
        Ok(())
    }
}

fn validate_pledge(pledge: Decimal) -> Result<(), String> {
    if pledge < Decimal::ZERO {
        return Err(format!("monthly_pledge must not be negative, got {pledge}"));
    }
    check_money("monthly_pledge", pledge)
}

/// Partial update of a donor. Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonorUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub monthly_pledge: Option<Decimal>,
}

impl DonorUpdate {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
            return Err("name must not be empty".to_string());
        }
        if let Some(pledge) = self.monthly_pledge {
            validate_pledge(pledge)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DonorPayment {
    pub id: DonorPaymentId,
    pub owner_id: OwnerId,
    pub donor_id: DonorId,
    pub payment_date: NaiveDate,
    pub amount: Decimal,
    pub note: String,
    pub recorded_by: String,
    pub kas_harian_id: Option<LedgerEntryId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct NewDonorPayment {
    pub(crate) donor_id: DonorId,
    pub(crate) payment_date: NaiveDate,
    pub(crate) amount: Decimal,
    #[builder(setter(into), default)]
    pub(crate) note: String,
    #[builder(setter(into))]
    pub(crate) recorded_by: String,
}

impl NewDonorPayment {
    pub fn builder() -> NewDonorPaymentBuilder {
        NewDonorPaymentBuilder::default()
    }
}

impl NewDonorPaymentBuilder {
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

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn donor_requires_a_name() {
        assert!(NewDonor::builder().name("  ").build().is_err());
        assert!(NewDonor::builder()
            .name("H. Abdullah")
            .monthly_pledge(dec!(100000))
            .build()
            .is_ok());
    }

    #[test]
    fn negative_pledge_is_rejected() {
        assert!(NewDonor::builder()
            .name("H. Abdullah")
            .monthly_pledge(dec!(-1))
            .build()
            .is_err());
        let update = DonorUpdate {
            monthly_pledge: Some(dec!(-5)),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn payment_amount_must_be_positive() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut builder = NewDonorPayment::builder();
        builder
            .donor_id(DonorId::from(1))
            .payment_date(date)
            .recorded_by("Bendahara");
        assert!(builder.clone().amount(dec!(0)).build().is_err());
        assert!(builder.amount(dec!(50000)).build().is_ok());
    }
}
