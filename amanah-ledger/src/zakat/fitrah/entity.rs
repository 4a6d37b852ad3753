use chrono::{DateTime, NaiveDate, Utc};
use derive_builder::Builder;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::primitives::*;

/// `rice_kg` is stored as `NUMERIC(10, 2)`.
const MAX_RICE_KG: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "zakat_payment_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ZakatPaymentKind {
    Cash,
    Rice,
}

/// How a zakat fitrah was settled: in money, or in rice valued at a unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "payment_kind", rename_all = "snake_case")]
pub enum FitrahPayment {
    Cash {
        amount: Decimal,
    },
    Rice {
        rice_kg: Decimal,
        price_per_kg: Decimal,
    },
}

impl FitrahPayment {
    pub fn kind(&self) -> ZakatPaymentKind {
        match self {
            FitrahPayment::Cash { .. } => ZakatPaymentKind::Cash,
            FitrahPayment::Rice { .. } => ZakatPaymentKind::Rice,
        }
    }

    /// The amount posted to the cash ledger.
    pub fn cash_equivalent(&self) -> Decimal {
        match self {
            FitrahPayment::Cash { amount } => *amount,
            FitrahPayment::Rice {
                rice_kg,
                price_per_kg,
            } => (rice_kg * price_per_kg).round_dp(2),
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            FitrahPayment::Cash { amount } => check_positive_money("amount", *amount),
            FitrahPayment::Rice {
                rice_kg,
                price_per_kg,
            } => {
                check_positive_money("price_per_kg", *price_per_kg)?;
                if *rice_kg <= Decimal::ZERO || rice_kg.normalize().scale() > MONEY_SCALE {
                    return Err(format!(
                        "rice_kg must be positive with at most {MONEY_SCALE} decimal places, got {rice_kg}"
                    ));
                }
                if *rice_kg >= MAX_RICE_KG {
                    return Err(format!("rice_kg must be below {MAX_RICE_KG}, got {rice_kg}"));
                }
                let value = self.cash_equivalent();
                if value <= Decimal::ZERO {
                    return Err("cash equivalent rounds to zero".to_string());
                }
                check_money("cash equivalent", value)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ZakatFitrah {
    pub id: ZakatFitrahId,
    pub owner_id: OwnerId,
    pub payer_name: String,
    pub souls: i32,
    pub payment_kind: ZakatPaymentKind,
    pub amount: Option<Decimal>,
    pub rice_kg: Option<Decimal>,
    pub price_per_kg: Option<Decimal>,
    pub cash_equivalent: Decimal,
    pub payment_date: NaiveDate,
    pub recorded_by: String,
    pub kas_harian_id: Option<LedgerEntryId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct NewZakatFitrah {
    #[builder(setter(into))]
    pub(crate) payer_name: String,
    #[builder(default = "1")]
    pub(crate) souls: i32,
    pub(crate) payment: FitrahPayment,
    pub(crate) payment_date: NaiveDate,
    #[builder(setter(into))]
    pub(crate) recorded_by: String,
}

impl NewZakatFitrah {
    pub fn builder() -> NewZakatFitrahBuilder {
        NewZakatFitrahBuilder::default()
    }
}

impl NewZakatFitrahBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = self.payer_name.as_ref() {
            if name.trim().is_empty() {
                return Err("payer_name must not be empty".to_string());
            }
        }
        if let Some(souls) = self.souls {
            if souls < 1 {
                return Err(format!("souls must be at least 1, got {souls}"));
            }
        }
        if let Some(recorded_by) = self.recorded_by.as_ref() {
            if recorded_by.trim().is_empty() {
                return Err("recorded_by must not be empty".to_string());
            }
        }
        if let Some(payment) = self.payment.as_ref() {
            payment.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ZakatFitrahSummary {
    pub payers: i64,
    pub souls: i64,
    pub total_cash: Decimal,
    pub total_rice_kg: Decimal,
    pub total_cash_equivalent: Decimal,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn builder(payment: FitrahPayment) -> NewZakatFitrahBuilder {
        let mut builder = NewZakatFitrah::builder();
        builder
            .payer_name("Keluarga Hasan")
            .souls(4)
            .payment(payment)
            .payment_date(NaiveDate::from_ymd_opt(2024, 4, 8).unwrap())
            .recorded_by("Amil 1");
        builder
    }

    #[test]
    fn rice_payment_is_valued_at_unit_price() {
        let payment = FitrahPayment::Rice {
            rice_kg: dec!(10),
            price_per_kg: dec!(15000),
        };
        assert_eq!(payment.kind(), ZakatPaymentKind::Rice);
        assert_eq!(payment.cash_equivalent(), dec!(150000));
    }

    #[test]
    fn rice_value_is_rounded_to_cents() {
        let payment = FitrahPayment::Rice {
            rice_kg: dec!(2.5),
            price_per_kg: dec!(14999.999),
        };
        assert_eq!(payment.cash_equivalent(), dec!(37500.00));
    }

    #[test]
    fn cash_payment_posts_its_amount() {
        let payment = FitrahPayment::Cash {
            amount: dec!(180000),
        };
        assert_eq!(payment.cash_equivalent(), dec!(180000));
        assert!(builder(payment).build().is_ok());
    }

    #[test]
    fn rejects_non_positive_payments() {
        assert!(builder(FitrahPayment::Cash { amount: dec!(0) })
            .build()
            .is_err());
        assert!(builder(FitrahPayment::Rice {
            rice_kg: dec!(2.5),
            price_per_kg: dec!(-1)
        })
        .build()
        .is_err());
    }

    #[test]
    fn rejects_amounts_finer_than_cents() {
        assert!(builder(FitrahPayment::Cash {
            amount: dec!(45000.005)
        })
        .build()
        .is_err());
        assert!(builder(FitrahPayment::Rice {
            rice_kg: dec!(2.505),
            price_per_kg: dec!(15000)
        })
        .build()
        .is_err());
    }

    #[test]
    fn rejects_zero_souls() {
        assert!(builder(FitrahPayment::Cash { amount: dec!(45000) })
            .souls(0)
            .build()
            .is_err());
    }

    #[test]
    fn payment_deserializes_from_tagged_json() {
        let payment: FitrahPayment = serde_json::from_str(
            r#"{ "payment_kind": "rice", "rice_kg": "2.5", "price_per_kg": "15000" }"#,
        )
        .unwrap();
        assert_eq!(payment.cash_equivalent(), dec!(37500));
    }
}
