use chrono::{DateTime, NaiveDate, Utc};
use derive_builder::Builder;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::primitives::*;

/// Share of zakatable wealth due when no explicit amount is given.
pub const ZAKAT_MAL_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 3);

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ZakatMal {
    pub id: ZakatMalId,
    pub owner_id: OwnerId,
    pub payer_name: String,
    pub wealth_kind: String,
    pub wealth_value: Decimal,
    pub zakat_amount: Decimal,
    pub payment_date: NaiveDate,
    pub recorded_by: String,
    pub kas_harian_id: Option<LedgerEntryId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct NewZakatMal {
    #[builder(setter(into))]
    pub(crate) payer_name: String,
    #[builder(setter(into))]
    pub(crate) wealth_kind: String,
    pub(crate) wealth_value: Decimal,
    #[builder(setter(strip_option), default)]
    pub(crate) zakat_amount: Option<Decimal>,
    pub(crate) payment_date: NaiveDate,
    #[builder(setter(into))]
    pub(crate) recorded_by: String,
}

impl NewZakatMal {
    pub fn builder() -> NewZakatMalBuilder {
        NewZakatMalBuilder::default()
    }

    /// The explicit amount if one was given, otherwise 2.5 % of the wealth.
    pub fn zakat_due(&self) -> Decimal {
        due(self.wealth_value, self.zakat_amount)
    }
}

fn due(wealth_value: Decimal, explicit: Option<Decimal>) -> Decimal {
    explicit.unwrap_or_else(|| (wealth_value * ZAKAT_MAL_RATE).round_dp(2))
}

impl NewZakatMalBuilder {
    fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("payer_name", self.payer_name.as_ref()),
            ("wealth_kind", self.wealth_kind.as_ref()),
            ("recorded_by", self.recorded_by.as_ref()),
        ] {
            if value.is_some_and(|v| v.trim().is_empty()) {
                return Err(format!("{field} must not be empty"));
            }
        }
        if let Some(wealth_value) = self.wealth_value {
            check_positive_money("wealth_value", wealth_value)?;
            let explicit = self.zakat_amount.flatten();
            check_positive_money("zakat_amount", due(wealth_value, explicit))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn builder(wealth_value: Decimal) -> NewZakatMalBuilder {
        let mut builder = NewZakatMal::builder();
        builder
            .payer_name("Haji Umar")
            .wealth_kind("emas")
            .wealth_value(wealth_value)
            .payment_date(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap())
            .recorded_by("Amil 2");
        builder
    }

    #[test]
    fn rate_is_two_and_a_half_percent() {
        assert_eq!(ZAKAT_MAL_RATE, dec!(0.025));
    }

    #[test]
    fn defaults_to_two_and_a_half_percent() {
        let mal = builder(dec!(120000000)).build().unwrap();
        assert_eq!(mal.zakat_due(), dec!(3000000));
    }

    #[test]
    fn explicit_amount_wins() {
        let mal = builder(dec!(120000000))
            .zakat_amount(dec!(3500000))
            .build()
            .unwrap();
        assert_eq!(mal.zakat_due(), dec!(3500000));
    }

    #[test]
    fn rejects_non_positive_wealth_or_zakat() {
        assert!(builder(dec!(0)).build().is_err());
        assert!(builder(dec!(1000)).zakat_amount(dec!(0)).build().is_err());
    }

    #[test]
    fn rejects_blank_wealth_kind() {
        assert!(builder(dec!(1000)).wealth_kind(" ").build().is_err());
    }
}
