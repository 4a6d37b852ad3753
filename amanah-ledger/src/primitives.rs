use serde::{Deserialize, Serialize};

#[macro_export]
macro_rules! owner_id {
    ($name:ident) => {
        #[derive(
            sqlx::Type,
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Deserialize,
            serde::Serialize,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                uuid::Uuid::new_v4().into()
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(uuid::Uuid::parse_str(s)?))
            }
        }
    };
}

/// Surrogate keys handed out by `BIGSERIAL` columns.
#[macro_export]
macro_rules! record_id {
    ($name:ident) => {
        #[derive(
            sqlx::Type,
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Deserialize,
            serde::Serialize,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(i64);

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

crate::owner_id! { OwnerId }

crate::record_id! { LedgerEntryId }
crate::record_id! { ZakatFitrahId }
crate::record_id! { ZakatMalId }
crate::record_id! { ExpenseId }
crate::record_id! { DonorId }
crate::record_id! { DonorPaymentId }
crate::record_id! { QurbanSaverId }
crate::record_id! { QurbanInstallmentId }
crate::record_id! { MustahiqId }

#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    sqlx::Type,
    strum::Display,
    strum::EnumString,
)]
#[sqlx(type_name = "cash_direction", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CashDirection {
    In,
    Out,
}

impl CashDirection {
    /// The effect an entry of `amount` has on the running balance.
    pub fn signed(&self, amount: rust_decimal::Decimal) -> rust_decimal::Decimal {
        match self {
            CashDirection::In => amount,
            CashDirection::Out => -amount,
        }
    }
}

/// The record type that produced a ledger entry as a side effect.
/// Manually recorded entries carry no source.
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type, strum::Display,
)]
#[sqlx(type_name = "ledger_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LedgerSource {
    ZakatFitrah,
    ZakatMal,
    Expense,
    DonorPayment,
    QurbanInstallment,
}

/// Decimal places kept by every money column.
pub const MONEY_SCALE: u32 = 2;

/// Largest value a `NUMERIC(15, 2)` money column holds.
pub fn max_money() -> rust_decimal::Decimal {
    rust_decimal::Decimal::new(999_999_999_999_999, MONEY_SCALE)
}

/// Accepts `value` only if it fits a money column without rounding.
pub(crate) fn check_money(field: &str, value: rust_decimal::Decimal) -> Result<(), String> {
    if value.normalize().scale() > MONEY_SCALE {
        return Err(format!(
            "{field} must have at most {MONEY_SCALE} decimal places, got {value}"
        ));
    }
    if value.abs() > max_money() {
        return Err(format!("{field} must not exceed {}, got {value}", max_money()));
    }
    Ok(())
}

/// Like [`check_money`], and additionally requires `value > 0`.
pub(crate) fn check_positive_money(
    field: &str,
    value: rust_decimal::Decimal,
) -> Result<(), String> {
    if value <= rust_decimal::Decimal::ZERO {
        return Err(format!("{field} must be positive, got {value}"));
    }
    check_money(field, value)
}
