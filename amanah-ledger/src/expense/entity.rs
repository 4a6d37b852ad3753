use chrono::{DateTime, NaiveDate, Utc};
use derive_builder::Builder;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::primitives::*;

#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    sqlx::Type,
    strum::Display,
    strum::EnumString,
)]
#[sqlx(type_name = "expense_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
}

/// What a status change request amounts to for an expense in a given status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Apply,
    AlreadyDone,
    Forbidden,
}

impl ExpenseStatus {
    /// Only pending expenses move; approved and rejected are final.
    pub fn transition_to(self, target: ExpenseStatus) -> Transition {
        use ExpenseStatus::*;
        match (self, target) {
            (current, target) if current == target => Transition::AlreadyDone,
            (Pending, Approved) | (Pending, Rejected) => Transition::Apply,
            _ => Transition::Forbidden,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Expense {
    pub id: ExpenseId,
    pub owner_id: OwnerId,
    pub expense_date: NaiveDate,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub status: ExpenseStatus,
    pub requested_by: String,
    pub decided_by: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub kas_harian_id: Option<LedgerEntryId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct NewExpense {
    pub(crate) expense_date: NaiveDate,
    #[builder(setter(into))]
    pub(crate) category: String,
    #[builder(setter(into), default)]
    pub(crate) description: String,
    pub(crate) amount: Decimal,
    #[builder(setter(into))]
    pub(crate) requested_by: String,
}

impl NewExpense {
    pub fn builder() -> NewExpenseBuilder {
        NewExpenseBuilder::default()
    }
}

impl NewExpenseBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(amount) = self.amount {
            check_positive_money("amount", amount)?;
        }
        if self
            .category
            .as_ref()
            .is_some_and(|c| c.trim().is_empty() || c.len() > 50)
        {
            return Err("category must be 1 to 50 characters".to_string());
        }
        if self
            .requested_by
            .as_ref()
            .is_some_and(|r| r.trim().is_empty())
        {
            return Err("requested_by must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn pending_can_be_approved_or_rejected() {
        assert_eq!(
            ExpenseStatus::Pending.transition_to(ExpenseStatus::Approved),
            Transition::Apply
        );
        assert_eq!(
            ExpenseStatus::Pending.transition_to(ExpenseStatus::Rejected),
            Transition::Apply
        );
    }

    #[test]
    fn repeated_decision_is_a_no_op() {
        assert_eq!(
            ExpenseStatus::Approved.transition_to(ExpenseStatus::Approved),
            Transition::AlreadyDone
        );
        assert_eq!(
            ExpenseStatus::Rejected.transition_to(ExpenseStatus::Rejected),
            Transition::AlreadyDone
        );
    }

    #[test]
    fn decisions_are_final() {
        assert_eq!(
            ExpenseStatus::Approved.transition_to(ExpenseStatus::Rejected),
            Transition::Forbidden
        );
        assert_eq!(
            ExpenseStatus::Rejected.transition_to(ExpenseStatus::Approved),
            Transition::Forbidden
        );
        assert_eq!(
            ExpenseStatus::Approved.transition_to(ExpenseStatus::Pending),
            Transition::Forbidden
        );
    }

    #[test]
    fn new_expense_requires_positive_amount() {
        let mut builder = NewExpense::builder();
        builder
            .expense_date(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap())
            .category("listrik")
            .amount(dec!(-5))
            .requested_by("Takmir");
        assert!(builder.build().is_err());
        assert!(builder.amount(dec!(350000)).build().is_ok());
    }

    #[test]
    fn status_parses_from_query_strings() {
        assert_eq!(
            "approved".parse::<ExpenseStatus>().unwrap(),
            ExpenseStatus::Approved
        );
        assert_eq!(ExpenseStatus::Pending.to_string(), "pending");
    }
}
