//! Read-only aggregations over the cash book.
pub mod error;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::instrument;

use crate::{
    kas::{CashLedger, LedgerEntry},
    primitives::*,
};

use error::*;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub category: String,
    pub total_in: Decimal,
    pub total_out: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CashReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
    pub total_in: Decimal,
    pub total_out: Decimal,
    pub categories: Vec<CategoryTotals>,
    pub entries: Vec<LedgerEntry>,
}

#[derive(Clone)]
pub struct Reports {
    cash: CashLedger,
}

impl Reports {
    pub(crate) fn new(cash: CashLedger) -> Self {
        Self { cash }
    }

    /// Cash movements of `owner` between `from` and `to`, both inclusive.
    #[instrument(name = "amanah_ledger.reports.cash_report", skip(self), err)]
    pub async fn cash_report(
        &self,
        owner: OwnerId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<CashReport, ReportError> {
        if from > to {
            return Err(ReportError::InvalidRange { from, to });
        }
        let opening_balance = self.cash.balance_before_date(owner, from).await?;
        let entries = self.cash.list_in_range(owner, from, to).await?;
        Ok(build_report(from, to, opening_balance, entries))
    }
}

fn build_report(
    from: NaiveDate,
    to: NaiveDate,
    opening_balance: Decimal,
    entries: Vec<LedgerEntry>,
) -> CashReport {
    let closing_balance = entries
        .last()
        .map(|e| e.balance_after)
        .unwrap_or(opening_balance);
    let categories = category_breakdown(&entries);
    let (total_in, total_out) = categories.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(total_in, total_out), c| (total_in + c.total_in, total_out + c.total_out),
    );
    CashReport {
        from,
        to,
        opening_balance,
        closing_balance,
        total_in,
        total_out,
        categories,
        entries,
    }
}

/// Per-category sums, ordered by category name.
pub fn category_breakdown(entries: &[LedgerEntry]) -> Vec<CategoryTotals> {
    let mut by_category: BTreeMap<&str, CategoryTotals> = BTreeMap::new();
    for entry in entries {
        let totals = by_category
            .entry(entry.category.as_str())
            .or_insert_with(|| CategoryTotals {
                category: entry.category.clone(),
                ..Default::default()
            });
        match entry.direction {
            CashDirection::In => totals.total_in += entry.amount,
            CashDirection::Out => totals.total_out += entry.amount,
        }
    }
    by_category.into_values().collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use super::*;

    fn entry(
        id: i64,
        category: &str,
        direction: CashDirection,
        amount: Decimal,
        balance_before: Decimal,
    ) -> LedgerEntry {
        LedgerEntry {
            id: LedgerEntryId::from(id),
            owner_id: OwnerId::new(),
            entry_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            direction,
            category: category.to_string(),
            description: String::new(),
            amount,
            balance_before,
            balance_after: balance_before + direction.signed(amount),
            recorded_by: "Bendahara".to_string(),
            source: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn breakdown_groups_by_category() {
        let entries = vec![
            entry(1, "infaq", CashDirection::In, dec!(100), dec!(0)),
            entry(2, "listrik", CashDirection::Out, dec!(30), dec!(100)),
            entry(3, "infaq", CashDirection::In, dec!(50), dec!(70)),
        ];
        let breakdown = category_breakdown(&entries);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, "infaq");
        assert_eq!(breakdown[0].total_in, dec!(150));
        assert_eq!(breakdown[1].category, "listrik");
        assert_eq!(breakdown[1].total_out, dec!(30));
    }

    #[test]
    fn report_closes_on_last_entry() {
        let from = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let entries = vec![
            entry(4, "infaq", CashDirection::In, dec!(200), dec!(500)),
            entry(5, "kebersihan", CashDirection::Out, dec!(75), dec!(700)),
        ];
        let report = build_report(from, from, dec!(500), entries);
        assert_eq!(report.opening_balance, dec!(500));
        assert_eq!(report.closing_balance, dec!(625));
        assert_eq!(report.total_in, dec!(200));
        assert_eq!(report.total_out, dec!(75));
        assert_eq!(
            report.opening_balance + report.total_in - report.total_out,
            report.closing_balance
        );
    }

    #[test]
    fn empty_range_keeps_opening_balance() {
        let from = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let report = build_report(from, from, dec!(1234.50), Vec::new());
        assert_eq!(report.closing_balance, dec!(1234.50));
        assert!(report.categories.is_empty());
    }
}
