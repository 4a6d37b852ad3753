use rust_decimal::Decimal;
use serde::Serialize;

use crate::primitives::{CashDirection, LedgerEntryId};

use super::entity::LedgerEntry;

/// Balances cached on one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainLink {
    pub balance_before: Decimal,
    pub balance_after: Decimal,
}

impl ChainLink {
    pub fn following(balance_before: Decimal, direction: CashDirection, amount: Decimal) -> Self {
        Self {
            balance_before,
            balance_after: balance_before + direction.signed(amount),
        }
    }
}

/// Recomputes the running balance of entries already in chronological order.
pub fn replay<'a>(
    deltas: impl IntoIterator<Item = (CashDirection, Decimal)> + 'a,
) -> impl Iterator<Item = ChainLink> + 'a {
    deltas
        .into_iter()
        .scan(Decimal::ZERO, |balance, (direction, amount)| {
            let link = ChainLink::following(*balance, direction, amount);
            *balance = link.balance_after;
            Some(link)
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainDiscrepancy {
    pub entry_id: LedgerEntryId,
    pub stored: ChainLink,
    pub expected: ChainLink,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChainAudit {
    pub entries_checked: usize,
    pub closing_balance: Decimal,
    pub discrepancies: Vec<ChainDiscrepancy>,
}

impl ChainAudit {
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

/// Compares stored balances with a fresh replay. `entries` must be in
/// `(entry_date, created_at, id)` ascending order.
pub fn audit(entries: &[LedgerEntry]) -> ChainAudit {
    let mut discrepancies = Vec::new();
    let mut closing_balance = Decimal::ZERO;
    let expected = replay(entries.iter().map(|e| (e.direction, e.amount)));
    for (entry, expected) in entries.iter().zip(expected) {
        let stored = ChainLink {
            balance_before: entry.balance_before,
            balance_after: entry.balance_after,
        };
        if stored != expected {
            discrepancies.push(ChainDiscrepancy {
                entry_id: entry.id,
                stored,
                expected,
            });
        }
        closing_balance = expected.balance_after;
    }
    ChainAudit {
        entries_checked: entries.len(),
        closing_balance,
        discrepancies,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::primitives::OwnerId;

    fn entry(id: i64, direction: CashDirection, amount: Decimal, link: ChainLink) -> LedgerEntry {
        LedgerEntry {
            id: LedgerEntryId::from(id),
            owner_id: OwnerId::new(),
            entry_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            direction,
            category: "operasional".to_string(),
            description: String::new(),
            amount,
            balance_before: link.balance_before,
            balance_after: link.balance_after,
            recorded_by: "bendahara".to_string(),
            source: None,
            created_at: Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(),
        }
    }

    #[test]
    fn replay_chains_each_entry_to_its_predecessor() {
        let links: Vec<_> = replay([
            (CashDirection::In, dec!(100)),
            (CashDirection::Out, dec!(30)),
            (CashDirection::In, dec!(50)),
        ])
        .collect();

        assert_eq!(links[0], ChainLink::following(dec!(0), CashDirection::In, dec!(100)));
        assert_eq!(links[1].balance_before, dec!(100));
        assert_eq!(links[1].balance_after, dec!(70));
        assert_eq!(links[2].balance_before, dec!(70));
        assert_eq!(links[2].balance_after, dec!(120));
    }

    #[test]
    fn replay_after_removing_middle_entry_closes_the_gap() {
        let links: Vec<_> =
            replay([(CashDirection::In, dec!(100)), (CashDirection::In, dec!(50))]).collect();

        assert_eq!(links[0].balance_before, dec!(0));
        assert_eq!(links[0].balance_after, dec!(100));
        assert_eq!(links[1].balance_before, dec!(100));
        assert_eq!(links[1].balance_after, dec!(150));
    }

    #[test]
    fn balance_may_go_negative() {
        let last = replay([(CashDirection::Out, dec!(25.50))]).last().unwrap();
        assert_eq!(last.balance_after, dec!(-25.50));
    }

    #[test]
    fn audit_flags_stale_entries_only() {
        let entries = vec![
            entry(
                1,
                CashDirection::In,
                dec!(100),
                ChainLink::following(dec!(0), CashDirection::In, dec!(100)),
            ),
            // stale: still chained to a deleted predecessor
            entry(
                3,
                CashDirection::In,
                dec!(50),
                ChainLink::following(dec!(70), CashDirection::In, dec!(50)),
            ),
        ];

        let audit = audit(&entries);

        assert!(!audit.is_consistent());
        assert_eq!(audit.entries_checked, 2);
        assert_eq!(audit.closing_balance, dec!(150));
        assert_eq!(audit.discrepancies.len(), 1);
        assert_eq!(audit.discrepancies[0].entry_id, LedgerEntryId::from(3));
        assert_eq!(audit.discrepancies[0].expected.balance_before, dec!(100));
    }

    #[test]
    fn empty_chain_is_consistent_at_zero() {
        let audit = audit(&[]);
        assert!(audit.is_consistent());
        assert_eq!(audit.closing_balance, Decimal::ZERO);
    }
}
