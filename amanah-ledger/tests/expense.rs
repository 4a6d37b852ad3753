mod helpers;

use rust_decimal_macros::dec;

use amanah_ledger::{expense::error::ExpenseError, expense::*, *};

fn new_expense() -> NewExpense {
    NewExpense::builder()
        .expense_date(helpers::day(10))
        .category("listrik")
        .description("Tagihan PLN April")
        .amount(dec!(750000))
        .requested_by("Takmir")
        .build()
        .unwrap()
}

#[tokio::test]
async fn only_approval_posts_to_the_ledger() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let owner = OwnerId::new();
    let expense = ledger.expenses().create(owner, new_expense()).await?;
    assert_eq!(expense.status, ExpenseStatus::Pending);
    assert!(ledger.cash().list_chronological(owner).await?.is_empty());

    let approved = ledger
        .expenses()
        .approve(owner, expense.id, "Ketua DKM")
        .await?;
    assert_eq!(approved.status, ExpenseStatus::Approved);
    assert_eq!(approved.decided_by.as_deref(), Some("Ketua DKM"));
    assert_eq!(ledger.cash().current_balance(owner).await?, dec!(-750000));

    let again = ledger
        .expenses()
        .approve(owner, expense.id, "Ketua DKM")
        .await?;
    assert_eq!(again.kas_harian_id, approved.kas_harian_id);
    assert_eq!(ledger.cash().list_chronological(owner).await?.len(), 1);

    let res = ledger.expenses().reject(owner, expense.id, "Ketua DKM").await;
    assert!(matches!(res, Err(ExpenseError::InvalidTransition { .. })));

    ledger.expenses().delete(owner, expense.id).await?;
    assert!(ledger.cash().list_chronological(owner).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn rejected_expense_never_touches_the_ledger() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let owner = OwnerId::new();
    let expense = ledger.expenses().create(owner, new_expense()).await?;
    let rejected = ledger
        .expenses()
        .reject(owner, expense.id, "Ketua DKM")
        .await?;
    assert_eq!(rejected.status, ExpenseStatus::Rejected);
    assert!(rejected.kas_harian_id.is_none());

    let res = ledger.expenses().approve(owner, expense.id, "Ketua DKM").await;
    assert!(matches!(res, Err(ExpenseError::InvalidTransition { .. })));
    assert!(ledger.cash().list_chronological(owner).await?.is_empty());

    let pending = ledger
        .expenses()
        .list(owner, Some(ExpenseStatus::Pending))
        .await?;
    assert!(pending.is_empty());
    Ok(())
}
