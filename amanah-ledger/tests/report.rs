mod helpers;

use rust_decimal_macros::dec;

use amanah_ledger::{report::error::ReportError, *};

#[tokio::test]
async fn cash_report_bridges_opening_to_closing() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let owner = OwnerId::new();
    ledger
        .cash()
        .append(owner, helpers::entry(helpers::day(1), CashDirection::In, dec!(1000)))
        .await?;
    ledger
        .cash()
        .append(owner, helpers::entry(helpers::day(10), CashDirection::Out, dec!(300)))
        .await?;
    ledger
        .cash()
        .append(owner, helpers::entry(helpers::day(12), CashDirection::In, dec!(50)))
        .await?;
    ledger
        .cash()
        .append(owner, helpers::entry(helpers::day(20), CashDirection::In, dec!(5)))
        .await?;

    let report = ledger
        .reports()
        .cash_report(owner, helpers::day(5), helpers::day(15))
        .await?;
    assert_eq!(report.opening_balance, dec!(1000));
    assert_eq!(report.closing_balance, dec!(750));
    assert_eq!(report.total_in, dec!(50));
    assert_eq!(report.total_out, dec!(300));
    assert_eq!(report.entries.len(), 2);

    let res = ledger
        .reports()
        .cash_report(owner, helpers::day(15), helpers::day(5))
        .await;
    assert!(matches!(res, Err(ReportError::InvalidRange { .. })));
    Ok(())
}
