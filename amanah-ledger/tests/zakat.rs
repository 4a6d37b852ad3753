mod helpers;

use rust_decimal_macros::dec;

use amanah_ledger::{kas::error::CashLedgerError, zakat::error::ZakatError, zakat::*, *};

#[tokio::test]
async fn rice_fitrah_posts_its_cash_equivalent() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let owner = OwnerId::new();
    let payment = NewZakatFitrah::builder()
        .payer_name("Keluarga Hasan")
        .souls(4)
        .payment(FitrahPayment::Rice {
            rice_kg: dec!(10),
            price_per_kg: dec!(15000),
        })
        .payment_date(helpers::day(8))
        .recorded_by("Amil 1")
        .build()?;
    let record = ledger.zakat_fitrah().record(owner, payment).await?;
    assert_eq!(record.cash_equivalent, dec!(150000));

    let entry_id = record.kas_harian_id.expect("linked entry");
    let entry = ledger.cash().find_by_id(owner, entry_id).await?;
    assert_eq!(entry.direction, CashDirection::In);
    assert_eq!(entry.category, ZAKAT_FITRAH_CATEGORY);
    assert_eq!(entry.amount, dec!(150000));
    assert_eq!(entry.source, Some(LedgerSource::ZakatFitrah));

    let summary = ledger.zakat_fitrah().summary(owner).await?;
    assert_eq!(summary.souls, 4);
    assert_eq!(summary.total_rice_kg, dec!(10));

    let res = ledger.cash().delete(owner, entry_id).await;
    assert!(matches!(
        res,
        Err(CashLedgerError::OwnedBySource(_, LedgerSource::ZakatFitrah))
    ));

    ledger.zakat_fitrah().delete(owner, record.id).await?;
    assert!(ledger.cash().list_chronological(owner).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn zakat_mal_defaults_to_two_and_a_half_percent() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let owner = OwnerId::new();
    let payment = NewZakatMal::builder()
        .payer_name("H. Ahmad")
        .wealth_kind("emas")
        .wealth_value(dec!(100000000))
        .payment_date(helpers::day(9))
        .recorded_by("Amil 2")
        .build()?;
    let record = ledger.zakat_mal().record(owner, payment).await?;
    assert_eq!(record.zakat_amount, dec!(2500000));
    assert_eq!(ledger.cash().current_balance(owner).await?, dec!(2500000));
    Ok(())
}

#[tokio::test]
async fn failed_ledger_append_leaves_no_zakat_record() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let pool = helpers::init_pool().await?;
    sqlx::query(
        r#"CREATE OR REPLACE FUNCTION reject_marked_kas_harian() RETURNS TRIGGER AS $$
        BEGIN
          IF NEW.description LIKE '%REJECT-LEDGER-WRITE%' THEN
            RAISE EXCEPTION 'ledger write rejected';
          END IF;
          RETURN NEW;
        END;
        $$ LANGUAGE plpgsql"#,
    )
    .execute(&pool)
    .await?;
    sqlx::query(
        r#"CREATE OR REPLACE TRIGGER reject_marked_kas_harian
        BEFORE INSERT ON kas_harian
        FOR EACH ROW EXECUTE FUNCTION reject_marked_kas_harian()"#,
    )
    .execute(&pool)
    .await?;

    let owner = OwnerId::new();
    let payment = NewZakatFitrah::builder()
        .payer_name(format!("REJECT-LEDGER-WRITE {}", helpers::random_suffix()))
        .payment(FitrahPayment::Cash {
            amount: dec!(45000),
        })
        .payment_date(helpers::day(8))
        .recorded_by("Amil 1")
        .build()?;
    let res = ledger.zakat_fitrah().record(owner, payment).await;
    assert!(matches!(res, Err(ZakatError::CashLedger(_))));

    assert!(ledger
        .zakat_fitrah()
        .list(owner, None, None)
        .await?
        .is_empty());
    assert!(ledger.cash().list_chronological(owner).await?.is_empty());
    Ok(())
}
