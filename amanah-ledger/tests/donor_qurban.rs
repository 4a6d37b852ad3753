mod helpers;

use rust_decimal_macros::dec;

use amanah_ledger::{
    donor::{error::DonorError, *},
    qurban::{error::QurbanError, *},
    *,
};

#[tokio::test]
async fn donor_payments_flow_through_the_ledger() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let owner = OwnerId::new();
    let donor = ledger
        .donors()
        .create(
            owner,
            NewDonor::builder()
                .name("H. Abdullah")
                .monthly_pledge(dec!(100000))
                .build()?,
        )
        .await?;
    let payment = ledger
        .donors()
        .record_payment(
            owner,
            NewDonorPayment::builder()
                .donor_id(donor.id)
                .payment_date(helpers::day(2))
                .amount(dec!(100000))
                .note("April")
                .recorded_by("Bendahara")
                .build()?,
        )
        .await?;
    assert!(payment.kas_harian_id.is_some());
    assert_eq!(ledger.cash().current_balance(owner).await?, dec!(100000));

    let res = ledger.donors().delete(owner, donor.id).await;
    assert!(matches!(res, Err(DonorError::HasPayments(_, 1))));

    let updated = ledger
        .donors()
        .update(
            owner,
            donor.id,
            DonorUpdate {
                phone: Some("0812000000".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.name, "H. Abdullah");
    assert_eq!(updated.phone.as_deref(), Some("0812000000"));

    ledger.donors().delete_payment(owner, payment.id).await?;
    assert!(ledger.cash().list_chronological(owner).await?.is_empty());
    ledger.donors().delete(owner, donor.id).await?;
    Ok(())
}

#[tokio::test]
async fn qurban_installments_track_progress() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let owner = OwnerId::new();
    let saver = ledger
        .qurban()
        .create_saver(
            owner,
            NewQurbanSaver::builder()
                .name("Pak Rahmat")
                .animal_kind("kambing")
                .target_amount(dec!(3000000))
                .build()?,
        )
        .await?;
    for d in [1, 15] {
        ledger
            .qurban()
            .record_installment(
                owner,
                NewQurbanInstallment::builder()
                    .saver_id(saver.id)
                    .payment_date(helpers::day(d))
                    .amount(dec!(500000))
                    .recorded_by("Bendahara")
                    .build()?,
            )
            .await?;
    }
    let progress = ledger.qurban().progress(owner, saver.id).await?;
    assert_eq!(progress.total_paid, dec!(1000000));
    assert_eq!(progress.remaining, dec!(2000000));
    assert_eq!(progress.installments, 2);
    assert_eq!(ledger.cash().current_balance(owner).await?, dec!(1000000));

    let res = ledger.qurban().delete_saver(owner, saver.id).await;
    assert!(matches!(res, Err(QurbanError::HasInstallments(_, 2))));
    Ok(())
}

#[tokio::test]
async fn donor_delete_waits_for_uncommitted_payment() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let owner = OwnerId::new();
    let donor = ledger
        .donors()
        .create(owner, NewDonor::builder().name("Bu Aisyah").build()?)
        .await?;

    let mut op = ledger.begin_op().await?;
    ledger
        .donors()
        .record_payment_in_op(
            &mut op,
            owner,
            NewDonorPayment::builder()
                .donor_id(donor.id)
                .payment_date(helpers::day(5))
                .amount(dec!(250000))
                .recorded_by("Bendahara")
                .build()?,
        )
        .await?;

    let deleting = {
        let ledger = ledger.clone();
        tokio::spawn(async move { ledger.donors().delete(owner, donor.id).await })
    };
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(!deleting.is_finished());
    op.commit().await?;

    let res = deleting.await?;
    assert!(matches!(res, Err(DonorError::HasPayments(_, 1))));
    assert_eq!(ledger.donors().list_payments(owner, Some(donor.id)).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn saver_delete_waits_for_open_installment() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let owner = OwnerId::new();
    let saver = ledger
        .qurban()
        .create_saver(
            owner,
            NewQurbanSaver::builder()
                .name("Pak Yusuf")
                .animal_kind("sapi")
                .target_amount(dec!(3500000))
                .build()?,
        )
        .await?;

    let mut op = ledger.begin_op().await?;
    ledger
        .qurban()
        .record_installment_in_op(
            &mut op,
            owner,
            NewQurbanInstallment::builder()
                .saver_id(saver.id)
                .payment_date(helpers::day(3))
                .amount(dec!(500000))
                .recorded_by("Bendahara")
                .build()?,
        )
        .await?;
    let deleting = {
        let ledger = ledger.clone();
        tokio::spawn(async move { ledger.qurban().delete_saver(owner, saver.id).await })
    };
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(!deleting.is_finished());
    op.rollback().await?;

    // With the installment rolled back the saver has no history and may go.
    deleting.await??;
    let res = ledger.qurban().find_saver(owner, saver.id).await;
    assert!(matches!(res, Err(QurbanError::SaverNotFound(_))));
    assert_eq!(ledger.cash().current_balance(owner).await?, dec!(0));
    Ok(())
}
