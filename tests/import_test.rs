mod common;

use anyhow::Result;
use common::{parse_date, test_service};
use neraca::domain::BalanceSheetCategory;
use neraca::io::{ImportKind, ImportOptions, Importer};

const ACCOUNTS_CSV: &str = "\
account_code,name,account_type,current_balance
1101,Kas,Asset,1500000.50
2101,Utang Usaha,Liability,-400000
3101,Modal,Equity,
5201,HPP,Cost of Goods Sold,0
";

#[tokio::test]
async fn test_import_accounts() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let importer = Importer::new(&service);

    let result = importer
        .import(
            ImportKind::Accounts,
            ACCOUNTS_CSV.as_bytes(),
            &ImportOptions::default(),
        )
        .await?;

    assert_eq!(result.imported, 4);
    assert!(result.errors.is_empty());

    let accounts = service.list_accounts().await?;
    assert_eq!(accounts.len(), 4);
    assert_eq!(accounts[0].current_balance, Some(150_000_050));
    assert_eq!(accounts[2].current_balance, None);

    let report = service.balance_sheet().await;
    assert_eq!(
        report.summary.amount_for(BalanceSheetCategory::Liabilities),
        40_000_000
    );

    Ok(())
}

#[tokio::test]
async fn test_import_accounts_duplicates() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let importer = Importer::new(&service);
    let options = ImportOptions::default();

    importer
        .import(ImportKind::Accounts, ACCOUNTS_CSV.as_bytes(), &options)
        .await?;

    // Second run reports every line as a duplicate
    let again = importer
        .import(ImportKind::Accounts, ACCOUNTS_CSV.as_bytes(), &options)
        .await?;
    assert_eq!(again.imported, 0);
    assert_eq!(again.errors.len(), 4);

    let skipping = ImportOptions {
        skip_duplicates: true,
        ..Default::default()
    };
    let skipped = importer
        .import(ImportKind::Accounts, ACCOUNTS_CSV.as_bytes(), &skipping)
        .await?;
    assert_eq!(skipped.skipped, 4);
    assert!(skipped.errors.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_import_ledger_and_bookings_feed_trend() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let importer = Importer::new(&service);
    let options = ImportOptions::default();

    let ledger_csv = "\
date,account_type,account_code,debit,credit,description
2024-03-02,Expense,5101,30,,Listrik
2024-03-09,cogs,5201,20,5,
2024-02-28,Expense,5101,99,,Sewa
";
    let bookings_csv = "\
date,sale_amount,description
2024-03-05,100,
2024-03-21T15:30:00+07:00,50,Online
";

    let ledger = importer
        .import(ImportKind::Ledger, ledger_csv.as_bytes(), &options)
        .await?;
    let bookings = importer
        .import(ImportKind::Bookings, bookings_csv.as_bytes(), &options)
        .await?;
    assert_eq!(ledger.imported, 3);
    assert_eq!(bookings.imported, 2);

    let series = service
        .revenue_expense_trend(parse_date("2024-03-25"))
        .await;
    let march = series.points.last().unwrap();
    assert_eq!(march.revenue, 15000);
    assert_eq!(march.expenses, 4500);
    assert_eq!(series.points[10].expenses, 9900);

    Ok(())
}

#[tokio::test]
async fn test_import_reports_bad_lines_and_keeps_good_ones() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let importer = Importer::new(&service);

    let csv = "\
date,account_type,account_code,debit,credit,description
2024-03-02,Expense,5101,30,,ok
03/02/2024,Expense,5101,30,,bad date
2024-03-02,Other,5101,30,,bad type
2024-03-02,Expense,5101,abc,,bad amount
2024-03-02,Expense,5101,-5,,negative
2024-03-02,Expense,5101,,,nothing
";

    let result = importer
        .import(ImportKind::Ledger, csv.as_bytes(), &ImportOptions::default())
        .await?;

    assert_eq!(result.imported, 1);
    let lines: Vec<usize> = result.errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, vec![3, 4, 5, 6, 7]);
    assert_eq!(result.errors[0].field.as_deref(), Some("date"));
    assert_eq!(result.errors[1].field.as_deref(), Some("account_type"));
    assert_eq!(result.errors[2].field.as_deref(), Some("debit"));
    assert_eq!(result.errors[3].field.as_deref(), Some("debit"));

    Ok(())
}

#[tokio::test]
async fn test_import_dry_run_writes_nothing() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let importer = Importer::new(&service);
    let options = ImportOptions {
        dry_run: true,
        ..Default::default()
    };

    let result = importer
        .import(ImportKind::Accounts, ACCOUNTS_CSV.as_bytes(), &options)
        .await?;

    assert_eq!(result.imported, 4);
    assert!(service.list_accounts().await?.is_empty());
    Ok(())
}

#[test]
fn test_import_kind_parse() {
    assert_eq!("Ledger".parse::<ImportKind>(), Ok(ImportKind::Ledger));
    assert!("transfers".parse::<ImportKind>().is_err());
}
