mod common;

use anyhow::Result;
use chrono::{DateTime, Utc};
use common::{parse_date, test_service};
use neraca::application::FigureStatus;
use neraca::domain::AccountType;

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

#[tokio::test]
async fn test_march_bucket_sums_bookings_and_expenses() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .record_booking(parse_date("2024-03-05"), 10000, None)
        .await?;
    service
        .record_booking(parse_date("2024-03-18"), 5000, Some("Walk-in sale".into()))
        .await?;
    service
        .record_ledger_entry(
            parse_date("2024-03-10"),
            AccountType::Expense,
            3000,
            0,
            Some("5101".into()),
            None,
        )
        .await?;

    let series = service
        .revenue_expense_trend(at("2024-03-20T10:00:00Z"))
        .await;

    assert_eq!(series.points.len(), 12);
    let march = series.points.last().unwrap();
    assert_eq!(march.label, "Mar 2024");
    assert_eq!(march.revenue, 15000);
    assert_eq!(march.expenses, 3000);
    assert_eq!(march.revenue_status, FigureStatus::Ok);
    assert_eq!(march.expense_status, FigureStatus::Ok);

    // Every other month is empty
    assert!(
        series.points[..11]
            .iter()
            .all(|p| p.revenue == 0 && p.expenses == 0)
    );

    Ok(())
}

#[tokio::test]
async fn test_month_boundaries_are_half_open() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .record_booking(at("2024-02-29T23:59:59Z"), 700, None)
        .await?;
    service
        .record_booking(at("2024-03-01T00:00:00Z"), 300, None)
        .await?;
    service
        .record_booking(at("2024-04-01T00:00:00Z"), 9999, None)
        .await?;

    let series = service
        .revenue_expense_trend(at("2024-03-31T23:00:00Z"))
        .await;

    let february = &series.points[10];
    let march = &series.points[11];
    assert_eq!(february.label, "Feb 2024");
    assert_eq!(february.revenue, 700);
    assert_eq!(march.revenue, 300);
    // April lies after the window
    assert_eq!(series.total_revenue(), 1000);

    Ok(())
}

#[tokio::test]
async fn test_ledger_month_boundaries_are_half_open() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .record_ledger_entry(at("2024-02-29T23:59:59Z"), AccountType::Expense, 400, 0, None, None)
        .await?;
    service
        .record_ledger_entry(at("2024-03-01T00:00:00Z"), AccountType::Expense, 250, 0, None, None)
        .await?;
    service
        .record_ledger_entry(
            at("2024-03-31T23:59:59Z"),
            AccountType::CostOfGoodsSold,
            50,
            0,
            None,
            None,
        )
        .await?;
    service
        .record_ledger_entry(at("2024-04-01T00:00:00Z"), AccountType::Expense, 8888, 0, None, None)
        .await?;

    let series = service
        .revenue_expense_trend(at("2024-03-15T12:00:00Z"))
        .await;

    assert_eq!(series.points[10].label, "Feb 2024");
    assert_eq!(series.points[10].expenses, 400);
    assert_eq!(series.points[11].expenses, 300);
    // April lies after the window
    assert_eq!(series.total_expenses(), 700);

    // Moving the window forward picks the April line up on its own
    let next = service
        .revenue_expense_trend(at("2024-04-01T00:00:00Z"))
        .await;
    assert_eq!(next.points[10].expenses, 300);
    assert_eq!(next.points[11].expenses, 8888);

    Ok(())
}

#[tokio::test]
async fn test_expenses_include_cogs_and_net_credits() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let day = parse_date("2024-06-12");

    service
        .record_ledger_entry(day, AccountType::Expense, 40000, 0, None, None)
        .await?;
    service
        .record_ledger_entry(day, AccountType::CostOfGoodsSold, 25000, 0, None, None)
        .await?;
    // Refund credited back to the expense account
    service
        .record_ledger_entry(day, AccountType::Expense, 0, 5000, None, None)
        .await?;
    // Other account types never count as expenses
    service
        .record_ledger_entry(day, AccountType::Revenue, 0, 80000, None, None)
        .await?;
    service
        .record_ledger_entry(day, AccountType::Asset, 80000, 0, None, None)
        .await?;

    let series = service
        .revenue_expense_trend(parse_date("2024-06-30"))
        .await;

    let june = series.points.last().unwrap();
    assert_eq!(june.expenses, 60000);
    // Revenue comes from bookings only
    assert_eq!(june.revenue, 0);

    Ok(())
}

#[tokio::test]
async fn test_net_credit_reported_as_magnitude() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .record_ledger_entry(
            parse_date("2024-06-03"),
            AccountType::Expense,
            1000,
            4000,
            None,
            None,
        )
        .await?;

    let series = service
        .revenue_expense_trend(parse_date("2024-06-15"))
        .await;

    assert_eq!(series.points.last().unwrap().expenses, 3000);
    Ok(())
}

#[tokio::test]
async fn test_trend_across_year_boundary() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .record_booking(parse_date("2023-02-01"), 111, None)
        .await?;
    service
        .record_booking(parse_date("2023-12-31"), 222, None)
        .await?;
    service
        .record_booking(parse_date("2024-01-02"), 333, None)
        .await?;
    // Just before the window starts
    service
        .record_booking(at("2023-01-31T23:59:59Z"), 999, None)
        .await?;

    let series = service
        .revenue_expense_trend(parse_date("2024-01-15"))
        .await;

    let labels: Vec<&str> = series.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels.first(), Some(&"Feb 2023"));
    assert_eq!(labels[10], "Dec 2023");
    assert_eq!(labels[11], "Jan 2024");

    assert_eq!(series.points[0].revenue, 111);
    assert_eq!(series.points[10].revenue, 222);
    assert_eq!(series.points[11].revenue, 333);
    assert_eq!(series.total_revenue(), 666);

    Ok(())
}

#[tokio::test]
async fn test_trend_is_idempotent() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .record_booking(parse_date("2024-05-05"), 12345, None)
        .await?;
    service
        .record_ledger_entry(
            parse_date("2024-04-05"),
            AccountType::Expense,
            678,
            0,
            None,
            None,
        )
        .await?;

    let now = parse_date("2024-05-20");
    let first = service.revenue_expense_trend(now).await;
    let second = service.revenue_expense_trend(now).await;

    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_empty_store_yields_twelve_zero_buckets() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let series = service
        .revenue_expense_trend(parse_date("2024-09-01"))
        .await;

    assert_eq!(series.points.len(), 12);
    assert_eq!(series.degraded_points(), 0);
    for pair in series.points.windows(2) {
        assert_eq!(pair[0].bucket.end, pair[1].bucket.start);
    }
    assert!(series.points.iter().all(|p| p.revenue == 0 && p.expenses == 0));

    Ok(())
}
