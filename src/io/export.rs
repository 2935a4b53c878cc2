use anyhow::Result;
use std::io::Write;

use crate::application::{AccountCardsReport, BalanceSheetReport, TrendSeries};

/// Write the balance-sheet slices as `category,label,amount_cents`.
pub fn write_balance_sheet_csv<W: Write>(report: &BalanceSheetReport, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["category", "label", "amount_cents"])?;

    for slice in &report.summary.slices {
        csv_writer.write_record([
            format!("{:?}", slice.category).to_lowercase(),
            slice.label.clone(),
            slice.amount.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(report.summary.slices.len())
}

/// Write one row per month: `year,month,label,revenue_cents,expenses_cents,status`.
pub fn write_trend_csv<W: Write>(series: &TrendSeries, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "year",
        "month",
        "label",
        "revenue_cents",
        "expenses_cents",
        "status",
    ])?;

    for point in &series.points {
        csv_writer.write_record([
            point.bucket.year.to_string(),
            point.bucket.month.to_string(),
            point.label.clone(),
            point.revenue.to_string(),
            point.expenses.to_string(),
            if point.is_degraded() { "degraded" } else { "ok" }.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(series.points.len())
}

/// Write account cards as `account_code,name,account_type,category_label,balance_cents`.
pub fn write_account_cards_csv<W: Write>(report: &AccountCardsReport, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "account_code",
        "name",
        "account_type",
        "category_label",
        "balance_cents",
    ])?;

    for card in &report.cards {
        csv_writer.write_record([
            card.account_code.as_str(),
            card.name.as_str(),
            card.account_type.as_str(),
            card.category_label.as_str(),
            card.balance.to_string().as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(report.cards.len())
}
