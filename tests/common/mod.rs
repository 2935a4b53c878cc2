// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use neraca::application::{DashboardService, DataSource, DataSourceError};
use neraca::domain::{AccountRecord, AccountType, BookingRecord, DateRange, LedgerEntry};
use neraca::storage::Repository;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(DashboardService<Repository>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = DashboardService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Open a second connection to the database behind `test_service`, for writing
/// rows the service itself would refuse.
pub async fn raw_pool(temp_dir: &TempDir) -> Result<SqlitePool> {
    let db_path = temp_dir.path().join("test.db");
    Ok(SqlitePool::connect(&format!("sqlite:{}", db_path.display())).await?)
}

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Test fixture: a small trading company's chart of accounts
pub struct StandardAccounts;

impl StandardAccounts {
    pub async fn create(service: &DashboardService<Repository>) -> Result<()> {
        let accounts = [
            ("1101", "Kas", AccountType::Asset, Some(2_500_000)),
            ("1102", "Bank", AccountType::Asset, Some(7_500_000)),
            ("2101", "Utang Usaha", AccountType::Liability, Some(-3_000_000)),
            ("3101", "Modal Pemilik", AccountType::Equity, Some(7_000_000)),
            ("4101", "Penjualan", AccountType::Revenue, Some(12_000_000)),
            ("5101", "Beban Gaji", AccountType::Expense, None),
        ];

        for (code, name, account_type, balance) in accounts {
            service
                .create_account(code.into(), name.into(), account_type, balance)
                .await?;
        }
        Ok(())
    }
}

/// In-memory data source with switchable failures, for exercising degradation paths.
#[derive(Default)]
pub struct InMemorySource {
    pub accounts: Vec<AccountRecord>,
    pub ledger: Vec<LedgerEntry>,
    pub bookings: Vec<BookingRecord>,
    /// Ledger queries whose range starts here fail.
    pub failing_ledger_month: Option<DateTime<Utc>>,
    /// Booking queries whose range starts here fail.
    pub failing_booking_month: Option<DateTime<Utc>>,
    pub fail_accounts: bool,
    pub ledger_queries: AtomicUsize,
    pub booking_queries: AtomicUsize,
}

#[async_trait]
impl DataSource for InMemorySource {
    async fn query_accounts(
        &self,
        account_codes: Option<&[String]>,
    ) -> Result<Vec<AccountRecord>, DataSourceError> {
        if self.fail_accounts {
            return Err(DataSourceError::query("chart_of_accounts", "permission denied"));
        }

        Ok(self
            .accounts
            .iter()
            .filter(|a| account_codes.is_none_or(|codes| codes.contains(&a.account_code)))
            .cloned()
            .collect())
    }

    async fn query_ledger_entries(
        &self,
        range: DateRange,
        account_types: &[AccountType],
    ) -> Result<Vec<LedgerEntry>, DataSourceError> {
        self.ledger_queries.fetch_add(1, Ordering::SeqCst);
        if self.failing_ledger_month == Some(range.start) {
            return Err(DataSourceError::query("general_ledger", "connection reset"));
        }

        Ok(self
            .ledger
            .iter()
            .filter(|e| range.contains(e.date) && account_types.contains(&e.account_type))
            .cloned()
            .collect())
    }

    async fn query_bookings(
        &self,
        range: DateRange,
    ) -> Result<Vec<BookingRecord>, DataSourceError> {
        self.booking_queries.fetch_add(1, Ordering::SeqCst);
        if self.failing_booking_month == Some(range.start) {
            return Err(DataSourceError::query("bookings", "connection reset"));
        }

        Ok(self
            .bookings
            .iter()
            .filter(|b| range.contains(b.date))
            .cloned()
            .collect())
    }
}
