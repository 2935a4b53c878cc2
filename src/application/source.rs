use async_trait::async_trait;

use crate::domain::{AccountRecord, AccountType, BookingRecord, DateRange, LedgerEntry};

use super::DataSourceError;

/// Read access to the accounting tables the dashboard aggregates.
///
/// Implementations return read-only snapshots. Every call may fail
/// independently; callers decide how a failure degrades the result.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Chart of accounts, optionally restricted to the given account codes.
    async fn query_accounts(
        &self,
        account_codes: Option<&[String]>,
    ) -> Result<Vec<AccountRecord>, DataSourceError>;

    /// General ledger rows with `date` in `range` and an account type in `account_types`.
    async fn query_ledger_entries(
        &self,
        range: DateRange,
        account_types: &[AccountType],
    ) -> Result<Vec<LedgerEntry>, DataSourceError>;

    /// Bookings with `date` in `range`.
    async fn query_bookings(&self, range: DateRange)
    -> Result<Vec<BookingRecord>, DataSourceError>;
}
