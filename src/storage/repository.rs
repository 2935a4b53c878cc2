use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::application::{DataSource, DataSourceError};
use crate::domain::{AccountRecord, AccountType, BookingRecord, DateRange, LedgerEntry};

use super::MIGRATION_001_INITIAL;

const ACCOUNTS_TABLE: &str = "chart_of_accounts";
const LEDGER_TABLE: &str = "general_ledger";
const BOOKINGS_TABLE: &str = "bookings";

/// SQLite-backed store for the chart of accounts, general ledger and bookings.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Chart of accounts
    // ========================

    pub async fn save_account(&self, account: &AccountRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO chart_of_accounts (id, account_code, name, account_type, current_balance)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.id.to_string())
        .bind(&account.account_code)
        .bind(&account.name)
        .bind(&account.account_type)
        .bind(account.current_balance)
        .execute(&self.pool)
        .await
        .context("Failed to save account")?;
        Ok(())
    }

    pub async fn get_account_by_code(&self, account_code: &str) -> Result<Option<AccountRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, account_code, name, account_type, current_balance
            FROM chart_of_accounts
            WHERE account_code = ?
            "#,
        )
        .bind(account_code)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account by code")?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    // Unknown type strings are kept as-is; classification falls back to the default.
    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<AccountRecord> {
        let id_str: String = row.try_get("id")?;

        Ok(AccountRecord {
            id: Uuid::parse_str(&id_str).context("Invalid account ID")?,
            account_code: row.try_get("account_code")?,
            name: row.try_get("name")?,
            account_type: row.try_get("account_type")?,
            current_balance: row.try_get("current_balance")?,
        })
    }

    // ========================
    // General ledger
    // ========================

    pub async fn save_ledger_entry(&self, entry: &LedgerEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO general_ledger (id, date, account_type, account_code, debit, credit, description)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(timestamp(entry.date))
        .bind(entry.account_type.as_str())
        .bind(&entry.account_code)
        .bind(entry.debit)
        .bind(entry.credit)
        .bind(&entry.description)
        .execute(&self.pool)
        .await
        .context("Failed to save ledger entry")?;
        Ok(())
    }

    fn row_to_ledger_entry(row: &sqlx::sqlite::SqliteRow) -> Result<LedgerEntry> {
        let id_str: String = row.try_get("id")?;
        let date_str: String = row.try_get("date")?;
        let account_type_str: String = row.try_get("account_type")?;

        Ok(LedgerEntry {
            id: Uuid::parse_str(&id_str).context("Invalid ledger entry ID")?,
            date: parse_timestamp(&date_str)?,
            account_type: AccountType::parse(&account_type_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid account type: {}", account_type_str))?,
            account_code: row.try_get("account_code")?,
            debit: row.try_get("debit")?,
            credit: row.try_get("credit")?,
            description: row.try_get("description")?,
        })
    }

    // ========================
    // Bookings
    // ========================

    pub async fn save_booking(&self, booking: &BookingRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, date, sale_amount, description)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(booking.id.to_string())
        .bind(timestamp(booking.date))
        .bind(booking.sale_amount)
        .bind(&booking.description)
        .execute(&self.pool)
        .await
        .context("Failed to save booking")?;
        Ok(())
    }

    fn row_to_booking(row: &sqlx::sqlite::SqliteRow) -> Result<BookingRecord> {
        let id_str: String = row.try_get("id")?;
        let date_str: String = row.try_get("date")?;

        Ok(BookingRecord {
            id: Uuid::parse_str(&id_str).context("Invalid booking ID")?,
            date: parse_timestamp(&date_str)?,
            sale_amount: row.try_get("sale_amount")?,
            description: row.try_get("description")?,
        })
    }
}

#[async_trait]
impl DataSource for Repository {
    async fn query_accounts(
        &self,
        account_codes: Option<&[String]>,
    ) -> Result<Vec<AccountRecord>, DataSourceError> {
        let rows = match account_codes {
            Some([]) => return Ok(Vec::new()),
            Some(codes) => {
                let sql = format!(
                    "SELECT id, account_code, name, account_type, current_balance FROM chart_of_accounts WHERE account_code IN ({}) ORDER BY account_code",
                    placeholders(codes.len())
                );
                let mut query = sqlx::query(&sql);
                for code in codes {
                    query = query.bind(code.as_str());
                }
                query.fetch_all(&self.pool).await
            }
            None => {
                sqlx::query(
                    "SELECT id, account_code, name, account_type, current_balance FROM chart_of_accounts ORDER BY account_code",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DataSourceError::query(ACCOUNTS_TABLE, e))?;

        rows.iter()
            .map(|row| {
                Self::row_to_account(row)
                    .map_err(|e| DataSourceError::invalid_row(ACCOUNTS_TABLE, format!("{:#}", e)))
            })
            .collect()
    }

    async fn query_ledger_entries(
        &self,
        range: DateRange,
        account_types: &[AccountType],
    ) -> Result<Vec<LedgerEntry>, DataSourceError> {
        if account_types.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT id, date, account_type, account_code, debit, credit, description
            FROM general_ledger
            WHERE account_type IN ({}) AND date >= ? AND date < ?
            ORDER BY date
            "#,
            placeholders(account_types.len())
        );
        let mut query = sqlx::query(&sql);
        for account_type in account_types {
            query = query.bind(account_type.as_str());
        }

        let rows = query
            .bind(timestamp(range.start))
            .bind(timestamp(range.end))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DataSourceError::query(LEDGER_TABLE, e))?;

        rows.iter()
            .map(|row| {
                Self::row_to_ledger_entry(row)
                    .map_err(|e| DataSourceError::invalid_row(LEDGER_TABLE, format!("{:#}", e)))
            })
            .collect()
    }

    async fn query_bookings(
        &self,
        range: DateRange,
    ) -> Result<Vec<BookingRecord>, DataSourceError> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, sale_amount, description
            FROM bookings
            WHERE date >= ? AND date < ?
            ORDER BY date
            "#,
        )
        .bind(timestamp(range.start))
        .bind(timestamp(range.end))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DataSourceError::query(BOOKINGS_TABLE, e))?;

        rows.iter()
            .map(|row| {
                Self::row_to_booking(row)
                    .map_err(|e| DataSourceError::invalid_row(BOOKINGS_TABLE, format!("{:#}", e)))
            })
            .collect()
    }
}

/// Fixed-width UTC timestamps so that text comparison in SQL matches time order.
fn timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Invalid timestamp: {}", s))?
        .with_timezone(&Utc))
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
