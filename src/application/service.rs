use chrono::{DateTime, Utc};

use crate::domain::{
    AccountRecord, AccountType, BookingRecord, Cents, LedgerEntry, MonthBucket, month_buckets,
    summarize_balance_sheet, total_expenses, total_revenue,
};
use crate::storage::Repository;

use super::{
    AccountCard, AccountCardsReport, AppError, BalanceSheetReport, Dashboard, DataSource,
    DataSourceError, FigureStatus, TrendPoint, TrendSeries,
};

/// Number of monthly buckets in the revenue/expense trend.
pub const TREND_MONTHS: u32 = 12;

/// Application service computing dashboard figures from a [`DataSource`].
///
/// The aggregation operations never fail: a failed query is logged, its figure
/// becomes zero, and the accompanying [`FigureStatus`] records the failure.
pub struct DashboardService<S> {
    source: S,
}

impl<S: DataSource> DashboardService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    // ========================
    // Aggregations
    // ========================

    /// Assets, liabilities and equity totals across the chart of accounts.
    pub async fn balance_sheet(&self) -> BalanceSheetReport {
        match self.source.query_accounts(None).await {
            Ok(accounts) => BalanceSheetReport {
                summary: summarize_balance_sheet(&accounts),
                status: FigureStatus::Ok,
            },
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "account query failed; balance sheet reported empty"
                );
                BalanceSheetReport {
                    summary: Default::default(),
                    status: failed(&err),
                }
            }
        }
    }

    /// Revenue and expenses for the twelve calendar months ending with the one containing `now`.
    pub async fn revenue_expense_trend(&self, now: DateTime<Utc>) -> TrendSeries {
        let mut points = Vec::with_capacity(TREND_MONTHS as usize);
        for bucket in month_buckets(now, TREND_MONTHS) {
            points.push(self.trend_point(bucket).await);
        }

        let series = TrendSeries { as_of: now, points };
        if series.degraded_points() > 0 {
            tracing::warn!(
                degraded = series.degraded_points(),
                "revenue/expense trend computed with failed queries"
            );
        }
        series
    }

    async fn trend_point(&self, bucket: MonthBucket) -> TrendPoint {
        let range = bucket.range();
        let label = bucket.label();

        // The two tables are independent, so query them together
        let (bookings, entries) = tokio::join!(
            self.source.query_bookings(range),
            self.source
                .query_ledger_entries(range, &AccountType::EXPENSE_TYPES)
        );

        let (revenue, revenue_status) = match bookings {
            Ok(bookings) => (total_revenue(&bookings), FigureStatus::Ok),
            Err(err) => {
                tracing::warn!(
                    bucket = %label,
                    error = %err,
                    "booking query failed; revenue reported as zero"
                );
                (0, failed(&err))
            }
        };

        let (expenses, expense_status) = match entries {
            Ok(entries) => (total_expenses(&entries), FigureStatus::Ok),
            Err(err) => {
                tracing::warn!(
                    bucket = %label,
                    error = %err,
                    "ledger query failed; expenses reported as zero"
                );
                (0, failed(&err))
            }
        };

        tracing::debug!(bucket = %label, revenue, expenses, "trend bucket computed");

        TrendPoint {
            bucket,
            label,
            revenue,
            expenses,
            revenue_status,
            expense_status,
        }
    }

    /// Balance cards for the given account codes (all accounts when `None`), ordered by code.
    pub async fn account_cards(&self, account_codes: Option<&[String]>) -> AccountCardsReport {
        match self.source.query_accounts(account_codes).await {
            Ok(accounts) => {
                let mut cards: Vec<AccountCard> = accounts.iter().map(account_card).collect();
                cards.sort_by(|a, b| a.account_code.cmp(&b.account_code));
                AccountCardsReport {
                    cards,
                    status: FigureStatus::Ok,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "account query failed; no account cards shown");
                AccountCardsReport {
                    cards: Vec::new(),
                    status: failed(&err),
                }
            }
        }
    }

    /// All dashboard widgets for one reference instant.
    pub async fn dashboard(&self, now: DateTime<Utc>) -> Dashboard {
        let cards = self.account_cards(None).await;
        let balance_sheet = self.balance_sheet().await;
        let trend = self.revenue_expense_trend(now).await;

        Dashboard {
            as_of: now,
            cards,
            balance_sheet,
            trend,
        }
    }
}

fn failed(err: &DataSourceError) -> FigureStatus {
    FigureStatus::Failed {
        reason: err.to_string(),
    }
}

fn account_card(account: &AccountRecord) -> AccountCard {
    let display = account.display();
    AccountCard {
        account_code: account.account_code.clone(),
        name: account.name.clone(),
        account_type: account.account_type.clone(),
        category_label: display.label.to_string(),
        icon: display.icon.to_string(),
        color: display.color.to_string(),
        balance: account.balance(),
    }
}

impl DashboardService<Repository> {
    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Recording rows
    // ========================

    /// Add an account to the chart of accounts.
    pub async fn create_account(
        &self,
        account_code: String,
        name: String,
        account_type: AccountType,
        current_balance: Option<Cents>,
    ) -> Result<AccountRecord, AppError> {
        if self
            .source
            .get_account_by_code(&account_code)
            .await?
            .is_some()
        {
            return Err(AppError::AccountAlreadyExists(account_code));
        }

        let mut account = AccountRecord::new(account_code, name, account_type);
        account.current_balance = current_balance;

        self.source.save_account(&account).await?;
        tracing::info!(
            code = %account.account_code,
            account_type = %account.account_type,
            "account created"
        );
        Ok(account)
    }

    /// List the whole chart of accounts.
    pub async fn list_accounts(&self) -> Result<Vec<AccountRecord>, AppError> {
        Ok(self.source.query_accounts(None).await?)
    }

    /// Record a general ledger line.
    pub async fn record_ledger_entry(
        &self,
        date: DateTime<Utc>,
        account_type: AccountType,
        debit: Cents,
        credit: Cents,
        account_code: Option<String>,
        description: Option<String>,
    ) -> Result<LedgerEntry, AppError> {
        if debit < 0 || credit < 0 {
            return Err(AppError::InvalidAmount(
                "Debit and credit must not be negative".to_string(),
            ));
        }
        if debit == 0 && credit == 0 {
            return Err(AppError::InvalidAmount(
                "Either debit or credit must be non-zero".to_string(),
            ));
        }

        let mut entry = LedgerEntry::new(date, account_type, debit, credit);
        entry.account_code = account_code;
        entry.description = description;

        self.source.save_ledger_entry(&entry).await?;
        Ok(entry)
    }

    /// Record a sale in the bookings table.
    pub async fn record_booking(
        &self,
        date: DateTime<Utc>,
        sale_amount: Cents,
        description: Option<String>,
    ) -> Result<BookingRecord, AppError> {
        if sale_amount < 0 {
            return Err(AppError::InvalidAmount(
                "Sale amount must not be negative".to_string(),
            ));
        }

        let mut booking = BookingRecord::new(date, sale_amount);
        booking.description = description;

        self.source.save_booking(&booking).await?;
        Ok(booking)
    }
}
