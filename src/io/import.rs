use anyhow::Result;
use std::io::Read;

use crate::application::{AppError, DashboardService};
use crate::domain::{AccountType, Cents, parse_cents};
use crate::storage::Repository;

use super::parse_date;

/// Which table a CSV file feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `account_code,name,account_type,current_balance`
    Accounts,
    /// `date,account_type,account_code,debit,credit,description`
    Ledger,
    /// `date,sale_amount,description`
    Bookings,
}

impl std::str::FromStr for ImportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accounts" => Ok(ImportKind::Accounts),
            "ledger" => Ok(ImportKind::Ledger),
            "bookings" => Ok(ImportKind::Bookings),
            other => Err(format!(
                "unknown import type '{}' (expected accounts, ledger or bookings)",
                other
            )),
        }
    }
}

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// A rejected CSV line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

impl ImportError {
    fn new(line: usize, field: Option<&str>, error: impl Into<String>) -> Self {
        Self {
            line,
            field: field.map(str::to_string),
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Validate every line without writing anything.
    pub dry_run: bool,
    /// Skip accounts whose code already exists instead of reporting an error.
    pub skip_duplicates: bool,
}

/// Loads CSV exports of the accounting tables into the local store.
///
/// Lines that fail validation are reported in [`ImportResult::errors`] and
/// do not stop the remaining lines from being imported.
pub struct Importer<'a> {
    service: &'a DashboardService<Repository>,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a DashboardService<Repository>) -> Self {
        Self { service }
    }

    pub async fn import<R: Read>(
        &self,
        kind: ImportKind,
        reader: R,
        options: &ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let mut result = ImportResult::default();

        for (index, record) in csv_reader.records().enumerate() {
            let line = index + 2; // header is line 1

            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    result
                        .errors
                        .push(ImportError::new(line, None, format!("CSV parse error: {}", e)));
                    continue;
                }
            };

            let outcome = match kind {
                ImportKind::Accounts => self.import_account(line, &record, options).await,
                ImportKind::Ledger => self.import_ledger_entry(line, &record, options).await,
                ImportKind::Bookings => self.import_booking(line, &record, options).await,
            };

            match outcome {
                Ok(LineOutcome::Imported) => result.imported += 1,
                Ok(LineOutcome::Skipped) => result.skipped += 1,
                Err(error) => result.errors.push(error),
            }
        }

        tracing::info!(
            ?kind,
            imported = result.imported,
            skipped = result.skipped,
            errors = result.errors.len(),
            dry_run = options.dry_run,
            "import finished"
        );
        Ok(result)
    }

    async fn import_account(
        &self,
        line: usize,
        record: &csv::StringRecord,
        options: &ImportOptions,
    ) -> Result<LineOutcome, ImportError> {
        let code = required(record, 0, "account_code", line)?;
        let name = required(record, 1, "name", line)?;
        let account_type = account_type_field(record, 2, line)?;
        let balance = optional_amount(record, 3, "current_balance", line)?;

        if options.dry_run {
            return Ok(LineOutcome::Imported);
        }

        match self
            .service
            .create_account(code.to_string(), name.to_string(), account_type, balance)
            .await
        {
            Ok(_) => Ok(LineOutcome::Imported),
            Err(AppError::AccountAlreadyExists(_)) if options.skip_duplicates => {
                Ok(LineOutcome::Skipped)
            }
            Err(e) => Err(ImportError::new(line, Some("account_code"), e.to_string())),
        }
    }

    async fn import_ledger_entry(
        &self,
        line: usize,
        record: &csv::StringRecord,
        options: &ImportOptions,
    ) -> Result<LineOutcome, ImportError> {
        let date = date_field(record, 0, line)?;
        let account_type = account_type_field(record, 1, line)?;
        let account_code = non_empty(record, 2);
        let debit = optional_amount(record, 3, "debit", line)?.unwrap_or(0);
        let credit = optional_amount(record, 4, "credit", line)?.unwrap_or(0);
        let description = non_empty(record, 5);

        if debit < 0 || credit < 0 {
            return Err(ImportError::new(
                line,
                Some(if debit < 0 { "debit" } else { "credit" }),
                "Amount must not be negative",
            ));
        }

        if options.dry_run {
            return Ok(LineOutcome::Imported);
        }

        self.service
            .record_ledger_entry(date, account_type, debit, credit, account_code, description)
            .await
            .map(|_| LineOutcome::Imported)
            .map_err(|e| ImportError::new(line, None, e.to_string()))
    }

    async fn import_booking(
        &self,
        line: usize,
        record: &csv::StringRecord,
        options: &ImportOptions,
    ) -> Result<LineOutcome, ImportError> {
        let date = date_field(record, 0, line)?;
        let sale_amount = optional_amount(record, 1, "sale_amount", line)?.unwrap_or(0);
        let description = non_empty(record, 2);

        if sale_amount < 0 {
            return Err(ImportError::new(
                line,
                Some("sale_amount"),
                "Amount must not be negative",
            ));
        }

        if options.dry_run {
            return Ok(LineOutcome::Imported);
        }

        self.service
            .record_booking(date, sale_amount, description)
            .await
            .map(|_| LineOutcome::Imported)
            .map_err(|e| ImportError::new(line, None, e.to_string()))
    }
}

enum LineOutcome {
    Imported,
    Skipped,
}

fn non_empty(record: &csv::StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn required<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    field: &str,
    line: usize,
) -> Result<&'r str, ImportError> {
    record
        .get(index)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ImportError::new(line, Some(field), "Missing value"))
}

fn optional_amount(
    record: &csv::StringRecord,
    index: usize,
    field: &str,
    line: usize,
) -> Result<Option<Cents>, ImportError> {
    match record.get(index).filter(|s| !s.is_empty()) {
        Some(value) => parse_cents(value)
            .map(Some)
            .map_err(|e| ImportError::new(line, Some(field), format!("Invalid amount: {}", e))),
        None => Ok(None),
    }
}

fn account_type_field(
    record: &csv::StringRecord,
    index: usize,
    line: usize,
) -> Result<AccountType, ImportError> {
    let value = required(record, index, "account_type", line)?;
    AccountType::parse(value).ok_or_else(|| {
        ImportError::new(
            line,
            Some("account_type"),
            format!("Unknown account type: {}", value),
        )
    })
}

fn date_field(
    record: &csv::StringRecord,
    index: usize,
    line: usize,
) -> Result<chrono::DateTime<chrono::Utc>, ImportError> {
    let value = required(record, index, "date", line)?;
    parse_date(value)
        .map_err(|e| ImportError::new(line, Some("date"), format!("Invalid date: {:#}", e)))
}
