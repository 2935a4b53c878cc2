use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::{
    AccountCardsReport, BalanceSheetReport, Dashboard, DashboardService, FigureStatus, TrendSeries,
};
use crate::domain::{AccountType, format_rupiah, parse_cents};
use crate::io::{
    ImportKind, ImportOptions, Importer, parse_date, write_account_cards_csv,
    write_balance_sheet_csv, write_trend_csv,
};
use crate::storage::Repository;

type Service = DashboardService<Repository>;

/// Neraca - small-business financial dashboard
#[derive(Parser)]
#[command(name = "neraca")]
#[command(about = "Balance sheet, account cards and revenue/expense trend for a small-business ledger")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "NERACA_DATABASE", default_value = "neraca.db")]
    pub database: String,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// The dashboard mixes several tables, so it has no single csv rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DashboardFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Chart of accounts commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Record a general ledger line
    Ledger {
        /// Account type: Asset, Liability, Equity, Revenue, Expense, "Cost of Goods Sold"
        #[arg(short = 't', long = "type")]
        account_type: String,

        /// Debit amount (e.g., "30000" or "30000.50")
        #[arg(long, default_value = "0")]
        debit: String,

        /// Credit amount
        #[arg(long, default_value = "0")]
        credit: String,

        /// Account code the line is posted to
        #[arg(long)]
        code: Option<String>,

        /// Date of the entry (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Record a sale
    Booking {
        /// Sale amount
        amount: String,

        /// Date of the sale (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Import accounts, ledger lines or bookings from CSV
    Import {
        /// What to import: accounts, ledger, bookings
        import_type: String,

        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Validate without importing
        #[arg(long)]
        dry_run: bool,

        /// Skip accounts whose code already exists
        #[arg(long)]
        skip_duplicates: bool,
    },

    /// Dashboard reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Show every dashboard widget at once
    Dashboard {
        /// Reference date (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        as_of: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: DashboardFormat,
    },
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Add an account to the chart of accounts
    Create {
        /// Account code (must be unique, e.g. 1101)
        code: String,

        /// Account name
        name: String,

        /// Account type: Asset, Liability, Equity, Revenue, Expense, "Cost of Goods Sold"
        #[arg(short = 't', long = "type")]
        account_type: String,

        /// Current balance (may be negative)
        #[arg(short, long, allow_hyphen_values = true)]
        balance: Option<String>,
    },

    /// List the chart of accounts
    List,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Assets, liabilities and equity totals
    BalanceSheet {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Revenue and expenses for the last twelve months
    Trend {
        /// Reference date (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        as_of: Option<String>,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Account balance cards
    Cards {
        /// Restrict to these account codes (repeatable)
        #[arg(long = "code")]
        codes: Vec<String>,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

impl Cli {
    /// Install the stderr log subscriber. `RUST_LOG` takes precedence over `--verbose`.
    pub fn init_logging(&self) {
        let default_level = if self.verbose { "debug" } else { "warn" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_filter(filter),
            )
            .init();
    }

    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                Service::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Account(account_cmd) => {
                let service = Service::connect(&self.database).await?;
                run_account_command(&service, account_cmd).await?;
            }

            Commands::Ledger {
                account_type,
                debit,
                credit,
                code,
                date,
                description,
            } => {
                let service = Service::connect(&self.database).await?;
                let account_type = parse_account_type(&account_type)?;
                let debit = parse_amount(&debit)?;
                let credit = parse_amount(&credit)?;
                let date = parse_optional_date(date)?;

                let entry = service
                    .record_ledger_entry(date, account_type, debit, credit, code, description)
                    .await?;

                println!(
                    "Ledger line recorded: {} {} debit {} credit {}",
                    entry.date.format("%Y-%m-%d"),
                    entry.account_type,
                    format_rupiah(entry.debit),
                    format_rupiah(entry.credit)
                );
            }

            Commands::Booking {
                amount,
                date,
                description,
            } => {
                let service = Service::connect(&self.database).await?;
                let amount = parse_amount(&amount)?;
                let date = parse_optional_date(date)?;

                let booking = service.record_booking(date, amount, description).await?;

                println!(
                    "Booking recorded: {} {}",
                    booking.date.format("%Y-%m-%d"),
                    format_rupiah(amount)
                );
            }

            Commands::Import {
                import_type,
                input,
                dry_run,
                skip_duplicates,
            } => {
                let service = Service::connect(&self.database).await?;
                let options = ImportOptions {
                    dry_run,
                    skip_duplicates,
                };
                run_import_command(&service, &import_type, input, options).await?;
            }

            Commands::Report(report_cmd) => {
                let service = Service::connect(&self.database).await?;
                run_report_command(&service, report_cmd).await?;
            }

            Commands::Dashboard { as_of, format } => {
                let service = Service::connect(&self.database).await?;
                let now = parse_optional_date(as_of)?;
                let dashboard = service.dashboard(now).await;

                match format {
                    DashboardFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&dashboard)?);
                    }
                    DashboardFormat::Table => print_dashboard(&dashboard),
                }
            }
        }

        Ok(())
    }
}

async fn run_account_command(service: &Service, cmd: AccountCommands) -> Result<()> {
    match cmd {
        AccountCommands::Create {
            code,
            name,
            account_type,
            balance,
        } => {
            let account_type = parse_account_type(&account_type)?;
            let balance = balance.as_deref().map(parse_amount).transpose()?;

            let account = service
                .create_account(code, name, account_type, balance)
                .await?;

            println!(
                "Account created: {} {} ({})",
                account.account_code, account.name, account.account_type
            );
        }

        AccountCommands::List => {
            let accounts = service.list_accounts().await?;
            if accounts.is_empty() {
                println!("No accounts found.");
                return Ok(());
            }

            println!(
                "{:<8} {:<28} {:<22} {:>18}",
                "CODE", "NAME", "TYPE", "BALANCE"
            );
            println!("{}", "-".repeat(79));
            for account in accounts {
                println!(
                    "{:<8} {:<28} {:<22} {:>18}",
                    account.account_code,
                    truncate(&account.name, 28),
                    account.account_type,
                    account
                        .current_balance
                        .map(format_rupiah)
                        .unwrap_or_else(|| "-".to_string())
                );
            }
        }
    }
    Ok(())
}

async fn run_import_command(
    service: &Service,
    import_type: &str,
    input: Option<String>,
    options: ImportOptions,
) -> Result<()> {
    use std::io::{Read, stdin};

    let kind: ImportKind = import_type.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let mut content = String::new();
    match input {
        Some(path) => {
            content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path))?;
        }
        None => {
            stdin()
                .read_to_string(&mut content)
                .context("Failed to read stdin")?;
        }
    }

    let importer = Importer::new(service);
    let result = importer
        .import(kind, content.as_bytes(), &options)
        .await?;

    if options.dry_run {
        println!("Dry run: {} line(s) valid", result.imported);
    } else {
        println!("Imported {} line(s)", result.imported);
    }
    if result.skipped > 0 {
        println!("Skipped {} duplicate(s)", result.skipped);
    }
    if !result.errors.is_empty() {
        println!("{} line(s) rejected:", result.errors.len());
        for error in &result.errors {
            match &error.field {
                Some(field) => println!("  line {} [{}]: {}", error.line, field, error.error),
                None => println!("  line {}: {}", error.line, error.error),
            }
        }
    }

    Ok(())
}

async fn run_report_command(service: &Service, cmd: ReportCommands) -> Result<()> {
    match cmd {
        ReportCommands::BalanceSheet { format } => {
            let report = service.balance_sheet().await;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Csv => {
                    write_balance_sheet_csv(&report, std::io::stdout())?;
                }
                OutputFormat::Table => print_balance_sheet(&report),
            }
        }

        ReportCommands::Trend { as_of, format } => {
            let now = parse_optional_date(as_of)?;
            let series = service.revenue_expense_trend(now).await;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&series)?),
                OutputFormat::Csv => {
                    write_trend_csv(&series, std::io::stdout())?;
                }
                OutputFormat::Table => print_trend(&series),
            }
        }

        ReportCommands::Cards { codes, format } => {
            let codes = if codes.is_empty() { None } else { Some(codes) };
            let report = service.account_cards(codes.as_deref()).await;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Csv => {
                    write_account_cards_csv(&report, std::io::stdout())?;
                }
                OutputFormat::Table => print_account_cards(&report),
            }
        }
    }
    Ok(())
}

fn print_status_warning(status: &FigureStatus) {
    if let FigureStatus::Failed { reason } = status {
        println!("! Data could not be loaded: {}", reason);
    }
}

fn print_balance_sheet(report: &BalanceSheetReport) {
    println!("Balance Sheet");
    println!();
    print_status_warning(&report.status);

    if report.summary.is_empty() {
        println!("No balances to show.");
        return;
    }

    let total = report.summary.total();
    for slice in &report.summary.slices {
        let share = slice.amount as f64 / total as f64 * 100.0;
        println!(
            "  {:<12} {:>20} {:>6.1}%",
            slice.label,
            format_rupiah(slice.amount),
            share
        );
    }
    println!("  {:<12} {:>20}", "", "-".repeat(20));
    println!("  {:<12} {:>20}", "Total", format_rupiah(total));
}

fn print_trend(series: &TrendSeries) {
    println!("Revenue vs Expenses");
    println!("As of: {}", series.as_of.format("%Y-%m-%d"));
    println!();
    println!(
        "{:<10} {:>20} {:>20} {:>20}",
        "MONTH", "REVENUE", "EXPENSES", "NET"
    );
    println!("{}", "-".repeat(73));

    for point in &series.points {
        let marker = if point.is_degraded() { " !" } else { "" };
        println!(
            "{:<10} {:>20} {:>20} {:>20}{}",
            point.label,
            format_rupiah(point.revenue),
            format_rupiah(point.expenses),
            format_rupiah(point.revenue - point.expenses),
            marker
        );
    }

    println!("{}", "-".repeat(73));
    println!(
        "{:<10} {:>20} {:>20} {:>20}",
        "TOTAL",
        format_rupiah(series.total_revenue()),
        format_rupiah(series.total_expenses()),
        format_rupiah(
            series
                .total_revenue()
                .saturating_sub(series.total_expenses())
        )
    );

    let degraded = series.degraded_points();
    if degraded > 0 {
        println!();
        println!(
            "! {} month(s) marked with ! could not be fully loaded and show zero",
            degraded
        );
    }
}

fn print_account_cards(report: &AccountCardsReport) {
    print_status_warning(&report.status);

    if report.cards.is_empty() {
        println!("No accounts found.");
        return;
    }

    for card in &report.cards {
        println!(
            "[{:<22}] {:<8} {:<28} {:>18}",
            card.category_label,
            card.account_code,
            truncate(&card.name, 28),
            format_rupiah(card.balance)
        );
    }
}

fn print_dashboard(dashboard: &Dashboard) {
    println!("Dashboard as of {}", dashboard.as_of.format("%Y-%m-%d"));
    println!("{}", "=".repeat(73));
    println!();
    print_account_cards(&dashboard.cards);
    println!();
    print_balance_sheet(&dashboard.balance_sheet);
    println!();
    print_trend(&dashboard.trend);
}

fn parse_account_type(value: &str) -> Result<AccountType> {
    value.parse::<AccountType>().map_err(|e| anyhow::anyhow!(e))
}

fn parse_amount(value: &str) -> Result<i64> {
    parse_cents(value).with_context(|| format!("Invalid amount '{}'", value))
}

fn parse_optional_date(value: Option<String>) -> Result<DateTime<Utc>> {
    match value {
        Some(date_str) => parse_date(&date_str),
        None => Ok(Utc::now()),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
