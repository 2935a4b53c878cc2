use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccountType, Cents, sum_cents};

pub type EntryId = Uuid;
pub type BookingId = Uuid;

/// Half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// A general ledger line. Debit and credit are both non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub date: DateTime<Utc>,
    pub account_type: AccountType,
    pub account_code: Option<String>,
    pub debit: Cents,
    pub credit: Cents,
    pub description: Option<String>,
}

impl LedgerEntry {
    pub fn new(
        date: DateTime<Utc>,
        account_type: AccountType,
        debit: Cents,
        credit: Cents,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            account_type,
            account_code: None,
            debit,
            credit,
            description: None,
        }
    }

    pub fn with_account_code(mut self, account_code: impl Into<String>) -> Self {
        self.account_code = Some(account_code.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Net movement on a debit-normal account (expenses, cost of goods sold).
    pub fn net_debit(&self) -> Cents {
        self.debit.saturating_sub(self.credit)
    }
}

/// A sale recorded in the bookings table. Only contributes to revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: BookingId,
    pub date: DateTime<Utc>,
    /// `None` when the source row carries no amount.
    pub sale_amount: Option<Cents>,
    pub description: Option<String>,
}

impl BookingRecord {
    pub fn new(date: DateTime<Utc>, sale_amount: Cents) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            sale_amount: Some(sale_amount),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Total sales over a set of bookings; missing amounts count as zero.
pub fn total_revenue(bookings: &[BookingRecord]) -> Cents {
    sum_cents(bookings.iter().filter_map(|b| b.sale_amount))
}

/// Expense magnitude over a set of ledger entries: `|Σ(debit − credit)|`.
pub fn total_expenses(entries: &[LedgerEntry]) -> Cents {
    sum_cents(entries.iter().map(LedgerEntry::net_debit)).saturating_abs()
}
