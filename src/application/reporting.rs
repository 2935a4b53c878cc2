use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{BalanceSheetSummary, Cents, MonthBucket, sum_cents};

/// Whether a reported figure was computed or substituted with zero after a failed query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FigureStatus {
    #[default]
    Ok,
    Failed {
        reason: String,
    },
}

impl FigureStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, FigureStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub bucket: MonthBucket,
    pub label: String,
    pub revenue: Cents,
    /// Always non-negative.
    pub expenses: Cents,
    pub revenue_status: FigureStatus,
    pub expense_status: FigureStatus,
}

impl TrendPoint {
    pub fn is_degraded(&self) -> bool {
        self.revenue_status.is_failed() || self.expense_status.is_failed()
    }
}

/// Twelve months of revenue and expenses, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub as_of: DateTime<Utc>,
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    pub fn total_revenue(&self) -> Cents {
        sum_cents(self.points.iter().map(|p| p.revenue))
    }

    pub fn total_expenses(&self) -> Cents {
        sum_cents(self.points.iter().map(|p| p.expenses))
    }

    /// Number of points with at least one figure substituted by zero.
    pub fn degraded_points(&self) -> usize {
        self.points.iter().filter(|p| p.is_degraded()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    pub summary: BalanceSheetSummary,
    pub status: FigureStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountCard {
    pub account_code: String,
    pub name: String,
    pub account_type: String,
    pub category_label: String,
    pub icon: String,
    pub color: String,
    /// Signed, so an overdrawn account stays visible.
    pub balance: Cents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountCardsReport {
    pub cards: Vec<AccountCard>,
    pub status: FigureStatus,
}

/// Everything the dashboard shows, computed for one reference instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub as_of: DateTime<Utc>,
    pub cards: AccountCardsReport,
    pub balance_sheet: BalanceSheetReport,
    pub trend: TrendSeries,
}
