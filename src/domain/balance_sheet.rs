use serde::{Deserialize, Serialize};

use super::{AccountRecord, AccountType, Cents, sum_cents};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceSheetCategory {
    Assets,
    Liabilities,
    Equity,
}

impl BalanceSheetCategory {
    /// Fixed output order.
    pub const ALL: [BalanceSheetCategory; 3] = [
        BalanceSheetCategory::Assets,
        BalanceSheetCategory::Liabilities,
        BalanceSheetCategory::Equity,
    ];

    pub fn for_account_type(account_type: AccountType) -> Option<Self> {
        match account_type {
            AccountType::Asset => Some(BalanceSheetCategory::Assets),
            AccountType::Liability => Some(BalanceSheetCategory::Liabilities),
            AccountType::Equity => Some(BalanceSheetCategory::Equity),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BalanceSheetCategory::Assets => "Aset",
            BalanceSheetCategory::Liabilities => "Kewajiban",
            BalanceSheetCategory::Equity => "Ekuitas",
        }
    }

    fn index(&self) -> usize {
        match self {
            BalanceSheetCategory::Assets => 0,
            BalanceSheetCategory::Liabilities => 1,
            BalanceSheetCategory::Equity => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetSlice {
    pub category: BalanceSheetCategory,
    pub label: String,
    pub amount: Cents,
}

/// Non-zero balance-sheet categories, in Assets/Liabilities/Equity order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetSummary {
    pub slices: Vec<BalanceSheetSlice>,
}

impl BalanceSheetSummary {
    pub fn total(&self) -> Cents {
        sum_cents(self.slices.iter().map(|s| s.amount))
    }

    pub fn amount_for(&self, category: BalanceSheetCategory) -> Cents {
        self.slices
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.amount)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Roll accounts up into a balance-sheet breakdown.
///
/// Each Asset, Liability and Equity account contributes the absolute value of
/// its current balance (missing balance = 0). Other account types are ignored,
/// and categories that total zero are left out.
pub fn summarize_balance_sheet(accounts: &[AccountRecord]) -> BalanceSheetSummary {
    let mut totals: [Cents; 3] = [0; 3];

    for account in accounts {
        if let Some(category) = account.kind().and_then(BalanceSheetCategory::for_account_type) {
            let total = &mut totals[category.index()];
            *total = total.saturating_add(account.balance().saturating_abs());
        }
    }

    let slices = BalanceSheetCategory::ALL
        .iter()
        .filter(|category| totals[category.index()] != 0)
        .map(|category| BalanceSheetSlice {
            category: *category,
            label: category.label().to_string(),
            amount: totals[category.index()],
        })
        .collect();

    BalanceSheetSummary { slices }
}
