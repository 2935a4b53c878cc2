use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type AccountId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountType {
    /// Cash, bank, receivables, inventory
    Asset,
    /// Payables, loans
    Liability,
    /// Owner's capital, retained earnings
    Equity,
    /// Sales and other income
    Revenue,
    /// Operating costs
    Expense,
    /// Direct cost of the goods sold; reported alongside expenses
    CostOfGoodsSold,
}

impl AccountType {
    pub const ALL: [AccountType; 6] = [
        AccountType::Asset,
        AccountType::Liability,
        AccountType::Equity,
        AccountType::Revenue,
        AccountType::Expense,
        AccountType::CostOfGoodsSold,
    ];

    /// Account types whose ledger movements count as expenses in the trend.
    pub const EXPENSE_TYPES: [AccountType; 2] =
        [AccountType::Expense, AccountType::CostOfGoodsSold];

    /// Name as stored in the chart of accounts.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "Asset",
            AccountType::Liability => "Liability",
            AccountType::Equity => "Equity",
            AccountType::Revenue => "Revenue",
            AccountType::Expense => "Expense",
            AccountType::CostOfGoodsSold => "Cost of Goods Sold",
        }
    }

    /// Case-insensitive parse. Returns `None` for anything outside the chart of accounts.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Some(AccountType::Asset),
            "liability" => Some(AccountType::Liability),
            "equity" => Some(AccountType::Equity),
            "revenue" => Some(AccountType::Revenue),
            "expense" => Some(AccountType::Expense),
            "cost of goods sold" | "cost_of_goods_sold" | "cogs" => {
                Some(AccountType::CostOfGoodsSold)
            }
            _ => None,
        }
    }

    pub fn display(&self) -> &'static AccountTypeDisplay {
        DISPLAY_TABLE
            .iter()
            .find(|(account_type, _)| account_type == self)
            .map(|(_, display)| display)
            .unwrap_or(&DEFAULT_DISPLAY)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown account type: {}", s))
    }
}

/// Presentation metadata for an account category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccountTypeDisplay {
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

static DISPLAY_TABLE: [(AccountType, AccountTypeDisplay); 6] = [
    (
        AccountType::Asset,
        AccountTypeDisplay {
            label: "Aset",
            icon: "wallet",
            color: "blue",
        },
    ),
    (
        AccountType::Liability,
        AccountTypeDisplay {
            label: "Kewajiban",
            icon: "credit-card",
            color: "red",
        },
    ),
    (
        AccountType::Equity,
        AccountTypeDisplay {
            label: "Ekuitas",
            icon: "landmark",
            color: "purple",
        },
    ),
    (
        AccountType::Revenue,
        AccountTypeDisplay {
            label: "Pendapatan",
            icon: "trending-up",
            color: "green",
        },
    ),
    (
        AccountType::Expense,
        AccountTypeDisplay {
            label: "Biaya",
            icon: "trending-down",
            color: "orange",
        },
    ),
    (
        AccountType::CostOfGoodsSold,
        AccountTypeDisplay {
            label: "Harga Pokok Penjualan",
            icon: "package",
            color: "amber",
        },
    ),
];

/// Used for any account type string not in the chart of accounts.
pub static DEFAULT_DISPLAY: AccountTypeDisplay = AccountTypeDisplay {
    label: "Lainnya",
    icon: "circle",
    color: "gray",
};

/// Display metadata for a raw account type string. Never fails.
pub fn display_for(raw_account_type: &str) -> &'static AccountTypeDisplay {
    AccountType::parse(raw_account_type)
        .map(|account_type| account_type.display())
        .unwrap_or(&DEFAULT_DISPLAY)
}

/// Category label for a raw account type string, e.g. "Asset" -> "Aset".
pub fn classify_account_type(raw_account_type: &str) -> &'static str {
    display_for(raw_account_type).label
}

/// A row of the chart of accounts.
///
/// The type is kept as stored, so rows written by other tools with a type
/// outside [`AccountType`] still load. Use [`AccountRecord::kind`] to match on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,
    pub account_code: String,
    pub name: String,
    pub account_type: String,
    /// `None` when the source row carries no balance.
    pub current_balance: Option<Cents>,
}

impl AccountRecord {
    pub fn new(
        account_code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_code: account_code.into(),
            name: name.into(),
            account_type: account_type.as_str().to_string(),
            current_balance: None,
        }
    }

    /// Keep an arbitrary type string, e.g. one read back from storage.
    pub fn with_raw_type(mut self, account_type: impl Into<String>) -> Self {
        self.account_type = account_type.into();
        self
    }

    /// The parsed account type, `None` when the stored string is not a known type.
    pub fn kind(&self) -> Option<AccountType> {
        AccountType::parse(&self.account_type)
    }

    pub fn display(&self) -> &'static AccountTypeDisplay {
        display_for(&self.account_type)
    }

    pub fn with_balance(mut self, balance: Cents) -> Self {
        self.current_balance = Some(balance);
        self
    }

    /// Signed balance, treating a missing value as zero.
    pub fn balance(&self) -> Cents {
        self.current_balance.unwrap_or(0)
    }
}
