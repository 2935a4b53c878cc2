use thiserror::Error;

/// Failure reported by a [`DataSource`](super::DataSource) query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataSourceError {
    #[error("Query failed on {table}: {reason}")]
    Query { table: String, reason: String },

    #[error("Invalid row in {table}: {reason}")]
    InvalidRow { table: String, reason: String },
}

impl DataSourceError {
    pub fn query(table: &str, reason: impl std::fmt::Display) -> Self {
        DataSourceError::Query {
            table: table.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_row(table: &str, reason: impl std::fmt::Display) -> Self {
        DataSourceError::InvalidRow {
            table: table.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid account type: {0}")]
    InvalidAccountType(String),

    #[error("Data source error: {0}")]
    DataSource(#[from] DataSourceError),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
