#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("decimal error: {0}")]
    Decimal(#[from] rust_decimal::Error),
    #[error("{field} value {value} does not fit in an sqlite integer")]
    CounterOverflow { field: &'static str, value: u64 },
}

pub type Result<T> = std::result::Result<T, DbError>;
