// ⚠️ Error types
// Typed errors for the ledger domain. I/O paths use anyhow (with context),
// these enums describe the failures callers may want to match on.

use rust_decimal::Decimal;

/// Why a persisted line could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("unknown transaction kind: {0:?}")]
    UnknownKind(String),

    #[error("invalid date: {0:?}")]
    InvalidDate(String),
}

/// Rejections raised by the ledger engine before anything is written
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("account {0} already exists")]
    DuplicateAccount(String),

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{field} must not contain commas or line breaks: {value:?}")]
    UnsafeField { field: &'static str, value: String },

    #[error("opening balance must not be negative (got {0})")]
    NegativeOpeningBalance(Decimal),

    #[error("amount {amount} overflows balance {balance}")]
    Overflow { balance: Decimal, amount: Decimal },
}
