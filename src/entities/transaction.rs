// 🧾 Transaction Record + append-only log
//
// Log line: accountNumber,kind,amount,purpose,isoDate
//
// Records are never rewritten once appended. The log is an audit trail only:
// balances are read from the account store, never recomputed from here.

use crate::entities::account::parse_decimal;
use crate::entities::category::SpendCategory;
use crate::error::RecordError;
use crate::parser::{parse_records, skip_defects, FlatRecord, ParsedLine};
use crate::store::LineStore;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdrawal => "Withdrawal",
        }
    }

    pub fn parse(text: &str) -> Option<TransactionKind> {
        match text {
            "Deposit" => Some(TransactionKind::Deposit),
            "Withdrawal" => Some(TransactionKind::Withdrawal),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Not checked against the account store
    pub account_number: String,
    pub kind: TransactionKind,
    /// Signed as the caller passed it
    pub amount: Decimal,
    pub purpose: Option<String>,
    pub date: NaiveDate,
}

impl TransactionRecord {
    /// Spend category, for withdrawals tagged with a known purpose
    pub fn spend_category(&self) -> Option<SpendCategory> {
        if self.kind != TransactionKind::Withdrawal {
            return None;
        }
        self.purpose.as_deref().and_then(SpendCategory::from_purpose)
    }
}

impl FlatRecord for TransactionRecord {
    fn from_fields(fields: &[String]) -> std::result::Result<Self, RecordError> {
        // The date is always last, so a purpose containing commas is rejoined
        if fields.len() < 5 {
            return Err(RecordError::FieldCount {
                expected: 5,
                found: fields.len(),
            });
        }
        let last = fields.len() - 1;

        let kind = TransactionKind::parse(&fields[1])
            .ok_or_else(|| RecordError::UnknownKind(fields[1].clone()))?;

        let amount = parse_decimal(&fields[2]).ok_or_else(|| RecordError::InvalidNumber {
            field: "amount",
            value: fields[2].clone(),
        })?;

        let purpose = fields[3..last].join(",");
        let purpose = if purpose.is_empty() { None } else { Some(purpose) };

        let date = NaiveDate::parse_from_str(fields[last].trim(), DATE_FORMAT)
            .map_err(|_| RecordError::InvalidDate(fields[last].clone()))?;

        Ok(TransactionRecord {
            account_number: fields[0].clone(),
            kind,
            amount,
            purpose,
            date,
        })
    }

    fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.account_number,
            self.kind,
            self.amount,
            self.purpose.as_deref().unwrap_or(""),
            self.date.format(DATE_FORMAT)
        )
    }
}

// ============================================================================
// TRANSACTION LOG
// ============================================================================

/// TransactionLog - append-only record of every applied transaction
pub struct TransactionLog {
    store: Box<dyn LineStore>,
}

impl TransactionLog {
    pub fn new(store: impl LineStore + 'static) -> Self {
        TransactionLog {
            store: Box::new(store),
        }
    }

    pub fn append(&self, record: &TransactionRecord) -> Result<()> {
        self.store.append_line(&record.to_line())
    }

    /// Every log line, parsed or rejected, in append order
    pub fn scan(&self) -> Result<Vec<ParsedLine<TransactionRecord>>> {
        let text = self.store.read_all()?;
        parse_records(&text)
            .with_context(|| format!("Failed to parse transaction log {}", self.store.describe()))
    }

    /// Valid records in append order; malformed lines are skipped with a warning
    pub fn records(&self) -> Result<Vec<TransactionRecord>> {
        let parsed = self.scan()?;
        Ok(skip_defects(parsed, &self.store.describe()))
    }

    /// Valid records matching `filter`, in append order
    pub fn filter<F>(&self, filter: F) -> Result<Vec<TransactionRecord>>
    where
        F: Fn(&TransactionRecord) -> bool,
    {
        Ok(self.records()?.into_iter().filter(|r| filter(r)).collect())
    }

    /// Records whose account number matches exactly
    pub fn for_account(&self, account_number: &str) -> Result<Vec<TransactionRecord>> {
        self.filter(|r| r.account_number == account_number)
    }
}
