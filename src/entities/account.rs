// 💳 Account Entity + Repository
//
// Store line: accountNumber,name,passwordHashHex,balance
//
// The account store is the only place balances live. Records are never
// deleted; LedgerEngine rewrites them in place.

use crate::error::RecordError;
use crate::parser::{expect_fields, parse_records, skip_defects, FlatRecord, ParsedLine};
use crate::store::LineStore;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique key across the store
    pub account_number: String,

    /// Holder name (no commas, the store does not escape them)
    pub name: String,

    /// Hex SHA-256 of the password, see auth::hash_password
    pub password_hash: String,

    pub balance: Decimal,
}

impl Account {
    pub fn new(
        account_number: impl Into<String>,
        name: impl Into<String>,
        password_hash: impl Into<String>,
        balance: Decimal,
    ) -> Self {
        Account {
            account_number: account_number.into(),
            name: name.into(),
            password_hash: password_hash.into(),
            balance,
        }
    }
}

impl FlatRecord for Account {
    fn from_fields(fields: &[String]) -> std::result::Result<Self, RecordError> {
        expect_fields(fields, 4)?;

        let balance = parse_decimal(&fields[3]).ok_or_else(|| RecordError::InvalidNumber {
            field: "balance",
            value: fields[3].clone(),
        })?;

        Ok(Account {
            account_number: fields[0].clone(),
            name: fields[1].clone(),
            password_hash: fields[2].clone(),
            balance,
        })
    }

    fn to_line(&self) -> String {
        format!(
            "{},{},{},{}",
            self.account_number, self.name, self.password_hash, self.balance
        )
    }
}

/// Decimal text as the stores write it; tolerates padding and exponents
pub(crate) fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

// ============================================================================
// ACCOUNT REPOSITORY
// ============================================================================

/// AccountRepository - load, look up, append and rewrite account records
pub struct AccountRepository {
    store: Box<dyn LineStore>,
}

impl AccountRepository {
    pub fn new(store: impl LineStore + 'static) -> Self {
        AccountRepository {
            store: Box::new(store),
        }
    }

    /// Every stored line, parsed or rejected, in store order
    pub fn scan(&self) -> Result<Vec<ParsedLine<Account>>> {
        let text = self.store.read_all()?;
        parse_records(&text)
            .with_context(|| format!("Failed to parse account store {}", self.store.describe()))
    }

    /// Valid accounts only; malformed lines are skipped with a warning
    pub fn load(&self) -> Result<Vec<Account>> {
        let parsed = self.scan()?;
        Ok(skip_defects(parsed, &self.store.describe()))
    }

    /// First account with this exact number
    pub fn find(&self, account_number: &str) -> Result<Option<Account>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|a| a.account_number == account_number))
    }

    /// Add a new account line. Duplicate numbers are not checked here.
    pub fn append(&self, account: &Account) -> Result<()> {
        self.store.append_line(&account.to_line())
    }

    /// Replace the whole store with exactly these accounts
    pub fn overwrite(&self, accounts: &[Account]) -> Result<()> {
        let lines: Vec<String> = accounts.iter().map(|a| a.to_line()).collect();
        self.store.replace_all(&lines)
    }

    /// Replace the whole store with a scanned line set
    ///
    /// Defective lines are written back verbatim so a rewrite never drops
    /// data it could not understand.
    pub fn rewrite(&self, entries: &[ParsedLine<Account>]) -> Result<()> {
        let lines: Vec<String> = entries
            .iter()
            .map(|entry| match entry {
                Ok(account) => account.to_line(),
                Err(defect) => defect.raw.clone(),
            })
            .collect();

        tracing::debug!(store = %self.store.describe(), lines = lines.len(), "rewriting account store");
        self.store.replace_all(&lines)
    }
}
