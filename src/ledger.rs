// ⚖️ Ledger Engine - the balance mutation protocol
//
// One transaction = read the whole account store, check the guard, rewrite
// the whole store, append one log line. The store and the log are treated as
// a single consistency domain: a declined transaction touches neither.

use crate::auth::hash_password;
use crate::entities::{Account, AccountRepository, TransactionKind, TransactionLog, TransactionRecord};
use crate::error::LedgerError;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

// ============================================================================
// OUTCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransactionOutcome {
    /// Store rewritten and log appended. `balance` is None when no account
    /// with that number exists (the log entry is written anyway).
    Applied { balance: Option<Decimal> },

    /// Withdrawal guard tripped; nothing was written
    InsufficientFunds { balance: Decimal, requested: Decimal },
}

impl TransactionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransactionOutcome::Applied { .. })
    }

    pub fn new_balance(&self) -> Option<Decimal> {
        match self {
            TransactionOutcome::Applied { balance } => *balance,
            TransactionOutcome::InsufficientFunds { .. } => None,
        }
    }
}

// ============================================================================
// LEDGER ENGINE
// ============================================================================

pub struct LedgerEngine<'a> {
    accounts: &'a AccountRepository,
    log: &'a TransactionLog,
}

impl<'a> LedgerEngine<'a> {
    pub fn new(accounts: &'a AccountRepository, log: &'a TransactionLog) -> Self {
        LedgerEngine { accounts, log }
    }

    /// Apply a transaction dated today (local time)
    pub fn apply_transaction(
        &self,
        account_number: &str,
        kind: TransactionKind,
        amount: Decimal,
        purpose: Option<&str>,
    ) -> Result<TransactionOutcome> {
        let today = Local::now().date_naive();
        self.apply_transaction_on(account_number, kind, amount, purpose, today)
    }

    /// Apply a transaction with an explicit date
    ///
    /// The guard compares `balance < amount` for withdrawals, and the update
    /// is always `balance += amount`. With the usual caller convention of a
    /// negative withdrawal amount the guard can never trip. Both halves are
    /// kept exactly as the stored data was produced; see `withdraw`.
    ///
    /// When several records share the number, all of them are guarded and
    /// updated, and the reported balance is the first one's. A guard failure
    /// on any of them or an overflowing sum writes nothing.
    pub fn apply_transaction_on(
        &self,
        account_number: &str,
        kind: TransactionKind,
        amount: Decimal,
        purpose: Option<&str>,
        date: NaiveDate,
    ) -> Result<TransactionOutcome> {
        let mut entries = self.accounts.scan()?;

        // Every valid line carrying this number is guarded and updated together
        let mut targets: Vec<&mut Account> = entries
            .iter_mut()
            .filter_map(|entry| entry.as_mut().ok())
            .filter(|account| account.account_number == account_number)
            .collect();

        if kind == TransactionKind::Withdrawal {
            if let Some(short) = targets.iter().find(|account| account.balance < amount) {
                tracing::warn!(
                    account = account_number,
                    balance = %short.balance,
                    requested = %amount,
                    "insufficient balance, transaction declined"
                );
                return Ok(TransactionOutcome::InsufficientFunds {
                    balance: short.balance,
                    requested: amount,
                });
            }
        }

        // Compute every new balance before touching any record
        let updated = targets
            .iter()
            .map(|account| {
                account.balance.checked_add(amount).ok_or(LedgerError::Overflow {
                    balance: account.balance,
                    amount,
                })
            })
            .collect::<std::result::Result<Vec<Decimal>, LedgerError>>()?;

        for (account, balance) in targets.iter_mut().zip(&updated) {
            account.balance = *balance;
        }

        let new_balance = updated.first().copied();
        if new_balance.is_none() {
            tracing::warn!(account = account_number, "no such account, logging transaction anyway");
        }

        self.accounts.rewrite(&entries)?;

        let record = TransactionRecord {
            account_number: account_number.to_string(),
            kind,
            amount,
            purpose: purpose.filter(|p| !p.is_empty()).map(|p| p.to_string()),
            date,
        };
        self.log.append(&record)?;

        tracing::info!(
            account = account_number,
            %kind,
            %amount,
            balance = ?new_balance,
            "transaction applied"
        );

        Ok(TransactionOutcome::Applied {
            balance: new_balance,
        })
    }

    /// Credit `amount` to the account
    pub fn deposit(&self, account_number: &str, amount: Decimal) -> Result<TransactionOutcome> {
        self.apply_transaction(account_number, TransactionKind::Deposit, amount, None)
    }

    /// Debit `amount` (given as a positive number) from the account
    ///
    /// The amount is negated before it reaches the engine, which is how every
    /// withdrawal in existing logs was recorded. The balance guard therefore
    /// does not block overdrafts on this path.
    pub fn withdraw(
        &self,
        account_number: &str,
        amount: Decimal,
        purpose: &str,
    ) -> Result<TransactionOutcome> {
        self.apply_transaction(
            account_number,
            TransactionKind::Withdrawal,
            -amount,
            Some(purpose),
        )
    }

    /// Current balance from the account store
    pub fn balance(&self, account_number: &str) -> Result<Option<Decimal>> {
        Ok(self.accounts.find(account_number)?.map(|a| a.balance))
    }

    /// Create and persist a new account
    ///
    /// Unlike `AccountRepository::append`, this refuses numbers already in
    /// the store and values that would break the line format.
    pub fn open_account(
        &self,
        account_number: &str,
        name: &str,
        password: &str,
        opening_balance: Decimal,
    ) -> Result<Account> {
        check_field("account number", account_number)?;
        check_field("name", name)?;

        if opening_balance < Decimal::ZERO {
            return Err(LedgerError::NegativeOpeningBalance(opening_balance).into());
        }

        if self.accounts.find(account_number)?.is_some() {
            return Err(LedgerError::DuplicateAccount(account_number.to_string()).into());
        }

        let account = Account::new(account_number, name, hash_password(password), opening_balance);
        self.accounts.append(&account)?;

        tracing::info!(account = account_number, "account created");
        Ok(account)
    }
}

fn check_field(field: &'static str, value: &str) -> std::result::Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::EmptyField { field });
    }
    if value.contains([',', '\n', '\r']) {
        return Err(LedgerError::UnsafeField {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
