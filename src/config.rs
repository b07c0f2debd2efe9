//! Configuration
//!
//! Store locations and display settings, read from environment variables
//! (a `.env` file is loaded first by the binary).

use crate::statement::DEFAULT_STATEMENT_LIMIT;
use std::path::PathBuf;

pub const DEFAULT_ACCOUNTS_FILE: &str = "accounts.txt";
pub const DEFAULT_TRANSACTIONS_FILE: &str = "transactions.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Account store path
    pub accounts_file: PathBuf,

    /// Transaction log path
    pub transactions_file: PathBuf,

    /// Entries shown in a mini-statement
    pub statement_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            accounts_file: PathBuf::from(DEFAULT_ACCOUNTS_FILE),
            transactions_file: PathBuf::from(DEFAULT_TRANSACTIONS_FILE),
            statement_limit: DEFAULT_STATEMENT_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key → value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let accounts_file = lookup("LEDGER_ACCOUNTS_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.accounts_file);

        let transactions_file = lookup("LEDGER_TRANSACTIONS_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.transactions_file);

        let statement_limit = match lookup("LEDGER_STATEMENT_LIMIT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LEDGER_STATEMENT_LIMIT"))?,
            None => defaults.statement_limit,
        };

        if accounts_file == transactions_file {
            return Err(ConfigError::SameFile);
        }

        Ok(Config {
            accounts_file,
            transactions_file,
            statement_limit,
        })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),

    #[error("Account store and transaction log must be different files")]
    SameFile,
}
