// Flat Ledger - Core Library
// Account store, transaction log and the engine that keeps them consistent.
// The interactive menu (src/main.rs) is a thin layer on top of this.

pub mod auth;
pub mod config;
pub mod currency;
pub mod entities;
pub mod error;
pub mod ledger;
pub mod parser;
pub mod spend;
pub mod statement;
pub mod store;

// Re-export commonly used types
pub use auth::{hash_password, AuthGateway};
pub use config::{Config, ConfigError};
pub use currency::Currency;
pub use entities::{
    Account, AccountRepository,
    SpendCategory,
    TransactionKind, TransactionLog, TransactionRecord,
};
pub use error::{LedgerError, RecordError};
pub use ledger::{LedgerEngine, TransactionOutcome};
pub use parser::{FlatRecord, LineDefect, ParsedLine};
pub use spend::{SpendAnalyzer, SpendBreakdown};
pub use statement::{StatementView, DEFAULT_STATEMENT_LIMIT};
pub use store::{FileStore, LineStore, MemoryStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Account repository and transaction log backed by the files in `config`
pub fn open_file_ledger(config: &Config) -> (AccountRepository, TransactionLog) {
    (
        AccountRepository::new(FileStore::new(&config.accounts_file)),
        TransactionLog::new(FileStore::new(&config.transactions_file)),
    )
}
