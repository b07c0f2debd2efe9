// 📄 Mini-statement - the most recent entries for one account

use crate::entities::{TransactionLog, TransactionRecord};
use anyhow::Result;

/// Default number of entries in a mini-statement
pub const DEFAULT_STATEMENT_LIMIT: usize = 5;

pub struct StatementView<'a> {
    log: &'a TransactionLog,
}

impl<'a> StatementView<'a> {
    pub fn new(log: &'a TransactionLog) -> Self {
        StatementView { log }
    }

    /// Last `limit` records for the account, oldest first
    ///
    /// Matches the parsed account-number field exactly, so "10" never picks
    /// up entries belonging to "100".
    pub fn recent_transactions(
        &self,
        account_number: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>> {
        let matches = self.log.for_account(account_number)?;
        let skip = matches.len().saturating_sub(limit);
        Ok(matches.into_iter().skip(skip).collect())
    }
}
