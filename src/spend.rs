// 📊 Spend Analyzer - withdrawal totals per category
//
// Amounts are summed exactly as logged. Withdrawals recorded through
// LedgerEngine::withdraw are negative, so totals usually come out negative;
// renderers should draw magnitudes.

use crate::entities::{SpendCategory, TransactionLog};
use crate::error::LedgerError;
use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Totals for every category, zero when unused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendBreakdown {
    totals: BTreeMap<SpendCategory, Decimal>,
}

impl SpendBreakdown {
    pub fn new() -> Self {
        let totals = SpendCategory::ALL
            .into_iter()
            .map(|c| (c, Decimal::ZERO))
            .collect();
        SpendBreakdown { totals }
    }

    pub fn add(&mut self, category: SpendCategory, amount: Decimal) -> Result<(), LedgerError> {
        let total = self.totals.entry(category).or_insert(Decimal::ZERO);
        *total = total.checked_add(amount).ok_or(LedgerError::Overflow {
            balance: *total,
            amount,
        })?;
        Ok(())
    }

    pub fn get(&self, category: SpendCategory) -> Decimal {
        self.totals.get(&category).copied().unwrap_or(Decimal::ZERO)
    }

    /// (category, total) in display order
    pub fn iter(&self) -> impl Iterator<Item = (SpendCategory, Decimal)> + '_ {
        self.totals.iter().map(|(c, t)| (*c, *t))
    }

    /// Grand total, None if it does not fit in a Decimal
    pub fn total(&self) -> Option<Decimal> {
        self.totals
            .values()
            .try_fold(Decimal::ZERO, |sum, t| sum.checked_add(*t))
    }

    pub fn is_empty(&self) -> bool {
        self.totals.values().all(|t| t.is_zero())
    }
}

impl Default for SpendBreakdown {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SpendAnalyzer<'a> {
    log: &'a TransactionLog,
}

impl<'a> SpendAnalyzer<'a> {
    pub fn new(log: &'a TransactionLog) -> Self {
        SpendAnalyzer { log }
    }

    /// Sum of categorized withdrawals for one account
    pub fn category_totals(&self, account_number: &str) -> Result<SpendBreakdown> {
        let mut breakdown = SpendBreakdown::new();

        for record in self.log.for_account(account_number)? {
            if let Some(category) = record.spend_category() {
                breakdown.add(category, record.amount)?;
            }
        }

        Ok(breakdown)
    }
}
