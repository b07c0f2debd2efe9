// 🏷️ Spend Category - the closed set of withdrawal purposes

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpendCategory {
    #[serde(rename = "Online Shopping")]
    OnlineShopping,

    #[serde(rename = "POS")]
    Pos,

    #[serde(rename = "ATM")]
    Atm,
}

impl SpendCategory {
    /// All categories, in display order
    pub const ALL: [SpendCategory; 3] = [
        SpendCategory::OnlineShopping,
        SpendCategory::Pos,
        SpendCategory::Atm,
    ];

    /// Label as written in the transaction log
    pub fn label(&self) -> &'static str {
        match self {
            SpendCategory::OnlineShopping => "Online Shopping",
            SpendCategory::Pos => "POS",
            SpendCategory::Atm => "ATM",
        }
    }

    /// Exact, case-sensitive match against a logged purpose
    pub fn from_purpose(purpose: &str) -> Option<SpendCategory> {
        Self::ALL.into_iter().find(|c| c.label() == purpose)
    }
}

impl fmt::Display for SpendCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_purpose_exact_match() {
        assert_eq!(SpendCategory::from_purpose("ATM"), Some(SpendCategory::Atm));
        assert_eq!(SpendCategory::from_purpose("POS"), Some(SpendCategory::Pos));
        assert_eq!(
            SpendCategory::from_purpose("Online Shopping"),
            Some(SpendCategory::OnlineShopping)
        );
    }

    #[test]
    fn test_from_purpose_rejects_near_misses() {
        assert_eq!(SpendCategory::from_purpose("atm"), None);
        assert_eq!(SpendCategory::from_purpose(" ATM"), None);
        assert_eq!(SpendCategory::from_purpose("Groceries"), None);
        assert_eq!(SpendCategory::from_purpose(""), None);
    }

    #[test]
    fn test_display_order() {
        let labels: Vec<&str> = SpendCategory::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["Online Shopping", "POS", "ATM"]);

        let mut sorted = SpendCategory::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, SpendCategory::ALL.to_vec(), "Ord should follow display order");
    }
}
