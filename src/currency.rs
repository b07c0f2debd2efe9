// 💱 Currency Conversion - fixed example rates into INR
// Pure lookup, no state and no rate refresh.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Gbp];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    /// INR per one unit of this currency
    pub fn rate_to_inr(&self) -> Decimal {
        match self {
            Currency::Usd => Decimal::new(825, 1),
            Currency::Eur => Decimal::new(897, 1),
            Currency::Gbp => Decimal::new(1012, 1),
        }
    }

    /// Menu choice "1".."3" → currency
    pub fn from_menu_choice(choice: &str) -> Option<Currency> {
        match choice.trim() {
            "1" => Some(Currency::Usd),
            "2" => Some(Currency::Eur),
            "3" => Some(Currency::Gbp),
            _ => None,
        }
    }

    /// None when the product does not fit in a Decimal
    pub fn convert_to_inr(&self, amount: Decimal) -> Option<Decimal> {
        amount.checked_mul(self.rate_to_inr())
    }
}
