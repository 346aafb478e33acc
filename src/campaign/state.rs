use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET_AMOUNT: f64 = 1000.0;
pub const DEFAULT_UNIT_VALUE: f64 = 50.0;
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// A currency offered by the configuration panel.
///
/// The symbol is only a display label; amounts are never converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub symbol: &'static str,
    pub code: &'static str,
    pub name: &'static str,
}

pub const CURRENCIES: &[Currency] = &[
    Currency {
        symbol: "$",
        code: "USD",
        name: "US Dollar",
    },
    Currency {
        symbol: "R$",
        code: "BRL",
        name: "Brazilian Real",
    },
    Currency {
        symbol: "€",
        code: "EUR",
        name: "Euro",
    },
    Currency {
        symbol: "£",
        code: "GBP",
        name: "British Pound",
    },
    Currency {
        symbol: "¥",
        code: "JPY",
        name: "Japanese Yen",
    },
];

impl Currency {
    /// Looks up a known currency by ISO code (case-insensitive) or symbol.
    pub fn find(input: &str) -> Option<&'static Currency> {
        let input = input.trim();
        CURRENCIES
            .iter()
            .find(|c| c.symbol == input || c.code.eq_ignore_ascii_case(input))
    }

    /// Maps user input to the symbol to store.
    ///
    /// Known codes and symbols resolve to the symbol, other text is kept as
    /// free entry. Blank input yields `None`.
    pub fn resolve_symbol(input: &str) -> Option<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match Self::find(trimmed) {
            Some(c) => c.symbol.to_string(),
            None => trimmed.to_string(),
        })
    }
}

/// The persisted campaign: target, value per sale, progress and currency label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CampaignState {
    pub target_amount: f64,
    pub unit_value: f64,
    pub sales_count: u64,
    pub currency_symbol: String,
}

impl Default for CampaignState {
    fn default() -> Self {
        Self {
            target_amount: DEFAULT_TARGET_AMOUNT,
            unit_value: DEFAULT_UNIT_VALUE,
            sales_count: 0,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl CampaignState {
    /// Whether every numeric field holds a value the store could have produced.
    pub fn is_valid(&self) -> bool {
        is_amount(self.target_amount) && is_amount(self.unit_value)
    }
}

fn is_amount(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

/// Clamps user input for an amount field: negatives, NaN and infinities become zero.
pub fn clamp_amount(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}
