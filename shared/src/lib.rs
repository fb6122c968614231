use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A coin amount as delivered by the wallet backend, already formatted for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amount {
    /// Formatted amount in coin units, e.g. "0.00120000"
    pub amount: String,
    /// Coin unit, e.g. "BTC" or "TBTC"
    pub unit: String,
    /// Formatted fiat values keyed by fiat unit ("USD" -> "74.52")
    #[serde(default)]
    pub conversions: BTreeMap<String, String>,
}

impl Amount {
    /// Create an amount without any fiat conversions
    pub fn new(amount: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            unit: unit.into(),
            conversions: BTreeMap::new(),
        }
    }

    /// Add a fiat conversion, replacing any previous value for that unit
    pub fn with_conversion(mut self, fiat_unit: impl Into<String>, value: impl Into<String>) -> Self {
        self.conversions.insert(fiat_unit.into(), value.into());
        self
    }

    /// Formatted fiat value for the given unit, if the backend supplied one
    pub fn conversion(&self, fiat_unit: &str) -> Option<&str> {
        self.conversions.get(fiat_unit).map(String::as_str)
    }
}

/// Balance of a single account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub available: Amount,
    #[serde(default)]
    pub has_incoming: bool,
    pub incoming: Option<Amount>,
}

/// An account together with its balance, as listed on the account summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    /// Stable account identifier
    pub code: String,
    /// User-visible account name
    pub name: String,
    pub coin_code: String,
    pub balance: Balance,
}

impl AccountSummary {
    pub fn available(&self) -> &Amount {
        &self.balance.available
    }
}

/// All accounts of one coin plus their summed balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinBalances {
    pub coin_code: String,
    pub accounts: Vec<AccountSummary>,
    pub total: Amount,
}
