use serde::{Deserialize, Serialize};
use std::fmt;

/// Tradeable asset, quoted in USD.
///
/// The book is single-quote: every symbol trades against the user's
/// cash balance, so the pair is fully identified by the base asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Symbol {
    Btc,
    Eth,
}

impl Symbol {
    pub const ALL: [Symbol; 2] = [Symbol::Btc, Symbol::Eth];

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Btc => "BTC",
            Symbol::Eth => "ETH",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Symbol {
    type Error = &'static str;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_uppercase().as_str() {
            "BTC" => Ok(Symbol::Btc),
            "ETH" => Ok(Symbol::Eth),
            _ => Err("Unknown symbol: must be BTC or ETH"),
        }
    }
}
